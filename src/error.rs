use std::{io, path::PathBuf};

/// Failure while materializing a [`FixtureTree`](crate::FixtureTree).
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("failed to {op} {}", path.display())]
	Io {
		op: &'static str,
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("invalid fixture entry name {name:?}: must be a single path segment")]
	InvalidName { name: String },
	#[error("invalid mode {mode:#o} for {}", path.display())]
	InvalidMode { mode: u32, path: PathBuf },
}

impl FixtureError {
	pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
		let path = path.into();
		move |source| Self::Io { op, path, source }
	}
}

/// Materialization failed before any action ran.
///
/// Whatever was created has already had its permissions restored and, unless
/// the root is being kept, been removed. `cleanup` holds the failure of that
/// cleanup, if any.
#[derive(Debug, thiserror::Error)]
#[error("failed to set up fixtures")]
pub struct FixtureSetupError {
	#[source]
	pub source: FixtureError,
	pub cleanup: Option<CleanupError>,
}

/// A path whose permissions could not be reset to fully permissive.
#[derive(Debug, derive_new::new)]
pub struct RestoreFailure {
	pub path: PathBuf,
	pub source: io::Error,
}

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
	/// `restore` holds any permission resets that failed before removal was attempted.
	#[error("failed to remove fixture root {}", path.display())]
	Removal {
		path: PathBuf,
		#[source]
		source: io::Error,
		restore: Vec<RestoreFailure>,
	},
	#[error("failed to return to working directory {}", path.display())]
	WorkingDirectory {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("failed to restore permissions on {} path(s)", .0.len())]
	Restore(Vec<RestoreFailure>),
}

/// Outcome of a failed [`with_fixtures`](crate::with_fixtures) session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E> {
	#[error(transparent)]
	Setup(#[from] FixtureSetupError),
	/// The action failed. Cleanup still ran; if it failed too, that failure is kept in `cleanup`.
	#[error("fixture action failed: {error}")]
	Action { error: E, cleanup: Option<CleanupError> },
	/// The action succeeded but cleanup did not.
	#[error(transparent)]
	Cleanup(CleanupError),
}

impl<E> SessionError<E> {
	/// The action's own error, if that is what failed.
	pub fn action_error(&self) -> Option<&E> {
		match self {
			Self::Action { error, .. } => Some(error),
			_ => None,
		}
	}

	/// Cleanup failure, regardless of whether the action itself failed.
	pub fn cleanup_error(&self) -> Option<&CleanupError> {
		match self {
			Self::Setup(setup) => setup.cleanup.as_ref(),
			Self::Action { cleanup, .. } => cleanup.as_ref(),
			Self::Cleanup(cleanup) => Some(cleanup),
		}
	}
}
