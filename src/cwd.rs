//! The process working directory is global; only one session may have it
//! switched at a time. [`CwdGuard`] holds a process-wide lock for as long as
//! the directory is switched.

use std::{
	env,
	path::{Path, PathBuf},
};

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error};

use crate::error::{CleanupError, FixtureError};

static ACTIVE_SESSION: Mutex<()> = Mutex::new(());

/// Blocks until no other session is active. Not reentrant.
pub(crate) fn lock_session() -> MutexGuard<'static, ()> {
	ACTIVE_SESSION.lock()
}

/// Switches into a directory and returns to the previous one on [`CwdGuard::restore`] or drop.
#[must_use = "dropping restores the prior working directory"]
#[derive(Debug)]
pub(crate) struct CwdGuard {
	original: Option<PathBuf>,
}

impl CwdGuard {
	pub(crate) fn enter(dir: &Path) -> Result<Self, FixtureError> {
		let original = env::current_dir().map_err(FixtureError::io("read working directory", "."))?;
		env::set_current_dir(dir).map_err(FixtureError::io("enter", dir))?;
		debug!(from = %original.display(), to = %dir.display(), "switched working directory");
		Ok(Self { original: Some(original) })
	}

	pub(crate) fn restore(mut self) -> Result<(), CleanupError> {
		match self.original.take() {
			Some(original) => Self::return_to(original),
			None => Ok(()),
		}
	}

	fn return_to(original: PathBuf) -> Result<(), CleanupError> {
		match env::set_current_dir(&original) {
			Ok(()) => {
				debug!(to = %original.display(), "restored working directory");
				Ok(())
			}
			Err(source) => Err(CleanupError::WorkingDirectory { path: original, source }),
		}
	}
}

impl Drop for CwdGuard {
	fn drop(&mut self) {
		if let Some(original) = self.original.take()
			&& let Err(err) = Self::return_to(original)
		{
			error!(error = %err, "working directory left inside fixture root");
		}
	}
}

#[cfg(test)]
mod tests {
	use serial_test::serial;

	use super::*;

	#[test]
	#[serial]
	fn test_enter_and_restore() {
		let _session = lock_session();
		let before = env::current_dir().unwrap();
		let dir = tempfile::tempdir().unwrap();

		let guard = CwdGuard::enter(dir.path()).unwrap();
		assert_eq!(env::current_dir().unwrap(), dir.path().canonicalize().unwrap());
		guard.restore().unwrap();

		assert_eq!(env::current_dir().unwrap(), before);
	}

	#[test]
	#[serial]
	fn test_drop_restores() {
		let _session = lock_session();
		let before = env::current_dir().unwrap();
		let dir = tempfile::tempdir().unwrap();

		{
			let _guard = CwdGuard::enter(dir.path()).unwrap();
		}

		assert_eq!(env::current_dir().unwrap(), before);
	}

	#[test]
	#[serial]
	fn test_enter_missing_directory_leaves_cwd_alone() {
		let _session = lock_session();
		let before = env::current_dir().unwrap();
		let dir = tempfile::tempdir().unwrap();

		let err = CwdGuard::enter(&dir.path().join("missing")).unwrap_err();

		assert!(matches!(err, FixtureError::Io { op: "enter", .. }));
		assert_eq!(env::current_dir().unwrap(), before);
	}
}
