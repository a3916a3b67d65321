//! Scoped fixture sessions: materialize, switch into the root, run, tear down.

use std::path::Path;

use tracing::{debug, error};

use crate::{
	FixtureTree,
	config::FixtureSettings,
	cwd::{CwdGuard, lock_session},
	error::{CleanupError, FixtureSetupError, SessionError},
	fixture::TempFixture,
};

/// Run `action` inside a freshly materialized `tree`, with settings read from the environment.
///
/// See [`FixtureSettings::with_fixtures`].
pub fn with_fixtures<R, E>(tree: &FixtureTree, action: impl FnOnce(&Path) -> Result<R, E>) -> Result<R, SessionError<E>> {
	FixtureSettings::from_env().with_fixtures(tree, action)
}

impl FixtureSettings {
	/// Materialize `tree` into a new temporary root, make it the working
	/// directory, and run `action` with the root's path.
	///
	/// Whatever the action does, including panicking, the working directory is
	/// switched back, restricted paths are opened up again and the root is
	/// removed (unless [`keep`](FixtureSettings::keep) is set) before this
	/// returns. The working directory is process-wide, so sessions are
	/// serialised: a session on another thread blocks until this one finishes.
	/// The lock is not reentrant, so calling `with_fixtures` from inside an
	/// action on the same thread deadlocks.
	pub fn with_fixtures<R, E>(&self, tree: &FixtureTree, action: impl FnOnce(&Path) -> Result<R, E>) -> Result<R, SessionError<E>> {
		let _session = lock_session();

		let fixture = TempFixture::with_settings(tree, self)?;
		let cwd = match CwdGuard::enter(fixture.root()) {
			Ok(cwd) => cwd,
			Err(source) => {
				let cleanup = fixture.close().err();
				return Err(FixtureSetupError { source, cleanup }.into());
			}
		};
		debug!(root = %fixture.root().display(), restricted = fixture.restricted().len(), "entered fixture session");

		let outcome = action(fixture.root());

		let cleanup = finish(cwd, fixture);
		debug!(ok = outcome.is_ok(), "left fixture session");
		match (outcome, cleanup) {
			(Ok(value), Ok(())) => Ok(value),
			(Ok(_), Err(cleanup)) => Err(SessionError::Cleanup(cleanup)),
			(Err(error), cleanup) => Err(SessionError::Action { error, cleanup: cleanup.err() }),
		}
	}
}

/// Both steps always run; a working directory failure wins over a fixture cleanup failure.
fn finish(cwd: CwdGuard, fixture: TempFixture) -> Result<(), CleanupError> {
	let returned = cwd.restore();
	let cleaned = fixture.close();
	match (returned, cleaned) {
		(Err(returned), Err(cleaned)) => {
			error!(error = %cleaned, "fixture cleanup also failed");
			Err(returned)
		}
		(returned, cleaned) => returned.and(cleaned),
	}
}
