use std::{
	fs,
	path::{Path, PathBuf},
};

use tracing::{error, info};

use crate::{
	FixtureTree,
	config::FixtureSettings,
	error::{CleanupError, FixtureError, FixtureSetupError},
	materialize::{materialize_logged, restore_permissions},
};

/// A file read back from a fixture root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixtureFile {
	/// Path relative to the fixture root, `/`-prefixed (e.g. "/src/main.rs")
	pub path: String,
	pub text: String,
}

/// A [`FixtureTree`] materialized into its own temporary directory.
///
/// Cleanup (restoring permissions, then removing the root unless it is being
/// kept) happens in [`TempFixture::close`], or on drop if `close` was never
/// reached.
#[derive(Debug)]
pub struct TempFixture {
	root: PathBuf,
	temp_dir: Option<tempfile::TempDir>,
	restricted: Vec<PathBuf>,
	keep: bool,
}

impl TempFixture {
	/// Materialize `tree` into a fresh temporary directory, honouring the environment's settings.
	pub fn new(tree: &FixtureTree) -> Result<Self, FixtureSetupError> {
		Self::with_settings(tree, &FixtureSettings::from_env())
	}

	pub fn with_settings(tree: &FixtureTree, settings: &FixtureSettings) -> Result<Self, FixtureSetupError> {
		let temp_dir = tempfile::Builder::new()
			.prefix(&settings.prefix)
			.tempdir()
			.map_err(FixtureError::io("create temporary directory with prefix", &settings.prefix))
			.map_err(|source| FixtureSetupError { source, cleanup: None })?;
		let root = temp_dir.path().to_path_buf();

		let mut fixture = Self {
			root,
			temp_dir: Some(temp_dir),
			restricted: Vec::new(),
			keep: settings.keep,
		};

		let mut applied = Vec::new();
		match materialize_logged(&fixture.root, tree, &mut applied) {
			Ok(restricted) => {
				fixture.restricted = restricted;
				Ok(fixture)
			}
			Err(source) => {
				fixture.restricted = applied;
				Err(FixtureSetupError { source, cleanup: fixture.close().err() })
			}
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Paths that were given a mode, in the order [`materialize`](crate::materialize()) reports them.
	pub fn restricted(&self) -> &[PathBuf] {
		&self.restricted
	}

	/// Get the full path to an entry
	pub fn path(&self, relative: &str) -> PathBuf {
		self.root.join(relative.trim_start_matches('/'))
	}

	/// Read a file's current contents
	pub fn read(&self, relative: &str) -> std::io::Result<String> {
		fs::read_to_string(self.path(relative))
	}

	/// Try to read a file's current contents
	pub fn try_read(&self, relative: &str) -> Option<String> {
		self.read(relative).ok()
	}

	/// Every readable file under the root, sorted by path.
	///
	/// Restricted entries that cannot be entered or read are skipped.
	pub fn files(&self) -> Vec<FixtureFile> {
		let mut files: Vec<FixtureFile> = walkdir::WalkDir::new(&self.root)
			.into_iter()
			.filter_map(Result::ok)
			.filter(|entry| entry.file_type().is_file())
			.filter_map(|entry| {
				let relative = entry.path().strip_prefix(&self.root).ok()?;
				let text = fs::read_to_string(entry.path()).ok()?;
				Some(FixtureFile {
					path: format!("/{}", relative.to_string_lossy()),
					text,
				})
			})
			.collect();

		files.sort_by(|a, b| a.path.cmp(&b.path));
		files
	}

	/// Restore permissions on every restricted path, then remove the root unless it is being kept.
	pub fn close(mut self) -> Result<(), CleanupError> {
		self.cleanup()
	}

	fn cleanup(&mut self) -> Result<(), CleanupError> {
		let Some(temp_dir) = self.temp_dir.take() else {
			return Ok(());
		};

		let failures = restore_permissions(&self.restricted);

		if self.keep {
			let root = temp_dir.keep();
			info!(root = %root.display(), "keeping fixture root");
		} else if let Err(source) = temp_dir.close() {
			return Err(CleanupError::Removal {
				path: self.root.clone(),
				source,
				restore: failures,
			});
		}

		if failures.is_empty() { Ok(()) } else { Err(CleanupError::Restore(failures)) }
	}
}

impl Drop for TempFixture {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup() {
			error!(root = %self.root.display(), error = %err, "failed to clean up fixture root");
		}
	}
}
