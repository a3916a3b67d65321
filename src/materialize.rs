//! Writes a [`FixtureTree`] onto disk.
//!
//! Restricted entries get their mode only after they and everything below them
//! exist, so a mode like `0o000` never blocks creation of children. The paths
//! that received a mode are returned so they can be opened back up with
//! [`restore_permissions`] before deletion.

use std::{
	fs, io,
	path::{Component, Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
	FixtureTree,
	error::{FixtureError, RestoreFailure},
	tree::{Content, Entry},
};

/// Mode restricted paths are reset to before removal.
pub const PERMISSIVE_MODE: u32 = 0o777;

const MAX_MODE: u32 = 0o7777;

/// Materialize `tree` under the existing directory `root`.
///
/// Returns every path that was given a mode, across all depths. A restricted
/// path always comes before the restricted paths beneath it; among siblings
/// the later one comes first.
///
/// Nothing is rolled back on failure: entries created before the failing one
/// stay on disk, later siblings are never created.
pub fn materialize(root: &Path, tree: &FixtureTree) -> Result<Vec<PathBuf>, FixtureError> {
	materialize_logged(root, tree, &mut Vec::new())
}

/// Like [`materialize`], additionally appending each path to `applied` as soon as its mode is set.
///
/// When materialization fails halfway, `applied` still names every path that needs restoring.
pub(crate) fn materialize_logged(dir: &Path, tree: &FixtureTree, applied: &mut Vec<PathBuf>) -> Result<Vec<PathBuf>, FixtureError> {
	let mut restricted = Vec::new();

	for (name, entry) in tree.iter() {
		let path = child_path(dir, name)?;
		match entry {
			Entry::File(text) => write_file(&path, text)?,
			Entry::Dir(subtree) => {
				create_dir(&path)?;
				let mut deep = materialize_logged(&path, subtree, applied)?;
				deep.append(&mut restricted);
				restricted = deep;
			}
			Entry::Restricted { mode, content } => {
				if *mode > MAX_MODE {
					return Err(FixtureError::InvalidMode { mode: *mode, path });
				}
				let deep = match content {
					Content::File(text) => {
						write_file(&path, text)?;
						Vec::new()
					}
					Content::Dir(subtree) => {
						create_dir(&path)?;
						materialize_logged(&path, subtree, applied)?
					}
				};
				apply_mode(&path, *mode).map_err(FixtureError::io("set mode on", &path))?;
				debug!(path = %path.display(), mode = %format_args!("{mode:#o}"), "restricted fixture entry");
				applied.push(path.clone());

				let mut head = Vec::with_capacity(1 + deep.len() + restricted.len());
				head.push(path);
				head.extend(deep);
				head.append(&mut restricted);
				restricted = head;
			}
		}
	}

	Ok(restricted)
}

/// Reset every path to [`PERMISSIVE_MODE`], shallowest first.
///
/// An inaccessible directory hides its descendants, so ancestors have to be
/// opened up before anything beneath them. A failure on one path does not stop
/// the others from being attempted; all failures are returned.
pub fn restore_permissions<P: AsRef<Path>>(paths: &[P]) -> Vec<RestoreFailure> {
	let mut ordered: Vec<&Path> = paths.iter().map(AsRef::as_ref).collect();
	ordered.sort_by_key(|path| path.components().count());

	let mut failures = Vec::new();
	for path in ordered {
		match apply_mode(path, PERMISSIVE_MODE) {
			Ok(()) => debug!(path = %path.display(), "restored fixture permissions"),
			Err(source) => {
				warn!(path = %path.display(), error = %source, "failed to restore fixture permissions");
				failures.push(RestoreFailure::new(path.to_path_buf(), source));
			}
		}
	}
	failures
}

fn child_path(dir: &Path, name: &str) -> Result<PathBuf, FixtureError> {
	let mut components = Path::new(name).components();
	match (components.next(), components.next()) {
		(Some(Component::Normal(segment)), None) if segment == name => Ok(dir.join(name)),
		_ => Err(FixtureError::InvalidName { name: name.to_owned() }),
	}
}

fn write_file(path: &Path, text: &str) -> Result<(), FixtureError> {
	fs::write(path, text).map_err(FixtureError::io("write", path))?;
	debug!(path = %path.display(), bytes = text.len(), "wrote fixture file");
	Ok(())
}

fn create_dir(path: &Path) -> Result<(), FixtureError> {
	fs::create_dir_all(path).map_err(FixtureError::io("create directory", path))?;
	debug!(path = %path.display(), "created fixture directory");
	Ok(())
}

#[cfg(unix)]
pub(crate) fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
	use std::os::unix::fs::PermissionsExt;
	fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

// Only the owner-write bit has a counterpart here.
#[cfg(not(unix))]
pub(crate) fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
	let mut permissions = fs::metadata(path)?.permissions();
	permissions.set_readonly(mode & 0o200 == 0);
	fs::set_permissions(path, permissions)
}
