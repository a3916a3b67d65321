//! Disposable, permission-controlled filesystem fixtures for tests.
//!
//! A [`FixtureTree`] describes files, directories and per-entry modes inline in
//! test code. It can be written anywhere with [`materialize`], into its own
//! temporary directory with [`TempFixture`], or used for a whole scoped session
//! with [`with_fixtures`].
//!
//! # Materializing into a directory
//!
//! ```
//! use inline_fixtures::{fixture_tree, materialize};
//!
//! let dir = tempfile::tempdir()?;
//! let tree = fixture_tree! {
//! 	"README.md" => "Hello World.",
//! 	"src" => fixture_tree! { "main.rs" => "fn main() {}" },
//! };
//! let restricted = materialize(dir.path(), &tree)?;
//! assert!(restricted.is_empty());
//! assert_eq!(std::fs::read_to_string(dir.path().join("src/main.rs"))?, "fn main() {}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Restricted entries
//!
//! A mode is applied once the entry and everything under it exist. The paths
//! that received one are returned, and must be opened up again with
//! [`restore_permissions`] before the tree can be deleted.
//!
//! ```
//! use inline_fixtures::{Entry, fixture_tree, materialize, restore_permissions};
//!
//! let dir = tempfile::tempdir()?;
//! let tree = fixture_tree! {
//! 	"private" => Entry::restricted(0o000, fixture_tree! { "README.md" => "Hello World." }),
//! };
//! let restricted = materialize(dir.path(), &tree)?;
//! assert_eq!(restricted, vec![dir.path().join("private")]);
//! assert!(restore_permissions(&restricted).is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Scoped sessions
//!
//! ```
//! use inline_fixtures::{fixture_tree, with_fixtures};
//!
//! let tree = fixture_tree! { "README.md" => "Hello Jupiter." };
//! let root = with_fixtures(&tree, |root| {
//! 	// The working directory is the fixture root for the duration of the action.
//! 	assert_eq!(std::fs::read_to_string("README.md")?, "Hello Jupiter.");
//! 	Ok::<_, std::io::Error>(root.to_path_buf())
//! })?;
//! # if std::env::var_os(inline_fixtures::KEEP_ENV_VAR).is_none() {
//! assert!(!root.exists());
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Set `INLINE_FIXTURES_KEEP=1` to leave fixture roots on disk for inspection.

pub mod config;
mod cwd;
pub mod error;
pub mod fixture;
pub mod materialize;
pub mod session;
pub mod tree;

pub use config::{FixtureSettings, KEEP_ENV_VAR};
pub use error::{CleanupError, FixtureError, FixtureSetupError, RestoreFailure, SessionError};
pub use fixture::{FixtureFile, TempFixture};
pub use materialize::{PERMISSIVE_MODE, materialize, restore_permissions};
pub use session::with_fixtures;
pub use tree::{Content, Entry, FixtureTree};
