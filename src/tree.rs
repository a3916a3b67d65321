//! Declarative description of a fixture directory tree.
//!
//! A [`FixtureTree`] maps entry names to [`Entry`] values. Insertion order is
//! creation order, and names are unique among siblings: inserting a name twice
//! replaces the earlier entry in place.

/// A directory's worth of fixture entries, in creation order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixtureTree {
	entries: Vec<(String, Entry)>,
}

/// One named entry of a [`FixtureTree`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Entry {
	/// A file holding literal text.
	File(String),
	/// A directory, populated recursively.
	Dir(FixtureTree),
	/// Content whose own path gets `mode` once it and everything below it exist.
	Restricted { mode: u32, content: Content },
}

/// What a [`Entry::Restricted`] wraps.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
	File(String),
	Dir(FixtureTree),
}

impl FixtureTree {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an entry, replacing (in its original position) any entry with the same name.
	pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) -> &mut Self {
		let name = name.into();
		let entry = entry.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
			Some(slot) => slot.1 = entry,
			None => self.entries.push((name, entry)),
		}
		self
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
		self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of [`Entry::Restricted`] entries at any depth.
	pub fn restricted_count(&self) -> usize {
		self.iter()
			.map(|(_, entry)| match entry {
				Entry::File(_) => 0,
				Entry::Dir(tree) => tree.restricted_count(),
				Entry::Restricted { content: Content::File(_), .. } => 1,
				Entry::Restricted { content: Content::Dir(tree), .. } => 1 + tree.restricted_count(),
			})
			.sum()
	}
}

impl Entry {
	/// Wrap `content` so that `mode` is applied to its path after creation.
	pub fn restricted(mode: u32, content: impl Into<Content>) -> Self {
		Self::Restricted { mode, content: content.into() }
	}
}

impl From<&str> for Entry {
	fn from(text: &str) -> Self {
		Self::File(text.to_owned())
	}
}

impl From<String> for Entry {
	fn from(text: String) -> Self {
		Self::File(text)
	}
}

impl From<FixtureTree> for Entry {
	fn from(tree: FixtureTree) -> Self {
		Self::Dir(tree)
	}
}

impl From<Content> for Entry {
	fn from(content: Content) -> Self {
		match content {
			Content::File(text) => Self::File(text),
			Content::Dir(tree) => Self::Dir(tree),
		}
	}
}

impl From<&str> for Content {
	fn from(text: &str) -> Self {
		Self::File(text.to_owned())
	}
}

impl From<String> for Content {
	fn from(text: String) -> Self {
		Self::File(text)
	}
}

impl From<FixtureTree> for Content {
	fn from(tree: FixtureTree) -> Self {
		Self::Dir(tree)
	}
}

/// Build a [`FixtureTree`] from a nested literal.
///
/// ```
/// use inline_fixtures::{Entry, fixture_tree};
///
/// let tree = fixture_tree! {
/// 	"README.md" => "Hello World.",
/// 	"src" => fixture_tree! { "main.rs" => "fn main() {}" },
/// 	"private" => Entry::restricted(0o000, fixture_tree! { "key" => "123456" }),
/// };
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.restricted_count(), 1);
/// ```
#[macro_export]
macro_rules! fixture_tree {
	($($name:expr => $entry:expr),* $(,)?) => {{
		#[allow(unused_mut)]
		let mut tree = $crate::FixtureTree::new();
		$(tree.insert($name, $entry);)*
		tree
	}};
}
