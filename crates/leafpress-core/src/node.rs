//! Page tree data model.
//!
//! Pages carry a fixed `name`/`path` pair plus an open attribute map that
//! extenders fill in during the build pass. The attribute value type
//! [`AttrValue`] is a closed variant set covering the shapes extenders are
//! known to produce; callers needing richer structure nest [`AttrValue::Map`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::save::PageSaver;

/// Well-known attribute keys.
///
/// Extenders may set any key; these are the ones the bundled collaborators
/// read and write by convention.
pub mod keys {
    /// Display title, usually derived from content or filename.
    pub const TITLE: &str = "title";
    /// URL-safe identifier derived from the title.
    pub const SLUG: &str = "slug";
    /// Publication date, defaulting to file modification time.
    pub const DATE: &str = "date";
    /// De-duplicated tag set.
    pub const TAGS: &str = "tags";
    /// Raw or parsed page content.
    pub const CONTENT: &str = "content";
    /// Attached [`PageSaver`](crate::PageSaver) capability.
    pub const SAVE: &str = "save";
}

/// Attribute value for the open page attribute map.
#[derive(Clone)]
pub enum AttrValue {
    /// UTF-8 string.
    Str(String),
    /// Numeric value.
    Num(f64),
    /// Boolean flag.
    Bool(bool),
    /// Timestamp (UTC).
    Date(DateTime<Utc>),
    /// De-duplicated, ordered set of strings.
    Tags(BTreeSet<String>),
    /// Nested attribute map.
    Map(BTreeMap<String, AttrValue>),
    /// Attached saver capability (see [`save_extender`](crate::save_extender)).
    Saver(Arc<dyn PageSaver>),
}

impl AttrValue {
    /// Borrow as string, if this is a [`AttrValue::Str`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, if this is a [`AttrValue::Num`].
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value, if this is a [`AttrValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Timestamp, if this is a [`AttrValue::Date`].
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow as tag set, if this is a [`AttrValue::Tags`].
    #[must_use]
    pub fn as_tags(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Tags(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow as nested map, if this is a [`AttrValue::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the attached saver, if this is a [`AttrValue::Saver`].
    #[must_use]
    pub fn as_saver(&self) -> Option<&Arc<dyn PageSaver>> {
        match self {
            Self::Saver(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Num(n) => f.debug_tuple("Num").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Self::Tags(t) => f.debug_tuple("Tags").field(t).finish(),
            Self::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Self::Saver(_) => f.write_str("Saver(..)"),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Num(a), Self::Num(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Tags(a), Self::Tags(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            // Savers compare by identity: two attachments are equal only if
            // they are the same allocation.
            (Self::Saver(a), Self::Saver(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<BTreeSet<String>> for AttrValue {
    fn from(value: BTreeSet<String>) -> Self {
        Self::Tags(value)
    }
}

/// Leaf node representing one content file and its accumulated metadata.
///
/// `name` and `path` are structural: they are set at construction and cannot
/// be removed by extenders. Everything else lives in the attribute map, which
/// extenders mutate freely during the build pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PageNode {
    name: String,
    path: PathBuf,
    attrs: BTreeMap<String, AttrValue>,
}

impl PageNode {
    /// Create a page node with an empty attribute map.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name, usually the filename minus extension
    /// * `path` - Full filesystem path to the source file
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Display name (filename minus extension).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filesystem path to the source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Set an attribute, replacing any previous value.
    ///
    /// The keys `"name"` and `"path"` address the structural fields: a string
    /// value overwrites them, any other value type is ignored with a warning.
    pub fn set(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        match key.as_str() {
            "name" => match value {
                AttrValue::Str(s) => self.name = s,
                other => tracing::warn!(value = ?other, "Ignoring non-string 'name' attribute"),
            },
            "path" => match value {
                AttrValue::Str(s) => self.path = PathBuf::from(s),
                other => tracing::warn!(value = ?other, "Ignoring non-string 'path' attribute"),
            },
            _ => {
                self.attrs.insert(key, value);
            }
        }
    }

    /// Remove an attribute, returning its previous value.
    ///
    /// The structural `"name"` and `"path"` fields cannot be removed; asking
    /// for them returns `None` and leaves the page untouched.
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        if key == "name" || key == "path" {
            return None;
        }
        self.attrs.remove(key)
    }

    /// Shallow-merge a flat attribute map onto this page, last write wins.
    pub fn merge(&mut self, attrs: &BTreeMap<String, AttrValue>) {
        for (key, value) in attrs {
            self.set(key.clone(), value.clone());
        }
    }

    /// The full attribute map (structural fields excluded).
    #[must_use]
    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    /// The `title` attribute, if set as a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get(keys::TITLE).and_then(AttrValue::as_str)
    }

    /// The `slug` attribute, if set as a string.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.get(keys::SLUG).and_then(AttrValue::as_str)
    }

    /// The `content` attribute, if set as a string.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.get(keys::CONTENT).and_then(AttrValue::as_str)
    }

    /// The `date` attribute, if set as a date.
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.get(keys::DATE).and_then(AttrValue::as_date)
    }

    /// The `tags` attribute, if set as a tag set.
    #[must_use]
    pub fn tags(&self) -> Option<&BTreeSet<String>> {
        self.get(keys::TAGS).and_then(AttrValue::as_tags)
    }

    /// The attached saver capability, if any extender attached one.
    ///
    /// Attachment is optional and extender-order-dependent; callers check for
    /// presence rather than assuming every page can save itself.
    #[must_use]
    pub fn saver(&self) -> Option<&Arc<dyn PageSaver>> {
        self.get(keys::SAVE).and_then(AttrValue::as_saver)
    }
}

/// Container node grouping child nodes under a directory name.
///
/// The builder never emits a `DirectoryNode` with zero matching descendants,
/// so `children` is non-empty in any tree it returns.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryNode {
    /// Directory name (single path component).
    pub name: String,
    /// Child nodes in filesystem enumeration order.
    pub children: Vec<Node>,
}

/// One node in the page tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Leaf content file.
    Page(PageNode),
    /// Directory container.
    Directory(DirectoryNode),
}

/// Ordered tree of page and directory nodes rooted at the scan root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree from top-level nodes.
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// True if the tree contains no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lazy depth-first iterator over every page node in the tree.
    ///
    /// Directory containers are descended into but not yielded. Each call
    /// starts a fresh traversal; iterators share no position.
    #[must_use]
    pub fn pages(&self) -> crate::walk::Pages<'_> {
        crate::walk::Pages::new(&self.nodes)
    }

    /// Total number of page nodes anywhere in the tree.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages().count()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a PageNode;
    type IntoIter = crate::walk::Pages<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_page_has_name_and_path() {
        let page = PageNode::new("guide", "content/guide.md");

        assert_eq!(page.name(), "guide");
        assert_eq!(page.path(), Path::new("content/guide.md"));
        assert!(page.attrs().is_empty());
    }

    #[test]
    fn test_set_and_get_attribute() {
        let mut page = PageNode::new("guide", "guide.md");

        page.set(keys::TITLE, "User Guide".into());

        assert_eq!(page.title(), Some("User Guide"));
        assert_eq!(page.get("missing"), None);
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let mut page = PageNode::new("guide", "guide.md");

        page.set("draft", true.into());
        page.set("draft", false.into());

        assert_eq!(page.get("draft").and_then(AttrValue::as_bool), Some(false));
    }

    #[test]
    fn test_set_name_with_string_updates_field() {
        let mut page = PageNode::new("old", "old.md");

        page.set("name", "renamed".into());

        assert_eq!(page.name(), "renamed");
        assert!(page.attrs().is_empty());
    }

    #[test]
    fn test_set_name_with_non_string_is_ignored() {
        let mut page = PageNode::new("guide", "guide.md");

        page.set("name", AttrValue::Num(7.0));

        assert_eq!(page.name(), "guide");
        assert!(page.attrs().is_empty());
    }

    #[test]
    fn test_remove_cannot_drop_name_or_path() {
        let mut page = PageNode::new("guide", "guide.md");

        assert!(page.remove("name").is_none());
        assert!(page.remove("path").is_none());
        assert_eq!(page.name(), "guide");
        assert_eq!(page.path(), Path::new("guide.md"));
    }

    #[test]
    fn test_remove_returns_previous_value() {
        let mut page = PageNode::new("guide", "guide.md");
        page.set(keys::TITLE, "Guide".into());

        let removed = page.remove(keys::TITLE);

        assert_eq!(removed, Some(AttrValue::Str("Guide".to_owned())));
        assert_eq!(page.title(), None);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut page = PageNode::new("guide", "guide.md");
        page.set("a", AttrValue::Num(1.0));

        let overlay = BTreeMap::from([
            ("a".to_owned(), AttrValue::Num(2.0)),
            ("b".to_owned(), AttrValue::Str("new".to_owned())),
        ]);
        page.merge(&overlay);

        assert_eq!(page.get("a").and_then(AttrValue::as_num), Some(2.0));
        assert_eq!(page.get("b").and_then(AttrValue::as_str), Some("new"));
    }

    #[test]
    fn test_typed_accessors_reject_wrong_variant() {
        let mut page = PageNode::new("guide", "guide.md");
        page.set(keys::TITLE, AttrValue::Num(3.0));

        assert_eq!(page.title(), None);
        assert_eq!(page.get(keys::TITLE).and_then(AttrValue::as_num), Some(3.0));
    }

    #[test]
    fn test_attr_value_from_impls() {
        assert_eq!(AttrValue::from("x"), AttrValue::Str("x".to_owned()));
        assert_eq!(AttrValue::from(2.5), AttrValue::Num(2.5));
        assert_eq!(AttrValue::from(true), AttrValue::Bool(true));

        let tags = BTreeSet::from(["a".to_owned(), "b".to_owned()]);
        assert_eq!(AttrValue::from(tags.clone()), AttrValue::Tags(tags));
    }

    #[test]
    fn test_nested_map_attribute() {
        let mut page = PageNode::new("guide", "guide.md");
        let nested = BTreeMap::from([("layout".to_owned(), AttrValue::Str("post".to_owned()))]);

        page.set("template", AttrValue::Map(nested));

        let map = page.get("template").and_then(AttrValue::as_map).unwrap();
        assert_eq!(map.get("layout").and_then(AttrValue::as_str), Some("post"));
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::default();

        assert!(tree.is_empty());
        assert_eq!(tree.page_count(), 0);
    }
}
