//! Core page tree for the leafpress site generator.
//!
//! Provides [`TreeBuilder`] for scanning a content directory into a [`Tree`]
//! of [`PageNode`]s and [`DirectoryNode`]s, with an ordered list of
//! [`Extender`]s applied to every page as it is created.
//!
//! # Architecture
//!
//! Building and walking are separate phases:
//! - [`TreeBuilder::build`] recursively enumerates a root directory,
//!   constructing a page node per matching content file and applying all
//!   extenders to it in declaration order. Directories with no matching
//!   descendants are pruned.
//! - [`Tree::pages`] flattens the finished tree into a lazy depth-first
//!   iterator over its page nodes, for callers to render and write.
//!
//! Extenders are the plugin seam: content parsers, metadata derivation, and
//! output writers all plug in as [`Extender`] values without the core knowing
//! their formats. The core never reads file contents itself.
//!
//! # Concurrency
//!
//! A single `build` call is one logical task: traversal and extender
//! application are strictly sequential, suspending only at filesystem reads
//! and awaited extender calls. Separate `build` calls share no state and may
//! run concurrently.
//!
//! # Example
//!
//! ```ignore
//! use leafpress_core::{Extender, TreeBuilder};
//!
//! let extenders = vec![Extender::object([("layout", "default.html".into())])];
//! let tree = TreeBuilder::new().build("content", &extenders).await?;
//! for page in tree.pages() {
//!     println!("{} -> {}", page.name(), page.path().display());
//! }
//! ```

mod builder;
mod extender;
mod node;
mod save;
mod walk;

pub use builder::{BuildError, EntryInfo, TreeBuilder};
pub use extender::{ExtendError, Extender, PageExtender, apply_extenders};
pub use node::{AttrValue, DirectoryNode, Node, PageNode, Tree, keys};
pub use save::{PageSaver, SaveError, save_extender};
pub use walk::Pages;
