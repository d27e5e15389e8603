//! The `Saveable` capability for page output.
//!
//! The core never writes output itself; a rendering collaborator attaches a
//! [`PageSaver`] to each page via an object extender (see [`save_extender`]),
//! and callers invoke it after walking the tree. Because attachment is
//! optional and extender-order-dependent, callers check
//! [`PageNode::saver`](crate::PageNode::saver) for presence rather than
//! assuming every page can save itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::extender::Extender;
use crate::node::{AttrValue, PageNode, keys};

/// Error returned when saving a page fails.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Page has no `content` attribute to write.
    #[error("Page has no content: {0}")]
    NoContent(String),
    /// I/O error writing the output file.
    #[error("I/O error writing {}: {source}", .path.display())]
    Io {
        /// Output path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Capability for writing a page to an output directory.
#[async_trait]
pub trait PageSaver: Send + Sync {
    /// Write `page` under `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if the page cannot be written.
    async fn save(&self, page: &PageNode, out_dir: &Path) -> Result<(), SaveError>;
}

/// Object extender attaching `saver` to every page under the
/// [`keys::SAVE`] key.
#[must_use]
pub fn save_extender(saver: Arc<dyn PageSaver>) -> Extender {
    Extender::Object(BTreeMap::from([(
        keys::SAVE.to_owned(),
        AttrValue::Saver(saver),
    )]))
}
