//! Content-loading extender.

use std::path::Path;

use async_trait::async_trait;

use leafpress_core::{AttrValue, EntryInfo, ExtendError, Extender, PageExtender, PageNode, keys};

/// Callback extender reading the source file into the `content` attribute.
///
/// This is the simplest content-parsing collaborator: it commits to no
/// format, leaving front-matter or Markdown handling to further extenders
/// downstream. An existing `content` attribute is overwritten.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentExtender;

impl ContentExtender {
    /// Create the extender.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wrap into an [`Extender`] for the build pass.
    #[must_use]
    pub fn into_extender(self) -> Extender {
        Extender::callback(self)
    }
}

#[async_trait]
impl PageExtender for ContentExtender {
    async fn extend(
        &self,
        page: &mut PageNode,
        path: &Path,
        _entry: &EntryInfo,
    ) -> Result<(), ExtendError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ExtendError::new)?;
        page.set(keys::CONTENT, AttrValue::Str(content));
        Ok(())
    }
}
