//! Filesystem page saver.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use leafpress_core::{Extender, PageNode, PageSaver, SaveError, save_extender};

/// [`PageSaver`] writing page content to files in an output directory.
///
/// Output file name is `<slug>.html`, falling back to the page name when no
/// slug was derived. Parent directories are created as needed. The build
/// pass never invokes this; callers do, after walking the tree:
///
/// ```ignore
/// for page in tree.pages() {
///     if let Some(saver) = page.saver() {
///         saver.save(page, &out_dir).await?;
///     }
/// }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSaver;

impl FsSaver {
    /// Create the saver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wrap into the object extender that attaches this saver to every page.
    #[must_use]
    pub fn into_extender(self) -> Extender {
        save_extender(Arc::new(self))
    }
}

#[async_trait]
impl PageSaver for FsSaver {
    async fn save(&self, page: &PageNode, out_dir: &Path) -> Result<(), SaveError> {
        let content = page
            .content()
            .ok_or_else(|| SaveError::NoContent(page.name().to_owned()))?;

        let stem = page.slug().unwrap_or_else(|| page.name());
        let out_path = out_dir.join(format!("{stem}.html"));

        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| SaveError::Io {
                path: out_dir.to_path_buf(),
                source,
            })?;
        tokio::fs::write(&out_path, content)
            .await
            .map_err(|source| SaveError::Io {
                path: out_path.clone(),
                source,
            })?;

        tracing::debug!(path = %out_path.display(), "Saved page");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use leafpress_core::{AttrValue, TreeBuilder, keys};

    use crate::content::ContentExtender;
    use crate::defaults::DefaultsExtender;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_content_under_slug() {
        let temp_dir = create_test_dir();
        let out_dir = temp_dir.path().join("out");

        let mut page = PageNode::new("post", "post.md");
        page.set(keys::CONTENT, AttrValue::from("<p>hello</p>"));
        page.set(keys::SLUG, AttrValue::from("hello-post"));

        FsSaver::new().save(&page, &out_dir).await.unwrap();

        let written = fs::read_to_string(out_dir.join("hello-post.html")).unwrap();
        assert_eq!(written, "<p>hello</p>");
    }

    #[tokio::test]
    async fn test_save_falls_back_to_page_name() {
        let temp_dir = create_test_dir();
        let out_dir = temp_dir.path().join("out");

        let mut page = PageNode::new("about", "about.md");
        page.set(keys::CONTENT, AttrValue::from("about us"));

        FsSaver::new().save(&page, &out_dir).await.unwrap();

        assert!(out_dir.join("about.html").exists());
    }

    #[tokio::test]
    async fn test_save_without_content_fails() {
        let temp_dir = create_test_dir();
        let page = PageNode::new("empty", "empty.md");

        let err = FsSaver::new()
            .save(&page, temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, SaveError::NoContent(name) if name == "empty"));
    }

    #[tokio::test]
    async fn test_full_pipeline_build_walk_save() {
        let temp_dir = create_test_dir();
        let source = temp_dir.path().join("content");
        let out_dir = temp_dir.path().join("build");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("hello-world.md"), "# Hello World\n\nBody").unwrap();
        let posts = source.join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(posts.join("second.md"), "# Second Post\n\nMore").unwrap();

        let extenders = vec![
            ContentExtender::new().into_extender(),
            DefaultsExtender::new().into_extender(),
            FsSaver::new().into_extender(),
        ];

        let tree = TreeBuilder::new().build(&source, &extenders).await.unwrap();
        for page in tree.pages() {
            let saver = page.saver().expect("saver attached to every page");
            saver.save(page, &out_dir).await.unwrap();
        }

        assert!(out_dir.join("hello-world.html").exists());
        assert!(out_dir.join("second-post.html").exists());
    }
}
