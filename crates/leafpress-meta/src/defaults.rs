//! Default metadata derivation.
//!
//! Fills in the well-known attributes a page is expected to carry when no
//! earlier extender set them:
//!
//! - `title` from the first `<h1>`/`<h2>` tag in `content`, else the first
//!   one- or two-level ATX heading, else the titlecased file name
//! - `slug` from the title
//! - `date` from the entry's modification time
//! - `tags` normalized into a de-duplicated set
//!
//! Attributes that are already present are left alone, so callers can
//! override any of these by running an extender earlier in the list.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use regex::Regex;

use leafpress_core::{AttrValue, EntryInfo, ExtendError, Extender, PageExtender, PageNode, keys};

use crate::slug::{slugify, title_from_name};

/// Callback extender deriving default `title`, `slug`, `date`, and `tags`.
#[derive(Clone, Debug)]
pub struct DefaultsExtender {
    heading: Regex,
    tag_strip: Regex,
}

impl Default for DefaultsExtender {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultsExtender {
    /// Create the extender.
    ///
    /// # Panics
    ///
    /// Panics if the built-in regular expressions fail to compile, which
    /// would be a bug in this crate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heading: Regex::new(r"(?is)<h[12][^>]*>(.*?)</h[12]\s*>").expect("valid heading regex"),
            tag_strip: Regex::new(r"<[^>]*>").expect("valid tag-strip regex"),
        }
    }

    /// Wrap into an [`Extender`] for the build pass.
    #[must_use]
    pub fn into_extender(self) -> Extender {
        Extender::callback(self)
    }

    /// Extract a title from page content.
    ///
    /// Looks for the first `<h1>`/`<h2>` tag (inner tags stripped), then the
    /// first `#`/`##` ATX heading line.
    fn title_from_content(&self, content: &str) -> Option<String> {
        if let Some(caps) = self.heading.captures(content) {
            let inner = self.tag_strip.replace_all(&caps[1], "");
            let title = inner.trim();
            if !title.is_empty() {
                return Some(title.to_owned());
            }
        }

        for line in content.lines() {
            let trimmed = line.trim_start();
            let hashes = trimmed.chars().take_while(|&c| c == '#').count();
            if (1..=2).contains(&hashes) {
                let title = trimmed[hashes..].trim();
                if !title.is_empty() {
                    return Some(title.to_owned());
                }
            }
        }

        None
    }
}

#[async_trait]
impl PageExtender for DefaultsExtender {
    async fn extend(
        &self,
        page: &mut PageNode,
        _path: &Path,
        entry: &EntryInfo,
    ) -> Result<(), ExtendError> {
        if page.get(keys::TITLE).is_none() {
            let title = page
                .content()
                .and_then(|content| self.title_from_content(content))
                .unwrap_or_else(|| title_from_name(page.name()));
            page.set(keys::TITLE, AttrValue::Str(title));
        }

        if page.get(keys::SLUG).is_none() {
            let mut slug = slugify(page.title().unwrap_or_else(|| page.name()));
            if slug.is_empty() {
                slug = slugify(page.name());
            }
            if !slug.is_empty() {
                page.set(keys::SLUG, AttrValue::Str(slug));
            }
        }

        if page.get(keys::DATE).is_none()
            && let Some(modified) = entry.modified
        {
            page.set(keys::DATE, AttrValue::Date(modified));
        }

        let raw_tags = match page.get(keys::TAGS) {
            Some(AttrValue::Str(raw)) => Some(raw.clone()),
            Some(AttrValue::Tags(_)) | None => None,
            Some(other) => {
                tracing::warn!(value = ?other, "Leaving 'tags' of unexpected type untouched");
                None
            }
        };
        if let Some(raw) = raw_tags {
            let tags: BTreeSet<String> = raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect();
            page.set(keys::TAGS, AttrValue::Tags(tags));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use leafpress_core::apply_extenders;

    use super::*;

    fn test_entry() -> EntryInfo {
        EntryInfo {
            file_name: "page.md".to_owned(),
            len: 0,
            modified: Some(chrono::Utc::now()),
        }
    }

    async fn extend(page: &mut PageNode, entry: &EntryInfo) {
        let extenders = vec![DefaultsExtender::new().into_extender()];
        apply_extenders(page, Path::new("page.md"), entry, &extenders)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_title_from_h1_tag() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::CONTENT, "<h1>Real Title</h1><p>Body</p>".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("Real Title"));
    }

    #[tokio::test]
    async fn test_title_from_h2_with_attributes_and_inner_tags() {
        let mut page = PageNode::new("page", "page.md");
        page.set(
            keys::CONTENT,
            "<h2 class=\"big\">Styled <em>Title</em></h2>".into(),
        );

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("Styled Title"));
    }

    #[tokio::test]
    async fn test_title_from_atx_heading() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::CONTENT, "some preamble\n\n## Section Title\n\nBody".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("Section Title"));
    }

    #[tokio::test]
    async fn test_title_falls_back_to_titlecased_name() {
        let mut page = PageNode::new("my-nice-page", "my-nice-page.md");
        page.set(keys::CONTENT, "no headings here".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("My Nice Page"));
    }

    #[tokio::test]
    async fn test_title_fallback_without_content() {
        let mut page = PageNode::new("setup_guide", "setup_guide.md");

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("Setup Guide"));
    }

    #[tokio::test]
    async fn test_existing_title_is_kept() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::TITLE, "Explicit".into());
        page.set(keys::CONTENT, "<h1>Derived</h1>".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.title(), Some("Explicit"));
    }

    #[tokio::test]
    async fn test_slug_derived_from_title() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::CONTENT, "<h1>Hello, World!</h1>".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.slug(), Some("hello-world"));
    }

    #[tokio::test]
    async fn test_existing_slug_is_kept() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::SLUG, "custom-slug".into());

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.slug(), Some("custom-slug"));
    }

    #[tokio::test]
    async fn test_date_defaults_to_mtime() {
        let entry = test_entry();
        let mut page = PageNode::new("page", "page.md");

        extend(&mut page, &entry).await;

        assert_eq!(page.date(), entry.modified);
    }

    #[tokio::test]
    async fn test_date_not_set_without_mtime() {
        let entry = EntryInfo {
            file_name: "page.md".to_owned(),
            len: 0,
            modified: None,
        };
        let mut page = PageNode::new("page", "page.md");

        extend(&mut page, &entry).await;

        assert_eq!(page.date(), None);
    }

    #[tokio::test]
    async fn test_tags_string_normalized_to_set() {
        let mut page = PageNode::new("page", "page.md");
        page.set(keys::TAGS, "rust, web,  rust tooling".into());

        extend(&mut page, &test_entry()).await;

        let tags = page.tags().unwrap();
        let expected: Vec<&str> = vec!["rust", "tooling", "web"];
        assert_eq!(tags.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn test_tags_set_left_as_is() {
        let mut page = PageNode::new("page", "page.md");
        let tags = BTreeSet::from(["a".to_owned(), "b".to_owned()]);
        page.set(keys::TAGS, AttrValue::Tags(tags.clone()));

        extend(&mut page, &test_entry()).await;

        assert_eq!(page.tags(), Some(&tags));
    }

    #[tokio::test]
    async fn test_composition_with_earlier_title_setter() {
        // A later extender reading a title set by an earlier one is the
        // canonical composition case: defaults must not clobber it, and slug
        // derivation must see it.
        let mut page = PageNode::new("page", "page.md");
        let extenders = vec![
            Extender::object([(keys::TITLE, AttrValue::from("From Object"))]),
            DefaultsExtender::new().into_extender(),
        ];

        apply_extenders(&mut page, Path::new("page.md"), &test_entry(), &extenders)
            .await
            .unwrap();

        assert_eq!(page.title(), Some("From Object"));
        assert_eq!(page.slug(), Some("from-object"));
    }
}
