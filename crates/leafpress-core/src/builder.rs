//! Recursive tree construction from a content directory.
//!
//! [`TreeBuilder`] walks a root directory and turns it into a [`Tree`]:
//! files with accepted extensions become [`PageNode`]s with every extender
//! applied in order, subdirectories become [`DirectoryNode`]s, and
//! directories with no matching descendants are pruned entirely.
//!
//! Entries are sorted lexicographically by file name inside each directory,
//! so tree ordering is deterministic regardless of filesystem enumeration
//! order. Traversal is strictly sequential; the only suspension points are
//! filesystem reads and awaited extender calls.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::extender::{ExtendError, Extender, apply_extenders};
use crate::node::{DirectoryNode, Node, PageNode, Tree};

/// Directory-entry metadata passed to callback extenders.
///
/// Captured once per page from the entry's stat data, so extenders deriving
/// defaults (e.g. `date` from mtime) need no filesystem access of their own.
#[derive(Clone, Debug)]
pub struct EntryInfo {
    /// Entry file name including extension.
    pub file_name: String,
    /// File size in bytes.
    pub len: u64,
    /// Modification time, if the filesystem reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl EntryInfo {
    /// Build entry metadata from stat data.
    #[must_use]
    pub fn new(file_name: impl Into<String>, metadata: &std::fs::Metadata) -> Self {
        Self {
            file_name: file_name.into(),
            len: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// Error returned when tree construction fails.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Root path does not exist or is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while scanning.
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Path being read when the error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An extender failed; the error is propagated unchanged.
    #[error("Extender failed on {}: {source}", .path.display())]
    Extender {
        /// Page source path the extender was applied to.
        path: PathBuf,
        /// The extender's own error.
        #[source]
        source: ExtendError,
    },
}

impl BuildError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Builds a page tree from a content directory.
///
/// Accepted content extensions are configurable; everything else is skipped.
/// Hidden (dot-prefixed) files and directories are always skipped.
#[derive(Clone, Debug)]
pub struct TreeBuilder {
    extensions: Vec<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_owned(), "html".to_owned()],
        }
    }
}

impl TreeBuilder {
    /// Create a builder accepting the default extensions (`md`, `html`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the accepted content extensions.
    ///
    /// Leading dots are stripped, so `".md"` and `"md"` are equivalent.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_owned())
            .collect();
        self
    }

    /// Build the page tree rooted at `root`, applying `extenders` to every
    /// page in the order given.
    ///
    /// Each page has all extenders applied exactly once before `build`
    /// returns; each extender completes fully (including any suspension)
    /// before the next begins.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotFound`] if `root` does not exist or is not a directory
    /// - [`BuildError::Io`] if scanning fails mid-walk
    /// - [`BuildError::Extender`] on the first extender failure; no partial
    ///   tree is returned
    pub async fn build(
        &self,
        root: impl AsRef<Path>,
        extenders: &[Extender],
    ) -> Result<Tree, BuildError> {
        let root = root.as_ref();
        let metadata = match tokio::fs::metadata(root).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BuildError::NotFound(root.to_path_buf()));
            }
            Err(e) => return Err(BuildError::io(root, e)),
        };
        if !metadata.is_dir() {
            return Err(BuildError::NotFound(root.to_path_buf()));
        }

        let nodes = self.scan_dir(root, extenders).await?;
        Ok(Tree::new(nodes))
    }

    /// Scan one directory level, recursing into subdirectories.
    ///
    /// Boxed future because async recursion needs an indirection.
    fn scan_dir<'a>(
        &'a self,
        dir: &'a Path,
        extenders: &'a [Extender],
    ) -> BoxFuture<'a, Result<Vec<Node>, BuildError>> {
        Box::pin(async move {
            let mut read_dir = tokio::fs::read_dir(dir)
                .await
                .map_err(|e| BuildError::io(dir, e))?;

            let mut entries = Vec::new();
            while let Some(entry) = read_dir
                .next_entry()
                .await
                .map_err(|e| BuildError::io(dir, e))?
            {
                entries.push(entry);
            }
            // Deterministic ordering independent of enumeration order
            entries.sort_by_key(tokio::fs::DirEntry::file_name);

            let mut nodes = Vec::new();
            for entry in entries {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if file_name.starts_with('.') {
                    continue;
                }

                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| BuildError::io(&path, e))?;

                if file_type.is_dir() {
                    let children = self.scan_dir(&path, extenders).await?;
                    if children.is_empty() {
                        tracing::debug!(path = %path.display(), "Pruning empty directory");
                        continue;
                    }
                    nodes.push(Node::Directory(DirectoryNode {
                        name: file_name,
                        children,
                    }));
                } else if self.matches_extension(&path) {
                    let metadata = entry
                        .metadata()
                        .await
                        .map_err(|e| BuildError::io(&path, e))?;
                    let info = EntryInfo::new(&file_name, &metadata);

                    let name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file_name.clone());
                    let mut page = PageNode::new(name, &path);

                    apply_extenders(&mut page, &path, &info, extenders)
                        .await
                        .map_err(|source| BuildError::Extender {
                            path: path.clone(),
                            source,
                        })?;

                    nodes.push(Node::Page(page));
                } else {
                    tracing::debug!(path = %path.display(), "Skipping non-content file");
                }
            }

            Ok(nodes)
        })
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy())
            .is_some_and(|ext| self.extensions.iter().any(|a| a.as_str() == ext))
    }
}
