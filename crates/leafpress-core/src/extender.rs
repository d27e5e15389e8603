//! Extenders: pluggable units that enrich a page during tree construction.
//!
//! An extender is either a *callback* (a [`PageExtender`] invoked with the
//! page, its path, and the directory-entry metadata) or an *object* (a flat
//! attribute map shallow-merged onto the page). [`apply_extenders`] runs a
//! list of them in order, each completing fully before the next begins, with
//! no isolation between steps: later extenders see every mutation made by
//! earlier ones, which is what makes composition work (a slug extender can
//! read a `title` set by a content parser).

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::builder::EntryInfo;
use crate::node::{AttrValue, PageNode};

/// Error raised by a failing extender.
///
/// Wraps the extender's own error unchanged; the build pass aborts on the
/// first failure and surfaces this through
/// [`BuildError::Extender`](crate::BuildError::Extender).
#[derive(Debug)]
pub struct ExtendError(Box<dyn std::error::Error + Send + Sync>);

impl ExtendError {
    /// Wrap an underlying error.
    #[must_use]
    pub fn new(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }

    /// Create an error from a message alone.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

impl fmt::Display for ExtendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ExtendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// Callback extender contract.
///
/// Implementations mutate the page in place and may suspend (e.g. to read
/// the source file). Purely synchronous extenders simply contain no await
/// points; [`Extender::from_fn`] wraps such closures without a trait impl.
#[async_trait]
pub trait PageExtender: Send + Sync {
    /// Enrich `page` for the content file at `path`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole build pass; no retry, no partial tree.
    async fn extend(
        &self,
        page: &mut PageNode,
        path: &Path,
        entry: &EntryInfo,
    ) -> Result<(), ExtendError>;
}

/// Adapter implementing [`PageExtender`] for synchronous closures.
struct FnExtender<F>(F);

#[async_trait]
impl<F> PageExtender for FnExtender<F>
where
    F: Fn(&mut PageNode, &Path, &EntryInfo) -> Result<(), ExtendError> + Send + Sync,
{
    async fn extend(
        &self,
        page: &mut PageNode,
        path: &Path,
        entry: &EntryInfo,
    ) -> Result<(), ExtendError> {
        (self.0)(page, path, entry)
    }
}

/// A pluggable transformation applied to every page as it is created.
#[derive(Clone)]
pub enum Extender {
    /// Callback invoked with `(page, path, entry)`, sync or async.
    Callback(Arc<dyn PageExtender>),
    /// Flat attribute map shallow-merged onto the page, last write wins.
    Object(BTreeMap<String, AttrValue>),
}

impl Extender {
    /// Wrap a [`PageExtender`] implementation.
    #[must_use]
    pub fn callback(extender: impl PageExtender + 'static) -> Self {
        Self::Callback(Arc::new(extender))
    }

    /// Wrap a synchronous closure as a callback extender.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut PageNode, &Path, &EntryInfo) -> Result<(), ExtendError> + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(FnExtender(f)))
    }

    /// Build an object extender from key/value pairs.
    #[must_use]
    pub fn object<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrValue)>,
        K: Into<String>,
    {
        Self::Object(attrs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for Extender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Object(attrs) => f.debug_tuple("Object").field(attrs).finish(),
        }
    }
}

impl From<BTreeMap<String, AttrValue>> for Extender {
    fn from(attrs: BTreeMap<String, AttrValue>) -> Self {
        Self::Object(attrs)
    }
}

/// Apply every extender to `page` in the order given.
///
/// Each extender runs to completion (including any suspension) before the
/// next begins. Object extenders merge last-write-wins; callback extenders
/// are awaited.
///
/// # Errors
///
/// Returns the first extender failure unchanged; remaining extenders are not
/// run.
pub async fn apply_extenders(
    page: &mut PageNode,
    path: &Path,
    entry: &EntryInfo,
    extenders: &[Extender],
) -> Result<(), ExtendError> {
    for extender in extenders {
        match extender {
            Extender::Object(attrs) => page.merge(attrs),
            Extender::Callback(callback) => callback.extend(page, path, entry).await?,
        }
    }
    Ok(())
}
