//! Bundled extenders for leafpress.
//!
//! These are collaborators of the core, not core logic: each one plugs into
//! the build pass through the [`Extender`](leafpress_core::Extender) seam and
//! can be replaced wholesale. The set shipped here covers the common
//! pipeline:
//!
//! - [`ContentExtender`] reads the source file into the `content` attribute.
//! - [`DefaultsExtender`] derives `title`, `slug`, `date`, and `tags` from
//!   whatever earlier extenders left on the page.
//! - [`FsSaver`] implements the [`PageSaver`](leafpress_core::PageSaver)
//!   capability, writing `content` into an output directory.
//!
//! Order matters: `ContentExtender` must run before `DefaultsExtender` for
//! title extraction to see any content.

mod content;
mod defaults;
mod save;
mod slug;

pub use content::ContentExtender;
pub use defaults::DefaultsExtender;
pub use save::FsSaver;
pub use slug::{slugify, title_from_name};
