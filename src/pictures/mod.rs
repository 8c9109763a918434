//! # Pictures
//!
//! Display URLs are derived on read from the stored reference and are
//! never persisted.

pub mod resolver;

pub use resolver::{resolve_display_url, PictureUrl, ResolvedPicture, THUMBNAIL_BASE};
