//! PresentationML slide writing.
//!
//! A [`NativeSlide`] is created from a template layout, populated shape by
//! shape, and serialized as a slide part once it is complete.

mod media;
mod slide;
mod table;

pub use media::{MediaShape, DEFAULT_MEDIA_XFRM};
pub use slide::{ChartFrame, NativeSlide, PictureShape, PlaceholderRef, PlaceholderShape, Shape};
pub use table::TableFrame;

/// Content type of a slide part.
pub const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
/// Content type of the core properties part.
pub const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";

pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_VIDEO: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/video";
pub const REL_AUDIO: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
/// PowerPoint 2010 embedded media relationship.
pub const REL_MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";

/// Any part in the slides folder; relationship targets are relative to it.
pub(crate) const SLIDE_ANCHOR: &str = "ppt/slides/slide.xml";
