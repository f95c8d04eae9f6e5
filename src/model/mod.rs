//! Slide content model.
//!
//! This module defines the plain data structures that flow through the
//! pipeline: what a slide says ([`SlideContent`]), which layout it was
//! assigned ([`Slide`]), and the ordered deck ([`Presentation`]). Tabular
//! assets read from workbooks are represented by [`TabularData`].

mod content;
mod slide;
mod tabular;

pub use content::*;
pub use slide::*;
pub use tabular::*;
