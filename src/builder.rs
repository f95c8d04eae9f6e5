//! Incremental slide construction.

use std::path::PathBuf;

use crate::layout::{self, LayoutMapping};
use crate::model::{ChartKind, Slide, SlideContent};

/// Accumulates one slide's fields and freezes its layout on [`finalize`].
///
/// `finalize` consumes the builder, so layout selection runs exactly once
/// per builder and a finalized builder cannot be reused.
///
/// # Example
///
/// ```
/// use deckgen::{LayoutMapping, SlideBuilder};
///
/// let mapping = LayoutMapping::default();
/// let mut builder = SlideBuilder::new(&mapping);
/// builder
///     .set_title("Results")
///     .add_bullet_point("a")
///     .add_bullet_point("b")
///     .set_table("data.xlsx");
///
/// let slide = builder.finalize();
/// assert_eq!(slide.layout_name(), "Title, Content, and Table");
/// assert_eq!(slide.layout_id(), 5);
/// ```
///
/// [`finalize`]: SlideBuilder::finalize
#[derive(Debug)]
pub struct SlideBuilder<'a> {
    mapping: &'a LayoutMapping,
    content: SlideContent,
}

impl<'a> SlideBuilder<'a> {
    /// Start an empty slide that will resolve layout ids through `mapping`.
    pub fn new(mapping: &'a LayoutMapping) -> Self {
        Self {
            mapping,
            content: SlideContent::default(),
        }
    }

    /// Set the slide title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.content.title = title.into();
        self
    }

    /// Append a bullet point.
    pub fn add_bullet_point(&mut self, bullet: impl Into<String>) -> &mut Self {
        self.content.bullet_points.push(bullet.into());
        self
    }

    /// Set the image asset.
    pub fn set_image(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.content.image_path = Some(path.into());
        self
    }

    /// Set the table asset.
    pub fn set_table(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.content.table_path = Some(path.into());
        self
    }

    /// Set the chart-source asset.
    pub fn set_chart(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.content.chart_path = Some(path.into());
        self
    }

    /// Set the chart kind used to render the chart asset.
    pub fn set_chart_kind(&mut self, kind: ChartKind) -> &mut Self {
        self.content.chart_kind = kind;
        self
    }

    /// Set the media asset.
    pub fn set_media(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.content.media_path = Some(path.into());
        self
    }

    /// Set the poster image shown for the media asset.
    pub fn set_media_poster(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.content.media_poster_path = Some(path.into());
        self
    }

    /// Content accumulated so far.
    pub fn content(&self) -> &SlideContent {
        &self.content
    }

    /// Select the layout and return the finished slide.
    pub fn finalize(self) -> Slide {
        let selected = layout::select(&self.content, self.mapping);
        Slide::new(selected, self.content)
    }
}
