//! Slides with frozen layout assignments, and the deck that orders them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::SlideContent;
use crate::builder::SlideBuilder;
use crate::layout::{LayoutKind, LayoutMapping, SelectedLayout};

/// A slide whose layout has been chosen.
///
/// The layout fields can only be set by the layout selector, which runs
/// when a [`SlideBuilder`] is finalized. There is no way to change them
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    layout: SelectedLayout,
    content: SlideContent,
}

impl Slide {
    pub(crate) fn new(layout: SelectedLayout, content: SlideContent) -> Self {
        Self { layout, content }
    }

    /// Numeric layout id (index into the template's layouts).
    pub fn layout_id(&self) -> usize {
        self.layout.id
    }

    /// Layout name chosen by the rule table.
    pub fn layout_name(&self) -> &'static str {
        self.layout.kind.name()
    }

    /// Layout rule that matched.
    pub fn layout_kind(&self) -> LayoutKind {
        self.layout.kind
    }

    /// The slide's semantic payload.
    pub fn content(&self) -> &SlideContent {
        &self.content
    }
}

/// An ordered deck of slides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Presentation {
    /// Document title, written to the core properties
    pub title: String,
    /// Slides in output order
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty presentation.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Presentation: {}", self.title)?;
        for (idx, slide) in self.slides.iter().enumerate() {
            let content = slide.content();
            write!(f, "\n\nSlide {}:", idx + 1)?;
            write!(f, "\n  Title: {}", content.title)?;
            write!(
                f,
                "\n  Layout: {} (ID: {})",
                slide.layout_name(),
                slide.layout_id()
            )?;
            if content.has_bullets() {
                write!(f, "\n  Bullet Points: {}", content.bullet_points.join(", "))?;
            }
            if let Some(ref image) = content.image_path {
                write!(f, "\n  Image: {}", image.display())?;
            }
        }
        Ok(())
    }
}

/// Structured slide list produced by a content interpreter.
///
/// This is the JSON input format of the `deckgen` command-line tool.
///
/// ```
/// use deckgen::{LayoutMapping, Outline};
///
/// let outline: Outline = serde_json::from_str(r#"{
///     "title": "Quarterly Review",
///     "slides": [
///         {"title": "Intro"},
///         {"title": "Highlights", "bullet_points": ["Revenue up", "Churn down"]}
///     ]
/// }"#)?;
///
/// let deck = outline.into_presentation(&LayoutMapping::default());
/// assert_eq!(deck.slides[0].layout_name(), "Title Only");
/// assert_eq!(deck.slides[1].layout_name(), "Title and Content");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title
    #[serde(default)]
    pub title: String,
    /// Slide contents in order
    #[serde(default)]
    pub slides: Vec<SlideContent>,
}

impl Outline {
    /// Run every slide through a [`SlideBuilder`], preserving order.
    pub fn into_presentation(self, mapping: &LayoutMapping) -> Presentation {
        let mut presentation = Presentation::new(self.title);
        for content in self.slides {
            let mut builder = SlideBuilder::new(mapping);
            builder.set_title(content.title);
            for bullet in content.bullet_points {
                builder.add_bullet_point(bullet);
            }
            if let Some(path) = content.image_path {
                builder.set_image(path);
            }
            if let Some(path) = content.table_path {
                builder.set_table(path);
            }
            if let Some(path) = content.chart_path {
                builder.set_chart(path);
            }
            builder.set_chart_kind(content.chart_kind);
            if let Some(path) = content.media_path {
                builder.set_media(path);
            }
            if let Some(path) = content.media_poster_path {
                builder.set_media_poster(path);
            }
            presentation.push(builder.finalize());
        }
        presentation
    }
}
