//! Per-slide semantic payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// Kind of chart rendered from a chart-source asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bars (column chart)
    Bar,
    /// Horizontal bars
    Barh,
    /// Line chart
    #[default]
    Line,
    /// Pie chart (first series only)
    Pie,
    /// Area chart
    Area,
}

impl ChartKind {
    /// Name used in outlines and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Barh => "barh",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Area => "area",
        }
    }

    /// Whether the chart is drawn against category and value axes.
    pub fn has_axes(&self) -> bool {
        !matches!(self, ChartKind::Pie)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" | "column" => Ok(ChartKind::Bar),
            "barh" => Ok(ChartKind::Barh),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "area" => Ok(ChartKind::Area),
            other => Err(Error::UnsupportedFormat(format!("chart kind '{}'", other))),
        }
    }
}

/// Kind of external asset a slide can reference.
///
/// The variant order is the order in which the assembler applies assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Still image
    Image,
    /// Tabular data rendered as a table
    Table,
    /// Tabular data rendered as a chart
    Chart,
    /// Video or audio clip
    Media,
}

impl AssetKind {
    /// All asset kinds in application order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Image,
        AssetKind::Table,
        AssetKind::Chart,
        AssetKind::Media,
    ];

    /// Lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Table => "table",
            AssetKind::Chart => "chart",
            AssetKind::Media => "media",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic payload of one slide.
///
/// Asset fields are independent; any subset may be set at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide heading (may be empty)
    #[serde(default)]
    pub title: String,

    /// Body text, one paragraph per entry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullet_points: Vec<String>,

    /// Still-image asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,

    /// Workbook rendered as a table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_path: Option<PathBuf>,

    /// Workbook rendered as a chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<PathBuf>,

    /// Declared chart kind for `chart_path`
    #[serde(default)]
    pub chart_kind: ChartKind,

    /// Video or audio asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_path: Option<PathBuf>,

    /// Poster frame shown before the media plays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_poster_path: Option<PathBuf>,
}

impl SlideContent {
    /// Create content with just a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Whether any bullet point is present.
    pub fn has_bullets(&self) -> bool {
        !self.bullet_points.is_empty()
    }

    /// Path of the asset of the given kind, if set.
    pub fn asset_path(&self, kind: AssetKind) -> Option<&PathBuf> {
        match kind {
            AssetKind::Image => self.image_path.as_ref(),
            AssetKind::Table => self.table_path.as_ref(),
            AssetKind::Chart => self.chart_path.as_ref(),
            AssetKind::Media => self.media_path.as_ref(),
        }
    }

    /// Iterate over the set assets in application order.
    pub fn assets(&self) -> impl Iterator<Item = (AssetKind, &PathBuf)> {
        AssetKind::ALL
            .into_iter()
            .filter_map(move |kind| self.asset_path(kind).map(|p| (kind, p)))
    }
}
