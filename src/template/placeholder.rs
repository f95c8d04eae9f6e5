//! Layout placeholder descriptions.

use std::fmt;

/// Placeholder type from `<p:ph type="...">`; absent means `obj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    Body,
    SubTitle,
    Object,
    Picture,
    Table,
    Chart,
    Media,
    Date,
    SlideNumber,
    Footer,
    Header,
    ClipArt,
    Diagram,
    SlideImage,
}

/// What a placeholder can receive when a slide is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderRole {
    Title,
    Text,
    Picture,
    Table,
    Chart,
    Media,
    Other,
}

impl PlaceholderType {
    /// Parse the `type` attribute value. Unknown values are treated as `obj`.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "title" => PlaceholderType::Title,
            "ctrTitle" => PlaceholderType::CenterTitle,
            "body" => PlaceholderType::Body,
            "subTitle" => PlaceholderType::SubTitle,
            "pic" => PlaceholderType::Picture,
            "tbl" => PlaceholderType::Table,
            "chart" => PlaceholderType::Chart,
            "media" => PlaceholderType::Media,
            "dt" => PlaceholderType::Date,
            "sldNum" => PlaceholderType::SlideNumber,
            "ftr" => PlaceholderType::Footer,
            "hdr" => PlaceholderType::Header,
            "clipArt" => PlaceholderType::ClipArt,
            "dgm" => PlaceholderType::Diagram,
            "sldImg" => PlaceholderType::SlideImage,
            _ => PlaceholderType::Object,
        }
    }

    /// The `type` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderType::Title => "title",
            PlaceholderType::CenterTitle => "ctrTitle",
            PlaceholderType::Body => "body",
            PlaceholderType::SubTitle => "subTitle",
            PlaceholderType::Object => "obj",
            PlaceholderType::Picture => "pic",
            PlaceholderType::Table => "tbl",
            PlaceholderType::Chart => "chart",
            PlaceholderType::Media => "media",
            PlaceholderType::Date => "dt",
            PlaceholderType::SlideNumber => "sldNum",
            PlaceholderType::Footer => "ftr",
            PlaceholderType::Header => "hdr",
            PlaceholderType::ClipArt => "clipArt",
            PlaceholderType::Diagram => "dgm",
            PlaceholderType::SlideImage => "sldImg",
        }
    }

    pub fn role(&self) -> PlaceholderRole {
        match self {
            PlaceholderType::Title | PlaceholderType::CenterTitle => PlaceholderRole::Title,
            PlaceholderType::Body | PlaceholderType::SubTitle | PlaceholderType::Object => {
                PlaceholderRole::Text
            }
            PlaceholderType::Picture => PlaceholderRole::Picture,
            PlaceholderType::Table => PlaceholderRole::Table,
            PlaceholderType::Chart => PlaceholderRole::Chart,
            PlaceholderType::Media => PlaceholderRole::Media,
            _ => PlaceholderRole::Other,
        }
    }

    /// Date, footer, slide-number and header placeholders stay on the
    /// layout and are not copied onto new slides.
    pub fn is_slide_furniture(&self) -> bool {
        matches!(
            self,
            PlaceholderType::Date
                | PlaceholderType::Footer
                | PlaceholderType::SlideNumber
                | PlaceholderType::Header
        )
    }

    /// Whether a cloned placeholder carries a text body.
    pub fn has_text_frame(&self) -> bool {
        matches!(
            self,
            PlaceholderType::Title
                | PlaceholderType::CenterTitle
                | PlaceholderType::Body
                | PlaceholderType::SubTitle
                | PlaceholderType::Object
        )
    }
}

impl fmt::Display for PlaceholderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position and size in EMU (`a:xfrm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Xfrm {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Xfrm {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// A placeholder shape on a slide layout or master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Shape id (`p:cNvPr@id`)
    pub shape_id: u32,
    /// Shape name (`p:cNvPr@name`)
    pub name: String,
    pub ph_type: PlaceholderType,
    /// Placeholder index (`p:ph@idx`, 0 when absent)
    pub idx: u32,
    /// Own geometry, or the master's when the layout inherits it
    pub xfrm: Option<Xfrm>,
}

impl Placeholder {
    pub fn role(&self) -> PlaceholderRole {
        self.ph_type.role()
    }
}
