//! The closed layout rule table.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::model::SlideContent;

/// One of the eight layouts the selector can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    TitleOnly,
    TitleAndContent,
    TitleAndPicture,
    TitleContentAndPicture,
    TitleContentAndTable,
    TitleContentAndChart,
    TitleAndMedia,
    TitleContentAndMedia,
}

impl LayoutKind {
    /// All layouts, ordered by default id.
    pub const ALL: [LayoutKind; 8] = [
        LayoutKind::TitleOnly,
        LayoutKind::TitleAndContent,
        LayoutKind::TitleAndPicture,
        LayoutKind::TitleContentAndPicture,
        LayoutKind::TitleContentAndTable,
        LayoutKind::TitleContentAndChart,
        LayoutKind::TitleAndMedia,
        LayoutKind::TitleContentAndMedia,
    ];

    /// Layout name as used in templates and layout mappings.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::TitleOnly => "Title Only",
            LayoutKind::TitleAndContent => "Title and Content",
            LayoutKind::TitleAndPicture => "Title and Picture",
            LayoutKind::TitleContentAndPicture => "Title, Content, and Picture",
            LayoutKind::TitleContentAndTable => "Title, Content, and Table",
            LayoutKind::TitleContentAndChart => "Title, Content, and Chart",
            LayoutKind::TitleAndMedia => "Title and Media",
            LayoutKind::TitleContentAndMedia => "Title, Content, and Media",
        }
    }

    /// Layout id used when the mapping has no entry for this layout.
    pub fn default_id(&self) -> usize {
        match self {
            LayoutKind::TitleOnly => 1,
            LayoutKind::TitleAndContent => 2,
            LayoutKind::TitleAndPicture => 3,
            LayoutKind::TitleContentAndPicture => 4,
            LayoutKind::TitleContentAndTable => 5,
            LayoutKind::TitleContentAndChart => 6,
            LayoutKind::TitleAndMedia => 7,
            LayoutKind::TitleContentAndMedia => 8,
        }
    }

    /// Look a layout up by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for LayoutKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A (predicate, layout) pair in the rule table.
#[derive(Clone, Copy)]
pub struct LayoutRule {
    /// Layout chosen when the predicate holds
    pub kind: LayoutKind,
    /// Whether the rule applies to the given content
    pub applies: fn(&SlideContent) -> bool,
}

impl fmt::Debug for LayoutRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutRule").field("kind", &self.kind).finish()
    }
}

/// Layout rules in precedence order. The first match wins.
///
/// Picture rules come first, then table, chart and media. A slide carrying
/// several of these assets gets the layout of the first matching rule only;
/// asset insertion during assembly does not depend on which layout won.
pub const RULES: [LayoutRule; 8] = [
    LayoutRule {
        kind: LayoutKind::TitleContentAndPicture,
        applies: |c| c.image_path.is_some() && c.has_bullets(),
    },
    LayoutRule {
        kind: LayoutKind::TitleAndPicture,
        applies: |c| c.image_path.is_some(),
    },
    LayoutRule {
        kind: LayoutKind::TitleContentAndTable,
        applies: |c| c.table_path.is_some() && c.has_bullets(),
    },
    LayoutRule {
        kind: LayoutKind::TitleContentAndChart,
        applies: |c| c.chart_path.is_some() && c.has_bullets(),
    },
    LayoutRule {
        kind: LayoutKind::TitleContentAndMedia,
        applies: |c| c.media_path.is_some() && c.has_bullets(),
    },
    LayoutRule {
        kind: LayoutKind::TitleAndMedia,
        applies: |c| c.media_path.is_some(),
    },
    LayoutRule {
        kind: LayoutKind::TitleAndContent,
        applies: |c| c.has_bullets(),
    },
    LayoutRule {
        kind: LayoutKind::TitleOnly,
        applies: |_| true,
    },
];
