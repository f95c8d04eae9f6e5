//! Rule evaluation and layout id resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::rules::{LayoutKind, RULES};
use crate::model::SlideContent;

/// Caller-chosen layout ids, keyed by layout name.
///
/// Entries are optional; layouts without an entry resolve to their
/// default id. Deserializes from a plain JSON object such as
/// `{"Title Only": 5, "Title and Content": 1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutMapping {
    ids: BTreeMap<String, usize>,
}

impl LayoutMapping {
    /// Create an empty mapping (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id for a layout.
    pub fn insert(&mut self, kind: LayoutKind, id: usize) -> &mut Self {
        self.ids.insert(kind.name().to_string(), id);
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, kind: LayoutKind, id: usize) -> Self {
        self.insert(kind, id);
        self
    }

    /// Id explicitly configured for a layout name.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Configured id, or the layout's default id.
    pub fn resolve(&self, kind: LayoutKind) -> usize {
        self.get(kind.name()).unwrap_or_else(|| kind.default_id())
    }

    /// Configured names that do not match any layout.
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.ids
            .keys()
            .map(String::as_str)
            .filter(|name| LayoutKind::from_name(name).is_none())
    }

    /// Whether no layout has an explicit id.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<(LayoutKind, usize)> for LayoutMapping {
    fn from_iter<I: IntoIterator<Item = (LayoutKind, usize)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (kind, id) in iter {
            mapping.insert(kind, id);
        }
        mapping
    }
}

/// The outcome of layout selection: which rule matched and its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectedLayout {
    /// Resolved layout id
    pub id: usize,
    /// Matched layout
    pub kind: LayoutKind,
}

impl SelectedLayout {
    /// Layout name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Pick the layout for a slide.
///
/// Evaluates [`RULES`] top-down and resolves the first match through
/// `mapping`. Pure and total: the same input always yields the same
/// layout, and every input yields one.
pub fn select(content: &SlideContent, mapping: &LayoutMapping) -> SelectedLayout {
    let kind = RULES
        .iter()
        .find(|rule| (rule.applies)(content))
        .map(|rule| rule.kind)
        .unwrap_or(LayoutKind::TitleOnly);

    SelectedLayout {
        id: mapping.resolve(kind),
        kind,
    }
}
