//! Layout inference.
//!
//! Each slide is matched against a fixed, ordered table of eight layout
//! rules ([`RULES`]); the first rule whose predicate holds names the layout.
//! The name is then resolved to a numeric id through a caller-supplied
//! [`LayoutMapping`], falling back to the rule's default id.
//!
//! # Example
//!
//! ```
//! use deckgen::layout::{select, LayoutMapping};
//! use deckgen::SlideContent;
//!
//! let content = SlideContent {
//!     title: "Results".to_string(),
//!     bullet_points: vec!["a".to_string(), "b".to_string()],
//!     table_path: Some("data.xlsx".into()),
//!     ..Default::default()
//! };
//!
//! let layout = select(&content, &LayoutMapping::default());
//! assert_eq!(layout.name(), "Title, Content, and Table");
//! assert_eq!(layout.id, 5);
//! ```

mod rules;
mod selector;

pub use rules::{LayoutKind, LayoutRule, RULES};
pub use selector::{select, LayoutMapping, SelectedLayout};
