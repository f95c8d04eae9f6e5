//! # deckgen
//!
//! Layout inference and template-driven PowerPoint assembly.
//!
//! Slides are described by their content (a title, bullet points, and
//! optional image, table, chart and media assets). Each slide is matched to
//! one of eight named layouts by a fixed rule table, and the deck is then
//! written into a `.pptx` template by populating the layout placeholders.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckgen::{Assembler, LayoutMapping, Presentation, SlideBuilder};
//!
//! let mapping = LayoutMapping::default();
//! let mut deck = Presentation::new("Quarterly Review");
//!
//! let mut intro = SlideBuilder::new(&mapping);
//! intro.set_title("Intro");
//! deck.push(intro.finalize());
//!
//! let mut results = SlideBuilder::new(&mapping);
//! results
//!     .set_title("Results")
//!     .add_bullet_point("Revenue up 12%")
//!     .set_table("data/sales.xlsx");
//! deck.push(results.finalize());
//!
//! let report = Assembler::new().assemble(
//!     &deck,
//!     "templates/SimpleTemplate.pptx",
//!     "outputs/review.pptx",
//! )?;
//! for skipped in &report.skipped {
//!     eprintln!("slide {}: {} not placed", skipped.slide_index + 1, skipped.kind);
//! }
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! ## From an outline
//!
//! ```no_run
//! let outline = serde_json::from_str(&std::fs::read_to_string("outline.json")?)?;
//! let report = deckgen::generate(outline, &deckgen::Config::default())?;
//! println!("wrote {}", report.output_path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - `async`: [`Assembler::assemble_async`], running assembly on Tokio's
//!   blocking pool

pub mod assembler;
pub mod builder;
pub mod charts;
pub mod config;
pub mod container;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod package;
pub mod pptx;
pub mod template;
pub mod xlsx;

// Re-exports
pub use assembler::{Assembler, AssemblyReport, LayoutFallback, SkipReason, SkippedAsset};
pub use builder::SlideBuilder;
pub use config::Config;
pub use error::{Error, Result};
pub use layout::{select, LayoutKind, LayoutMapping, SelectedLayout};
pub use model::{AssetKind, ChartKind, Outline, Presentation, Slide, SlideContent, TabularData};
pub use template::Template;

/// Build a deck from an outline using the template, layout mapping, output
/// directory and asset root of `config`.
///
/// The output file is named after the outline title.
pub fn generate(outline: Outline, config: &Config) -> Result<AssemblyReport> {
    let presentation = outline.into_presentation(&config.layout_mapping);
    let output = config.output_path_for(&presentation.title);
    assembler_for(config).assemble(&presentation, &config.ppt_template, output)
}

/// An [`Assembler`] using the asset root of `config`.
pub fn assembler_for(config: &Config) -> Assembler {
    match &config.asset_root {
        Some(root) => Assembler::new().with_asset_root(root),
        None => Assembler::new(),
    }
}
