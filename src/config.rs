//! JSON configuration.
//!
//! ```json
//! {
//!   "ppt_template": "templates/SimpleTemplate.pptx",
//!   "layout_mapping": { "Title Only": 1, "Title and Content": 2 },
//!   "output_dir": "outputs",
//!   "asset_root": "assets"
//! }
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::LayoutMapping;

const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Deck generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template used when none is given on the command line
    pub ppt_template: PathBuf,
    /// Layout name to template layout index
    pub layout_mapping: LayoutMapping,
    /// Directory generated decks are written to
    pub output_dir: PathBuf,
    /// Root for relative asset paths (current directory when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ppt_template: PathBuf::from("templates/SimpleTemplate.pptx"),
            layout_mapping: LayoutMapping::default(),
            output_dir: PathBuf::from("outputs"),
            asset_root: None,
        }
    }
}

impl Config {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Parse from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Output path for a deck title: `{output_dir}/{title}.pptx`, with
    /// characters that are invalid in file names removed.
    pub fn output_path_for(&self, title: &str) -> PathBuf {
        let mut name: String = title
            .chars()
            .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
            .collect::<String>()
            .trim()
            .to_string();
        if name.is_empty() {
            name.push_str("presentation");
        }
        self.output_dir.join(format!("{}.pptx", name))
    }
}
