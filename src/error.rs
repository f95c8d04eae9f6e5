//! Error types for the deckgen library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deckgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting layouts and assembling decks.
///
/// Only [`Error::TemplateNotFound`] and failures reading the template or
/// writing the output abort an assembly run. The asset and layout variants
/// are produced internally and absorbed by the assembler, which records them
/// in its report instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The template file does not exist.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// A referenced asset file does not exist.
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// The slide has no placeholder for the requested role.
    #[error("No {0} placeholder on slide")]
    PlaceholderNotFound(String),

    /// A layout id is outside the template's layout list.
    #[error("Layout index {requested} out of range ({available} layouts available)")]
    LayoutIndexOutOfRange {
        /// Requested layout id
        requested: usize,
        /// Number of layouts in the template
        available: usize,
    },

    /// The file format is recognized but not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading or writing a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing or writing XML content.
    #[error("XML error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in a document or asset.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
