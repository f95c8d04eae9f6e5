//! Format detection for packages and embedded assets.
//!
//! Templates and workbooks are identified from `[Content_Types].xml`;
//! images are sniffed from their magic bytes and media files are
//! recognized by extension, which is enough to choose the OOXML content
//! type and part extension they are stored under.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use std::path::Path;

/// Main-part content types of presentation packages (.pptx, .potx, .ppsx).
const PPTX_CONTENT_TYPES: [&str; 3] = [
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml",
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml",
];

/// Main-part content types of workbook packages (.xlsx, .xlsm).
const XLSX_CONTENT_TYPES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
    "application/vnd.ms-excel.sheet.macroEnabled.main+xml",
];

/// Detected Office package format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
    /// Microsoft PowerPoint presentation or template (.pptx, .potx)
    Pptx,
}

impl FormatType {
    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Pptx => "PowerPoint Presentation",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the package format of an opened container.
///
/// Inspects `[Content_Types].xml` first and falls back to the folder
/// structure (`ppt/` or `xl/`) when the content types are inconclusive.
pub fn detect_format(container: &OoxmlContainer) -> Result<FormatType> {
    let content_types = container
        .read_xml("[Content_Types].xml")
        .map_err(|_| Error::MissingComponent("[Content_Types].xml".to_string()))?;

    if PPTX_CONTENT_TYPES.iter().any(|ct| content_types.contains(ct)) {
        return Ok(FormatType::Pptx);
    }
    if XLSX_CONTENT_TYPES.iter().any(|ct| content_types.contains(ct)) {
        return Ok(FormatType::Xlsx);
    }

    let has_xl = !container.list_files_with_prefix("xl/").is_empty();
    let has_ppt = !container.list_files_with_prefix("ppt/").is_empty();
    match (has_xl, has_ppt) {
        (true, false) => Ok(FormatType::Xlsx),
        (false, true) => Ok(FormatType::Pptx),
        _ => Err(Error::UnsupportedFormat(
            "not a presentation or workbook package".to_string(),
        )),
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

/// Still-image formats that can be embedded in a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Svg,
}

impl ImageFormat {
    /// Detect from magic bytes, falling back to the file extension.
    pub fn detect(data: &[u8], path: &Path) -> Option<Self> {
        Self::from_magic(data).or_else(|| Self::from_extension(&extension_of(path)))
    }

    /// Detect from magic bytes.
    pub fn from_magic(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            Some(ImageFormat::Tiff)
        } else {
            None
        }
    }

    /// Detect from a lowercase file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Extension of the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Svg => "svg",
        }
    }

    /// MIME content type.
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Video and audio formats that can be embedded in a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Mp4,
    M4v,
    Mov,
    Avi,
    Wmv,
    Mp3,
    Wav,
    M4a,
    Wma,
}

impl MediaFormat {
    /// Detect from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_of(path).as_str() {
            "mp4" => Some(MediaFormat::Mp4),
            "m4v" => Some(MediaFormat::M4v),
            "mov" => Some(MediaFormat::Mov),
            "avi" => Some(MediaFormat::Avi),
            "wmv" => Some(MediaFormat::Wmv),
            "mp3" => Some(MediaFormat::Mp3),
            "wav" => Some(MediaFormat::Wav),
            "m4a" => Some(MediaFormat::M4a),
            "wma" => Some(MediaFormat::Wma),
            _ => None,
        }
    }

    /// Whether this is an audio-only format.
    pub fn is_audio(&self) -> bool {
        matches!(
            self,
            MediaFormat::Mp3 | MediaFormat::Wav | MediaFormat::M4a | MediaFormat::Wma
        )
    }

    /// Extension of the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::M4v => "m4v",
            MediaFormat::Mov => "mov",
            MediaFormat::Avi => "avi",
            MediaFormat::Wmv => "wmv",
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Wav => "wav",
            MediaFormat::M4a => "m4a",
            MediaFormat::Wma => "wma",
        }
    }

    /// MIME content type.
    pub fn content_type(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::M4v => "video/x-m4v",
            MediaFormat::Mov => "video/quicktime",
            MediaFormat::Avi => "video/x-msvideo",
            MediaFormat::Wmv => "video/x-ms-wmv",
            MediaFormat::Mp3 => "audio/mpeg",
            MediaFormat::Wav => "audio/wav",
            MediaFormat::M4a => "audio/mp4",
            MediaFormat::Wma => "audio/x-ms-wma",
        }
    }
}
