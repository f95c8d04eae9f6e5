//! ZIP container abstraction for OOXML documents.
//!
//! Read side of the OPC layer. Templates and workbook assets are opened
//! through [`OoxmlContainer`]; relationship files are parsed into
//! [`Relationships`], which can also be serialized back for the writer.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Relationship type of the main document part.
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
/// Relationship type of the core properties part.
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Ordered collection of relationships from one .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the XML of a .rels file.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().unwrap_or_default().to_string();
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"TargetMode" => external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.entries.push(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Get relationships by type, in file order.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Iterate over all relationships in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an internal relationship under the next free `rIdN` and return its ID.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: false,
        });
        id
    }

    /// Remove every relationship matching the predicate and return them.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Relationship) -> bool) -> Vec<Relationship> {
        let (removed, kept): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|r| pred(r));
        self.entries = kept;
        removed
    }

    /// Smallest `rIdN` not yet in use.
    fn next_id(&self) -> String {
        let max = self
            .entries
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Serialize as a .rels part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        );
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.entries {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            );
            if rel.external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Escape text for use in XML content or attribute values.
pub fn escape_xml(s: &str) -> String {
    quick_xml::escape::escape(s).into_owned()
}

/// Path of the .rels part describing `part_path`'s relationships.
///
/// `ppt/slides/slide1.xml` maps to `ppt/slides/_rels/slide1.xml.rels`; the
/// package itself (empty path) maps to `_rels/.rels`.
pub fn rels_path_for(part_path: &str) -> String {
    if part_path.is_empty() || part_path == "/" {
        return "_rels/.rels".to_string();
    }
    match part_path.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part_path[..pos], &part_path[pos + 1..]),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// After decoding UTF-16 XML to a Rust String the declaration still says
/// encoding="UTF-16", which makes quick-xml re-interpret the text.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM: ASCII markup leaves null bytes in alternating positions
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Decode UTF-16 bytes with the given byte order.
fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let u16_iter = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(u16_iter)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// OOXML container abstraction over a ZIP archive.
///
/// Provides methods to read XML files, binary data, and relationships
/// from an Office Open XML package.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deckgen::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("template.pptx")?;
    /// # Ok::<(), deckgen::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML file from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary file from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all files in the archive, skipping directory entries.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| !n.ends_with('/'))
            .map(String::from)
            .collect()
    }

    /// List files matching a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix) && !n.ends_with('/'))
            .map(String::from)
            .collect()
    }

    /// Read the relationships of a part; a missing .rels file yields an empty set.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        match self.read_xml(&rels_path_for(part_path)) {
            Ok(xml) => Relationships::parse(&xml),
            Err(Error::MissingComponent(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// Read package-level relationships (_rels/.rels).
    pub fn read_package_relationships(&self) -> Result<Relationships> {
        self.read_relationships("")
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }

    /// Express `target` relative to the directory of `source`.
    ///
    /// Inverse of [`resolve_path`](Self::resolve_path), used when writing
    /// relationship targets.
    pub fn relative_path(source: &str, target: &str) -> String {
        let source_dir: Vec<&str> = match source.rfind('/') {
            Some(pos) => source[..pos].split('/').collect(),
            None => Vec::new(),
        };
        let target_parts: Vec<&str> = target.split('/').collect();

        let common = source_dir
            .iter()
            .zip(target_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; source_dir.len() - common];
        parts.extend_from_slice(&target_parts[common..]);
        parts.join("/")
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_with(files: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, content) in files {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            OoxmlContainer::relative_path("ppt/slides/slide1.xml", "ppt/media/image1.png"),
            "../media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::relative_path("ppt/presentation.xml", "ppt/slides/slide2.xml"),
            "slides/slide2.xml"
        );
        assert_eq!(
            OoxmlContainer::relative_path("", "docProps/core.xml"),
            "docProps/core.xml"
        );
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for(""), "_rels/.rels");
        assert_eq!(
            rels_path_for("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        let first = rels.add("http://test/type1", "target1.xml");
        let second = rels.add("http://test/type1", "target2.xml");
        rels.add("http://test/type2", "target3.xml");

        assert_eq!(first, "rId1");
        assert_eq!(second, "rId2");
        assert!(rels.get("rId1").is_some());
        assert!(rels.get("rId9").is_none());
        assert_eq!(rels.get_by_type("http://test/type1").len(), 2);

        let removed = rels.remove_where(|r| r.rel_type == "http://test/type1");
        assert_eq!(removed.len(), 2);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.add("http://test/type1", "again.xml"), "rId4");
    }

    #[test]
    fn test_relationships_xml_round_trip() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://t/link" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
  <Relationship Id="rId1" Type="http://t/slide" Target="slides/slide1.xml"/>
</Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.len(), 2);
        let link = rels.get("rId2").unwrap();
        assert!(link.external);
        assert_eq!(link.target, "https://example.com/?a=1&b=2");

        let reparsed = Relationships::parse(&rels.to_xml()).unwrap();
        let ids: Vec<&str> = reparsed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId2", "rId1"]);
        assert!(reparsed.get("rId2").unwrap().external);
    }

    #[test]
    fn test_open_from_bytes() {
        let data = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            (
                "_rels/.rels",
                r#"<Relationships><Relationship Id="rId1" Type="t" Target="ppt/presentation.xml"/></Relationships>"#,
            ),
            ("ppt/presentation.xml", "<p:presentation/>"),
        ]);

        let container = OoxmlContainer::from_bytes(data).unwrap();
        assert!(container.exists("ppt/presentation.xml"));
        assert!(!container.exists("ppt/slides/slide1.xml"));
        assert_eq!(container.list_files_with_prefix("ppt/").len(), 1);
        assert_eq!(container.read_package_relationships().unwrap().len(), 1);
        assert!(container
            .read_relationships("ppt/presentation.xml")
            .unwrap()
            .is_empty());
        assert!(matches!(
            container.read_xml("missing.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        let utf8_plain = b"<?xml>";
        assert_eq!(decode_xml_bytes(utf8_plain).unwrap(), "<?xml>");
    }
}
