//! Writable OPC package.
//!
//! Write side of the container layer: every part of a template is loaded
//! into memory, edited, pruned to what is still reachable through
//! relationships, and serialized back to a ZIP archive with a regenerated
//! `[Content_Types].xml`.

use crate::container::{escape_xml, rels_path_for, OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_XML: &str = "application/xml";

/// Content type mapping of a package (`[Content_Types].xml`).
///
/// Part names are stored without the leading slash.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Parse `[Content_Types].xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut types = ContentTypes::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().flatten() {
                        let value = attr.unescape_value().unwrap_or_default().to_string();
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }

                    if let (Some(key), Some(ct)) = (key, content_type) {
                        match e.name().local_name().as_ref() {
                            b"Default" => {
                                types.defaults.insert(key.to_lowercase(), ct);
                            }
                            b"Override" => {
                                types
                                    .overrides
                                    .insert(key.trim_start_matches('/').to_string(), ct);
                            }
                            _ => {}
                        }
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Content type of a part: its override, else the default of its extension.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        self.overrides
            .get(part.trim_start_matches('/'))
            .or_else(|| self.defaults.get(&extension_of(part)))
            .map(String::as_str)
    }

    /// Register a content type for one part.
    ///
    /// Binary parts get a `Default` entry for their extension when none
    /// exists yet; everything else gets an `Override`.
    pub fn register(&mut self, part: &str, content_type: &str) {
        let part = part.trim_start_matches('/');
        let ext = extension_of(part);
        let existing = self.defaults.get(&ext).cloned();
        match existing.as_deref() {
            Some(existing) if existing == content_type => {}
            None if ext != "xml" && !content_type.ends_with("+xml") => {
                self.defaults.insert(ext, content_type.to_string());
            }
            _ => {
                self.overrides
                    .insert(part.to_string(), content_type.to_string());
            }
        }
    }

    /// Drop overrides for parts that fail the predicate.
    pub fn retain_parts(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.overrides.retain(|part, _| keep(part));
    }

    /// Serialize as `[Content_Types].xml`.
    pub fn to_xml(&self) -> String {
        let mut defaults = self.defaults.clone();
        defaults
            .entry("rels".to_string())
            .or_insert_with(|| CT_RELATIONSHIPS.to_string());
        defaults
            .entry("xml".to_string())
            .or_insert_with(|| CT_XML.to_string());

        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(ct)
            );
        }
        for (part, ct) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                escape_xml(part),
                escape_xml(ct)
            );
        }
        xml.push_str("</Types>");
        xml
    }
}

fn extension_of(part: &str) -> String {
    let file = part.rsplit('/').next().unwrap_or(part);
    match file.rfind('.') {
        Some(pos) => file[pos + 1..].to_lowercase(),
        None => String::new(),
    }
}

/// In-memory OPC package: every part keyed by its path inside the archive.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
    content_types: ContentTypes,
}

impl Package {
    /// Load every part of an opened container.
    pub fn from_container(container: &OoxmlContainer) -> Result<Self> {
        let content_types = ContentTypes::parse(&container.read_xml(CONTENT_TYPES_PART)?)?;

        let mut parts = BTreeMap::new();
        for name in container.list_files() {
            if name == CONTENT_TYPES_PART {
                continue;
            }
            let data = container.read_binary(&name)?;
            parts.insert(name, data);
        }

        Ok(Self {
            parts,
            content_types,
        })
    }

    /// Raw bytes of a part.
    pub fn get(&self, part: &str) -> Option<&[u8]> {
        self.parts.get(part).map(Vec::as_slice)
    }

    /// Whether the package contains a part.
    pub fn contains(&self, part: &str) -> bool {
        self.parts.contains_key(part)
    }

    /// Read a part as XML text.
    pub fn read_xml(&self, part: &str) -> Result<String> {
        let bytes = self
            .get(part)
            .ok_or_else(|| Error::MissingComponent(part.to_string()))?;
        crate::container::decode_xml_bytes(bytes)
    }

    /// Part names in sorted order, `.rels` parts included.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Content type mapping.
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Insert or replace a part and register its content type.
    pub fn put_part(&mut self, part: &str, data: Vec<u8>, content_type: &str) {
        self.content_types.register(part, content_type);
        self.parts.insert(part.to_string(), data);
    }

    /// Remove a part together with its relationships.
    pub fn remove_part(&mut self, part: &str) -> bool {
        self.parts.remove(&rels_path_for(part));
        self.parts.remove(part).is_some()
    }

    /// Replace the bytes of a part whose content type is already known.
    pub fn set_xml(&mut self, part: &str, xml: String) {
        self.parts.insert(part.to_string(), xml.into_bytes());
    }

    /// Relationships of a part; a missing .rels part yields an empty set.
    pub fn relationships(&self, part: &str) -> Result<Relationships> {
        let rels_path = rels_path_for(part);
        if !self.contains(&rels_path) {
            return Ok(Relationships::new());
        }
        Relationships::parse(&self.read_xml(&rels_path)?)
    }

    /// Write the relationships of a part.
    pub fn set_relationships(&mut self, part: &str, rels: &Relationships) {
        self.parts
            .insert(rels_path_for(part), rels.to_xml().into_bytes());
    }

    /// First free part name of the form `{prefix}{N}.{ext}`, N starting at 1.
    pub fn next_part_name(&self, prefix: &str, ext: &str) -> String {
        (1..)
            .map(|n| format!("{}{}.{}", prefix, n, ext))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| format!("{}0.{}", prefix, ext))
    }

    /// Drop every part that cannot be reached from the package relationships.
    ///
    /// Returns the number of removed parts. `.rels` parts survive only when
    /// their source part does.
    pub fn prune_unreachable(&mut self) -> Result<usize> {
        let mut reachable: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([String::new()]);

        while let Some(source) = queue.pop_front() {
            let rels = self.relationships(&source)?;
            if !rels.is_empty() {
                reachable.insert(rels_path_for(&source));
            }
            for rel in rels.iter().filter(|r| !r.external) {
                let target = OoxmlContainer::resolve_path(&source, &rel.target);
                if self.contains(&target) && reachable.insert(target.clone()) {
                    queue.push_back(target);
                }
            }
        }

        let before = self.parts.len();
        self.parts.retain(|name, _| reachable.contains(name));
        let parts = &self.parts;
        self.content_types
            .retain_parts(|name| parts.contains_key(name));
        Ok(before - self.parts.len())
    }

    /// Serialize the package as ZIP bytes, `[Content_Types].xml` first.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            zip.start_file(CONTENT_TYPES_PART, options)?;
            zip.write_all(self.content_types.to_xml().as_bytes())?;

            let package_rels = rels_path_for("");
            if let Some(data) = self.parts.get(&package_rels) {
                zip.start_file(package_rels.as_str(), options)?;
                zip.write_all(data)?;
            }

            for (name, data) in self.parts.iter().filter(|(n, _)| **n != package_rels) {
                zip.start_file(name.as_str(), options)?;
                zip.write_all(data)?;
            }
            zip.finish()?;
        }
        Ok(buffer)
    }

    /// Write the package to a file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REL_TYPE: &str = "http://test/rel";

    fn package() -> Package {
        let mut pkg = Package::default();
        pkg.put_part("ppt/presentation.xml", b"<p/>".to_vec(), "application/test.main+xml");
        pkg.put_part("ppt/slides/slide1.xml", b"<s/>".to_vec(), "application/test.slide+xml");
        pkg.put_part("ppt/media/image1.png", vec![1, 2, 3], "image/png");
        pkg.put_part("ppt/orphan.xml", b"<o/>".to_vec(), "application/test.orphan+xml");

        let mut root = Relationships::new();
        root.add(REL_TYPE, "ppt/presentation.xml");
        pkg.set_relationships("", &root);

        let mut pres = Relationships::new();
        pres.add(REL_TYPE, "slides/slide1.xml");
        pkg.set_relationships("ppt/presentation.xml", &pres);

        let mut slide = Relationships::new();
        slide.add(REL_TYPE, "../media/image1.png");
        pkg.set_relationships("ppt/slides/slide1.xml", &slide);
        pkg
    }

    #[test]
    fn test_content_types_parse() {
        let xml = r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="PNG" ContentType="image/png"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/main+xml"/>
</Types>"#;
        let types = ContentTypes::parse(xml).unwrap();
        assert_eq!(types.content_type_of("ppt/media/a.png"), Some("image/png"));
        assert_eq!(
            types.content_type_of("/ppt/presentation.xml"),
            Some("application/main+xml")
        );
        assert_eq!(types.content_type_of("other.xml"), Some("application/xml"));
        assert_eq!(types.content_type_of("clip.mp4"), None);
    }

    #[test]
    fn test_register_defaults_and_overrides() {
        let mut types = ContentTypes::default();
        types.register("ppt/media/clip.mp4", "video/mp4");
        types.register("ppt/charts/chart1.xml", "application/chart+xml");

        let xml = types.to_xml();
        assert!(xml.contains(r#"<Default Extension="mp4" ContentType="video/mp4"/>"#));
        assert!(xml.contains(r#"<Override PartName="/ppt/charts/chart1.xml""#));
        assert!(xml.contains(r#"<Default Extension="rels""#));
    }

    #[test]
    fn test_next_part_name() {
        let pkg = package();
        assert_eq!(pkg.next_part_name("ppt/slides/slide", "xml"), "ppt/slides/slide2.xml");
        assert_eq!(pkg.next_part_name("ppt/charts/chart", "xml"), "ppt/charts/chart1.xml");
    }

    #[test]
    fn test_prune_unreachable() {
        let mut pkg = package();
        let removed = pkg.prune_unreachable().unwrap();

        assert_eq!(removed, 1);
        assert!(!pkg.contains("ppt/orphan.xml"));
        assert!(pkg.contains("ppt/media/image1.png"));
        assert!(pkg.contains("ppt/slides/_rels/slide1.xml.rels"));
        assert!(!pkg.content_types().to_xml().contains("orphan"));
    }

    #[test]
    fn test_prune_drops_detached_slide() {
        let mut pkg = package();
        let mut pres = pkg.relationships("ppt/presentation.xml").unwrap();
        pres.remove_where(|_| true);
        pkg.set_relationships("ppt/presentation.xml", &pres);

        pkg.prune_unreachable().unwrap();
        assert!(!pkg.contains("ppt/slides/slide1.xml"));
        assert!(!pkg.contains("ppt/slides/_rels/slide1.xml.rels"));
        assert!(!pkg.contains("ppt/media/image1.png"));
        assert!(pkg.contains("ppt/presentation.xml"));
    }

    #[test]
    fn test_to_bytes_round_trip() {
        let pkg = package();
        let bytes = pkg.to_bytes().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), CONTENT_TYPES_PART);
        assert_eq!(archive.by_index(1).unwrap().name(), "_rels/.rels");

        let container = OoxmlContainer::from_bytes(bytes).unwrap();
        let reloaded = Package::from_container(&container).unwrap();
        assert_eq!(reloaded.get("ppt/media/image1.png"), Some(&[1u8, 2, 3][..]));
        assert_eq!(
            reloaded.content_types().content_type_of("ppt/slides/slide1.xml"),
            Some("application/test.slide+xml")
        );
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.pptx");
        package().save(&path).unwrap();
        assert!(path.exists());
    }
}
