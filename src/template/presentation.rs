//! Presentation part and core properties editing.
//!
//! Both parts are rewritten by streaming their events through a
//! `quick_xml::Writer`, so markup the template carries and this crate does
//! not model survives unchanged.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::layout::attr_num;

/// Default slide size (16:9) in EMU when `p:sldSz` is missing.
pub const DEFAULT_SLIDE_SIZE: (i64, i64) = (12_192_000, 6_858_000);

/// First id PowerPoint hands out in `p:sldIdLst`.
pub const FIRST_SLIDE_ID: u32 = 256;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Elements that follow `p:sldIdLst` inside `p:presentation`.
const AFTER_SLIDE_LIST: [&[u8]; 11] = [
    b"sldSz",
    b"notesSz",
    b"smartTags",
    b"embeddedFontLst",
    b"custShowLst",
    b"photoAlbum",
    b"custDataLst",
    b"kinsoku",
    b"defaultTextStyle",
    b"modifyVerifier",
    b"extLst",
];

/// Slide size from `p:sldSz`.
pub fn slide_size(xml: &str) -> (i64, i64) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldSz" => {
                return match (attr_num(&e, b"cx"), attr_num(&e, b"cy")) {
                    (Some(cx), Some(cy)) if cx > 0 && cy > 0 => (cx, cy),
                    _ => DEFAULT_SLIDE_SIZE,
                };
            }
            Ok(Event::Eof) | Err(_) => return DEFAULT_SLIDE_SIZE,
            _ => {}
        }
    }
}

/// Relationship ids of the given list entries (`sldMasterId`, `sldLayoutId`, ...), in order.
pub fn list_rel_ids(xml: &str, entry: &[u8]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == entry => {
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.local_name().as_ref() == b"id" && a.key.prefix().is_some())
                    .map(|a| String::from_utf8_lossy(&a.value).to_string());
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }
    Ok(ids)
}

/// `(slide id, relationship id)` entries of `p:sldIdLst`, in order.
pub fn slide_entries(xml: &str) -> Result<Vec<(u32, String)>> {
    let mut entries = Vec::new();
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldId" => {
                let id = attr_num(&e, b"id").and_then(|id| u32::try_from(id).ok());
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.local_name().as_ref() == b"id" && a.key.prefix().is_some())
                    .map(|a| String::from_utf8_lossy(&a.value).to_string());
                if let (Some(id), Some(rel_id)) = (id, rel_id) {
                    entries.push((id, rel_id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }
    Ok(entries)
}

/// Replace `p:sldIdLst` with the given `(slide id, relationship id)` entries.
///
/// An empty list removes the element. The new list is written where the
/// schema expects it: before `p:sldSz` or whichever later element comes first.
pub fn rewrite_slide_list(xml: &str, entries: &[(u32, String)]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + entries.len() * 48));

    let mut p_prefix = String::from("p");
    let mut r_prefix = String::from("r");
    let mut depth = 0usize;
    let mut skip_depth = 0usize;
    let mut emitted = false;

    loop {
        let event = reader.read_event()?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match &event {
            Event::Start(e) if depth == 0 => {
                if let Some((prefix, _)) = qualified_name(e).split_once(':') {
                    p_prefix = prefix.to_string();
                }
                if let Some(prefix) = namespace_prefix(e, REL_NS) {
                    r_prefix = prefix;
                }
            }
            Event::Start(e) if depth == 1 && e.local_name().as_ref() == b"sldIdLst" => {
                skip_depth = 1;
                continue;
            }
            Event::Empty(e) if depth == 1 && e.local_name().as_ref() == b"sldIdLst" => continue,
            Event::Start(e) | Event::Empty(e)
                if depth == 1 && !emitted && AFTER_SLIDE_LIST.contains(&e.local_name().as_ref()) =>
            {
                write_slide_list(&mut writer, &p_prefix, &r_prefix, entries)?;
                emitted = true;
            }
            Event::End(_) if depth == 1 && !emitted => {
                write_slide_list(&mut writer, &p_prefix, &r_prefix, entries)?;
                emitted = true;
            }
            Event::Eof => break,
            _ => {}
        }

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        writer.write_event(event)?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlParse(e.to_string()))
}

fn write_slide_list(
    writer: &mut Writer<Vec<u8>>,
    p_prefix: &str,
    r_prefix: &str,
    entries: &[(u32, String)],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let list = format!("{}:sldIdLst", p_prefix);
    let item = format!("{}:sldId", p_prefix);
    let rel_attr = format!("{}:id", r_prefix);

    writer.write_event(Event::Start(BytesStart::new(list.as_str())))?;
    for (id, rel_id) in entries {
        let id = id.to_string();
        let entry = BytesStart::new(item.as_str())
            .with_attributes([("id", id.as_str()), (rel_attr.as_str(), rel_id.as_str())]);
        writer.write_event(Event::Empty(entry))?;
    }
    writer.write_event(Event::End(BytesEnd::new(list.as_str())))?;
    Ok(())
}

/// Set `dc:title` in a core properties part, adding the element if needed.
pub fn set_core_title(xml: &str, title: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + title.len() + 64));

    let mut depth = 0usize;
    let mut skip_depth = 0usize;
    let mut written = false;

    loop {
        let event = reader.read_event()?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(e) => {
                    skip_depth -= 1;
                    if skip_depth == 0 {
                        writer.write_event(Event::End(e))?;
                        depth -= 1;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) if depth == 1 && e.local_name().as_ref() == b"title" => {
                writer.write_event(Event::Start(e))?;
                writer.write_event(Event::Text(BytesText::new(title)))?;
                written = true;
                depth += 1;
                skip_depth = 1;
            }
            Event::Empty(e) if depth == 1 && e.local_name().as_ref() == b"title" => {
                let name = qualified_name(&e);
                writer.write_event(Event::Start(e))?;
                writer.write_event(Event::Text(BytesText::new(title)))?;
                writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                written = true;
            }
            Event::End(e) if depth == 1 => {
                if !written {
                    let dc = BytesStart::new("dc:title").with_attributes([("xmlns:dc", DC_NS)]);
                    writer.write_event(Event::Start(dc))?;
                    writer.write_event(Event::Text(BytesText::new(title)))?;
                    writer.write_event(Event::End(BytesEnd::new("dc:title")))?;
                    written = true;
                }
                depth -= 1;
                writer.write_event(Event::End(e))?;
            }
            Event::Start(e) => {
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlParse(e.to_string()))
}

/// A minimal core properties part carrying only a title.
pub fn new_core_xml(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>{}</dc:title></cp:coreProperties>"#
        ),
        crate::container::escape_xml(title)
    )
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Prefix bound to a namespace URI by an `xmlns:prefix` attribute of `e`.
fn namespace_prefix(e: &BytesStart<'_>, uri: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
        let prefix = key.strip_prefix("xmlns:")?;
        (a.value.as_ref() == uri.as_bytes()).then(|| prefix.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">
<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
<p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst>
<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>
<p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#;

    #[test]
    fn test_slide_size() {
        assert_eq!(slide_size(PRESENTATION), (9144000, 6858000));
        assert_eq!(slide_size("<p:presentation/>"), DEFAULT_SLIDE_SIZE);
    }

    #[test]
    fn test_list_rel_ids() {
        assert_eq!(list_rel_ids(PRESENTATION, b"sldMasterId").unwrap(), vec!["rId1"]);
        assert_eq!(list_rel_ids(PRESENTATION, b"sldId").unwrap(), vec!["rId2", "rId3"]);
    }

    #[test]
    fn test_slide_entries() {
        assert_eq!(
            slide_entries(PRESENTATION).unwrap(),
            vec![(256, "rId2".to_string()), (257, "rId3".to_string())]
        );
    }

    #[test]
    fn test_rewrite_slide_list() {
        let entries = vec![(256, "rId7".to_string()), (257, "rId8".to_string())];
        let xml = rewrite_slide_list(PRESENTATION, &entries).unwrap();

        assert_eq!(list_rel_ids(&xml, b"sldId").unwrap(), vec!["rId7", "rId8"]);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId7"/>"#));
        let list_pos = xml.find("<p:sldIdLst>").unwrap();
        assert!(list_pos < xml.find("<p:sldSz").unwrap());
        assert!(list_pos > xml.find("</p:sldMasterIdLst>").unwrap());
        assert!(xml.contains(r#"saveSubsetFonts="1""#));
    }

    #[test]
    fn test_rewrite_slide_list_empty_removes_element() {
        let xml = rewrite_slide_list(PRESENTATION, &[]).unwrap();
        assert!(!xml.contains("sldIdLst"));
        assert!(xml.contains("<p:sldSz"));
    }

    #[test]
    fn test_rewrite_inserts_missing_list() {
        let xml = r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldMasterIdLst/><p:notesSz cx="1" cy="1"/></p:presentation>"#;
        let out = rewrite_slide_list(xml, &[(256, "rId3".to_string())]).unwrap();
        assert!(out.contains(r#"<p:sldIdLst><p:sldId id="256" rel:id="rId3"/></p:sldIdLst><p:notesSz"#));
    }

    #[test]
    fn test_set_core_title_replaces_existing() {
        let xml = r#"<?xml version="1.0"?><cp:coreProperties xmlns:cp="cp" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Old</dc:title><dc:creator>me</dc:creator></cp:coreProperties>"#;
        let out = set_core_title(xml, "Q3 & Q4 Review").unwrap();
        assert!(out.contains("<dc:title>Q3 &amp; Q4 Review</dc:title>"));
        assert!(out.contains("<dc:creator>me</dc:creator>"));
        assert!(!out.contains("Old"));
    }

    #[test]
    fn test_set_core_title_fills_empty_or_missing() {
        let empty = r#"<cp:coreProperties xmlns:cp="cp" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title/></cp:coreProperties>"#;
        assert!(set_core_title(empty, "Deck")
            .unwrap()
            .contains("<dc:title>Deck</dc:title>"));

        let missing = r#"<cp:coreProperties xmlns:cp="cp"><dc:creator xmlns:dc="http://purl.org/dc/elements/1.1/">me</dc:creator></cp:coreProperties>"#;
        let out = set_core_title(missing, "Deck").unwrap();
        assert!(out.contains(r#"<dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">Deck</dc:title></cp:coreProperties>"#));
    }

    #[test]
    fn test_new_core_xml() {
        let xml = new_core_xml("A <b> deck");
        assert!(xml.contains("<dc:title>A &lt;b&gt; deck</dc:title>"));
        assert!(set_core_title(&xml, "Other").unwrap().contains("<dc:title>Other</dc:title>"));
    }
}
