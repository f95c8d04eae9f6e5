//! Slide layout and master parsing.

use super::placeholder::{Placeholder, PlaceholderRole, PlaceholderType, Xfrm};
use crate::error::{Error, Result};
use quick_xml::events::BytesStart;

/// A slide layout of the template.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    /// Layout name (`p:cSld@name`)
    pub name: String,
    /// Part path, e.g. `ppt/slideLayouts/slideLayout2.xml`
    pub part: String,
    /// Placeholders in document order
    pub placeholders: Vec<Placeholder>,
}

impl SlideLayout {
    /// Parse a layout part, inheriting missing geometry from the master.
    pub fn parse(part: &str, xml: &str, master: &[Placeholder]) -> Result<Self> {
        let (name, mut placeholders) = parse_shapes(xml)?;
        for ph in placeholders.iter_mut().filter(|ph| ph.xfrm.is_none()) {
            ph.xfrm = inherited_xfrm(ph, master);
        }

        Ok(Self {
            name,
            part: part.to_string(),
            placeholders,
        })
    }

    /// First placeholder with the given role.
    pub fn placeholder(&self, role: PlaceholderRole) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.role() == role)
    }

    /// Placeholders copied onto a slide created from this layout.
    pub fn slide_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(|ph| !ph.ph_type.is_slide_furniture())
    }
}

/// Master placeholder geometry for a layout placeholder without its own.
///
/// Same type first; text-like placeholders fall back to the master body.
fn inherited_xfrm(ph: &Placeholder, master: &[Placeholder]) -> Option<Xfrm> {
    let by_type = |t: PlaceholderType| {
        master
            .iter()
            .find(|m| m.ph_type == t)
            .and_then(|m| m.xfrm)
    };

    by_type(ph.ph_type).or_else(|| match ph.ph_type {
        PlaceholderType::CenterTitle => by_type(PlaceholderType::Title),
        PlaceholderType::Title => None,
        PlaceholderType::Date
        | PlaceholderType::SlideNumber
        | PlaceholderType::Footer
        | PlaceholderType::Header => None,
        _ => by_type(PlaceholderType::Body),
    })
}

/// Parse the placeholders of a master part.
pub fn parse_master_placeholders(xml: &str) -> Result<Vec<Placeholder>> {
    Ok(parse_shapes(xml)?.1)
}

/// Parse `p:cSld@name` and every placeholder `p:sp` of a layout or master.
fn parse_shapes(xml: &str) -> Result<(String, Vec<Placeholder>)> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ShapeScan::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => state.open(&e, false),
            Ok(quick_xml::events::Event::Empty(e)) => state.open(&e, true),
            Ok(quick_xml::events::Event::End(e)) => state.close(e.name().local_name().as_ref()),
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((state.name, state.placeholders))
}

/// Scanner state for [`parse_shapes`].
#[derive(Default)]
struct ShapeScan {
    name: String,
    placeholders: Vec<Placeholder>,
    sp_depth: usize,
    in_sp_pr: bool,
    shape_id: u32,
    shape_name: String,
    ph: Option<(PlaceholderType, u32)>,
    xfrm: Option<Xfrm>,
}

impl ShapeScan {
    fn open(&mut self, e: &BytesStart<'_>, is_empty: bool) {
        match e.name().local_name().as_ref() {
            b"cSld" => {
                if let Some(name) = attr_str(e, b"name") {
                    self.name = name;
                }
            }
            b"sp" if !is_empty => {
                if self.sp_depth == 0 {
                    self.shape_id = 0;
                    self.shape_name.clear();
                    self.ph = None;
                    self.xfrm = None;
                }
                self.sp_depth += 1;
            }
            b"cNvPr" if self.sp_depth == 1 => {
                self.shape_id = attr_num(e, b"id").unwrap_or(0) as u32;
                self.shape_name = attr_str(e, b"name").unwrap_or_default();
            }
            b"ph" if self.sp_depth == 1 => {
                let ph_type = attr_str(e, b"type")
                    .map(|t| PlaceholderType::from_attr(&t))
                    .unwrap_or(PlaceholderType::Object);
                let idx = attr_num(e, b"idx").unwrap_or(0) as u32;
                self.ph = Some((ph_type, idx));
            }
            b"spPr" if self.sp_depth == 1 && !is_empty => self.in_sp_pr = true,
            b"off" if self.in_sp_pr => {
                let xfrm = self.xfrm.get_or_insert_with(Xfrm::default);
                xfrm.x = attr_num(e, b"x").unwrap_or(0);
                xfrm.y = attr_num(e, b"y").unwrap_or(0);
            }
            // a:ext also names extension-list entries, which carry no size
            b"ext" if self.in_sp_pr => {
                if let (Some(cx), Some(cy)) = (attr_num(e, b"cx"), attr_num(e, b"cy")) {
                    let xfrm = self.xfrm.get_or_insert_with(Xfrm::default);
                    xfrm.cx = cx;
                    xfrm.cy = cy;
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"sp" if self.sp_depth > 0 => {
                self.sp_depth -= 1;
                if self.sp_depth == 0 {
                    if let Some((ph_type, idx)) = self.ph.take() {
                        self.placeholders.push(Placeholder {
                            shape_id: self.shape_id,
                            name: std::mem::take(&mut self.shape_name),
                            ph_type,
                            idx,
                            xfrm: self.xfrm.take(),
                        });
                    }
                }
            }
            b"spPr" => self.in_sp_pr = false,
            _ => {}
        }
    }
}

/// Unescaped value of an attribute, matched on its full key.
pub(crate) fn attr_str(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| a.unescape_value().unwrap_or_default().to_string())
}

/// Integer value of an attribute.
pub(crate) fn attr_num(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    attr_str(e, key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="838200" y="365125"/><a:ext cx="10515600" cy="1325563"/></a:xfrm></p:spPr></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="3" name="Text Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="838200" y="1825625"/><a:ext cx="10515600" cy="4351338"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldMaster>"#;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld name="Title, Content, and Table"><p:spTree>
  <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>
    <p:txBody><a:bodyPr/><a:p><a:r><a:t>Text</a:t></a:r></a:p></p:txBody></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="4" name="Table 3"/><p:cNvSpPr/><p:nvPr><p:ph type="tbl" idx="2"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="6172200" y="1825625"/><a:ext cx="5181600" cy="4351338"/></a:xfrm></p:spPr></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="5" name="Footer 4"/><p:cNvSpPr/><p:nvPr><p:ph type="ftr" sz="quarter" idx="11"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="6" name="Decoration"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
</p:spTree></p:cSld></p:sldLayout>"#;

    #[test]
    fn test_parse_layout() {
        let master = parse_master_placeholders(MASTER).unwrap();
        assert_eq!(master.len(), 2);

        let layout =
            SlideLayout::parse("ppt/slideLayouts/slideLayout5.xml", LAYOUT, &master).unwrap();
        assert_eq!(layout.name, "Title, Content, and Table");
        assert_eq!(layout.placeholders.len(), 4);

        let content = &layout.placeholders[1];
        assert_eq!(content.ph_type, PlaceholderType::Object);
        assert_eq!(content.idx, 1);
        assert_eq!(content.name, "Content 2");
        assert_eq!(content.shape_id, 3);

        let table = layout.placeholder(PlaceholderRole::Table).unwrap();
        assert_eq!(table.xfrm, Some(Xfrm::new(6172200, 1825625, 5181600, 4351338)));
    }

    #[test]
    fn test_geometry_inherited_from_master() {
        let master = parse_master_placeholders(MASTER).unwrap();
        let layout = SlideLayout::parse("l.xml", LAYOUT, &master).unwrap();

        let title = layout.placeholder(PlaceholderRole::Title).unwrap();
        assert_eq!(title.xfrm, Some(Xfrm::new(838200, 365125, 10515600, 1325563)));
        // Untyped content placeholder falls back to the master body
        let content = layout.placeholder(PlaceholderRole::Text).unwrap();
        assert_eq!(content.xfrm.map(|x| x.cy), Some(4351338));
        // Footer has no counterpart on this master
        assert_eq!(layout.placeholders[3].xfrm, None);
    }

    #[test]
    fn test_slide_placeholders_skip_furniture() {
        let layout = SlideLayout::parse("l.xml", LAYOUT, &[]).unwrap();
        let kinds: Vec<PlaceholderType> =
            layout.slide_placeholders().map(|ph| ph.ph_type).collect();
        assert_eq!(
            kinds,
            vec![
                PlaceholderType::Title,
                PlaceholderType::Object,
                PlaceholderType::Table
            ]
        );
    }
}
