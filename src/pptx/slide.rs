//! Slide shape tree.

use std::fmt::Write as _;

use super::media::MediaShape;
use super::table::TableFrame;
use super::{REL_SLIDE_LAYOUT, SLIDE_ANCHOR};
use crate::charts::CHART_URI;
use crate::container::{escape_xml, OoxmlContainer, Relationships};
use crate::template::{PlaceholderRole, PlaceholderType, SlideLayout, Xfrm};

/// Binding of a slide shape to a layout placeholder (`p:ph`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRef {
    pub ph_type: PlaceholderType,
    pub idx: u32,
}

impl PlaceholderRef {
    /// `type` is omitted for `obj` and `idx` for 0, as PowerPoint does.
    pub(crate) fn write(&self, xml: &mut String) {
        xml.push_str("<p:ph");
        if self.ph_type != PlaceholderType::Object {
            let _ = write!(xml, r#" type="{}""#, self.ph_type.as_str());
        }
        if self.idx != 0 {
            let _ = write!(xml, r#" idx="{}""#, self.idx);
        }
        xml.push_str("/>");
    }
}

/// A placeholder cloned from the layout, geometry inherited.
#[derive(Debug, Clone)]
pub struct PlaceholderShape {
    pub id: u32,
    pub name: String,
    pub ph: PlaceholderRef,
    /// Layout geometry, used when the placeholder is replaced by a frame
    pub xfrm: Option<Xfrm>,
    /// Text paragraphs; `None` for placeholders without a text body
    pub paragraphs: Option<Vec<String>>,
}

/// A picture filling a picture placeholder.
#[derive(Debug, Clone)]
pub struct PictureShape {
    pub id: u32,
    pub name: String,
    pub descr: String,
    pub ph: PlaceholderRef,
    pub rel_id: String,
}

/// A chart graphic frame filling a chart placeholder.
#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub id: u32,
    pub name: String,
    pub ph: PlaceholderRef,
    pub xfrm: Xfrm,
    pub rel_id: String,
}

/// A shape on a slide.
#[derive(Debug, Clone)]
pub enum Shape {
    Placeholder(PlaceholderShape),
    Picture(PictureShape),
    Table(TableFrame),
    Chart(ChartFrame),
    Media(MediaShape),
}

impl Shape {
    pub fn id(&self) -> u32 {
        match self {
            Shape::Placeholder(s) => s.id,
            Shape::Picture(s) => s.id,
            Shape::Table(s) => s.id,
            Shape::Chart(s) => s.id,
            Shape::Media(s) => s.id,
        }
    }

    fn write(&self, xml: &mut String) {
        match self {
            Shape::Placeholder(s) => write_placeholder(xml, s),
            Shape::Picture(s) => write_picture(xml, s),
            Shape::Table(s) => s.write(xml),
            Shape::Chart(s) => write_chart_frame(xml, s),
            Shape::Media(s) => s.write(xml),
        }
    }
}

/// A slide under construction.
#[derive(Debug, Clone)]
pub struct NativeSlide {
    shapes: Vec<Shape>,
    rels: Relationships,
}

impl NativeSlide {
    /// Create a slide from a layout.
    ///
    /// Placeholders are cloned in layout order, except date, footer,
    /// slide-number and header placeholders.
    pub fn from_layout(layout: &SlideLayout) -> Self {
        let mut rels = Relationships::new();
        rels.add(
            REL_SLIDE_LAYOUT,
            &OoxmlContainer::relative_path(SLIDE_ANCHOR, &layout.part),
        );

        let shapes = layout
            .slide_placeholders()
            .zip(2u32..)
            .map(|(ph, id)| {
                Shape::Placeholder(PlaceholderShape {
                    id,
                    name: ph.name.clone(),
                    ph: PlaceholderRef {
                        ph_type: ph.ph_type,
                        idx: ph.idx,
                    },
                    xfrm: ph.xfrm,
                    paragraphs: ph.ph_type.has_text_frame().then(Vec::new),
                })
            })
            .collect();

        Self { shapes, rels }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn relationships(&self) -> &Relationships {
        &self.rels
    }

    /// Set the title placeholder text. Returns false when there is none.
    pub fn set_title(&mut self, text: &str) -> bool {
        match self.placeholder_mut(|ph| ph.ph.ph_type.role() == PlaceholderRole::Title) {
            Some(ph) => {
                ph.paragraphs = Some(vec![text.to_string()]);
                true
            }
            None => false,
        }
    }

    /// Replace the text of the first non-title text placeholder, one
    /// paragraph per entry. Returns false when there is none.
    pub fn set_body(&mut self, paragraphs: &[String]) -> bool {
        let body = self.placeholder_mut(|ph| {
            ph.paragraphs.is_some() && ph.ph.ph_type.role() != PlaceholderRole::Title
        });
        match body {
            Some(ph) => {
                ph.paragraphs = Some(paragraphs.to_vec());
                true
            }
            None => false,
        }
    }

    /// Text paragraphs of the title placeholder.
    pub fn title(&self) -> Option<&[String]> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Placeholder(ph) if ph.ph.ph_type.role() == PlaceholderRole::Title => {
                ph.paragraphs.as_deref()
            }
            _ => None,
        })
    }

    /// Position of the first unfilled placeholder with the given role.
    pub fn find_placeholder(&self, role: PlaceholderRole) -> Option<usize> {
        self.shapes.iter().position(|s| match s {
            Shape::Placeholder(ph) => ph.ph.ph_type.role() == role,
            _ => false,
        })
    }

    /// Placeholder shape at a position.
    pub fn placeholder_at(&self, index: usize) -> Option<&PlaceholderShape> {
        match self.shapes.get(index) {
            Some(Shape::Placeholder(ph)) => Some(ph),
            _ => None,
        }
    }

    /// Replace the shape at a position, keeping document order.
    pub fn replace_shape(&mut self, index: usize, shape: Shape) {
        if let Some(slot) = self.shapes.get_mut(index) {
            *slot = shape;
        }
    }

    /// Add a relationship to a part path and return its id.
    pub fn add_relationship(&mut self, rel_type: &str, target_part: &str) -> String {
        self.rels.add(
            rel_type,
            &OoxmlContainer::relative_path(SLIDE_ANCHOR, target_part),
        )
    }

    /// Serialize as a slide part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#);
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        for shape in &self.shapes {
            shape.write(&mut xml);
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        xml
    }

    fn placeholder_mut(
        &mut self,
        pred: impl Fn(&PlaceholderShape) -> bool,
    ) -> Option<&mut PlaceholderShape> {
        self.shapes.iter_mut().find_map(|s| match s {
            Shape::Placeholder(ph) if pred(ph) => Some(ph),
            _ => None,
        })
    }
}

/// Write `<a:p>` elements for text, one per entry. Line breaks inside an
/// entry become `<a:br/>`.
pub(crate) fn write_paragraphs(xml: &mut String, paragraphs: &[String]) {
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
        return;
    }
    for text in paragraphs {
        if text.is_empty() {
            xml.push_str("<a:p/>");
            continue;
        }
        xml.push_str("<a:p>");
        for (i, line) in text.split(['\n', '\u{b}']).enumerate() {
            if i > 0 {
                xml.push_str("<a:br/>");
            }
            if !line.is_empty() {
                let _ = write!(
                    xml,
                    r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r>"#,
                    escape_xml(line)
                );
            }
        }
        xml.push_str("</a:p>");
    }
}

fn write_placeholder(xml: &mut String, shape: &PlaceholderShape) {
    xml.push_str("<p:sp><p:nvSpPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}"/>"#,
        shape.id,
        escape_xml(&shape.name)
    );
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>"#);
    shape.ph.write(xml);
    xml.push_str("</p:nvPr></p:nvSpPr><p:spPr/>");

    if let Some(paragraphs) = &shape.paragraphs {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
        write_paragraphs(xml, paragraphs);
        xml.push_str("</p:txBody>");
    }
    xml.push_str("</p:sp>");
}

fn write_picture(xml: &mut String, pic: &PictureShape) {
    xml.push_str("<p:pic><p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
        pic.id,
        escape_xml(&pic.name),
        escape_xml(&pic.descr)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr><p:nvPr>"#);
    pic.ph.write(xml);
    xml.push_str("</p:nvPr></p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
        pic.rel_id
    );
    // Geometry comes from the bound placeholder
    xml.push_str("<p:spPr/></p:pic>");
}

pub(crate) fn write_xfrm(xml: &mut String, tag: &str, xfrm: &Xfrm) {
    let _ = write!(
        xml,
        r#"<{tag}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></{tag}>"#,
        xfrm.x,
        xfrm.y,
        xfrm.cx,
        xfrm.cy,
        tag = tag
    );
}

pub(crate) fn write_frame_start(xml: &mut String, id: u32, name: &str, ph: &PlaceholderRef, xfrm: &Xfrm) {
    xml.push_str("<p:graphicFrame><p:nvGraphicFramePr>");
    let _ = write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, escape_xml(name));
    xml.push_str(r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr>"#);
    ph.write(xml);
    xml.push_str("</p:nvPr></p:nvGraphicFramePr>");
    write_xfrm(xml, "p:xfrm", xfrm);
}

fn write_chart_frame(xml: &mut String, frame: &ChartFrame) {
    write_frame_start(xml, frame.id, &frame.name, &frame.ph, &frame.xfrm);
    let _ = write!(
        xml,
        r#"<a:graphic><a:graphicData uri="{}"><c:chart xmlns:c="{}" r:id="{}"/></a:graphicData></a:graphic>"#,
        CHART_URI,
        CHART_URI,
        frame.rel_id
    );
    xml.push_str("</p:graphicFrame>");
}
