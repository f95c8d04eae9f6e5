//! Synthetic templates and workbooks for integration tests.

#![allow(dead_code)]

use deckgen::container::OoxmlContainer;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// `(type attribute, idx, geometry)`; an empty type means `obj`.
type PlaceholderDef = (&'static str, u32, Option<(i64, i64, i64, i64)>);

/// Layout names in template order. Index 0 is not one of the eight
/// selectable layouts, so default ids line up with positions 1..=8.
pub const LAYOUT_NAMES: [&str; 9] = [
    "Title Slide",
    "Title Only",
    "Title and Content",
    "Title and Picture",
    "Title, Content, and Picture",
    "Title, Content, and Table",
    "Title, Content, and Chart",
    "Title and Media",
    "Title, Content, and Media",
];

pub const PICTURE_XFRM: (i64, i64, i64, i64) = (6_096_000, 1_600_000, 5_000_000, 4_000_000);
pub const TABLE_XFRM: (i64, i64, i64, i64) = (838_200, 4_000_000, 10_515_600, 2_400_000);
pub const MEDIA_XFRM: (i64, i64, i64, i64) = (1_524_000, 1_397_000, 9_144_000, 5_143_500);
/// Master body geometry, inherited by layout placeholders without their own.
pub const MASTER_BODY_XFRM: (i64, i64, i64, i64) = (838_200, 1_825_625, 10_515_600, 4_351_338);
pub const MASTER_TITLE_XFRM: (i64, i64, i64, i64) = (838_200, 365_125, 10_515_600, 1_325_563);

fn furniture() -> Vec<PlaceholderDef> {
    vec![("dt", 10, None), ("ftr", 11, None), ("sldNum", 12, None)]
}

fn layout_placeholders(index: usize) -> Vec<PlaceholderDef> {
    let mut phs: Vec<PlaceholderDef> = match index {
        0 => vec![("ctrTitle", 0, None), ("subTitle", 1, None)],
        1 => vec![("title", 0, None)],
        2 => vec![("title", 0, None), ("", 1, None)],
        3 => vec![("title", 0, None), ("pic", 1, Some(PICTURE_XFRM))],
        4 => vec![("title", 0, None), ("body", 1, None), ("pic", 2, Some(PICTURE_XFRM))],
        5 => vec![("title", 0, None), ("", 1, None), ("tbl", 2, Some(TABLE_XFRM))],
        6 => vec![("title", 0, None), ("", 1, None), ("chart", 2, None)],
        7 => vec![("title", 0, None), ("media", 1, Some(MEDIA_XFRM))],
        _ => vec![("title", 0, None), ("", 1, None), ("media", 2, None)],
    };
    phs.extend(furniture());
    phs
}

fn shape_tree(placeholders: &[PlaceholderDef]) -> String {
    let mut xml = String::from(
        r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#,
    );
    for (i, (ph_type, idx, xfrm)) in placeholders.iter().enumerate() {
        let type_attr = if ph_type.is_empty() {
            String::new()
        } else {
            format!(r#" type="{}""#, ph_type)
        };
        let idx_attr = if *idx == 0 {
            String::new()
        } else {
            format!(r#" idx="{}""#, idx)
        };
        let sp_pr = match xfrm {
            Some((x, y, cx, cy)) => format!(
                r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr>"#
            ),
            None => "<p:spPr/>".to_string(),
        };
        xml.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph{}{}/></p:nvPr></p:nvSpPr>{}<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>Click to edit</a:t></a:r></a:p></p:txBody></p:sp>"#,
            i + 2,
            i + 1,
            type_attr,
            idx_attr,
            sp_pr
        ));
    }
    xml.push_str("</p:spTree>");
    xml
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">"#,
        RELS_NS
    );
    for (id, rel_type, target) in entries {
        let rel_type = if rel_type.contains("://") {
            rel_type.to_string()
        } else {
            format!("{}/{}", REL_BASE, rel_type)
        };
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, rel_type, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn zip_files(files: Vec<(String, Vec<u8>)>) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            zip.start_file(name, options).unwrap();
            zip.write_all(&content).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// A 16:9 template with nine layouts, one existing slide and an image
/// only that slide references.
pub fn template_bytes() -> Vec<u8> {
    let layout_ct = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    );
    for n in 1..=LAYOUT_NAMES.len() {
        content_types.push_str(&format!(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="{}"/>"#,
            n, layout_ct
        ));
    }
    content_types.push_str("</Types>");

    let mut files: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types.into_bytes()),
        (
            "_rels/.rels".into(),
            rels(&[
                ("rId1", "officeDocument", "ppt/presentation.xml"),
                ("rId2", deckgen::container::REL_CORE_PROPERTIES, "docProps/core.xml"),
            ])
            .into_bytes(),
        ),
        (
            "docProps/core.xml".into(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>Template Deck</dc:title><dc:creator>Designer</dc:creator></cp:coreProperties>"#.to_vec(),
        ),
        (
            "ppt/presentation.xml".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
            )
            .into_bytes(),
        ),
        (
            "ppt/_rels/presentation.xml.rels".into(),
            rels(&[
                ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
                ("rId2", "slide", "slides/slide1.xml"),
            ])
            .into_bytes(),
        ),
        (
            "ppt/slides/slide1.xml".into(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Sample slide</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
            )
            .into_bytes(),
        ),
        (
            "ppt/slides/_rels/slide1.xml.rels".into(),
            rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout2.xml"),
                ("rId2", "image", "../media/image1.png"),
            ])
            .into_bytes(),
        ),
        ("ppt/media/image1.png".into(), png_bytes()),
    ];

    let master_phs: Vec<PlaceholderDef> = vec![
        ("title", 0, Some(MASTER_TITLE_XFRM)),
        ("body", 1, Some(MASTER_BODY_XFRM)),
    ];
    let mut layout_ids = String::new();
    let mut master_rels = Vec::new();
    for n in 1..=LAYOUT_NAMES.len() {
        layout_ids.push_str(&format!(
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2147483648u64 + n as u64,
            n
        ));
        master_rels.push((
            format!("rId{}", n),
            format!("../slideLayouts/slideLayout{}.xml", n),
        ));
    }
    files.push((
        "ppt/slideMasters/slideMaster1.xml".into(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {NS}><p:cSld>{}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst>{}</p:sldLayoutIdLst></p:sldMaster>"#,
            shape_tree(&master_phs),
            layout_ids
        )
        .into_bytes(),
    ));
    let master_rel_refs: Vec<(&str, &str, &str)> = master_rels
        .iter()
        .map(|(id, target)| (id.as_str(), "slideLayout", target.as_str()))
        .collect();
    files.push((
        "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
        rels(&master_rel_refs).into_bytes(),
    ));

    for (i, name) in LAYOUT_NAMES.iter().enumerate() {
        files.push((
            format!("ppt/slideLayouts/slideLayout{}.xml", i + 1),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {NS} preserve="1"><p:cSld name="{}">{}</p:cSld></p:sldLayout>"#,
                name,
                shape_tree(&layout_placeholders(i))
            )
            .into_bytes(),
        ));
        files.push((
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).into_bytes(),
        ));
    }

    zip_files(files)
}

pub fn write_template(dir: &Path) -> PathBuf {
    let path = dir.join("template.pptx");
    fs::write(&path, template_bytes()).unwrap();
    path
}

/// A workbook with one sheet; numeric-looking cells are stored as numbers.
pub fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", (b'A' + c as u8) as char, r + 1);
            if value.parse::<f64>().is_ok() {
                sheet.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, value));
            } else {
                sheet.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref, value
                ));
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");
    workbook_with_sheet(&sheet)
}

/// A one-sheet workbook around raw worksheet XML.
pub fn workbook_with_sheet(sheet: &str) -> Vec<u8> {
    zip_files(vec![
        (
            "[Content_Types].xml".into(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#.to_vec(),
        ),
        (
            "_rels/.rels".into(),
            rels(&[("rId1", "officeDocument", "xl/workbook.xml")]).into_bytes(),
        ),
        (
            "xl/workbook.xml".into(),
            br#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_vec(),
        ),
        (
            "xl/_rels/workbook.xml.rels".into(),
            rels(&[("rId1", "worksheet", "worksheets/sheet1.xml")]).into_bytes(),
        ),
        ("xl/worksheets/sheet1.xml".into(), sheet.as_bytes().to_vec()),
    ])
}

pub fn write_workbook(dir: &Path, name: &str, rows: &[&[&str]]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, workbook_bytes(rows)).unwrap();
    path
}

/// PNG signature followed by filler; enough for format sniffing.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 32]);
    data
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

/// An opened output deck.
pub struct Deck {
    pub container: OoxmlContainer,
}

impl Deck {
    pub fn open(path: &Path) -> Self {
        Self {
            container: OoxmlContainer::open(path).unwrap(),
        }
    }

    pub fn xml(&self, part: &str) -> String {
        self.container.read_xml(part).unwrap()
    }

    pub fn has_part(&self, part: &str) -> bool {
        self.container.exists(part)
    }

    /// Slide part paths in presentation order.
    pub fn slide_parts(&self) -> Vec<String> {
        let presentation = self.xml("ppt/presentation.xml");
        let rels = self
            .container
            .read_relationships("ppt/presentation.xml")
            .unwrap();

        let list = presentation
            .split("<p:sldIdLst>")
            .nth(1)
            .and_then(|rest| rest.split("</p:sldIdLst>").next())
            .unwrap_or_default();
        list.split("r:id=\"")
            .skip(1)
            .filter_map(|s| s.split('"').next())
            .map(|id| {
                let rel = rels.get(id).unwrap();
                OoxmlContainer::resolve_path("ppt/presentation.xml", &rel.target)
            })
            .collect()
    }

    /// XML of the slide at a zero-based position.
    pub fn slide(&self, index: usize) -> String {
        self.xml(&self.slide_parts()[index])
    }

    /// Target part of the first relationship of a slide with the given type suffix.
    pub fn slide_target(&self, index: usize, rel_type_suffix: &str) -> Option<String> {
        let part = self.slide_parts()[index].clone();
        let rels = self.container.read_relationships(&part).unwrap();
        let target = rels
            .iter()
            .find(|r| r.rel_type.ends_with(rel_type_suffix))
            .map(|r| OoxmlContainer::resolve_path(&part, &r.target));
        target
    }
}
