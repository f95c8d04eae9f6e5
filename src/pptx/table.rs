//! Table graphic frames.

use std::fmt::Write as _;

use super::slide::{write_frame_start, write_paragraphs, PlaceholderRef};
use crate::template::Xfrm;

const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
/// "Medium Style 2 - Accent 1", the default PowerPoint table style.
const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

/// A table filling a table placeholder.
#[derive(Debug, Clone)]
pub struct TableFrame {
    pub id: u32,
    pub name: String,
    pub ph: PlaceholderRef,
    pub xfrm: Xfrm,
    /// Cell text, row 0 being the header row
    pub grid: Vec<Vec<String>>,
}

impl TableFrame {
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn columns(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    /// Text of one cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.grid.get(row)?.get(col).map(String::as_str)
    }

    /// Column widths and row heights split the frame evenly.
    pub(crate) fn write(&self, xml: &mut String) {
        let rows = self.rows().max(1) as i64;
        let cols = self.columns().max(1) as i64;
        let col_width = self.xfrm.cx / cols;
        let row_height = self.xfrm.cy / rows;

        write_frame_start(xml, self.id, &self.name, &self.ph, &self.xfrm);
        let _ = write!(xml, r#"<a:graphic><a:graphicData uri="{}"><a:tbl>"#, TABLE_URI);
        let _ = write!(
            xml,
            r#"<a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{}</a:tableStyleId></a:tblPr>"#,
            DEFAULT_TABLE_STYLE
        );

        xml.push_str("<a:tblGrid>");
        for _ in 0..self.columns() {
            let _ = write!(xml, r#"<a:gridCol w="{}"/>"#, col_width);
        }
        xml.push_str("</a:tblGrid>");

        for row in &self.grid {
            let _ = write!(xml, r#"<a:tr h="{}">"#, row_height);
            for cell in row {
                xml.push_str("<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>");
                write_paragraphs(xml, std::slice::from_ref(cell));
                xml.push_str("</a:txBody><a:tcPr/></a:tc>");
            }
            xml.push_str("</a:tr>");
        }

        xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
    }
}
