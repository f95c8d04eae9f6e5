//! Worksheet reader producing [`TabularData`].

use crate::container::{OoxmlContainer, REL_OFFICE_DOCUMENT};
use crate::detect::{detect_format, FormatType};
use crate::error::{Error, Result};
use crate::model::TabularData;
use std::path::Path;

use super::shared_strings::SharedStrings;

/// Sheet info from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Reader for XLSX (Excel) workbooks used as table and chart sources.
pub struct WorkbookReader {
    container: OoxmlContainer,
    workbook_path: String,
    shared_strings: SharedStrings,
    sheets: Vec<SheetInfo>,
}

impl WorkbookReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a reader from a container.
    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if detect_format(&container)? != FormatType::Xlsx {
            return Err(Error::UnsupportedFormat(
                "table data must be an Excel workbook".to_string(),
            ));
        }

        let workbook_path = container
            .read_package_relationships()?
            .first_of_type(REL_OFFICE_DOCUMENT)
            .map(|rel| OoxmlContainer::resolve_path("", &rel.target))
            .unwrap_or_else(|| "xl/workbook.xml".to_string());

        let shared_strings_path = OoxmlContainer::resolve_path(&workbook_path, "sharedStrings.xml");
        let shared_strings = match container.read_xml(&shared_strings_path) {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(_) => SharedStrings::default(),
        };

        let xml = container.read_xml(&workbook_path)?;
        let sheets = Self::parse_workbook(&xml)?;

        Ok(Self {
            container,
            workbook_path,
            shared_strings,
            sheets,
        })
    }

    /// Parse workbook.xml for sheet info, in workbook order.
    fn parse_workbook(xml: &str) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"sheet" =>
                {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        let key = attr.key.as_ref();
                        if key == b"name" {
                            name = attr.unescape_value().unwrap_or_default().to_string();
                        } else if key.ends_with(b":id") {
                            rel_id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }

                    sheets.push(SheetInfo { name, rel_id });
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read the first worksheet: first row as headers, the rest as data.
    pub fn read_first_sheet(&self) -> Result<TabularData> {
        let rels = self.container.read_relationships(&self.workbook_path)?;
        let sheet_path = self
            .sheets
            .first()
            .and_then(|sheet| rels.get(&sheet.rel_id))
            .map(|rel| OoxmlContainer::resolve_path(&self.workbook_path, &rel.target))
            .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());

        let xml = self.container.read_xml(&sheet_path)?;
        let mut rows = self.parse_sheet(&xml)?.into_iter();

        let headers = rows
            .next()
            .ok_or_else(|| Error::InvalidData("worksheet has no header row".to_string()))?;
        Ok(TabularData::new(headers, rows.collect()))
    }

    /// Parse a worksheet into rows of cell text, positioned by cell reference.
    ///
    /// Rows without any non-empty cell are dropped.
    fn parse_sheet(&self, xml: &str) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut in_row = false;
        let mut in_value = false;
        let mut current_row: Vec<String> = Vec::new();
        let mut current_col = 0usize;
        let mut current_cell_type: Option<String> = None;
        let mut current_cell_value = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => match e.name().local_name().as_ref() {
                    b"row" => {
                        in_row = true;
                        current_row.clear();
                    }
                    b"c" if in_row => {
                        current_cell_type = None;
                        current_cell_value.clear();
                        current_col = current_row.len();

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"t" => {
                                    current_cell_type =
                                        Some(String::from_utf8_lossy(&attr.value).to_string());
                                }
                                b"r" => {
                                    let reference = String::from_utf8_lossy(&attr.value);
                                    match column_index(&reference) {
                                        Some(col) => current_col = col,
                                        None if has_column_letters(&reference) => {
                                            return Err(Error::InvalidData(format!(
                                                "cell reference '{}' is beyond column XFD",
                                                reference
                                            )));
                                        }
                                        None => {}
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    // <v> holds values, <t> holds inline string runs
                    b"v" | b"t" => in_value = true,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Text(ref e)) if in_value => {
                    current_cell_value.push_str(&e.unescape().unwrap_or_default());
                }
                Ok(quick_xml::events::Event::End(ref e)) => match e.name().local_name().as_ref() {
                    b"row" => {
                        if current_row.iter().any(|v| !v.is_empty()) {
                            rows.push(std::mem::take(&mut current_row));
                        }
                        in_row = false;
                    }
                    b"c" if in_row => {
                        let value = self
                            .resolve_cell_value(&current_cell_value, current_cell_type.as_deref());
                        if current_row.len() <= current_col {
                            current_row.resize(current_col + 1, String::new());
                        }
                        current_row[current_col] = value;
                    }
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rows)
    }

    /// Resolve a cell value based on its type.
    fn resolve_cell_value(&self, value: &str, cell_type: Option<&str>) -> String {
        match cell_type {
            Some("s") => match value.trim().parse::<usize>() {
                Ok(idx) => self.shared_strings.get(idx).unwrap_or("").to_string(),
                Err(_) => value.to_string(),
            },
            Some("b") => {
                if value.trim() == "1" {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            Some("e") => format!("#ERROR:{}", value),
            // Numbers, formula strings and inline strings are stored as text already
            _ => value.to_string(),
        }
    }
}

/// Last column a worksheet can address (`XFD`), zero-based.
const MAX_COLUMN: usize = 16_383;

fn has_column_letters(reference: &str) -> bool {
    reference.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
}

/// Zero-based column index of a cell reference such as `C4` or `AB12`.
///
/// Returns `None` when the reference has no column letters or points past `XFD`.
fn column_index(reference: &str) -> Option<usize> {
    if !has_column_letters(reference) {
        return None;
    }

    let number = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .try_fold(0usize, |acc, b| {
            let digit = (b.to_ascii_uppercase() - b'A' + 1) as usize;
            acc.checked_mul(26)?
                .checked_add(digit)
                .filter(|&n| n <= MAX_COLUMN + 1)
        })?;
    Some(number - 1)
}

/// Read the first worksheet of a workbook file.
pub fn read_table(path: impl AsRef<Path>) -> Result<TabularData> {
    WorkbookReader::open(path)?.read_first_sheet()
}
