//! Chart part generation.
//!
//! Converts tabular data into chart series and writes the DrawingML chart
//! part (`ppt/charts/chartN.xml`) referenced by a slide's graphic frame.

use crate::container::escape_xml;
use crate::error::{Error, Result};
use crate::model::{ChartKind, TabularData};
use std::fmt::Write as _;

/// Content type of a chart part.
pub const CHART_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
/// Relationship type from a slide to a chart part.
pub const REL_CHART: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";
/// `graphicData@uri` of a chart graphic frame.
pub const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

const CAT_AX_ID: u32 = 1;
const VAL_AX_ID: u32 = 2;

/// Chart data: categories plus one or more named series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Category labels (X-axis)
    pub categories: Vec<String>,
    /// Series data
    pub series: Vec<ChartSeries>,
}

/// A data series in a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Series name (legend label)
    pub name: String,
    /// Data values, one per category
    pub values: Vec<f64>,
}

impl ChartData {
    /// Build chart data from a table.
    ///
    /// The first column holds the categories and every other column is a
    /// series named by its header. Cells that are not numbers count as 0.
    pub fn from_tabular(data: &TabularData) -> Result<Self> {
        if data.column_count() < 2 {
            return Err(Error::InvalidData(format!(
                "chart data needs a category column and at least one series, got {} column(s)",
                data.column_count()
            )));
        }

        let categories = data.column(0).map(str::to_string).collect();
        let series = data
            .headers
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, name)| ChartSeries {
                name: name.clone(),
                values: data
                    .column(i)
                    .map(|v| v.trim().parse::<f64>().unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        Ok(Self { categories, series })
    }

    /// Check if chart data is empty
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.series.is_empty()
    }

    /// Serialize as a chart part of the given kind.
    ///
    /// Pie charts only plot the first series.
    pub fn to_xml(&self, kind: ChartKind) -> String {
        let mut xml = String::with_capacity(1024 + self.categories.len() * 64);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#);
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
        xml.push_str(r#"<c:date1904 val="0"/><c:lang val="en-US"/><c:roundedCorners val="0"/>"#);
        xml.push_str(r#"<c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>"#);

        match kind {
            ChartKind::Bar | ChartKind::Barh => {
                let dir = if kind == ChartKind::Barh { "bar" } else { "col" };
                let _ = write!(
                    xml,
                    r#"<c:barChart><c:barDir val="{}"/><c:grouping val="clustered"/><c:varyColors val="0"/>"#,
                    dir
                );
                self.write_series(&mut xml, self.series.len());
                let _ = write!(
                    xml,
                    r#"<c:gapWidth val="150"/><c:axId val="{}"/><c:axId val="{}"/></c:barChart>"#,
                    CAT_AX_ID, VAL_AX_ID
                );
            }
            ChartKind::Line => {
                xml.push_str(r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
                self.write_series(&mut xml, self.series.len());
                let _ = write!(
                    xml,
                    r#"<c:marker val="1"/><c:axId val="{}"/><c:axId val="{}"/></c:lineChart>"#,
                    CAT_AX_ID, VAL_AX_ID
                );
            }
            ChartKind::Area => {
                xml.push_str(r#"<c:areaChart><c:grouping val="standard"/><c:varyColors val="0"/>"#);
                self.write_series(&mut xml, self.series.len());
                let _ = write!(
                    xml,
                    r#"<c:axId val="{}"/><c:axId val="{}"/></c:areaChart>"#,
                    CAT_AX_ID, VAL_AX_ID
                );
            }
            ChartKind::Pie => {
                xml.push_str(r#"<c:pieChart><c:varyColors val="1"/>"#);
                self.write_series(&mut xml, 1);
                xml.push_str(r#"<c:firstSliceAng val="0"/></c:pieChart>"#);
            }
        }

        if kind.has_axes() {
            // Horizontal bars swap the axis sides
            let (cat_pos, val_pos) = if kind == ChartKind::Barh {
                ("l", "b")
            } else {
                ("b", "l")
            };
            write_axes(&mut xml, cat_pos, val_pos);
        }

        xml.push_str("</c:plotArea>");
        xml.push_str(r#"<c:legend><c:legendPos val="r"/><c:overlay val="0"/></c:legend>"#);
        xml.push_str(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart>"#);
        xml.push_str("</c:chartSpace>");
        xml
    }

    fn write_series(&self, xml: &mut String, limit: usize) {
        for (i, series) in self.series.iter().take(limit).enumerate() {
            let _ = write!(
                xml,
                r#"<c:ser><c:idx val="{0}"/><c:order val="{0}"/><c:tx><c:v>{1}</c:v></c:tx>"#,
                i,
                escape_xml(&series.name)
            );

            xml.push_str("<c:cat><c:strLit>");
            let _ = write!(xml, r#"<c:ptCount val="{}"/>"#, self.categories.len());
            for (idx, category) in self.categories.iter().enumerate() {
                let _ = write!(
                    xml,
                    r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                    idx,
                    escape_xml(category)
                );
            }
            xml.push_str("</c:strLit></c:cat>");

            xml.push_str("<c:val><c:numLit><c:formatCode>General</c:formatCode>");
            let _ = write!(xml, r#"<c:ptCount val="{}"/>"#, series.values.len());
            for (idx, value) in series.values.iter().enumerate() {
                let _ = write!(
                    xml,
                    r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                    idx,
                    format_number(*value)
                );
            }
            xml.push_str("</c:numLit></c:val></c:ser>");
        }
    }
}

fn write_axes(xml: &mut String, cat_pos: &str, val_pos: &str) {
    let _ = write!(
        xml,
        r#"<c:catAx><c:axId val="{}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="{}"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{}"/><c:crosses val="autoZero"/><c:auto val="1"/><c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/></c:catAx>"#,
        CAT_AX_ID, cat_pos, VAL_AX_ID
    );
    let _ = write!(
        xml,
        r#"<c:valAx><c:axId val="{}"/><c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/><c:axPos val="{}"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="0"/><c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/><c:crossAx val="{}"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#,
        VAL_AX_ID, val_pos, CAT_AX_ID
    );
}

/// Format a number, removing unnecessary trailing zeros
pub(crate) fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        let s = format!("{:.6}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
