//! SpreadsheetML workbook with two sheets: typed data with formulas, dates, a
//! merged range and a hyperlink, plus a sheet of multi-script text.

use super::ooxml::{
    app_properties_xml, esc, root_relationships, ContentTypes, CoreProperties, Package,
    Relationships, REL_HYPERLINK, REL_STYLES, REL_WORKSHEET, XML_DECL,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use time::{Date, Month};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CT_SHARED_STRINGS: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";

pub const TITLE: &str = "Tika XLSX Sample";
pub const CREATOR: &str = "Tika Samples";
pub const DESCRIPTION: &str = "Workbook with data, formulas, dates, hyperlink, and merged cells.";
pub const LINK_URL: &str = "https://tika.apache.org/";

/// Indexes into `cellXfs` in [`STYLES_XML`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Normal = 0,
    Bold = 1,
    Date = 2,
    Hyperlink = 3,
}

#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Number(f64),
    Formula { expr: String, cached: f64 },
    Date(Date),
}

struct Worksheet {
    name: &'static str,
    rows: BTreeMap<u32, BTreeMap<u32, (Value, Style)>>,
    merges: Vec<String>,
    hyperlinks: Vec<(String, String)>,
}

impl Worksheet {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
            merges: Vec::new(),
            hyperlinks: Vec::new(),
        }
    }

    fn set(&mut self, row: u32, col: u32, value: Value, style: Style) {
        self.rows.entry(row).or_default().insert(col, (value, style));
    }

    fn text(&mut self, row: u32, col: u32, s: &str) {
        self.set(row, col, Value::Text(s.to_string()), Style::Normal);
    }

    fn append_text_row(&mut self, row: u32, cells: &[&str], style: Style) {
        for (i, s) in cells.iter().enumerate() {
            self.set(row, i as u32 + 1, Value::Text((*s).to_string()), style);
        }
    }

    fn get_number(&self, row: u32, col: u32) -> f64 {
        match self.rows.get(&row).and_then(|r| r.get(&col)) {
            Some((Value::Number(n), _)) => *n,
            Some((Value::Formula { cached, .. }, _)) => *cached,
            _ => 0.0,
        }
    }

    fn to_xml(&self, strings: &mut SharedStrings) -> String {
        let mut xml = String::from(XML_DECL);
        let _ = write!(xml, r#"<worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheetData>"#);
        for (row, cells) in &self.rows {
            let _ = write!(xml, r#"<row r="{row}">"#);
            for (col, (value, style)) in cells {
                let r = a1(*row, *col);
                let s = match style {
                    Style::Normal => String::new(),
                    other => format!(r#" s="{}""#, *other as u8),
                };
                match value {
                    Value::Text(t) => {
                        let idx = strings.index(t);
                        let _ = write!(xml, r#"<c r="{r}"{s} t="s"><v>{idx}</v></c>"#);
                    }
                    Value::Number(n) => {
                        let _ = write!(xml, r#"<c r="{r}"{s}><v>{n}</v></c>"#);
                    }
                    Value::Formula { expr, cached } => {
                        let _ = write!(
                            xml,
                            r#"<c r="{r}"{s}><f>{}</f><v>{cached}</v></c>"#,
                            esc(expr)
                        );
                    }
                    Value::Date(d) => {
                        let _ = write!(xml, r#"<c r="{r}"{s}><v>{}</v></c>"#, excel_serial(*d));
                    }
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");
        if !self.merges.is_empty() {
            let _ = write!(xml, r#"<mergeCells count="{}">"#, self.merges.len());
            for m in &self.merges {
                let _ = write!(xml, r#"<mergeCell ref="{m}"/>"#);
            }
            xml.push_str("</mergeCells>");
        }
        if !self.hyperlinks.is_empty() {
            xml.push_str("<hyperlinks>");
            for (i, (cell, _)) in self.hyperlinks.iter().enumerate() {
                let _ = write!(xml, r#"<hyperlink ref="{cell}" r:id="rId{}"/>"#, i + 1);
            }
            xml.push_str("</hyperlinks>");
        }
        xml.push_str("</worksheet>");
        xml
    }

    fn relationships(&self) -> Option<Relationships> {
        if self.hyperlinks.is_empty() {
            return None;
        }
        let mut rels = Relationships::new();
        for (_, url) in &self.hyperlinks {
            rels.add_external(REL_HYPERLINK, url.clone());
        }
        Some(rels)
    }
}

#[derive(Default)]
struct SharedStrings {
    items: Vec<String>,
    lookup: BTreeMap<String, usize>,
}

impl SharedStrings {
    fn index(&mut self, s: &str) -> usize {
        if let Some(i) = self.lookup.get(s) {
            return *i;
        }
        let i = self.items.len();
        self.items.push(s.to_string());
        self.lookup.insert(s.to_string(), i);
        i
    }

    fn to_xml(&self, references: usize) -> String {
        let mut xml = String::from(XML_DECL);
        let _ = write!(
            xml,
            r#"<sst xmlns="{NS_MAIN}" count="{references}" uniqueCount="{}">"#,
            self.items.len()
        );
        for s in &self.items {
            let preserve = if s.trim() != s { r#" xml:space="preserve""# } else { "" };
            let _ = write!(xml, "<si><t{preserve}>{}</t></si>", esc(s));
        }
        xml.push_str("</sst>");
        xml
    }
}

/// `(row, col)` to an A1 reference, both 1-based.
fn a1(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut c = col;
    while c > 0 {
        let rem = (c - 1) % 26;
        letters.push(b'A' + rem as u8);
        c = (c - 1) / 26;
    }
    letters.reverse();
    format!("{}{row}", String::from_utf8_lossy(&letters))
}

/// Days since 1899-12-30, the 1900 date system as Excel counts it.
fn excel_serial(d: Date) -> i64 {
    let epoch = Date::from_calendar_date(1899, Month::December, 30).unwrap_or(Date::MIN);
    (d - epoch).whole_days()
}

fn date(year: i32, month: Month, day: u8) -> Result<Date> {
    Date::from_calendar_date(year, month, day)
        .with_context(|| format!("invalid date {year}-{month}-{day}"))
}

fn data_sheet() -> Result<Worksheet> {
    let mut ws = Worksheet::new("Data");
    ws.append_text_row(1, &["Item", "Qty", "Price", "Total", "Date"], Style::Bold);

    let items = [
        ("Widget", 3.0, 9.99, date(2024, Month::January, 15)?),
        ("Gadget", 5.0, 2.5, date(2023, Month::June, 30)?),
        ("Thingamajig", 1.0, 199.95, date(2025, Month::September, 22)?),
    ];
    for (i, (name, qty, price, day)) in items.into_iter().enumerate() {
        let row = i as u32 + 2;
        ws.text(row, 1, name);
        ws.set(row, 2, Value::Number(qty), Style::Normal);
        ws.set(row, 3, Value::Number(price), Style::Normal);
        ws.set(
            row,
            4,
            Value::Formula {
                expr: format!("B{row}*C{row}"),
                cached: qty * price,
            },
            Style::Normal,
        );
        ws.set(row, 5, Value::Date(day), Style::Date);
    }

    let total: f64 = (2..=4).map(|r| ws.get_number(r, 4)).sum();
    ws.text(6, 3, "Grand Total");
    ws.set(
        6,
        4,
        Value::Formula {
            expr: "SUM(D2:D4)".into(),
            cached: total,
        },
        Style::Normal,
    );

    ws.text(8, 1, "Merged cell example");
    ws.merges.push("A8:E8".into());

    ws.set(10, 1, Value::Text("Apache Tika".into()), Style::Hyperlink);
    ws.hyperlinks.push((a1(10, 1), LINK_URL.into()));
    Ok(ws)
}

fn unicode_sheet() -> Worksheet {
    let mut ws = Worksheet::new("Unicode");
    let rows = [
        ["Language", "Sample"],
        ["Chinese", "你好，世界"],
        ["Russian", "Привет, мир"],
        ["Emoji", "😀🚀📄"],
    ];
    for (i, row) in rows.iter().enumerate() {
        ws.append_text_row(i as u32 + 1, row, Style::Normal);
    }
    ws
}

pub fn build() -> Result<Vec<u8>> {
    let sheets = [data_sheet()?, unicode_sheet()];

    let mut strings = SharedStrings::default();
    let sheet_xml: Vec<String> = sheets.iter().map(|ws| ws.to_xml(&mut strings)).collect();
    let references: usize = sheets
        .iter()
        .flat_map(|ws| ws.rows.values())
        .flat_map(|r| r.values())
        .filter(|(v, _)| matches!(v, Value::Text(_)))
        .count();

    let mut content_types = ContentTypes::new();
    content_types.add_override("/xl/workbook.xml", CT_WORKBOOK);
    content_types.add_override("/xl/styles.xml", CT_STYLES);
    content_types.add_override("/xl/sharedStrings.xml", CT_SHARED_STRINGS);

    let mut workbook_rels = Relationships::new();
    let mut workbook = String::from(XML_DECL);
    let _ = write!(workbook, r#"<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheets>"#);
    for (i, ws) in sheets.iter().enumerate() {
        let target = format!("worksheets/sheet{}.xml", i + 1);
        content_types.add_override(format!("/xl/{target}"), CT_WORKSHEET);
        let rid = workbook_rels.add(REL_WORKSHEET, target);
        let _ = write!(
            workbook,
            r#"<sheet name="{}" sheetId="{}" r:id="{rid}"/>"#,
            esc(ws.name),
            i + 1
        );
    }
    workbook.push_str(r#"</sheets><calcPr calcId="191029" fullCalcOnLoad="1"/></workbook>"#);
    workbook_rels.add(REL_STYLES, "styles.xml");
    workbook_rels.add(REL_SHARED_STRINGS, "sharedStrings.xml");

    let core = CoreProperties {
        title: Some(TITLE),
        creator: Some(CREATOR),
        description: Some(DESCRIPTION),
        ..Default::default()
    };

    let mut pkg = Package::new();
    pkg.add_part("[Content_Types].xml", content_types.to_xml().as_bytes())?;
    pkg.add_part("_rels/.rels", root_relationships("xl/workbook.xml").to_xml().as_bytes())?;
    pkg.add_part("docProps/core.xml", core.to_xml().as_bytes())?;
    pkg.add_part("docProps/app.xml", app_properties_xml().as_bytes())?;
    pkg.add_part("xl/workbook.xml", workbook.as_bytes())?;
    pkg.add_part("xl/_rels/workbook.xml.rels", workbook_rels.to_xml().as_bytes())?;
    for (i, (ws, xml)) in sheets.iter().zip(&sheet_xml).enumerate() {
        pkg.add_part(&format!("xl/worksheets/sheet{}.xml", i + 1), xml.as_bytes())?;
        if let Some(rels) = ws.relationships() {
            pkg.add_part(
                &format!("xl/worksheets/_rels/sheet{}.xml.rels", i + 1),
                rels.to_xml().as_bytes(),
            )?;
        }
    }
    pkg.add_part("xl/styles.xml", STYLES_XML.as_bytes())?;
    pkg.add_part("xl/sharedStrings.xml", strings.to_xml(references).as_bytes())?;
    pkg.finish()
}

const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy-mm-dd"/></numFmts>"#,
    r#"<fonts count="3">"#,
    r#"<font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#,
    r#"<font><b/><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#,
    r#"<font><u/><sz val="11"/><color rgb="FF0563C1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#,
    r#"</fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="2">"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>"#,
    r#"<xf numFmtId="0" fontId="2" fillId="0" borderId="0" applyNumberFormat="0" applyFill="0" applyBorder="0" applyAlignment="0" applyProtection="0"/>"#,
    r#"</cellStyleXfs>"#,
    r#"<cellXfs count="4">"#,
    r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#,
    r#"<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
    r#"<xf numFmtId="0" fontId="2" fillId="0" borderId="0" xfId="1"/>"#,
    r#"</cellXfs>"#,
    r#"<cellStyles count="2">"#,
    r#"<cellStyle name="Hyperlink" xfId="1" builtinId="8"/>"#,
    r#"<cellStyle name="Normal" xfId="0" builtinId="0"/>"#,
    r#"</cellStyles>"#,
    r#"</styleSheet>"#,
);
