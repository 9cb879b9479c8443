// ============================================================
// TEST WORKBOOK
// ============================================================
// Minimal XLSX packages built in memory for reader tests

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One worksheet cell.
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Excel serial day number rendered with a built-in date format
    Date(f64),
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml"
    ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml"
    ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml"
    ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1"
    Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"
    Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
    xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Report" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1"
    Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet"
    Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2"
    Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
    Target="styles.xml"/>
</Relationships>"#;

// Style 1 uses built-in number format 14 (m/d/yyyy)
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="2">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;

/// Build an XLSX whose first sheet holds `rows` at their 1-based sheet row numbers.
///
/// Row numbers that are skipped come back from the reader as blank rows.
pub fn build(rows: &[(u32, Vec<Cell>)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];

    for (name, body) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// `Date, revenue, profit` over three months, with a blank sheet row between the first
/// two records.
pub fn revenue_workbook() -> Vec<u8> {
    build(&[
        (
            1,
            vec![Cell::Text("Date"), Cell::Text("revenue"), Cell::Text("profit")],
        ),
        (
            2,
            vec![Cell::Date(45322.0), Cell::Number(100.0), Cell::Number(10.0)],
        ),
        (
            4,
            vec![Cell::Date(45351.0), Cell::Number(200.0), Cell::Number(20.0)],
        ),
        (
            5,
            vec![Cell::Date(45382.0), Cell::Number(300.0), Cell::Number(30.0)],
        ),
    ])
}

fn sheet_xml(rows: &[(u32, Vec<Cell>)]) -> String {
    let mut data = String::new();
    for (row, cells) in rows {
        data.push_str(&format!(r#"<row r="{row}">"#));
        for (idx, cell) in cells.iter().enumerate() {
            let reference = format!("{}{}", column_letter(idx), row);
            let xml = match cell {
                Cell::Text(text) => format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{text}</t></is></c>"#
                ),
                Cell::Number(value) => format!(r#"<c r="{reference}"><v>{value}</v></c>"#),
                Cell::Date(serial) => {
                    format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#)
                }
            };
            data.push_str(&xml);
        }
        data.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{data}</sheetData>
</worksheet>"#
    )
}

fn column_letter(idx: usize) -> char {
    (b'A' + idx as u8) as char
}
