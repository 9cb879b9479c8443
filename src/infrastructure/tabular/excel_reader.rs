// ============================================================
// EXCEL READER
// ============================================================
// Read the first worksheet of an XLSX/XLS upload into a typed table

use std::fmt::Display;
use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xls, Xlsx};
use chrono::NaiveDateTime;

use super::is_na_token;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, FileFormat, Table};

/// Read a workbook from memory. The first row of the first sheet is the header.
pub fn read_workbook(bytes: &[u8], format: FileFormat) -> Result<Table> {
    match format {
        FileFormat::Xlsx => read_first_sheet::<Xlsx<Cursor<Vec<u8>>>>(bytes, format),
        FileFormat::Xls => read_first_sheet::<Xls<Cursor<Vec<u8>>>>(bytes, format),
        FileFormat::Csv => Err(AppError::UnsupportedFormat(
            "CSV content is not a workbook".to_string(),
        )),
    }
}

fn read_first_sheet<R>(bytes: &[u8], format: FileFormat) -> Result<Table>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: Display,
{
    let mut workbook = R::new(Cursor::new(bytes.to_vec())).map_err(|e| {
        AppError::ParseError(format!("Failed to open {} workbook: {}", format, e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ))
        }
    };

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(Table::from_rows(headers, data))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if is_na_token(s.trim()) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map_or(CellValue::Empty, CellValue::DateTime),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map_or_else(|_| CellValue::Text(s.clone()), CellValue::DateTime),
        Data::Error(_) | Data::Empty => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}
