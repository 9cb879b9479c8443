// ============================================================
// CSV PARSER
// ============================================================
// Parse uploaded CSV bytes into a typed table

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;

use super::is_na_token;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Column, Table};

/// CSV parser with encoding fallback and column type inference
#[derive(Default)]
pub struct CsvParser {
    /// Delimiter character; `None` sniffs it from the content
    delimiter: Option<u8>,
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed delimiter instead of detecting one
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Parse raw upload bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let content = decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true) // short rows are padded below
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut raw_columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for result in reader.records() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row: {}", e))
            })?;

            if is_blank_line(&record) {
                continue;
            }

            if record.len() > headers.len() {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    line,
                    record.len()
                )));
            }

            for (idx, column) in raw_columns.iter_mut().enumerate() {
                let value = record
                    .get(idx)
                    .filter(|v| !is_na_token(v))
                    .map(str::to_string);
                column.push(value);
            }
        }

        let columns = headers
            .iter()
            .zip(raw_columns)
            .map(|(name, values)| Column::new(name, type_column(values)))
            .collect();

        Ok(Table::from_columns(columns))
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// UTF-8 first, Windows-1252 otherwise
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, str::is_empty)
}

/// Type one column the way a dataframe reader would: all numbers, all booleans, or text.
fn type_column(values: Vec<Option<String>>) -> Vec<CellValue> {
    let present = || values.iter().flatten();

    if present().all(|v| v.parse::<f64>().is_ok()) {
        return values
            .iter()
            .map(|v| match v.as_deref().map(str::parse::<f64>) {
                Some(Ok(n)) => CellValue::Number(n),
                _ => CellValue::Empty,
            })
            .collect();
    }

    if present().all(|v| parse_bool(v).is_some()) {
        return values
            .iter()
            .map(|v| match v.as_deref().and_then(parse_bool) {
                Some(b) => CellValue::Bool(b),
                None => CellValue::Empty,
            })
            .collect();
    }

    values
        .into_iter()
        .map(|v| v.map_or(CellValue::Empty, CellValue::Text))
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::ColumnKind;

    #[test]
    fn test_parse_typed_columns() {
        let content = "region,revenue,profit,audited\nNorth,100,10.5,true\nSouth,200,-3,FALSE";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.headers(), vec!["region", "revenue", "profit", "audited"]);
        assert_eq!(table.column("region").unwrap().kind, ColumnKind::Text);
        assert_eq!(table.column("revenue").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(table.column("audited").unwrap().kind, ColumnKind::Boolean);
        assert_eq!(
            table.column("profit").unwrap().cells,
            vec![CellValue::Number(10.5), CellValue::Number(-3.0)]
        );
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let content = "revenue,profit\n100,NA\n,20\nN/A,30";
        let table = CsvParser::new().parse_content(content).unwrap();

        let revenue = table.column("revenue").unwrap();
        assert_eq!(revenue.kind, ColumnKind::Numeric);
        assert_eq!(revenue.missing_count(), 2);
        assert_eq!(table.column("profit").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_text_column_keeps_numeric_looking_values_as_text() {
        let content = "code,amount\n42,1\nA7,2";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(
            table.column("code").unwrap().cells[0],
            CellValue::Text("42".to_string())
        );
    }

    #[test]
    fn test_short_rows_padded_long_rows_rejected() {
        let table = CsvParser::new().parse_content("a,b\n1,2\n3").unwrap();
        assert_eq!(table.column("b").unwrap().cells[1], CellValue::Empty);

        let err = CsvParser::new().parse_content("a,b\n1,2\n3,4,5").unwrap_err();
        match err {
            AppError::ParseError(msg) => {
                assert!(msg.contains("Expected 2 fields in line 3, saw 3"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_content_is_parse_error() {
        assert!(matches!(
            CsvParser::new().parse_content(""),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("single\n1\n2"), b',');
    }

    #[test]
    fn test_semicolon_file() {
        let table = CsvParser::new().parse_content("revenue;profit\n1;2").unwrap();
        assert_eq!(table.column_count(), 2);

        let fixed = CsvParser::new()
            .with_delimiter(b',')
            .parse_content("revenue;profit\n1;2")
            .unwrap();
        assert_eq!(fixed.headers(), vec!["revenue;profit"]);
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "café" with 0xE9 for é
        let bytes = b"name,amount\ncaf\xE9,1";
        let table = CsvParser::new().parse_bytes(bytes).unwrap();
        assert_eq!(
            table.column("name").unwrap().cells[0],
            CellValue::Text("café".to_string())
        );
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let table = CsvParser::new()
            .parse_bytes(b"\xEF\xBB\xBFrevenue,profit\n1,2")
            .unwrap();
        assert_eq!(table.headers(), vec!["revenue", "profit"]);
    }
}
