// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// Decode uploaded CSV/XLSX/XLS bytes into the table model

mod csv_parser;
mod excel_reader;
#[cfg(test)]
pub(crate) mod test_workbook;

pub use csv_parser::CsvParser;
pub use excel_reader::read_workbook;

use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{FileFormat, Table, UploadedDocument};
use crate::domain::tier::Tier;

/// Cell strings read as missing values
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

pub(crate) fn is_na_token(value: &str) -> bool {
    NA_TOKENS.contains(&value)
}

/// Loads an upload into a [`Table`] after checking its extension against the tier.
#[derive(Default)]
pub struct TabularLoader {
    csv: CsvParser,
}

impl TabularLoader {
    /// Resolve the declared format, rejecting extensions the tier does not accept.
    pub fn resolve_format(&self, document: &UploadedDocument, tier: Tier) -> Result<FileFormat> {
        document
            .format()
            .filter(|format| tier.accepts(*format))
            .ok_or_else(|| {
                AppError::UnsupportedFormat(format!(
                    "Only {} files are supported.",
                    tier.accepted_extensions()
                ))
            })
    }

    pub fn load(&self, document: &UploadedDocument, tier: Tier) -> Result<Table> {
        let format = self.resolve_format(document, tier)?;

        let table = match format {
            FileFormat::Csv => self.csv.parse_bytes(&document.bytes)?,
            FileFormat::Xlsx | FileFormat::Xls => read_workbook(&document.bytes, format)?,
        };

        debug!(
            filename = %document.filename,
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded upload"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let loader = TabularLoader::default();
        let doc = UploadedDocument::new("notes.txt", b"revenue,profit\n1,2".to_vec());

        let err = loader.load(&doc, Tier::Premium).unwrap_err();
        match err {
            AppError::UnsupportedFormat(msg) => {
                assert_eq!(msg, "Only .csv or .xlsx files are supported.")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_xls_only_for_standard() {
        let loader = TabularLoader::default();
        let doc = UploadedDocument::new("legacy.xls", Vec::new());

        assert_eq!(
            loader.resolve_format(&doc, Tier::Standard).unwrap(),
            FileFormat::Xls
        );
        assert!(matches!(
            loader.resolve_format(&doc, Tier::Plus),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_csv_upload() {
        let loader = TabularLoader::default();
        let doc = UploadedDocument::new("Q3.CSV", b"revenue,profit\n100,10\n200,20".to_vec());

        let table = loader.load(&doc, Tier::Plus).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_load_xlsx_upload() {
        let loader = TabularLoader::default();
        let doc = UploadedDocument::new("Q3.XLSX", test_workbook::revenue_workbook());

        for tier in Tier::ALL {
            let table = loader.load(&doc, tier).unwrap();
            assert_eq!(table.row_count(), 3);
            assert_eq!(table.column_count(), 3);
        }
    }

    #[test]
    fn test_csv_bytes_declared_as_xlsx_fail_to_parse() {
        let loader = TabularLoader::default();
        let doc = UploadedDocument::new("q3.xlsx", b"revenue,profit\n100,10".to_vec());

        assert!(matches!(
            loader.load(&doc, Tier::Premium),
            Err(AppError::ParseError(_))
        ));
    }
}
