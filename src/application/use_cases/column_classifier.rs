// ============================================================
// COLUMN CLASSIFIER
// ============================================================
// Coerce date-named columns and select the numeric subset

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::domain::analysis_config::{ColumnRoles, DATE_COLUMN_TOKEN};
use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, Column, ColumnKind, Table};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

/// A numeric column, values indexed by row (`None` = missing).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    /// Non-missing values in row order
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied().filter(|v| !v.is_nan())
    }
}

/// Numeric columns of a table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumnSet {
    columns: Vec<NumericColumn>,
}

impl NumericColumnSet {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn find(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns
            .iter()
            .position(|c| c.name.trim().eq_ignore_ascii_case(wanted))
    }
}

/// Revenue and profit columns picked for KPI computation.
#[derive(Debug, Clone, Copy)]
pub struct RoleColumns<'a> {
    pub revenue: &'a NumericColumn,
    pub profit: &'a NumericColumn,
}

pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Coerce every column whose name contains `date` (any case) to datetimes.
    ///
    /// Cells that cannot be read as a datetime become missing.
    pub fn classify(mut table: Table) -> Table {
        for column in table.columns_mut() {
            if column.name.to_lowercase().contains(DATE_COLUMN_TOKEN) {
                coerce_datetime(column);
            }
        }
        table
    }

    /// Names of the datetime columns
    pub fn date_columns(table: &Table) -> Vec<String> {
        table
            .columns()
            .iter()
            .filter(|c| c.kind == ColumnKind::DateTime)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Select the numeric columns, enforcing the minimum shape for KPI work.
    pub fn numeric_columns(table: &Table) -> Result<NumericColumnSet> {
        if table.column_count() < 2 {
            return Err(AppError::InsufficientColumns(
                "Uploaded file must have at least 2 columns.".to_string(),
            ));
        }
        if table.is_empty() {
            return Err(AppError::EmptyTable);
        }

        let columns: Vec<NumericColumn> = table
            .columns()
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| NumericColumn {
                name: c.name.clone(),
                values: c.numeric_values(),
            })
            .collect();

        debug!(
            numeric = columns.len(),
            total = table.column_count(),
            "Classified numeric columns"
        );

        if columns.len() < 2 {
            return Err(AppError::InsufficientColumns(
                "Uploaded file must have at least 2 numeric columns.".to_string(),
            ));
        }

        Ok(NumericColumnSet { columns })
    }

    /// Pick the revenue and profit columns.
    ///
    /// Named roles must match a numeric column. Unset roles take the first numeric
    /// column not already claimed, in table order.
    pub fn resolve_roles<'a>(
        set: &'a NumericColumnSet,
        roles: &ColumnRoles,
    ) -> Result<RoleColumns<'a>> {
        let named = |role: &Option<String>| -> Result<Option<usize>> {
            match role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
                Some(name) => set
                    .find(name)
                    .map(Some)
                    .ok_or_else(|| {
                        AppError::UnknownColumn(format!(
                            "'{}' is not a numeric column. Numeric columns: {}",
                            name,
                            set.names().join(", ")
                        ))
                    }),
                None => Ok(None),
            }
        };

        let revenue_named = named(&roles.revenue)?;
        let profit_named = named(&roles.profit)?;

        let first_free = |taken: Option<usize>| (0..set.len()).find(|idx| Some(*idx) != taken);

        let revenue = match revenue_named {
            Some(idx) => idx,
            None => first_free(profit_named).ok_or_else(not_enough_numeric)?,
        };
        let profit = match profit_named {
            Some(idx) => idx,
            None => first_free(Some(revenue)).ok_or_else(not_enough_numeric)?,
        };

        if revenue == profit {
            return Err(AppError::InsufficientColumns(format!(
                "Revenue and profit must be different columns (both resolved to '{}').",
                set.columns[revenue].name
            )));
        }

        Ok(RoleColumns {
            revenue: &set.columns[revenue],
            profit: &set.columns[profit],
        })
    }
}

fn not_enough_numeric() -> AppError {
    AppError::InsufficientColumns("Uploaded file must have at least 2 numeric columns.".to_string())
}

fn coerce_datetime(column: &mut Column) {
    for cell in column.cells.iter_mut() {
        let coerced = match cell {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(text) => parse_datetime(text),
            _ => None,
        };
        *cell = coerced.map_or(CellValue::Empty, CellValue::DateTime);
    }
    column.kind = ColumnKind::DateTime;
}

/// Parse a datetime string against the accepted layouts.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: Vec<(&str, Vec<CellValue>)>) -> Table {
        Table::from_columns(
            columns
                .into_iter()
                .map(|(name, cells)| Column::new(name, cells))
                .collect(),
        )
    }

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Number(*v)).collect()
    }

    #[test]
    fn test_date_columns_are_coerced() {
        let t = table(vec![
            (
                "Invoice Date",
                vec![
                    CellValue::Text("2024-01-31".into()),
                    CellValue::Text("not a date".into()),
                    CellValue::Number(45000.0),
                ],
            ),
            ("revenue", nums(&[1.0, 2.0, 3.0])),
        ]);

        let t = ColumnClassifier::classify(t);
        let dates = t.column("Invoice Date").unwrap();

        assert_eq!(dates.kind, ColumnKind::DateTime);
        assert!(matches!(dates.cells[0], CellValue::DateTime(_)));
        assert_eq!(dates.cells[1], CellValue::Empty);
        assert_eq!(dates.cells[2], CellValue::Empty);
        assert_eq!(ColumnClassifier::date_columns(&t), vec!["Invoice Date"]);
    }

    #[test]
    fn test_numeric_date_column_is_not_numeric_after_coercion() {
        let t = table(vec![
            ("update_DATE", nums(&[1.0, 2.0])),
            ("revenue", nums(&[1.0, 2.0])),
            ("profit", nums(&[1.0, 2.0])),
        ]);

        let t = ColumnClassifier::classify(t);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        assert_eq!(set.names(), vec!["revenue", "profit"]);
    }

    #[test]
    fn test_fewer_than_two_columns() {
        let t = table(vec![("revenue", nums(&[1.0]))]);
        assert!(matches!(
            ColumnClassifier::numeric_columns(&t),
            Err(AppError::InsufficientColumns(_))
        ));
    }

    #[test]
    fn test_one_numeric_column() {
        let t = table(vec![
            ("region", vec![CellValue::Text("North".into())]),
            ("revenue", nums(&[1.0])),
        ]);
        match ColumnClassifier::numeric_columns(&t) {
            Err(AppError::InsufficientColumns(msg)) => assert!(msg.contains("2 numeric columns")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_rows_is_empty_table() {
        let t = Table::from_rows(vec!["a".into(), "b".into()], vec![]);
        assert!(matches!(
            ColumnClassifier::numeric_columns(&t),
            Err(AppError::EmptyTable)
        ));
    }

    #[test]
    fn test_positional_roles() {
        let t = table(vec![
            ("units", nums(&[1.0])),
            ("region", vec![CellValue::Text("x".into())]),
            ("sales", nums(&[2.0])),
        ]);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        let roles = ColumnClassifier::resolve_roles(&set, &ColumnRoles::default()).unwrap();

        assert_eq!(roles.revenue.name, "units");
        assert_eq!(roles.profit.name, "sales");
    }

    #[test]
    fn test_named_roles_case_insensitive() {
        let t = table(vec![
            ("units", nums(&[1.0])),
            ("Net Profit", nums(&[2.0])),
            ("Revenue", nums(&[3.0])),
        ]);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        let roles = ColumnRoles {
            revenue: Some("revenue".into()),
            profit: Some(" net profit ".into()),
        };
        let resolved = ColumnClassifier::resolve_roles(&set, &roles).unwrap();

        assert_eq!(resolved.revenue.name, "Revenue");
        assert_eq!(resolved.profit.name, "Net Profit");
    }

    #[test]
    fn test_partial_role_falls_back_to_first_free_column() {
        let t = table(vec![
            ("units", nums(&[1.0])),
            ("sales", nums(&[2.0])),
        ]);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        let roles = ColumnRoles {
            revenue: None,
            profit: Some("units".into()),
        };
        let resolved = ColumnClassifier::resolve_roles(&set, &roles).unwrap();

        assert_eq!(resolved.revenue.name, "sales");
        assert_eq!(resolved.profit.name, "units");
    }

    #[test]
    fn test_unknown_role_column() {
        let t = table(vec![("a", nums(&[1.0])), ("b", nums(&[2.0]))]);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        let roles = ColumnRoles {
            revenue: Some("turnover".into()),
            profit: None,
        };

        assert!(matches!(
            ColumnClassifier::resolve_roles(&set, &roles),
            Err(AppError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_same_column_for_both_roles() {
        let t = table(vec![("a", nums(&[1.0])), ("b", nums(&[2.0]))]);
        let set = ColumnClassifier::numeric_columns(&t).unwrap();
        let roles = ColumnRoles {
            revenue: Some("a".into()),
            profit: Some("A".into()),
        };

        assert!(matches!(
            ColumnClassifier::resolve_roles(&set, &roles),
            Err(AppError::InsufficientColumns(_))
        ));
    }

    #[test]
    fn test_parse_datetime_layouts() {
        assert!(parse_datetime("2024-03-31").is_some());
        assert!(parse_datetime("2024-03-31 12:30:00").is_some());
        assert!(parse_datetime("2024-03-31T12:30:00").is_some());
        assert!(parse_datetime("2024-03-31T12:30:00+02:00").is_some());
        assert!(parse_datetime("03/31/2024").is_some());
        assert!(parse_datetime("31-Mar-2024").is_some());
        assert!(parse_datetime("Q1 2024").is_none());
        assert!(parse_datetime("").is_none());
    }
}
