// ============================================================
// TABLE
// ============================================================
// Ordered named columns with a fixed row count

use std::collections::HashMap;

use super::{CellValue, ColumnKind};

/// A named column of typed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its kind from the cells.
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&cells);
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Numeric view of the column, one entry per row (`None` for missing).
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(CellValue::as_f64).collect()
    }
}

/// Row/column table owned by a single analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from a header row and data rows.
    ///
    /// Header names are normalized (blank → `Unnamed: {i}`, duplicates suffixed `.1`,
    /// `.2`, ...). Rows shorter than the header are padded with missing cells; cells past
    /// the header width are dropped, so callers must reject over-long rows first.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let headers = normalize_headers(headers);
        let row_count = rows.len();
        let mut columns: Vec<Vec<CellValue>> = headers
            .iter()
            .map(|_| Vec::with_capacity(row_count))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        Self { columns, row_count }
    }

    /// Build a table from already-typed columns.
    ///
    /// Names are normalized like [`Table::from_rows`]; shorter columns are padded.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let row_count = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        let names = normalize_headers(columns.iter().map(|c| c.name.clone()).collect());
        let columns = columns
            .into_iter()
            .zip(names)
            .map(|(mut c, name)| {
                c.name = name;
                c.cells.resize(row_count, CellValue::Empty);
                c
            })
            .collect();
        Self { columns, row_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    // Next suffix to try per name; emitted names are always present as keys.
    let mut counts: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let trimmed = raw.trim();
            let mut name = if trimmed.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                trimmed.to_string()
            };

            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{}.{}", name, count);
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), 1);
            name
        })
        .collect()
}
