// ============================================================
// CELL VALUES
// ============================================================
// Typed cell values and the column kinds inferred from them

use chrono::NaiveDateTime;

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value (blank cell, NA token, unparseable date)
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Storage type of a whole column, as a dataframe would report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    DateTime,
    /// Text or a mix of types
    Text,
}

impl ColumnKind {
    /// Infer the kind from the non-missing cells.
    ///
    /// A column with no values at all is numeric (every cell is a missing float).
    pub fn infer(cells: &[CellValue]) -> Self {
        let mut kind: Option<ColumnKind> = None;

        for cell in cells {
            let cell_kind = match cell {
                CellValue::Empty => continue,
                CellValue::Number(_) => ColumnKind::Numeric,
                CellValue::Bool(_) => ColumnKind::Boolean,
                CellValue::DateTime(_) => ColumnKind::DateTime,
                CellValue::Text(_) => return ColumnKind::Text,
            };
            match kind {
                None => kind = Some(cell_kind),
                Some(k) if k != cell_kind => return ColumnKind::Text,
                Some(_) => {}
            }
        }

        kind.unwrap_or(ColumnKind::Numeric)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}
