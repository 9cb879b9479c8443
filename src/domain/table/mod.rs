// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// In-memory spreadsheet model shared by every analysis tier
// No I/O, no async

mod cell;
mod column;
mod upload;

pub use cell::{CellValue, ColumnKind};
pub use column::{Column, Table};
pub use upload::{FileFormat, UploadedDocument};
