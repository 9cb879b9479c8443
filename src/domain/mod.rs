pub mod analysis_config;
pub mod error;
pub mod report;
pub mod tier;

// Spreadsheet table model
pub mod table;
