//! Report export for the plus tier.
//!
//! The bundled exporter is a stub: it acknowledges the request and produces no file.

use serde::Serialize;
use tracing::info;

use crate::domain::error::Result;
use crate::domain::report::KpiReport;
use crate::domain::table::Table;

/// Outcome of an export request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReceipt {
    pub generated: bool,
    pub artifact: Option<String>,
}

pub trait ReportExporter: Send + Sync {
    fn export_summary(&self, table: &Table, kpis: &KpiReport) -> Result<ExportReceipt>;
}

/// PDF summary exporter that reports success without rendering anything.
#[derive(Debug, Default)]
pub struct PdfSummaryStub;

impl ReportExporter for PdfSummaryStub {
    fn export_summary(&self, table: &Table, kpis: &KpiReport) -> Result<ExportReceipt> {
        info!(
            rows = table.row_count(),
            revenue_column = %kpis.revenue_column,
            "PDF summary requested (stub, no artifact written)"
        );
        Ok(ExportReceipt {
            generated: true,
            artifact: None,
        })
    }
}
