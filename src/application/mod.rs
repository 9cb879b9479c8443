pub mod use_cases;

pub use use_cases::audit_service::{AuditEntry, AuditSink, TracingAuditSink};
pub use use_cases::export::{ExportReceipt, PdfSummaryStub, ReportExporter};
pub use use_cases::report_dispatcher::ReportDispatcher;
