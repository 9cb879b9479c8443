//! Audit trail for report analyses
//!
//! Each plus-tier analysis records one entry:
//! - a random entry id and UTC timestamp
//! - the action and the agent that performed it
//! - a SHA-256 fingerprint of the upload instead of its content

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::Result;
use crate::domain::table::UploadedDocument;

/// Audit log entry for one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub agent: String,
    pub document_sha256: String,
    pub row_count: usize,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        action: impl Into<String>,
        agent: impl Into<String>,
        document: &UploadedDocument,
        row_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            agent: agent.into(),
            document_sha256: document.fingerprint(),
            row_count,
            recorded_at: Utc::now(),
        }
    }
}

/// Destination for audit entries
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry) -> Result<()>;
}

/// Writes audit entries as structured log events on the `audit` target.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &AuditEntry) -> Result<()> {
        info!(
            target: "audit",
            id = %entry.id,
            action = %entry.action,
            agent = %entry.agent,
            document_sha256 = %entry.document_sha256,
            rows = entry.row_count,
            recorded_at = %entry.recorded_at.to_rfc3339(),
            "Audit entry recorded"
        );
        Ok(())
    }
}
