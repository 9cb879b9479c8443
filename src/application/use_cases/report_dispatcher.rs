// ============================================================
// REPORT DISPATCHER USE CASE
// ============================================================
// Route one upload to the pipeline of its tier

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::use_cases::audit_service::{AuditEntry, AuditSink, TracingAuditSink};
use crate::application::use_cases::column_classifier::ColumnClassifier;
use crate::application::use_cases::compliance_checker::ComplianceChecker;
use crate::application::use_cases::export::{PdfSummaryStub, ReportExporter};
use crate::application::use_cases::forecast::{ForecastNarrator, TrendForecaster};
use crate::application::use_cases::kpi_calculator::KpiCalculator;
use crate::domain::analysis_config::{AnalysisConfig, ColumnRoles};
use crate::domain::error::{AppError, Result};
use crate::domain::report::{
    AnalysisResponse, PlusReport, PremiumReport, StandardReport, ValidationSummary,
};
use crate::domain::table::UploadedDocument;
use crate::domain::tier::Tier;
use crate::infrastructure::tabular::TabularLoader;

const AUDIT_ACTION: &str = "analyze";
const PLUS_AGENT: &str = "report_plus";

/// Stateless per request; shared read-only across workers.
pub struct ReportDispatcher {
    config: AnalysisConfig,
    loader: TabularLoader,
    exporter: Arc<dyn ReportExporter>,
    audit: Arc<dyn AuditSink>,
}

impl ReportDispatcher {
    /// Dispatcher with the bundled export stub and tracing audit sink
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(PdfSummaryStub),
            Arc::new(TracingAuditSink),
        )
    }

    pub fn with_collaborators(
        config: AnalysisConfig,
        exporter: Arc<dyn ReportExporter>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            loader: TabularLoader::default(),
            exporter,
            audit,
        }
    }

    /// Run the pipeline for `tier`. `overrides` replace configured column roles where set.
    #[instrument(
        skip_all,
        fields(tier = %tier, filename = %document.filename, bytes = document.len())
    )]
    pub fn analyze(
        &self,
        tier: Tier,
        document: &UploadedDocument,
        overrides: &ColumnRoles,
    ) -> Result<AnalysisResponse> {
        let roles = self.config.roles.overridden_by(overrides);

        let response = match tier {
            Tier::Standard => AnalysisResponse::Standard(self.standard(document)?),
            Tier::Plus => AnalysisResponse::Plus(self.plus(document, &roles)?),
            Tier::Premium => AnalysisResponse::Premium(self.premium(document, &roles)?),
        };

        info!("Analysis complete");
        Ok(response)
    }

    fn standard(&self, document: &UploadedDocument) -> Result<StandardReport> {
        let table = self.loader.load(document, Tier::Standard)?;

        Ok(StandardReport {
            status: "success",
            message: "Standard report processed",
            rows: table.row_count(),
        })
    }

    fn plus(&self, document: &UploadedDocument, roles: &ColumnRoles) -> Result<PlusReport> {
        let table = ColumnClassifier::classify(self.loader.load(document, Tier::Plus)?);
        let numeric = ColumnClassifier::numeric_columns(&table)?;
        let resolved = ColumnClassifier::resolve_roles(&numeric, roles)?;

        let validation = ValidationSummary {
            rows: table.row_count(),
            columns: table.column_count(),
            numeric_columns: numeric.names(),
            date_columns: ColumnClassifier::date_columns(&table),
            missing_values: table.missing_count(),
            status: "Valid",
        };

        let kpis = KpiCalculator::new(self.config.deviation).compute(resolved);
        let sox_controls = ComplianceChecker::check(&table);
        let forecast =
            TrendForecaster::new(self.config.forecast_horizon).forecast(resolved.revenue);

        let entry = AuditEntry::new(AUDIT_ACTION, PLUS_AGENT, document, table.row_count());
        self.audit.record(&entry).map_err(collaborator_failure)?;

        let receipt = self
            .exporter
            .export_summary(&table, &kpis)
            .map_err(collaborator_failure)?;

        Ok(PlusReport {
            validation,
            kpis,
            sox_controls,
            forecast,
            pdf_summary_generated: receipt.generated,
        })
    }

    fn premium(&self, document: &UploadedDocument, roles: &ColumnRoles) -> Result<PremiumReport> {
        let table = ColumnClassifier::classify(self.loader.load(document, Tier::Premium)?);
        let numeric = ColumnClassifier::numeric_columns(&table)?;
        let resolved = ColumnClassifier::resolve_roles(&numeric, roles)?;

        let kpis = KpiCalculator::new(self.config.deviation).compute(resolved);
        let sox_controls = ComplianceChecker::check(&table);
        let forecast = ForecastNarrator::summarize(&kpis);

        Ok(PremiumReport {
            kpis,
            sox_controls,
            forecast,
        })
    }
}

fn collaborator_failure(err: AppError) -> AppError {
    match err {
        AppError::ProcessingFailure(_) => err,
        other => AppError::ProcessingFailure(other.to_string()),
    }
}
