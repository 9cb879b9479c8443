//! Report payloads returned by the analysis tiers.
//!
//! Field names on the wire follow the published response shape (`"Total Revenue"`,
//! `"SOX_Controls"`, ...), so most structs rename every field explicitly.

use serde::{Serialize, Serializer};
use std::fmt;

/// Categorical flag for revenue dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VarianceLevel {
    High,
    Normal,
}

impl VarianceLevel {
    /// `High` iff `std_dev > ratio * mean`; undefined inputs are `Normal`.
    pub fn classify(std_dev: Option<f64>, mean: Option<f64>, ratio: f64) -> Self {
        match (std_dev, mean) {
            (Some(sd), Some(m)) if sd > ratio * m => VarianceLevel::High,
            _ => VarianceLevel::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceLevel::High => "High",
            VarianceLevel::Normal => "Normal",
        }
    }
}

impl fmt::Display for VarianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate metrics over the revenue and profit columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    #[serde(rename = "Total Revenue")]
    pub total_revenue: f64,

    #[serde(rename = "Total Profit")]
    pub total_profit: f64,

    #[serde(rename = "Cost Variance Level")]
    pub variance_level: VarianceLevel,

    #[serde(skip)]
    pub revenue_column: String,

    #[serde(skip)]
    pub profit_column: String,

    #[serde(skip)]
    pub revenue_mean: Option<f64>,

    #[serde(skip)]
    pub revenue_std_dev: Option<f64>,
}

/// Whether a control outcome came from a real evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleBasis {
    /// Fixed value standing in for a rule nobody has written yet
    NotImplemented,
    Evaluated,
}

/// A control result. Serializes as the bare value.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome<T> {
    pub value: T,
    pub basis: RuleBasis,
}

impl<T> RuleOutcome<T> {
    pub fn placeholder(value: T) -> Self {
        Self {
            value,
            basis: RuleBasis::NotImplemented,
        }
    }

    pub fn evaluated(value: T) -> Self {
        Self {
            value,
            basis: RuleBasis::Evaluated,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.basis == RuleBasis::NotImplemented
    }
}

impl<T: Serialize> Serialize for RuleOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

/// SOX-style control indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    #[serde(rename = "SegregationOfDuties")]
    pub segregation_of_duties: RuleOutcome<&'static str>,

    #[serde(rename = "ApprovalMatrix")]
    pub approval_matrix: RuleOutcome<&'static str>,

    #[serde(rename = "SignOffLog")]
    pub sign_off_log: RuleOutcome<&'static str>,

    #[serde(rename = "AuditTrailAvailable")]
    pub audit_trail_available: RuleOutcome<bool>,
}

impl ComplianceReport {
    /// True when no control has a real rule behind it
    pub fn is_placeholder(&self) -> bool {
        self.segregation_of_duties.is_placeholder()
            && self.approval_matrix.is_placeholder()
            && self.sign_off_log.is_placeholder()
            && self.audit_trail_available.is_placeholder()
    }
}

/// Premium forecast block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    #[serde(rename = "12-Month Projection")]
    pub twelve_month_projection: RuleOutcome<&'static str>,

    #[serde(rename = "Next Quarter Risk")]
    pub next_quarter_risk: RuleOutcome<&'static str>,

    #[serde(rename = "NarrativeSummary")]
    pub narrative_summary: String,
}

/// Plus-tier linear trend over the revenue column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendForecast {
    #[serde(rename = "Method")]
    pub method: &'static str,

    #[serde(rename = "Periods Observed")]
    pub periods_observed: usize,

    #[serde(rename = "Slope")]
    pub slope: Option<f64>,

    #[serde(rename = "Intercept")]
    pub intercept: Option<f64>,

    #[serde(rename = "Next Period Estimate")]
    pub next_period_estimate: Option<f64>,

    #[serde(rename = "Projection")]
    pub projection: Vec<f64>,
}

/// Plus-tier structural checks on the loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    #[serde(rename = "Rows")]
    pub rows: usize,

    #[serde(rename = "Columns")]
    pub columns: usize,

    #[serde(rename = "Numeric Columns")]
    pub numeric_columns: Vec<String>,

    #[serde(rename = "Date Columns")]
    pub date_columns: Vec<String>,

    #[serde(rename = "Missing Values")]
    pub missing_values: usize,

    #[serde(rename = "Status")]
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardReport {
    pub status: &'static str,
    pub message: &'static str,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlusReport {
    #[serde(rename = "Validation")]
    pub validation: ValidationSummary,

    #[serde(rename = "KPIs")]
    pub kpis: KpiReport,

    #[serde(rename = "SOX_Controls")]
    pub sox_controls: ComplianceReport,

    #[serde(rename = "Forecast")]
    pub forecast: TrendForecast,

    #[serde(rename = "PDF_Summary_Generated")]
    pub pdf_summary_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremiumReport {
    #[serde(rename = "KPIs")]
    pub kpis: KpiReport,

    #[serde(rename = "SOX_Controls")]
    pub sox_controls: ComplianceReport,

    #[serde(rename = "Forecast")]
    pub forecast: ForecastSummary,
}

/// Response body of one analysis, shaped by the tier that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Standard(StandardReport),
    Plus(PlusReport),
    Premium(PremiumReport),
}
