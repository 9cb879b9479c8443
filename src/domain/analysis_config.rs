use serde::{Deserialize, Serialize};
use validator::Validate;

/// Variance level is `High` when the revenue deviation exceeds this share of its mean.
pub const VARIANCE_THRESHOLD_RATIO: f64 = 0.2;

/// Name token that marks a column for datetime coercion.
pub const DATE_COLUMN_TOKEN: &str = "date";

/// Which standard deviation formula feeds the variance flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationKind {
    /// Divides by `n - 1` (dataframe default)
    #[default]
    Sample,
    /// Divides by `n`
    Population,
}

impl DeviationKind {
    /// Delta degrees of freedom
    pub fn ddof(&self) -> usize {
        match self {
            DeviationKind::Sample => 1,
            DeviationKind::Population => 0,
        }
    }
}

/// Explicit mapping of logical KPI roles to column names.
///
/// An unset role falls back to column position among the numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub profit: Option<String>,
}

impl ColumnRoles {
    /// Roles from `other` win over `self` where set.
    pub fn overridden_by(&self, other: &ColumnRoles) -> ColumnRoles {
        ColumnRoles {
            revenue: other.revenue.clone().or_else(|| self.revenue.clone()),
            profit: other.profit.clone().or_else(|| self.profit.clone()),
        }
    }
}

/// Knobs for the analysis pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub roles: ColumnRoles,

    #[serde(default)]
    pub deviation: DeviationKind,

    /// Periods projected by the plus-tier trend forecast
    #[validate(range(min = 1, max = 60))]
    pub forecast_horizon: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            roles: ColumnRoles::default(),
            deviation: DeviationKind::Sample,
            forecast_horizon: 3,
        }
    }
}
