//! KPI calculator: revenue/profit totals and the cost variance flag.
//!
//! Missing values are skipped in every aggregate, so an all-missing column totals 0 and
//! has no mean.

use crate::application::use_cases::column_classifier::{NumericColumn, RoleColumns};
use crate::domain::analysis_config::{DeviationKind, VARIANCE_THRESHOLD_RATIO};
use crate::domain::report::{KpiReport, VarianceLevel};

pub struct KpiCalculator {
    deviation: DeviationKind,
}

impl KpiCalculator {
    pub fn new(deviation: DeviationKind) -> Self {
        Self { deviation }
    }

    pub fn compute(&self, roles: RoleColumns<'_>) -> KpiReport {
        let total_revenue = sum(roles.revenue);
        let total_profit = sum(roles.profit);
        let revenue_mean = mean(roles.revenue);
        let revenue_std_dev = std_dev(roles.revenue, self.deviation);

        let variance_level =
            VarianceLevel::classify(revenue_std_dev, revenue_mean, VARIANCE_THRESHOLD_RATIO);

        KpiReport {
            total_revenue,
            total_profit,
            variance_level,
            revenue_column: roles.revenue.name.clone(),
            profit_column: roles.profit.name.clone(),
            revenue_mean,
            revenue_std_dev,
        }
    }
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new(DeviationKind::default())
    }
}

pub fn sum(column: &NumericColumn) -> f64 {
    column.present().sum()
}

pub fn mean(column: &NumericColumn) -> Option<f64> {
    let (total, count) = column
        .present()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total / count as f64)
}

/// Two-pass standard deviation; `None` when there are not more observations than `ddof`.
pub fn std_dev(column: &NumericColumn, kind: DeviationKind) -> Option<f64> {
    let count = column.present().count();
    let ddof = kind.ddof();
    if count <= ddof {
        return None;
    }

    let mean = mean(column)?;
    let squares: f64 = column.present().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (count - ddof) as f64).sqrt())
}
