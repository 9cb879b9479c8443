//! Forecast outputs for the plus and premium tiers.
//!
//! Premium gets a templated narrative next to two fixed forward-looking statements.
//! Plus gets a least-squares trend over the revenue column.

use crate::application::use_cases::column_classifier::NumericColumn;
use crate::domain::report::{
    ForecastSummary, KpiReport, RuleOutcome, TrendForecast, VarianceLevel,
};
use crate::shared::number_format::format_thousands;

const TWELVE_MONTH_PROJECTION: &str = "+7.5% CAGR";
const NEXT_QUARTER_RISK: &str = "Moderate - due to cost spikes";
const TREND_METHOD: &str = "linear_trend";

pub struct ForecastNarrator;

impl ForecastNarrator {
    /// Render the narrative paragraph for a reporting period.
    pub fn narrate(revenue: f64, profit: f64, variance_level: VarianceLevel) -> String {
        format!(
            "In this reporting period, total revenue reached {} \
             with a corresponding profit of {}. \
             The system detected a {} variance in cost trends, \
             suggesting the need for variance root cause analysis and stronger controls. \
             Forecast models indicate stable but cautious growth for the next quarter.",
            format_thousands(revenue, 2),
            format_thousands(profit, 2),
            variance_level.as_str().to_lowercase()
        )
    }

    pub fn summarize(kpis: &KpiReport) -> ForecastSummary {
        ForecastSummary {
            twelve_month_projection: RuleOutcome::placeholder(TWELVE_MONTH_PROJECTION),
            next_quarter_risk: RuleOutcome::placeholder(NEXT_QUARTER_RISK),
            narrative_summary: Self::narrate(
                kpis.total_revenue,
                kpis.total_profit,
                kpis.variance_level,
            ),
        }
    }
}

pub struct TrendForecaster {
    horizon: usize,
}

impl TrendForecaster {
    pub fn new(horizon: usize) -> Self {
        Self { horizon }
    }

    /// Fit `value = intercept + slope * row` over the present values and project
    /// `horizon` rows past the last row of the column.
    pub fn forecast(&self, column: &NumericColumn) -> TrendForecast {
        let points: Vec<(f64, f64)> = column
            .values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| v.filter(|v| v.is_finite()).map(|v| (row as f64, v)))
            .collect();

        let fit = fit_line(&points);
        let last_row = column.values.len() as f64 - 1.0;

        let projection: Vec<f64> = match fit {
            Some((intercept, slope)) => (1..=self.horizon)
                .map(|step| intercept + slope * (last_row + step as f64))
                .collect(),
            None => Vec::new(),
        };

        TrendForecast {
            method: TREND_METHOD,
            periods_observed: points.len(),
            slope: fit.map(|(_, slope)| slope),
            intercept: fit.map(|(intercept, _)| intercept),
            next_period_estimate: projection.first().copied(),
            projection,
        }
    }
}

/// Ordinary least squares. Returns `(intercept, slope)`.
fn fit_line(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    match points {
        [] => None,
        [(_, y)] => Some((*y, 0.0)),
        _ => {
            let n = points.len() as f64;
            let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
            let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

            let (cov, var) = points.iter().fold((0.0, 0.0), |(cov, var), (x, y)| {
                let dx = x - mean_x;
                (cov + dx * (y - mean_y), var + dx * dx)
            });

            let slope = if var == 0.0 { 0.0 } else { cov / var };
            Some((mean_y - slope * mean_x, slope))
        }
    }
}
