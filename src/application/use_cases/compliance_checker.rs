use crate::domain::report::{ComplianceReport, RuleOutcome};
use crate::domain::table::Table;

/// SOX control checks.
///
/// None of the controls has a real rule behind it yet: every outcome is a fixed
/// placeholder and the table content is not inspected.
pub struct ComplianceChecker;

impl ComplianceChecker {
    pub fn check(_table: &Table) -> ComplianceReport {
        ComplianceReport {
            segregation_of_duties: RuleOutcome::placeholder("Pass"),
            approval_matrix: RuleOutcome::placeholder("Pass"),
            sign_off_log: RuleOutcome::placeholder("Verified"),
            audit_trail_available: RuleOutcome::placeholder(true),
        }
    }
}
