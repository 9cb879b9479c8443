pub mod audit_service;
pub mod column_classifier;
pub mod compliance_checker;
pub mod export;
pub mod forecast;
pub mod kpi_calculator;
pub mod report_dispatcher;
