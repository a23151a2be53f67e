//! Configuration loading and management for the HRMS engine.
//!
//! This module loads payroll rates, approval thresholds, the onboarding
//! template and government API settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hrms_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/saudi").unwrap().into_config();
//! println!("Loan HR threshold: {}", config.approvals().loan_hr_threshold);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApprovalThresholds, GosiRates, GovApiConfig, HrmsConfig, IntegrationsConfig,
    OnboardingTemplate, OnboardingTemplateItem, PayrollConfig,
};
