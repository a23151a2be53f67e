//! Configuration types for the HRMS engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a configuration directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AssigneeRole, TaskPriority, TaskType};

/// GOSI contribution rates and the contribution base ceiling.
#[derive(Debug, Clone, Deserialize)]
pub struct GosiRates {
    /// Employee share for Saudi nationals (e.g. 0.10).
    pub saudi_employee_rate: Decimal,
    /// Employer share for Saudi nationals (e.g. 0.12).
    pub saudi_employer_rate: Decimal,
    /// Employee share for non-Saudi employees.
    pub non_saudi_employee_rate: Decimal,
    /// Employer share for non-Saudi employees (occupational hazards).
    pub non_saudi_employer_rate: Decimal,
    /// Maximum monthly salary on which contributions are charged.
    pub max_contribution_base: Decimal,
}

/// Payroll settings from payroll.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Working days used to derive the daily rate (30 under Saudi practice).
    pub working_days_per_month: Decimal,
    /// Working hours per day used to derive the hourly rate.
    pub hours_per_day: Decimal,
    /// Overtime premium multiplier.
    pub overtime_multiplier: Decimal,
    /// GOSI contribution rates.
    pub gosi: GosiRates,
    /// Nationality spellings treated as Saudi.
    pub saudi_nationalities: Vec<String>,
}

/// Amounts at which loan and travel requests need additional approval tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalThresholds {
    /// Loans at or above this amount need HR approval.
    pub loan_hr_threshold: Decimal,
    /// Loans at or above this amount need senior management approval.
    pub loan_senior_management_threshold: Decimal,
    /// Trips costing at least this much need finance approval.
    pub travel_finance_threshold: Decimal,
}

/// One item of the onboarding template.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingTemplateItem {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Category.
    pub task_type: TaskType,
    /// Who completes the task.
    pub assignee_role: AssigneeRole,
    /// Priority.
    pub priority: TaskPriority,
    /// Offset in days from the start date.
    pub day_number: u32,
}

/// The onboarding checklist from onboarding.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingTemplate {
    /// Checklist identifier stamped on created tasks.
    pub checklist_id: String,
    /// Checklist name.
    pub name: String,
    /// Template items in display order.
    pub tasks: Vec<OnboardingTemplateItem>,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for one government platform.
#[derive(Debug, Clone, Deserialize)]
pub struct GovApiConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token. Usually supplied through the environment.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Integration settings from integrations.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationsConfig {
    /// Establishment number registered with MHRSD, printed on wage files.
    pub establishment_id: String,
    /// QIWA connection.
    pub qiwa: GovApiConfig,
    /// SINAD (WPS) connection.
    pub sinad: GovApiConfig,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct HrmsConfig {
    payroll: PayrollConfig,
    approvals: ApprovalThresholds,
    onboarding: OnboardingTemplate,
    integrations: IntegrationsConfig,
}

impl HrmsConfig {
    /// Creates a new HrmsConfig from its component parts.
    pub fn new(
        payroll: PayrollConfig,
        approvals: ApprovalThresholds,
        onboarding: OnboardingTemplate,
        integrations: IntegrationsConfig,
    ) -> Self {
        let mut onboarding = onboarding;
        onboarding.tasks.sort_by_key(|item| item.day_number);
        Self {
            payroll,
            approvals,
            onboarding,
            integrations,
        }
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollConfig {
        &self.payroll
    }

    /// Returns the approval thresholds.
    pub fn approvals(&self) -> &ApprovalThresholds {
        &self.approvals
    }

    /// Returns the onboarding template, ordered by day number.
    pub fn onboarding(&self) -> &OnboardingTemplate {
        &self.onboarding
    }

    /// Returns the integration settings.
    pub fn integrations(&self) -> &IntegrationsConfig {
        &self.integrations
    }

    pub(crate) fn integrations_mut(&mut self) -> &mut IntegrationsConfig {
        &mut self.integrations
    }
}
