//! Audit trace models.
//!
//! Every payroll rule records an [`AuditStep`] describing its input, output
//! and reasoning, so a stored payroll can be explained line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use hrms_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "gosi_contribution".to_string(),
///     rule_name: "GOSI Contribution".to_string(),
///     input: serde_json::json!({"gosi_calculation_base": "5000"}),
///     output: serde_json::json!({"gosi_employee": "500", "gosi_employer": "600"}),
///     reasoning: "Saudi national: employee 10%, employer 12%".to_string(),
/// };
/// assert_eq!(step.rule_id, "gosi_contribution");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention (e.g. a net salary below zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    #[serde(default)]
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step, renumbering it to follow the existing steps.
    pub fn push(&mut self, mut step: AuditStep) {
        step.step_number = self.steps.len() as u32 + 1;
        self.steps.push(step);
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(AuditWarning {
            code: code.into(),
            message: message.into(),
        });
    }
}
