//! Local mirrors of QIWA and SINAD submission state.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollMonth;

/// Outcome of the last round-trip with an external platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Never synced.
    #[default]
    Pending,
    /// Last call succeeded.
    Synced,
    /// Last call failed; see `sync_error`.
    Failed,
}

/// QIWA registration state of an employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Not registered yet.
    #[default]
    NotRegistered,
    /// Registration submitted, awaiting QIWA.
    Submitted,
    /// Registered on QIWA.
    Registered,
    /// Registration refused.
    Rejected,
}

/// Mirror of an employee's QIWA state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiwaRecord {
    /// Unique identifier.
    pub id: String,
    /// The employee mirrored.
    pub employee_id: String,
    /// Identifier assigned by QIWA.
    #[serde(default)]
    pub qiwa_employee_id: Option<String>,
    /// Registration state.
    #[serde(default)]
    pub registration_status: RegistrationStatus,
    /// Work permit number.
    #[serde(default)]
    pub work_permit_number: Option<String>,
    /// Work permit status as reported by QIWA.
    #[serde(default)]
    pub work_permit_status: Option<String>,
    /// Work permit expiry date.
    #[serde(default)]
    pub work_permit_expiry: Option<NaiveDate>,
    /// Outcome of the last call.
    #[serde(default)]
    pub sync_status: SyncStatus,
    /// Error of the last failed call.
    #[serde(default)]
    pub sync_error: Option<String>,
    /// When the last call completed.
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl QiwaRecord {
    /// A fresh mirror for an employee that has never been synced.
    pub fn new(id: String, employee_id: String) -> Self {
        Self {
            id,
            employee_id,
            qiwa_employee_id: None,
            registration_status: RegistrationStatus::NotRegistered,
            work_permit_number: None,
            work_permit_status: None,
            work_permit_expiry: None,
            sync_status: SyncStatus::Pending,
            sync_error: None,
            last_sync_at: None,
        }
    }
}

/// Lifecycle of a SINAD wage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinadStatus {
    /// Wage file built locally.
    Generated,
    /// Checked by SINAD's validation endpoint.
    Validated,
    /// Submitted, awaiting a verdict.
    Submitted,
    /// Accepted by SINAD.
    Accepted,
    /// Rejected by SINAD.
    Rejected,
    /// The last call failed; see `sync_error`.
    Failed,
}

/// Mirror of a wage file submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinadRecord {
    /// Unique identifier.
    pub id: String,
    /// The payroll month covered.
    pub month: PayrollMonth,
    /// File reference sent to SINAD.
    pub file_reference: String,
    /// Number of salary rows.
    pub employee_count: u32,
    /// Sum of net salaries.
    pub total_amount: Decimal,
    /// The WPS wage file (CSV).
    pub wage_file: String,
    /// Lifecycle status.
    pub status: SinadStatus,
    /// Submission id assigned by SINAD.
    #[serde(default)]
    pub submission_id: Option<String>,
    /// Compliance score (0-100) reported by SINAD.
    #[serde(default)]
    pub compliance_score: Option<Decimal>,
    /// Problems reported by SINAD.
    #[serde(default)]
    pub validation_errors: Vec<String>,
    /// Error of the last failed call.
    #[serde(default)]
    pub sync_error: Option<String>,
    /// When the file was submitted.
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the submission status was last checked.
    #[serde(default)]
    pub last_checked_at: Option<DateTime<Utc>>,
    /// E-mail of the account that generated the file.
    pub created_by: String,
}
