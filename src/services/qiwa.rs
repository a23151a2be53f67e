//! QIWA employee registration and work permit sync.
//!
//! Every call updates the employee's local [`QiwaRecord`] mirror, created on
//! first use. Failed calls leave the mirror `failed` with the error text.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HrmsError, HrmsResult};
use crate::models::{Employee, EmployeeStatus, QiwaRecord, RegistrationStatus, SyncStatus};
use crate::store::{EmployeeQuery, QiwaRecordQuery};

use super::{AuthContext, BatchError, HrmsContext, new_id};

/// The QIWA operations exposed to admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QiwaAction {
    /// Register one employee's contract.
    RegisterEmployee,
    /// Refresh one employee's work permit.
    SyncWorkPermit,
    /// Register every active employee.
    BulkSync,
}

/// A QIWA operation and its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QiwaCommand {
    /// Operation to run.
    pub action: QiwaAction,
    /// Target employee; required by the single-employee actions.
    pub employee_id: Option<String>,
}

/// The result of a bulk registration.
#[derive(Debug, Clone, Serialize)]
pub struct QiwaSyncSummary {
    /// Employees attempted.
    pub processed: usize,
    /// Employees registered successfully.
    pub synced: usize,
    /// Employees whose registration failed.
    pub failed: usize,
    /// Mirrors of the successful registrations.
    pub records: Vec<QiwaRecord>,
    /// One entry per failed employee.
    pub errors: Vec<BatchError>,
}

/// What a QIWA action returns.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QiwaOutcome {
    /// The updated mirror of a single employee.
    Record(QiwaRecord),
    /// The bulk registration summary.
    Bulk(QiwaSyncSummary),
}

#[derive(Debug, Serialize)]
struct RegistrationPayload<'a> {
    establishment_id: &'a str,
    employee_id: &'a str,
    national_id: &'a str,
    iqama_number: Option<&'a str>,
    full_name: &'a str,
    nationality: &'a str,
    job_title: Option<&'a str>,
    hire_date: NaiveDate,
    basic_salary: Decimal,
}

#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    status: String,
    #[serde(default)]
    qiwa_employee_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RegistrationResponse {
    fn registration_status(&self) -> RegistrationStatus {
        match self.status.to_ascii_lowercase().as_str() {
            "registered" | "success" | "active" => RegistrationStatus::Registered,
            "rejected" | "refused" => RegistrationStatus::Rejected,
            _ => RegistrationStatus::Submitted,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkPermitResponse {
    permit_number: String,
    status: String,
    #[serde(default)]
    expiry_date: Option<NaiveDate>,
}

/// Runs a QIWA action.
///
/// Admins are e-mailed the outcome of every action.
///
/// # Errors
///
/// - [`HrmsError::Forbidden`] unless the caller is an admin.
/// - [`HrmsError::Validation`] when a single-employee action has no
///   `employee_id`, or a work permit sync targets an employee without an
///   iqama number.
/// - [`HrmsError::NotFound`] for an unknown employee.
/// - [`HrmsError::ExternalService`] when a single-employee call fails.
pub async fn qiwa_action(
    ctx: &HrmsContext,
    auth: &AuthContext,
    command: QiwaCommand,
) -> HrmsResult<QiwaOutcome> {
    auth.require_admin()?;
    info!(action = ?command.action, employee_id = ?command.employee_id, "QIWA action");

    match command.action {
        QiwaAction::RegisterEmployee => {
            let employee = target(ctx, &command).await?;
            let result = register(ctx, &employee).await;
            report(ctx, "registration", &employee, &result).await;
            result.map(QiwaOutcome::Record)
        }
        QiwaAction::SyncWorkPermit => {
            let employee = target(ctx, &command).await?;
            let iqama = employee.iqama_number.clone().ok_or_else(|| {
                HrmsError::validation(format!("employee {} has no iqama number", employee.id))
            })?;
            let result = sync_work_permit(ctx, &employee, &iqama).await;
            report(ctx, "work permit sync", &employee, &result).await;
            result.map(QiwaOutcome::Record)
        }
        QiwaAction::BulkSync => bulk_sync(ctx).await.map(QiwaOutcome::Bulk),
    }
}

async fn target(ctx: &HrmsContext, command: &QiwaCommand) -> HrmsResult<Employee> {
    let employee_id = command
        .employee_id
        .as_deref()
        .ok_or_else(|| HrmsError::validation("employee_id is required for this action"))?;
    ctx.store.employees.require(employee_id).await
}

/// The employee's mirror and whether it is already stored.
async fn mirror(ctx: &HrmsContext, employee_id: &str) -> HrmsResult<(QiwaRecord, bool)> {
    let existing = ctx
        .store
        .qiwa_records
        .find_one(&QiwaRecordQuery::new().employee_id(employee_id))
        .await?;
    Ok(match existing {
        Some(record) => (record, true),
        None => (QiwaRecord::new(new_id("qiwa"), employee_id.to_string()), false),
    })
}

async fn save(ctx: &HrmsContext, record: QiwaRecord, stored: bool) -> HrmsResult<QiwaRecord> {
    if stored {
        ctx.store.qiwa_records.update(record).await
    } else {
        ctx.store.qiwa_records.create(record).await
    }
}

/// Marks the mirror failed and hands back the original error.
async fn fail(
    ctx: &HrmsContext,
    mut record: QiwaRecord,
    stored: bool,
    error: HrmsError,
) -> HrmsResult<QiwaRecord> {
    warn!(employee_id = %record.employee_id, error = %error, "QIWA call failed");
    record.sync_status = SyncStatus::Failed;
    record.sync_error = Some(error.to_string());
    record.last_sync_at = Some(Utc::now());
    save(ctx, record, stored).await?;
    Err(error)
}

async fn register(ctx: &HrmsContext, employee: &Employee) -> HrmsResult<QiwaRecord> {
    let (mut record, stored) = mirror(ctx, &employee.id).await?;
    let payload = RegistrationPayload {
        establishment_id: &ctx.config.integrations().establishment_id,
        employee_id: &employee.id,
        national_id: &employee.national_id,
        iqama_number: employee.iqama_number.as_deref(),
        full_name: &employee.full_name,
        nationality: &employee.nationality,
        job_title: employee.job_title.as_deref(),
        hire_date: employee.hire_date,
        basic_salary: employee.basic_salary,
    };

    let response: RegistrationResponse = match ctx.qiwa.post_json("employees", &payload).await {
        Ok(response) => response,
        Err(error) => return fail(ctx, record, stored, error).await,
    };

    record.registration_status = response.registration_status();
    if response.qiwa_employee_id.is_some() {
        record.qiwa_employee_id = response.qiwa_employee_id;
    }
    record.sync_status = SyncStatus::Synced;
    record.sync_error = match record.registration_status {
        RegistrationStatus::Rejected => response.message,
        _ => None,
    };
    record.last_sync_at = Some(Utc::now());
    let record = save(ctx, record, stored).await?;

    info!(
        employee_id = %employee.id,
        registration_status = ?record.registration_status,
        "QIWA registration synced"
    );
    Ok(record)
}

async fn sync_work_permit(
    ctx: &HrmsContext,
    employee: &Employee,
    iqama_number: &str,
) -> HrmsResult<QiwaRecord> {
    let (mut record, stored) = mirror(ctx, &employee.id).await?;
    let path = format!("work-permits/{iqama_number}");

    let permit: WorkPermitResponse = match ctx.qiwa.get_json(&path).await {
        Ok(permit) => permit,
        Err(error) => return fail(ctx, record, stored, error).await,
    };

    record.work_permit_number = Some(permit.permit_number);
    record.work_permit_status = Some(permit.status);
    record.work_permit_expiry = permit.expiry_date;
    record.sync_status = SyncStatus::Synced;
    record.sync_error = None;
    record.last_sync_at = Some(Utc::now());
    let record = save(ctx, record, stored).await?;

    info!(
        employee_id = %employee.id,
        work_permit_status = ?record.work_permit_status,
        "QIWA work permit synced"
    );
    Ok(record)
}

async fn bulk_sync(ctx: &HrmsContext) -> HrmsResult<QiwaSyncSummary> {
    let employees = ctx
        .store
        .employees
        .find(&EmployeeQuery::new().status(EmployeeStatus::Active))
        .await?;

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for employee in &employees {
        match register(ctx, employee).await {
            Ok(record) => records.push(record),
            Err(error) => errors.push(BatchError::new(&employee.id, &error)),
        }
    }

    let summary = QiwaSyncSummary {
        processed: employees.len(),
        synced: records.len(),
        failed: errors.len(),
        records,
        errors,
    };
    info!(
        processed = summary.processed,
        synced = summary.synced,
        failed = summary.failed,
        "QIWA bulk sync completed"
    );

    let mut body = format!(
        "QIWA bulk sync finished: {} of {} employees synced.\n",
        summary.synced, summary.processed
    );
    for error in &summary.errors {
        body.push_str(&format!("- {}: {}\n", error.id, error.message));
    }
    ctx.notify_admins("QIWA bulk sync completed", &body).await;
    Ok(summary)
}

async fn report(
    ctx: &HrmsContext,
    operation: &str,
    employee: &Employee,
    result: &HrmsResult<QiwaRecord>,
) {
    let (subject, body) = match result {
        Ok(record) => (
            format!("QIWA {operation} succeeded: {}", employee.full_name),
            format!(
                "QIWA {operation} for {} ({}) completed.\nRegistration status: {:?}\n",
                employee.full_name, employee.id, record.registration_status
            ),
        ),
        Err(error) => (
            format!("QIWA {operation} failed: {}", employee.full_name),
            format!(
                "QIWA {operation} for {} ({}) failed.\nError: {error}\n",
                employee.full_name, employee.id
            ),
        ),
    };
    ctx.notify_admins(&subject, &body).await;
}
