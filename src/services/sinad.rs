//! SINAD wage protection submissions.
//!
//! A wage file moves `generated → validated → submitted → accepted |
//! rejected`. Any failed call leaves the record `failed` with the error text;
//! a failed record can be validated or submitted again.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HrmsError, HrmsResult};
use crate::integrations::{WageFileRow, build_wage_file};
use crate::models::{PayrollMonth, SinadRecord, SinadStatus};
use crate::store::PayrollQuery;

use super::{AuthContext, HrmsContext, new_id};

/// The SINAD operations exposed to admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinadAction {
    /// Build the WPS wage file for a month.
    GenerateWageFile,
    /// Ask SINAD to check a generated file.
    ValidateBeforeSubmit,
    /// Submit a file.
    SubmitToSinad,
    /// Poll the verdict of a submitted file.
    CheckSubmissionStatus,
}

/// A SINAD operation and its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinadCommand {
    /// Operation to run.
    pub action: SinadAction,
    /// Month to generate; required by `generate_wage_file`.
    pub month: Option<PayrollMonth>,
    /// Wage file record; required by every other action.
    pub record_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct WageFilePayload<'a> {
    establishment_id: &'a str,
    file_reference: &'a str,
    month: PayrollMonth,
    employee_count: u32,
    total_amount: Decimal,
    wage_file: &'a str,
}

impl<'a> WageFilePayload<'a> {
    fn new(establishment_id: &'a str, record: &'a SinadRecord) -> Self {
        Self {
            establishment_id,
            file_reference: &record.file_reference,
            month: record.month,
            employee_count: record.employee_count,
            total_amount: record.total_amount,
            wage_file: &record.wage_file,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    compliance_score: Option<Decimal>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    submission_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    compliance_score: Option<Decimal>,
    #[serde(default)]
    errors: Vec<String>,
}

impl StatusResponse {
    fn sinad_status(&self) -> SinadStatus {
        match self.status.to_ascii_lowercase().as_str() {
            "accepted" | "approved" | "processed" => SinadStatus::Accepted,
            "rejected" => SinadStatus::Rejected,
            _ => SinadStatus::Submitted,
        }
    }
}

/// Runs a SINAD action and returns the affected wage file record.
///
/// # Errors
///
/// - [`HrmsError::Forbidden`] unless the caller is an admin.
/// - [`HrmsError::Validation`] for a missing `month` or `record_id`, a month
///   without payroll, a file that was already submitted, a file with
///   outstanding validation errors, or a status check on a file that was
///   never submitted.
/// - [`HrmsError::NotFound`] for an unknown record.
/// - [`HrmsError::ExternalService`] when the SINAD call fails.
pub async fn sinad_action(
    ctx: &HrmsContext,
    auth: &AuthContext,
    command: SinadCommand,
) -> HrmsResult<SinadRecord> {
    auth.require_admin()?;
    info!(action = ?command.action, month = ?command.month, record_id = ?command.record_id, "SINAD action");

    match command.action {
        SinadAction::GenerateWageFile => {
            let month = command
                .month
                .ok_or_else(|| HrmsError::validation("month is required to generate a wage file"))?;
            generate(ctx, auth, month).await
        }
        SinadAction::ValidateBeforeSubmit => validate(ctx, target(ctx, &command).await?).await,
        SinadAction::SubmitToSinad => submit(ctx, target(ctx, &command).await?).await,
        SinadAction::CheckSubmissionStatus => check(ctx, target(ctx, &command).await?).await,
    }
}

async fn target(ctx: &HrmsContext, command: &SinadCommand) -> HrmsResult<SinadRecord> {
    let record_id = command
        .record_id
        .as_deref()
        .ok_or_else(|| HrmsError::validation("record_id is required for this action"))?;
    ctx.store.sinad_records.require(record_id).await
}

async fn generate(
    ctx: &HrmsContext,
    auth: &AuthContext,
    month: PayrollMonth,
) -> HrmsResult<SinadRecord> {
    let payrolls = ctx
        .store
        .payrolls
        .find(&PayrollQuery::new().month(month))
        .await?;

    let mut rows = Vec::with_capacity(payrolls.len());
    for payroll in &payrolls {
        let employee = ctx.store.employees.require(&payroll.employee_id).await?;
        rows.push(WageFileRow::new(payroll, &employee));
    }
    let establishment_id = &ctx.config.integrations().establishment_id;
    let wage_file = build_wage_file(establishment_id, month, &rows)?;

    let record = SinadRecord {
        id: new_id("sinad"),
        month,
        file_reference: wage_file.file_reference,
        employee_count: wage_file.employee_count,
        total_amount: wage_file.total_amount,
        wage_file: wage_file.content,
        status: SinadStatus::Generated,
        submission_id: None,
        compliance_score: None,
        validation_errors: Vec::new(),
        sync_error: None,
        submitted_at: None,
        last_checked_at: None,
        created_by: auth.email().to_string(),
    };
    let record = ctx.store.sinad_records.create(record).await?;

    info!(
        record_id = %record.id,
        month = %month,
        employees = record.employee_count,
        total_amount = %record.total_amount,
        "Wage file generated"
    );
    Ok(record)
}

/// A file SINAD has accepted a submission for is never sent again, whatever
/// its local status.
fn ensure_not_submitted(record: &SinadRecord) -> HrmsResult<()> {
    let submitted = record.submission_id.is_some()
        || matches!(
            record.status,
            SinadStatus::Submitted | SinadStatus::Accepted | SinadStatus::Rejected
        );
    if submitted {
        return Err(HrmsError::validation(format!(
            "wage file {} was already submitted",
            record.id
        )));
    }
    Ok(())
}

/// Records the error, tells the admins and hands back the error.
///
/// A submitted file keeps its status; only files not yet submitted are
/// marked failed.
async fn fail(
    ctx: &HrmsContext,
    mut record: SinadRecord,
    operation: &str,
    error: HrmsError,
) -> HrmsResult<SinadRecord> {
    warn!(record_id = %record.id, operation, error = %error, "SINAD call failed");
    if record.submission_id.is_none() {
        record.status = SinadStatus::Failed;
    }
    record.sync_error = Some(error.to_string());
    let record = ctx.store.sinad_records.update(record).await?;

    ctx.notify_admins(
        &format!("SINAD {operation} failed for {}", record.month),
        &format!(
            "SINAD {operation} of {} failed.\nError: {error}\n",
            record.file_reference
        ),
    )
    .await;
    Err(error)
}

async fn validate(ctx: &HrmsContext, mut record: SinadRecord) -> HrmsResult<SinadRecord> {
    ensure_not_submitted(&record)?;
    let establishment_id = &ctx.config.integrations().establishment_id;
    let result: HrmsResult<ValidationResponse> = ctx
        .sinad
        .post_json(
            "wage-files/validate",
            &WageFilePayload::new(establishment_id, &record),
        )
        .await;
    let response = match result {
        Ok(response) => response,
        Err(error) => return fail(ctx, record, "validation", error).await,
    };

    let mut errors = response.errors;
    if !response.valid && errors.is_empty() {
        errors.push("wage file failed validation".to_string());
    }
    record.compliance_score = response.compliance_score;
    record.validation_errors = errors;
    record.status = SinadStatus::Validated;
    record.sync_error = None;
    let record = ctx.store.sinad_records.update(record).await?;

    info!(
        record_id = %record.id,
        compliance_score = ?record.compliance_score,
        errors = record.validation_errors.len(),
        "Wage file validated"
    );
    Ok(record)
}

async fn submit(ctx: &HrmsContext, mut record: SinadRecord) -> HrmsResult<SinadRecord> {
    ensure_not_submitted(&record)?;
    if !record.validation_errors.is_empty() {
        return Err(HrmsError::validation(format!(
            "wage file {} has {} validation errors",
            record.id,
            record.validation_errors.len()
        )));
    }

    let establishment_id = &ctx.config.integrations().establishment_id;
    let result: HrmsResult<SubmissionResponse> = ctx
        .sinad
        .post_json("wage-files", &WageFilePayload::new(establishment_id, &record))
        .await;
    let response = match result {
        Ok(response) => response,
        Err(error) => return fail(ctx, record, "submission", error).await,
    };

    record.submission_id = Some(response.submission_id);
    record.status = SinadStatus::Submitted;
    record.submitted_at = Some(Utc::now());
    record.sync_error = None;
    let record = ctx.store.sinad_records.update(record).await?;

    info!(
        record_id = %record.id,
        submission_id = ?record.submission_id,
        "Wage file submitted"
    );
    ctx.notify_admins(
        &format!("SINAD wage file submitted for {}", record.month),
        &format!(
            "{} ({} employees, {} SAR) was submitted.\nSubmission id: {}\n",
            record.file_reference,
            record.employee_count,
            record.total_amount,
            record.submission_id.as_deref().unwrap_or_default()
        ),
    )
    .await;
    Ok(record)
}

async fn check(ctx: &HrmsContext, mut record: SinadRecord) -> HrmsResult<SinadRecord> {
    let submission_id = record.submission_id.clone().ok_or_else(|| {
        HrmsError::validation(format!("wage file {} has not been submitted", record.id))
    })?;

    let result: HrmsResult<StatusResponse> = ctx
        .sinad
        .get_json(&format!("wage-files/{submission_id}"))
        .await;
    let response = match result {
        Ok(response) => response,
        Err(error) => return fail(ctx, record, "status check", error).await,
    };

    let previous = record.status;
    record.status = response.sinad_status();
    if response.compliance_score.is_some() {
        record.compliance_score = response.compliance_score;
    }
    if !response.errors.is_empty() {
        record.validation_errors = response.errors;
    }
    record.sync_error = None;
    record.last_checked_at = Some(Utc::now());
    let record = ctx.store.sinad_records.update(record).await?;

    info!(
        record_id = %record.id,
        submission_id = %submission_id,
        status = ?record.status,
        "Wage file status checked"
    );
    if record.status != previous
        && matches!(record.status, SinadStatus::Accepted | SinadStatus::Rejected)
    {
        ctx.notify_admins(
            &format!("SINAD wage file {:?} for {}", record.status, record.month),
            &format!(
                "{} was {:?} by SINAD.\nCompliance score: {}\n",
                record.file_reference,
                record.status,
                record
                    .compliance_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "n/a".to_string())
            ),
        )
        .await;
    }
    Ok(record)
}
