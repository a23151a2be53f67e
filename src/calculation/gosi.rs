//! GOSI (General Organization for Social Insurance) contributions.
//!
//! ## Rate Structure
//!
//! | Nationality | Employee | Employer |
//! |---|---|---|
//! | Saudi | 10% | 12% |
//! | Non-Saudi | 0% | 2% |
//!
//! Contributions are charged on `gosi_salary_basis` when the employee record
//! carries one, otherwise on the basic salary, capped at the configured
//! maximum contribution base.

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::models::{AuditStep, Employee};

/// The result of the GOSI contribution calculation.
#[derive(Debug, Clone)]
pub struct GosiContribution {
    /// Salary the rates were applied to.
    pub calculation_base: Decimal,
    /// Employee share, deducted from salary.
    pub employee_share: Decimal,
    /// Employer share, an employer cost.
    pub employer_share: Decimal,
    /// Whether Saudi rates were applied.
    pub is_saudi: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee and employer GOSI contributions.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_gosi;
/// use hrms_engine::config::ConfigLoader;
/// use hrms_engine::models::{Employee, EmployeeStatus, EmploymentType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("config/saudi").unwrap().into_config();
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     full_name: "Sara Al-Qahtani".to_string(),
///     email: "sara@example.sa".to_string(),
///     national_id: "1012345678".to_string(),
///     nationality: "Saudi".to_string(),
///     status: EmployeeStatus::Active,
///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     employment_type: EmploymentType::FullTime,
///     department: None,
///     job_title: None,
///     manager_id: None,
///     basic_salary: Decimal::new(5000, 0),
///     housing_allowance: Decimal::new(1250, 0),
///     transport_allowance: Decimal::new(500, 0),
///     other_allowances: Decimal::ZERO,
///     gosi_salary_basis: None,
///     iban: None,
///     bank_name: None,
///     iqama_number: None,
/// };
///
/// let gosi = calculate_gosi(&employee, config.payroll(), 1);
/// assert_eq!(gosi.employee_share, Decimal::new(500, 0));
/// assert_eq!(gosi.employer_share, Decimal::new(600, 0));
/// ```
pub fn calculate_gosi(employee: &Employee, config: &PayrollConfig, step_number: u32) -> GosiContribution {
    let rates = &config.gosi;
    let declared_base = employee.gosi_salary_basis.unwrap_or(employee.basic_salary);
    let calculation_base = declared_base
        .min(rates.max_contribution_base)
        .max(Decimal::ZERO);
    let capped = calculation_base < declared_base;

    let is_saudi = employee.is_saudi(&config.saudi_nationalities);
    let (employee_rate, employer_rate) = if is_saudi {
        (rates.saudi_employee_rate, rates.saudi_employer_rate)
    } else {
        (rates.non_saudi_employee_rate, rates.non_saudi_employer_rate)
    };

    let employee_share = (calculation_base * employee_rate).round_dp(2);
    let employer_share = (calculation_base * employer_rate).round_dp(2);

    let audit_step = AuditStep {
        step_number,
        rule_id: "gosi_contribution".to_string(),
        rule_name: "GOSI Contribution".to_string(),
        input: serde_json::json!({
            "nationality": employee.nationality,
            "gosi_salary_basis": employee.gosi_salary_basis.map(|b| b.to_string()),
            "basic_salary": employee.basic_salary.to_string(),
            "max_contribution_base": rates.max_contribution_base.to_string()
        }),
        output: serde_json::json!({
            "gosi_calculation_base": calculation_base.to_string(),
            "employee_rate": employee_rate.to_string(),
            "employer_rate": employer_rate.to_string(),
            "gosi_employee": employee_share.to_string(),
            "gosi_employer": employer_share.to_string()
        }),
        reasoning: format!(
            "{} rates on base {}{}: employee {} × {} = {}, employer {} × {} = {}",
            if is_saudi { "Saudi" } else { "Non-Saudi" },
            calculation_base,
            if capped { " (capped)" } else { "" },
            calculation_base,
            employee_rate,
            employee_share,
            calculation_base,
            employer_rate,
            employer_share
        ),
    };

    GosiContribution {
        calculation_base,
        employee_share,
        employer_share,
        is_saudi,
        audit_step,
    }
}
