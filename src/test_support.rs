//! Shared fixtures for unit tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::{GosiRates, PayrollConfig};
use crate::models::{
    Employee, EmployeeStatus, EmploymentType, LeaveRequest, LeaveType, LoanRequest,
    RepaymentStatus,
};
use crate::workflow::{ApprovalState, ApprovalTier};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn payroll_config() -> PayrollConfig {
    PayrollConfig {
        working_days_per_month: dec("30"),
        hours_per_day: dec("8"),
        overtime_multiplier: dec("1.5"),
        gosi: GosiRates {
            saudi_employee_rate: dec("0.10"),
            saudi_employer_rate: dec("0.12"),
            non_saudi_employee_rate: Decimal::ZERO,
            non_saudi_employer_rate: dec("0.02"),
            max_contribution_base: dec("45000"),
        },
        saudi_nationalities: vec!["Saudi".to_string(), "Saudi Arabian".to_string()],
    }
}

/// Active full-time employee: basic 5000, housing 1250, transport 500,
/// hired 2023-06-01.
pub fn employee(id: &str, nationality: &str) -> Employee {
    Employee {
        id: id.to_string(),
        full_name: format!("Employee {id}"),
        email: format!("{id}@example.sa"),
        national_id: "1012345678".to_string(),
        nationality: nationality.to_string(),
        status: EmployeeStatus::Active,
        hire_date: date(2023, 6, 1),
        employment_type: EmploymentType::FullTime,
        department: Some("Finance".to_string()),
        job_title: Some("Accountant".to_string()),
        manager_id: None,
        basic_salary: dec("5000"),
        housing_allowance: dec("1250"),
        transport_allowance: dec("500"),
        other_allowances: Decimal::ZERO,
        gosi_salary_basis: None,
        iban: Some("SA0380000000608010167519".to_string()),
        bank_name: Some("Al Rajhi Bank".to_string()),
        iqama_number: None,
    }
}

/// Pending leave request awaiting the manager.
pub fn leave_request(
    id: &str,
    employee_id: &str,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LeaveRequest {
    LeaveRequest {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        leave_type,
        start_date,
        end_date,
        total_days: Decimal::from((end_date - start_date).num_days() + 1),
        reason: None,
        approval: ApprovalState::new(ApprovalTier::Manager),
    }
}

/// Pending loan awaiting the manager, repayment not started.
pub fn loan(id: &str, employee_id: &str, amount: &str, months: u32) -> LoanRequest {
    let amount = dec(amount);
    LoanRequest {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        amount_requested: amount,
        installment_months: months,
        monthly_installment: (amount / Decimal::from(months)).round_dp(2),
        remaining_balance: Decimal::ZERO,
        repayment_status: RepaymentStatus::NotStarted,
        purpose: None,
        approval: ApprovalState::new(ApprovalTier::Manager),
    }
}
