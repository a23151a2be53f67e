//! Employee model and related types.
//!
//! This module defines the [`Employee`] record with its identity, employment
//! and compensation fields, and the enums describing employment status and
//! arrangement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent full-time employment.
    FullTime,
    /// Permanent part-time employment.
    PartTime,
    /// Fixed-term contract.
    Contract,
    /// Temporary or seasonal employment.
    Temporary,
    /// Internship or trainee program.
    Intern,
}

/// Lifecycle status of an employee record.
///
/// Employees are never deleted; they are retired through this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed and included in payroll and accrual runs.
    Active,
    /// On extended leave.
    OnLeave,
    /// Temporarily suspended.
    Suspended,
    /// Employment terminated by the employer.
    Terminated,
    /// Employee resigned.
    Resigned,
}

/// Represents an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name as printed on payslips.
    pub full_name: String,
    /// Work e-mail; links the employee to a [`crate::models::User`] login.
    pub email: String,
    /// National identity number.
    pub national_id: String,
    /// Nationality as recorded by HR (e.g. "Saudi", "Egyptian").
    pub nationality: String,
    /// Employment status.
    pub status: EmployeeStatus,
    /// First day of employment.
    pub hire_date: NaiveDate,
    /// Employment arrangement.
    pub employment_type: EmploymentType,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title.
    #[serde(default)]
    pub job_title: Option<String>,
    /// Employee id of the direct manager.
    #[serde(default)]
    pub manager_id: Option<String>,
    /// Monthly basic salary in SAR.
    pub basic_salary: Decimal,
    /// Monthly housing allowance in SAR.
    #[serde(default)]
    pub housing_allowance: Decimal,
    /// Monthly transport allowance in SAR.
    #[serde(default)]
    pub transport_allowance: Decimal,
    /// Any other fixed monthly allowances in SAR.
    #[serde(default)]
    pub other_allowances: Decimal,
    /// Explicit GOSI contribution base; basic salary is used when absent.
    #[serde(default)]
    pub gosi_salary_basis: Option<Decimal>,
    /// Salary IBAN.
    #[serde(default)]
    pub iban: Option<String>,
    /// Bank name.
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Iqama (residence permit) number for non-Saudi employees.
    #[serde(default)]
    pub iqama_number: Option<String>,
}

impl Employee {
    /// Returns true if the employee's nationality is one of the accepted
    /// spellings of Saudi.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrms_engine::models::{Employee, EmployeeStatus, EmploymentType};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     full_name: "Sara Al-Qahtani".to_string(),
    ///     email: "sara@example.sa".to_string(),
    ///     national_id: "1012345678".to_string(),
    ///     nationality: "saudi".to_string(),
    ///     status: EmployeeStatus::Active,
    ///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    ///     employment_type: EmploymentType::FullTime,
    ///     department: None,
    ///     job_title: None,
    ///     manager_id: None,
    ///     basic_salary: Decimal::new(5000, 0),
    ///     housing_allowance: Decimal::ZERO,
    ///     transport_allowance: Decimal::ZERO,
    ///     other_allowances: Decimal::ZERO,
    ///     gosi_salary_basis: None,
    ///     iban: None,
    ///     bank_name: None,
    ///     iqama_number: None,
    /// };
    /// assert!(employee.is_saudi(&["Saudi".to_string()]));
    /// ```
    pub fn is_saudi(&self, saudi_nationalities: &[String]) -> bool {
        let nationality = self.nationality.trim();
        saudi_nationalities
            .iter()
            .any(|n| n.eq_ignore_ascii_case(nationality))
    }

    /// Returns true if the employee is active.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Sum of the fixed monthly allowances.
    pub fn total_allowances(&self) -> Decimal {
        self.housing_allowance + self.transport_allowance + self.other_allowances
    }
}
