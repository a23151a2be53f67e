//! Persistence seam for the HRMS engine.
//!
//! Every entity is reached through a [`Repository`] with its own typed query.
//! The [`Store`] bundles one repository per entity and is built once at
//! process start, optionally seeded from a JSON [`Dataset`].

mod memory;
mod query;
mod repository;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{HrmsError, HrmsResult};
use crate::models::{
    AttendanceRecord, BenefitEnrollment, Bonus, Deduction, Employee, LeaveAccrual,
    LeaveAccrualPolicy, LeaveBalance, LeaveRequest, LoanRequest, OnboardingTask, Payroll,
    QiwaRecord, SinadRecord, TravelRequest, User,
};

pub use memory::InMemoryRepository;
pub use query::{
    AttendanceQuery, BenefitEnrollmentQuery, BonusQuery, DeductionQuery, EmployeeQuery,
    LeaveAccrualPolicyQuery, LeaveAccrualQuery, LeaveBalanceQuery, LeaveRequestQuery,
    LoanRequestQuery, OnboardingTaskQuery, PayrollQuery, QiwaRecordQuery, SinadRecordQuery,
    TravelRequestQuery, UserQuery,
};
pub use repository::{Entity, RecordQuery, Repository};

/// Shared handle to a repository of `T`.
pub type Repo<T> = Arc<dyn Repository<T>>;

/// One repository per entity.
#[derive(Clone)]
pub struct Store {
    /// Login accounts.
    pub users: Repo<User>,
    /// Employees.
    pub employees: Repo<Employee>,
    /// Daily attendance.
    pub attendance: Repo<AttendanceRecord>,
    /// Computed payrolls.
    pub payrolls: Repo<Payroll>,
    /// One-off deductions.
    pub deductions: Repo<Deduction>,
    /// Bonuses and commissions.
    pub bonuses: Repo<Bonus>,
    /// Benefit enrollments.
    pub benefit_enrollments: Repo<BenefitEnrollment>,
    /// Leave requests.
    pub leave_requests: Repo<LeaveRequest>,
    /// Loan requests.
    pub loan_requests: Repo<LoanRequest>,
    /// Travel requests.
    pub travel_requests: Repo<TravelRequest>,
    /// Leave balances.
    pub leave_balances: Repo<LeaveBalance>,
    /// Accrual policies.
    pub accrual_policies: Repo<LeaveAccrualPolicy>,
    /// Accrual audit records.
    pub leave_accruals: Repo<LeaveAccrual>,
    /// Onboarding tasks.
    pub onboarding_tasks: Repo<OnboardingTask>,
    /// QIWA mirrors.
    pub qiwa_records: Repo<QiwaRecord>,
    /// SINAD wage file records.
    pub sinad_records: Repo<SinadRecord>,
}

impl Store {
    /// An empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_dataset(Dataset::default())
    }

    /// An in-memory store holding the records of `dataset`.
    pub fn from_dataset(dataset: Dataset) -> Self {
        fn repo<T: Entity>(records: Vec<T>) -> Repo<T> {
            Arc::new(InMemoryRepository::with_records(records))
        }

        Self {
            users: repo(dataset.users),
            employees: repo(dataset.employees),
            attendance: repo(dataset.attendance),
            payrolls: repo(dataset.payrolls),
            deductions: repo(dataset.deductions),
            bonuses: repo(dataset.bonuses),
            benefit_enrollments: repo(dataset.benefit_enrollments),
            leave_requests: repo(dataset.leave_requests),
            loan_requests: repo(dataset.loan_requests),
            travel_requests: repo(dataset.travel_requests),
            leave_balances: repo(dataset.leave_balances),
            accrual_policies: repo(dataset.accrual_policies),
            leave_accruals: repo(dataset.leave_accruals),
            onboarding_tasks: repo(dataset.onboarding_tasks),
            qiwa_records: repo(dataset.qiwa_records),
            sinad_records: repo(dataset.sinad_records),
        }
    }
}

/// A seed document with records for every entity. Missing lists are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// Login accounts.
    pub users: Vec<User>,
    /// Employees.
    pub employees: Vec<Employee>,
    /// Daily attendance.
    pub attendance: Vec<AttendanceRecord>,
    /// Computed payrolls.
    pub payrolls: Vec<Payroll>,
    /// One-off deductions.
    pub deductions: Vec<Deduction>,
    /// Bonuses and commissions.
    pub bonuses: Vec<Bonus>,
    /// Benefit enrollments.
    pub benefit_enrollments: Vec<BenefitEnrollment>,
    /// Leave requests.
    pub leave_requests: Vec<LeaveRequest>,
    /// Loan requests.
    pub loan_requests: Vec<LoanRequest>,
    /// Travel requests.
    pub travel_requests: Vec<TravelRequest>,
    /// Leave balances.
    pub leave_balances: Vec<LeaveBalance>,
    /// Accrual policies.
    pub accrual_policies: Vec<LeaveAccrualPolicy>,
    /// Accrual audit records.
    pub leave_accruals: Vec<LeaveAccrual>,
    /// Onboarding tasks.
    pub onboarding_tasks: Vec<OnboardingTask>,
    /// QIWA mirrors.
    pub qiwa_records: Vec<QiwaRecord>,
    /// SINAD wage file records.
    pub sinad_records: Vec<SinadRecord>,
}

impl Dataset {
    /// Reads a dataset from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> HrmsResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrmsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_json::from_str(&content).map_err(|e| HrmsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
