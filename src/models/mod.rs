//! Core data models for the HRMS engine.
//!
//! This module contains the entities persisted through [`crate::store`] and
//! the value types shared by the calculation rules and services.

mod accrual;
mod attendance;
mod audit;
mod employee;
mod government;
mod leave;
mod loan;
mod onboarding;
mod payroll;
mod period;
mod travel;
mod user;

pub use accrual::{LeaveAccrual, LeaveAccrualPolicy};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use employee::{Employee, EmployeeStatus, EmploymentType};
pub use government::{QiwaRecord, RegistrationStatus, SinadRecord, SinadStatus, SyncStatus};
pub use leave::{LeaveBalance, LeaveRequest, LeaveType};
pub use loan::{LoanRequest, RepaymentStatus};
pub use onboarding::{AssigneeRole, OnboardingTask, TaskPriority, TaskStatus, TaskType};
pub use payroll::{
    BenefitEnrollment, Bonus, BonusType, Deduction, DeductionType, EnrollmentStatus, Payroll,
    PayrollStatus,
};
pub use period::PayrollMonth;
pub use travel::TravelRequest;
pub use user::{User, UserRole};
