//! Typed per-entity queries.
//!
//! Each entity gets a query struct whose fields are optional criteria, built
//! with chained setters:
//!
//! ```
//! use hrms_engine::models::{EmployeeStatus, PayrollMonth};
//! use hrms_engine::store::{AttendanceQuery, EmployeeQuery};
//!
//! let active = EmployeeQuery::new().status(EmployeeStatus::Active);
//! let january = AttendanceQuery::new()
//!     .employee_id("emp_001")
//!     .month("2025-01".parse::<PayrollMonth>().unwrap());
//! assert!(active.ids.is_none());
//! assert!(january.month.is_some());
//! ```

use crate::models::{
    AttendanceRecord, BenefitEnrollment, Bonus, Deduction, DeductionType, Employee,
    EmployeeStatus, EnrollmentStatus, LeaveAccrual, LeaveAccrualPolicy, LeaveBalance,
    LeaveRequest, LeaveType, LoanRequest, OnboardingTask, Payroll, PayrollMonth, PayrollStatus,
    QiwaRecord, RepaymentStatus, SinadRecord, SinadStatus, SyncStatus, TaskStatus, TravelRequest,
    User, UserRole,
};
use crate::workflow::RequestStatus;

use super::repository::{Entity, RecordQuery};

/// Declares a query struct, its setters, and its [`RecordQuery`] impl.
///
/// Each criterion is written `field: Type => |value, record| predicate`.
macro_rules! record_query {
    (
        $(#[$meta:meta])*
        $name:ident for $entity:ty {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty => |$value:ident, $record:ident| $predicate:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            /// A query matching every record.
            pub fn new() -> Self {
                Self::default()
            }

            $(
                #[doc = concat!("Restricts `", stringify!($field), "`.")]
                pub fn $field(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*
        }

        impl RecordQuery<$entity> for $name {
            fn matches(&self, record: &$entity) -> bool {
                $(
                    self.$field.as_ref().is_none_or(|$value| {
                        let $record = record;
                        $predicate
                    }) &&
                )* true
            }
        }
    };
}

record_query! {
    /// Filters login accounts.
    UserQuery for User {
        /// Login e-mail, compared case-insensitively.
        email: String => |v, r| r.email.eq_ignore_ascii_case(v),
        /// Account role.
        role: UserRole => |v, r| r.role == *v,
        /// Department, compared case-insensitively.
        department: String => |v, r| r.in_department(v),
    }
}

record_query! {
    /// Filters employees.
    EmployeeQuery for Employee {
        /// Any of these identifiers.
        ids: Vec<String> => |v, r| v.contains(&r.id),
        /// Employment status.
        status: EmployeeStatus => |v, r| r.status == *v,
        /// Work e-mail, compared case-insensitively.
        email: String => |v, r| r.email.eq_ignore_ascii_case(v),
        /// Direct manager's employee id.
        manager_id: String => |v, r| r.manager_id.as_deref() == Some(v.as_str()),
    }
}

record_query! {
    /// Filters attendance records.
    AttendanceQuery for AttendanceRecord {
        /// Owning employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Records dated inside this month.
        month: PayrollMonth => |v, r| v.contains_date(r.date),
    }
}

record_query! {
    /// Filters payroll records.
    PayrollQuery for Payroll {
        /// Paid employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Payroll month.
        month: PayrollMonth => |v, r| r.month == *v,
        /// Lifecycle status.
        status: PayrollStatus => |v, r| r.status == *v,
    }
}

record_query! {
    /// Filters one-off deductions.
    DeductionQuery for Deduction {
        /// Charged employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Month applied.
        month: PayrollMonth => |v, r| r.month == *v,
        /// Category.
        deduction_type: DeductionType => |v, r| r.deduction_type == *v,
    }
}

record_query! {
    /// Filters bonus and commission records.
    BonusQuery for Bonus {
        /// Paid employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Month paid.
        month: PayrollMonth => |v, r| r.month == *v,
    }
}

record_query! {
    /// Filters benefit enrollments.
    BenefitEnrollmentQuery for BenefitEnrollment {
        /// Enrolled employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Enrollment status.
        status: EnrollmentStatus => |v, r| r.status == *v,
    }
}

record_query! {
    /// Filters leave requests.
    LeaveRequestQuery for LeaveRequest {
        /// Requesting employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Leave category.
        leave_type: LeaveType => |v, r| r.leave_type == *v,
        /// Overall request status.
        status: RequestStatus => |v, r| r.approval.status == *v,
    }
}

record_query! {
    /// Filters loan requests.
    LoanRequestQuery for LoanRequest {
        /// Requesting employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Overall request status.
        status: RequestStatus => |v, r| r.approval.status == *v,
        /// Repayment state.
        repayment_status: RepaymentStatus => |v, r| r.repayment_status == *v,
    }
}

record_query! {
    /// Filters travel requests.
    TravelRequestQuery for TravelRequest {
        /// Travelling employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Overall request status.
        status: RequestStatus => |v, r| r.approval.status == *v,
    }
}

record_query! {
    /// Filters leave balances.
    LeaveBalanceQuery for LeaveBalance {
        /// Owning employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Leave category.
        leave_type: LeaveType => |v, r| r.leave_type == *v,
        /// Calendar year.
        year: i32 => |v, r| r.year == *v,
    }
}

record_query! {
    /// Filters accrual policies.
    LeaveAccrualPolicyQuery for LeaveAccrualPolicy {
        /// Active flag.
        is_active: bool => |v, r| r.is_active == *v,
        /// Leave category credited.
        leave_type: LeaveType => |v, r| r.leave_type == *v,
    }
}

record_query! {
    /// Filters accrual audit records.
    LeaveAccrualQuery for LeaveAccrual {
        /// Credited employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Applied policy.
        policy_id: String => |v, r| r.policy_id == *v,
        /// Accrual period.
        accrual_period: PayrollMonth => |v, r| r.accrual_period == *v,
    }
}

record_query! {
    /// Filters onboarding tasks.
    OnboardingTaskQuery for OnboardingTask {
        /// New hire.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Task status.
        status: TaskStatus => |v, r| r.status == *v,
    }
}

record_query! {
    /// Filters QIWA mirrors.
    QiwaRecordQuery for QiwaRecord {
        /// Mirrored employee.
        employee_id: String => |v, r| r.employee_id == *v,
        /// Outcome of the last call.
        sync_status: SyncStatus => |v, r| r.sync_status == *v,
    }
}

record_query! {
    /// Filters SINAD wage file records.
    SinadRecordQuery for SinadRecord {
        /// Payroll month covered.
        month: PayrollMonth => |v, r| r.month == *v,
        /// Lifecycle status.
        status: SinadStatus => |v, r| r.status == *v,
    }
}

macro_rules! entity {
    ($entity:ty, $name:literal, $query:ty) => {
        impl Entity for $entity {
            const NAME: &'static str = $name;
            type Query = $query;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

entity!(User, "User", UserQuery);
entity!(Employee, "Employee", EmployeeQuery);
entity!(AttendanceRecord, "AttendanceRecord", AttendanceQuery);
entity!(Payroll, "Payroll", PayrollQuery);
entity!(Deduction, "Deduction", DeductionQuery);
entity!(Bonus, "Bonus", BonusQuery);
entity!(BenefitEnrollment, "BenefitEnrollment", BenefitEnrollmentQuery);
entity!(LeaveRequest, "LeaveRequest", LeaveRequestQuery);
entity!(LoanRequest, "LoanRequest", LoanRequestQuery);
entity!(TravelRequest, "TravelRequest", TravelRequestQuery);
entity!(LeaveBalance, "LeaveBalance", LeaveBalanceQuery);
entity!(LeaveAccrualPolicy, "LeaveAccrualPolicy", LeaveAccrualPolicyQuery);
entity!(LeaveAccrual, "LeaveAccrual", LeaveAccrualQuery);
entity!(OnboardingTask, "OnboardingTask", OnboardingTaskQuery);
entity!(QiwaRecord, "QiwaRecord", QiwaRecordQuery);
entity!(SinadRecord, "SinadRecord", SinadRecordQuery);
