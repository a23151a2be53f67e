//! Overtime pay and gross salary.
//!
//! ## Rate Structure
//!
//! - Hourly rate: `basic / (working_days_per_month × hours_per_day)`
//! - Overtime pay: `overtime_hours × hourly rate × overtime_multiplier`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::{HrmsError, HrmsResult};
use crate::models::{AuditStep, Bonus, BonusType, Employee, PayrollMonth};

/// The result of the overtime pay calculation.
#[derive(Debug, Clone)]
pub struct OvertimePayResult {
    /// Hourly rate derived from the basic salary.
    pub hourly_rate: Decimal,
    /// Overtime pay, rounded to 2 decimal places.
    pub overtime_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates overtime pay from the monthly basic salary.
///
/// # Errors
///
/// Returns [`HrmsError::CalculationError`] if the configured working days or
/// hours per day are zero.
///
/// # Examples
///
/// ```
/// use hrms_engine::calculation::calculate_overtime_pay;
/// use hrms_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("config/saudi").unwrap().into_config();
/// let result = calculate_overtime_pay(
///     Decimal::new(4800, 0),
///     Decimal::new(10, 0),
///     config.payroll(),
///     1,
/// )
/// .unwrap();
///
/// // 4800 / 240 = 20 per hour; 10 × 20 × 1.5 = 300
/// assert_eq!(result.overtime_pay, Decimal::new(300, 0));
/// ```
pub fn calculate_overtime_pay(
    basic_salary: Decimal,
    overtime_hours: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> HrmsResult<OvertimePayResult> {
    let monthly_hours = config.working_days_per_month * config.hours_per_day;
    if monthly_hours.is_zero() {
        return Err(HrmsError::CalculationError {
            message: "working_days_per_month × hours_per_day must be positive".to_string(),
        });
    }

    let hourly_rate = basic_salary / monthly_hours;
    let overtime_pay =
        (overtime_hours * hourly_rate * config.overtime_multiplier).round_dp(2);

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "overtime_hours": overtime_hours.to_string(),
            "monthly_hours": monthly_hours.to_string(),
            "multiplier": config.overtime_multiplier.to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": hourly_rate.round_dp(4).to_string(),
            "overtime_pay": overtime_pay.to_string()
        }),
        reasoning: format!(
            "{} hours × {} per hour × {} = {}",
            overtime_hours,
            hourly_rate.round_dp(4),
            config.overtime_multiplier,
            overtime_pay
        ),
    };

    Ok(OvertimePayResult {
        hourly_rate,
        overtime_pay,
        audit_step,
    })
}

/// The earning components that make up the gross salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Housing allowance.
    pub housing_allowance: Decimal,
    /// Transport allowance.
    pub transport_allowance: Decimal,
    /// Other fixed allowances.
    pub other_allowances: Decimal,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// One-off bonuses.
    pub bonus: Decimal,
    /// Sales commission.
    pub commission: Decimal,
}

impl Earnings {
    /// Fixed components taken from the employee record.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            basic_salary: employee.basic_salary,
            housing_allowance: employee.housing_allowance,
            transport_allowance: employee.transport_allowance,
            other_allowances: employee.other_allowances,
            ..Earnings::default()
        }
    }

    /// Sum of all components.
    pub fn gross(&self) -> Decimal {
        self.basic_salary
            + self.housing_allowance
            + self.transport_allowance
            + self.other_allowances
            + self.overtime_pay
            + self.bonus
            + self.commission
    }
}

/// Bonus and commission totals for a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariablePay {
    /// Sum of bonus records.
    pub bonus: Decimal,
    /// Sum of commission records.
    pub commission: Decimal,
}

/// Totals the bonus and commission records paid in `month`.
pub fn sum_variable_pay(bonuses: &[Bonus], month: PayrollMonth) -> VariablePay {
    bonuses
        .iter()
        .filter(|b| b.month == month)
        .fold(VariablePay::default(), |mut acc, b| {
            match b.bonus_type {
                BonusType::Bonus => acc.bonus += b.amount,
                BonusType::Commission => acc.commission += b.amount,
            }
            acc
        })
}

/// The result of the gross salary calculation.
#[derive(Debug, Clone)]
pub struct GrossSalaryResult {
    /// Gross salary, rounded to 2 decimal places.
    pub gross_salary: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Sums the earning components into the gross salary.
pub fn calculate_gross_salary(earnings: &Earnings, step_number: u32) -> GrossSalaryResult {
    let gross_salary = earnings.gross().round_dp(2);

    let audit_step = AuditStep {
        step_number,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        input: serde_json::to_value(earnings).unwrap_or_default(),
        output: serde_json::json!({
            "gross_salary": gross_salary.to_string()
        }),
        reasoning: format!(
            "Basic {} + allowances {} + overtime {} + bonus {} + commission {} = {}",
            earnings.basic_salary,
            earnings.housing_allowance + earnings.transport_allowance + earnings.other_allowances,
            earnings.overtime_pay,
            earnings.bonus,
            earnings.commission,
            gross_salary
        ),
    };

    GrossSalaryResult {
        gross_salary,
        audit_step,
    }
}
