//! WPS wage file generation.
//!
//! A wage file is a CSV document: one establishment header record, one
//! column header record, then one record per payroll.

use rust_decimal::Decimal;

use crate::error::{HrmsError, HrmsResult};
use crate::models::{Employee, Payroll, PayrollMonth};

/// Column names of the payroll records.
pub const WAGE_FILE_COLUMNS: [&str; 8] = [
    "employee_id",
    "employee_name",
    "national_id",
    "iban",
    "basic_salary",
    "allowances",
    "deductions",
    "net_salary",
];

/// One employee's line in the wage file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WageFileRow {
    /// Employee identifier.
    pub employee_id: String,
    /// Full name.
    pub employee_name: String,
    /// Iqama number for residents, national id otherwise.
    pub national_id: String,
    /// Salary account IBAN, empty when unknown.
    pub iban: String,
    /// Basic salary.
    pub basic_salary: Decimal,
    /// Every earning other than basic salary.
    pub allowances: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// Amount transferred.
    pub net_salary: Decimal,
}

impl WageFileRow {
    /// Builds the line for `payroll`, taking identity fields from `employee`.
    pub fn new(payroll: &Payroll, employee: &Employee) -> Self {
        Self {
            employee_id: employee.id.clone(),
            employee_name: employee.full_name.clone(),
            national_id: employee
                .iqama_number
                .clone()
                .unwrap_or_else(|| employee.national_id.clone()),
            iban: employee.iban.clone().unwrap_or_default(),
            basic_salary: payroll.basic_salary,
            allowances: payroll.gross_salary - payroll.basic_salary,
            deductions: payroll.total_deductions,
            net_salary: payroll.net_salary,
        }
    }

    fn record(&self) -> [String; 8] {
        [
            self.employee_id.clone(),
            self.employee_name.clone(),
            self.national_id.clone(),
            self.iban.clone(),
            self.basic_salary.round_dp(2).to_string(),
            self.allowances.round_dp(2).to_string(),
            self.deductions.round_dp(2).to_string(),
            self.net_salary.round_dp(2).to_string(),
        ]
    }
}

/// A generated wage file and its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WageFile {
    /// File name, e.g. `WPS_7001234567_2025-01.csv`.
    pub file_reference: String,
    /// CSV content.
    pub content: String,
    /// Number of payroll records.
    pub employee_count: u32,
    /// Sum of net salaries.
    pub total_amount: Decimal,
}

/// Writes the wage file for `month`.
///
/// # Errors
///
/// Returns [`HrmsError::Validation`] when `rows` is empty.
pub fn build_wage_file(
    establishment_id: &str,
    month: PayrollMonth,
    rows: &[WageFileRow],
) -> HrmsResult<WageFile> {
    if rows.is_empty() {
        return Err(HrmsError::validation(format!(
            "no payroll records for {month}"
        )));
    }

    let employee_count = rows.len() as u32;
    let total_amount: Decimal = rows.iter().map(|r| r.net_salary).sum();

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record([
            "EST".to_string(),
            establishment_id.to_string(),
            month.to_string(),
            employee_count.to_string(),
            total_amount.round_dp(2).to_string(),
        ])
        .map_err(write_failure)?;
    writer.write_record(WAGE_FILE_COLUMNS).map_err(write_failure)?;
    for row in rows {
        writer.write_record(row.record()).map_err(write_failure)?;
    }

    let bytes = writer.into_inner().map_err(|e| HrmsError::CalculationError {
        message: format!("failed to finish wage file: {e}"),
    })?;
    let content = String::from_utf8(bytes).map_err(|e| HrmsError::CalculationError {
        message: format!("wage file is not valid UTF-8: {e}"),
    })?;

    Ok(WageFile {
        file_reference: format!("WPS_{establishment_id}_{month}.csv"),
        content,
        employee_count,
        total_amount,
    })
}

fn write_failure(error: csv::Error) -> HrmsError {
    HrmsError::CalculationError {
        message: format!("failed to write wage file: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dec;

    fn row(id: &str, name: &str, net: &str) -> WageFileRow {
        WageFileRow {
            employee_id: id.to_string(),
            employee_name: name.to_string(),
            national_id: "1012345678".to_string(),
            iban: "SA0380000000608010167519".to_string(),
            basic_salary: dec("5000"),
            allowances: dec("1750"),
            deductions: dec("500"),
            net_salary: dec(net),
        }
    }

    #[test]
    fn test_wage_file_layout() {
        let month = PayrollMonth::new(2025, 1).unwrap();
        let file = build_wage_file(
            "7001234567",
            month,
            &[row("emp_001", "Sara", "6250"), row("emp_002", "Omar", "6000.5")],
        )
        .unwrap();

        let lines: Vec<&str> = file.content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "EST,7001234567,2025-01,2,12250.5");
        assert_eq!(
            lines[1],
            "employee_id,employee_name,national_id,iban,basic_salary,allowances,deductions,net_salary"
        );
        assert_eq!(
            lines[2],
            "emp_001,Sara,1012345678,SA0380000000608010167519,5000,1750,500,6250"
        );
        assert_eq!(file.employee_count, 2);
        assert_eq!(file.total_amount, dec("12250.5"));
        assert_eq!(file.file_reference, "WPS_7001234567_2025-01.csv");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let month = PayrollMonth::new(2025, 1).unwrap();
        let file =
            build_wage_file("7001234567", month, &[row("emp_001", "Al-Harbi, Omar", "10")])
                .unwrap();
        assert!(file.content.contains("\"Al-Harbi, Omar\""));
    }

    #[test]
    fn test_empty_month_is_rejected() {
        let month = PayrollMonth::new(2025, 1).unwrap();
        let result = build_wage_file("7001234567", month, &[]);
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
    }
}
