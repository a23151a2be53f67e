//! Performance benchmarks for the payroll engine.
//!
//! - Single employee calculation with a full month of attendance
//! - Calculation batches of 10, 100 and 1000 employees
//! - A complete `/payroll/process` run over HTTP for 100 employees
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use hrms_engine::api::{AppState, create_router};
use hrms_engine::calculation::{PayrollInputs, calculate_payroll};
use hrms_engine::config::{ConfigLoader, HrmsConfig};
use hrms_engine::models::{
    AttendanceRecord, AttendanceStatus, Employee, EmployeeStatus, EmploymentType, PayrollMonth,
    User, UserRole,
};
use hrms_engine::notify::OutboxMailer;
use hrms_engine::services::HrmsContext;
use hrms_engine::store::{Dataset, Store};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> HrmsConfig {
    ConfigLoader::load("./config/saudi")
        .expect("Failed to load config")
        .into_config()
}

fn january() -> PayrollMonth {
    PayrollMonth::new(2025, 1).expect("valid month")
}

/// Creates an active employee; every third one is non-Saudi.
fn create_employee(i: usize) -> Employee {
    Employee {
        id: format!("emp_bench_{:04}", i),
        full_name: format!("Bench Employee {i}"),
        email: format!("emp_bench_{:04}@example.sa", i),
        national_id: "1012345678".to_string(),
        nationality: if i % 3 == 0 { "Indian" } else { "Saudi" }.to_string(),
        status: EmployeeStatus::Active,
        hire_date: NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date"),
        employment_type: EmploymentType::FullTime,
        department: Some("Operations".to_string()),
        job_title: None,
        manager_id: None,
        basic_salary: Decimal::new(5000 + (i as i64 % 20) * 250, 0),
        housing_allowance: Decimal::new(1250, 0),
        transport_allowance: Decimal::new(500, 0),
        other_allowances: Decimal::ZERO,
        gosi_salary_basis: None,
        iban: Some("SA0380000000608010167519".to_string()),
        bank_name: Some("Al Rajhi Bank".to_string()),
        iqama_number: None,
    }
}

/// Creates 31 days of attendance with two absences and some overtime.
fn create_attendance(employee_id: &str) -> Vec<AttendanceRecord> {
    (1..=31)
        .map(|day| AttendanceRecord {
            id: format!("att_{employee_id}_{day}"),
            employee_id: employee_id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).expect("valid date"),
            status: match day {
                7 | 21 => AttendanceStatus::Absent,
                _ => AttendanceStatus::Present,
            },
            overtime_hours: if day % 5 == 0 { Decimal::new(2, 0) } else { Decimal::ZERO },
        })
        .collect()
}

/// Benchmark: One employee's payroll calculation.
fn bench_single_employee(c: &mut Criterion) {
    let config = load_config();
    let employee = create_employee(1);
    let attendance = create_attendance(&employee.id);

    c.bench_function("single_employee", |b| {
        b.iter(|| {
            let inputs = PayrollInputs {
                employee: &employee,
                month: january(),
                attendance: &attendance,
                leave_requests: &[],
                bonuses: &[],
                deductions: &[],
                loans: &[],
                benefits: &[],
            };
            black_box(calculate_payroll(black_box(&inputs), config.payroll()))
        })
    });
}

/// Benchmark: Pure calculation over growing batches.
fn bench_calculation_batches(c: &mut Criterion) {
    let config = load_config();
    let mut group = c.benchmark_group("calculation_batch");

    for size in [10usize, 100, 1000] {
        let employees: Vec<(Employee, Vec<AttendanceRecord>)> = (0..size)
            .map(|i| {
                let employee = create_employee(i);
                let attendance = create_attendance(&employee.id);
                (employee, attendance)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &employees, |b, employees| {
            b.iter(|| {
                let mut net = Decimal::ZERO;
                for (employee, attendance) in employees {
                    let inputs = PayrollInputs {
                        employee,
                        month: january(),
                        attendance,
                        leave_requests: &[],
                        bonuses: &[],
                        deductions: &[],
                        loans: &[],
                        benefits: &[],
                    };
                    if let Ok(result) = calculate_payroll(&inputs, config.payroll()) {
                        net += result.net_salary;
                    }
                }
                black_box(net)
            })
        });
    }

    group.finish();
}

fn create_dataset(size: usize) -> Dataset {
    let employees: Vec<Employee> = (0..size).map(create_employee).collect();
    let attendance = employees
        .iter()
        .flat_map(|e| create_attendance(&e.id))
        .collect();
    Dataset {
        users: vec![User {
            id: "user_hr".to_string(),
            email: "hr@example.sa".to_string(),
            full_name: "HR Admin".to_string(),
            role: UserRole::Admin,
            department: Some("HR".to_string()),
        }],
        employees,
        attendance,
        ..Dataset::default()
    }
}

/// Benchmark: Full payroll run through the HTTP API.
///
/// Each iteration gets a fresh store since a month can only be paid once.
fn bench_payroll_run_http(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let config = load_config();
    let dataset = create_dataset(100);
    let body = serde_json::json!({"month": "2025-01"}).to_string();

    let mut group = c.benchmark_group("payroll_run");
    group.throughput(Throughput::Elements(100));
    group.sample_size(20);

    group.bench_function("http_100_employees", |b| {
        b.to_async(&rt).iter_batched(
            || {
                let context = HrmsContext::new(
                    Store::from_dataset(dataset.clone()),
                    config.clone(),
                    Arc::new(OutboxMailer::new()),
                )
                .expect("context");
                create_router(AppState::new(context))
            },
            |router| {
                let body = body.clone();
                async move {
                    let response = router
                        .oneshot(
                            Request::builder()
                                .method("POST")
                                .uri("/payroll/process")
                                .header("Content-Type", "application/json")
                                .header("x-user-email", "hr@example.sa")
                                .body(Body::from(body))
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    black_box(response)
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_employee,
    bench_calculation_batches,
    bench_payroll_run_http,
);
criterion_main!(benches);
