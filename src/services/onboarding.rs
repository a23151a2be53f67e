//! Onboarding checklist assignment, task progress and due-date reminders.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{HrmsError, HrmsResult};
use crate::models::{AssigneeRole, Employee, OnboardingTask, TaskStatus};
use crate::notify::Email;
use crate::store::OnboardingTaskQuery;

use super::{AuthContext, BatchError, HrmsContext, new_id};

/// Assignment of the onboarding checklist to a new hire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingAssignment {
    /// The new hire.
    pub employee_id: String,
    /// First day the offsets count from. Defaults to the hire date.
    pub start_date: Option<NaiveDate>,
    /// Checklist to use. Only the configured checklist exists.
    pub checklist_id: Option<String>,
}

/// The tasks created for a new hire.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingPlan {
    /// The new hire.
    pub employee_id: String,
    /// Checklist the tasks came from.
    pub checklist_id: String,
    /// Day zero of the checklist.
    pub start_date: NaiveDate,
    /// Created tasks in template order.
    pub tasks: Vec<OnboardingTask>,
}

/// A progress update on one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatusUpdate {
    /// Task to update.
    pub task_id: String,
    /// Requested status.
    pub status: TaskStatus,
}

/// A reminder sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderRun {
    /// The sweep date. Defaults to today (UTC).
    pub today: Option<NaiveDate>,
}

/// The result of a reminder sweep.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderSummary {
    /// Date the sweep ran for.
    pub today: NaiveDate,
    /// Tasks not yet completed.
    pub tasks_checked: usize,
    /// Tasks moved to `overdue` by this sweep.
    pub marked_overdue: usize,
    /// Reminder e-mails sent.
    pub reminders_sent: usize,
    /// Tasks that could not be handled.
    pub errors: Vec<BatchError>,
}

/// Creates the onboarding checklist for an employee.
///
/// Each task is due `day_number` days after the start date and starts as
/// `not_started`. The new hire gets a welcome e-mail listing the tasks.
///
/// # Errors
///
/// - [`HrmsError::Forbidden`] unless the caller is an admin.
/// - [`HrmsError::NotFound`] for an unknown employee.
/// - [`HrmsError::Validation`] for an unknown checklist or an employee who
///   already has onboarding tasks.
pub async fn assign_onboarding_tasks(
    ctx: &HrmsContext,
    auth: &AuthContext,
    assignment: OnboardingAssignment,
) -> HrmsResult<OnboardingPlan> {
    auth.require_admin()?;
    let employee = ctx.store.employees.require(&assignment.employee_id).await?;

    let template = ctx.config.onboarding();
    if let Some(requested) = &assignment.checklist_id {
        if requested != &template.checklist_id {
            return Err(HrmsError::validation(format!(
                "unknown onboarding checklist: {requested}"
            )));
        }
    }

    let existing = OnboardingTaskQuery::new().employee_id(employee.id.as_str());
    if ctx.store.onboarding_tasks.exists(&existing).await? {
        return Err(HrmsError::validation(format!(
            "employee {} already has onboarding tasks",
            employee.id
        )));
    }

    let start_date = assignment.start_date.unwrap_or(employee.hire_date);
    let mut tasks = Vec::with_capacity(template.tasks.len());
    for item in &template.tasks {
        let due_date = start_date
            .checked_add_days(Days::new(u64::from(item.day_number)))
            .ok_or_else(|| {
                HrmsError::validation(format!("due date out of range for '{}'", item.title))
            })?;
        let task = OnboardingTask {
            id: new_id("task"),
            employee_id: employee.id.clone(),
            checklist_id: Some(template.checklist_id.clone()),
            title: item.title.clone(),
            description: item.description.clone(),
            task_type: item.task_type,
            assignee_role: item.assignee_role,
            priority: item.priority,
            day_number: item.day_number,
            due_date,
            status: TaskStatus::NotStarted,
            completed_at: None,
        };
        tasks.push(ctx.store.onboarding_tasks.create(task).await?);
    }

    info!(
        employee_id = %employee.id,
        checklist_id = %template.checklist_id,
        start_date = %start_date,
        tasks = tasks.len(),
        "Onboarding tasks assigned"
    );
    ctx.notify(welcome_email(&employee, &template.name, start_date, &tasks))
        .await;

    Ok(OnboardingPlan {
        employee_id: employee.id,
        checklist_id: template.checklist_id.clone(),
        start_date,
        tasks,
    })
}

fn welcome_email(
    employee: &Employee,
    checklist_name: &str,
    start_date: NaiveDate,
    tasks: &[OnboardingTask],
) -> Email {
    let mut body = format!(
        "Welcome aboard, {}!\n\nYour {} starts on {}. Your tasks:\n",
        employee.full_name, checklist_name, start_date
    );
    for task in tasks {
        body.push_str(&format!("- {} (due {})\n", task.title, task.due_date));
    }
    Email::new(employee.email.clone(), "Welcome to the team", body)
}

/// Moves a task to a new status.
///
/// Completing a task stamps `completed_at`.
///
/// # Errors
///
/// - [`HrmsError::NotFound`] for an unknown task.
/// - [`HrmsError::Forbidden`] unless the caller is an admin or the new hire.
/// - [`HrmsError::InvalidTransition`] for a move the lifecycle does not
///   allow, including any request for `overdue`.
pub async fn update_task_status(
    ctx: &HrmsContext,
    auth: &AuthContext,
    update: TaskStatusUpdate,
) -> HrmsResult<OnboardingTask> {
    let mut task = ctx.store.onboarding_tasks.require(&update.task_id).await?;

    if !auth.is_admin() {
        let employee = ctx.store.employees.require(&task.employee_id).await?;
        if !auth.is_employee(&employee) {
            return Err(HrmsError::forbidden(
                "only the new hire or an admin can update this task",
            ));
        }
    }

    if !task.status.can_transition_to(update.status) {
        return Err(HrmsError::InvalidTransition {
            from: task.status.as_str().to_string(),
            to: update.status.as_str().to_string(),
        });
    }

    task.status = update.status;
    if update.status == TaskStatus::Completed {
        task.completed_at = Some(Utc::now());
    }
    let task = ctx.store.onboarding_tasks.update(task).await?;

    info!(
        task_id = %task.id,
        employee_id = %task.employee_id,
        status = task.status.as_str(),
        updated_by = %auth.email(),
        "Onboarding task updated"
    );
    Ok(task)
}

/// Marks late tasks overdue and reminds whoever owns each task that is
/// overdue or due today or tomorrow.
///
/// A digest of the reminders goes to the first HR admin. Tasks whose owner
/// cannot be resolved are reported in [`ReminderSummary::errors`].
///
/// # Errors
///
/// [`HrmsError::Forbidden`] unless the caller is an admin, or a store error
/// while listing tasks.
pub async fn send_onboarding_reminders(
    ctx: &HrmsContext,
    auth: &AuthContext,
    run: ReminderRun,
) -> HrmsResult<ReminderSummary> {
    auth.require_admin()?;
    let today = run.today.unwrap_or_else(|| Utc::now().date_naive());
    let tomorrow = today.succ_opt().unwrap_or(today);

    let mut summary = ReminderSummary {
        today,
        tasks_checked: 0,
        marked_overdue: 0,
        reminders_sent: 0,
        errors: Vec::new(),
    };
    let mut digest = Vec::new();

    for mut task in ctx.store.onboarding_tasks.list().await? {
        if task.status == TaskStatus::Completed {
            continue;
        }
        summary.tasks_checked += 1;

        if task.status.is_open() && task.due_date < today {
            task.status = TaskStatus::Overdue;
            match ctx.store.onboarding_tasks.update(task.clone()).await {
                Ok(_) => summary.marked_overdue += 1,
                Err(error) => {
                    summary.errors.push(BatchError::new(&task.id, &error));
                    continue;
                }
            }
        }

        let due = if task.status == TaskStatus::Overdue {
            "overdue"
        } else if task.due_date == today {
            "due today"
        } else if task.due_date == tomorrow {
            "due tomorrow"
        } else {
            continue;
        };

        match remind(ctx, &task, due).await {
            Ok(recipient) => {
                summary.reminders_sent += 1;
                digest.push(format!(
                    "- [{due}] {} for {} ({}), sent to {recipient}",
                    task.title, task.employee_id, task.due_date
                ));
            }
            Err(error) => {
                warn!(task_id = %task.id, error = %error, "Onboarding reminder failed");
                summary.errors.push(BatchError::new(&task.id, &error));
            }
        }
    }

    if !digest.is_empty() {
        match ctx.department_admin("HR").await {
            Ok(Some(hr)) => {
                let body = format!(
                    "Onboarding reminders for {today}:\n{}\n",
                    digest.join("\n")
                );
                ctx.notify(Email::new(hr.email, "Onboarding reminder digest", body))
                    .await;
            }
            Ok(None) => warn!("No admin to receive the onboarding digest"),
            Err(error) => warn!(error = %error, "Could not load admins for onboarding digest"),
        }
    }

    info!(
        today = %today,
        checked = summary.tasks_checked,
        overdue = summary.marked_overdue,
        reminders = summary.reminders_sent,
        errors = summary.errors.len(),
        "Onboarding reminders sent"
    );
    Ok(summary)
}

/// Sends the reminder for one task and returns the recipient.
async fn remind(ctx: &HrmsContext, task: &OnboardingTask, due: &str) -> HrmsResult<String> {
    let employee = ctx.store.employees.require(&task.employee_id).await?;
    let recipient = match task.assignee_role {
        AssigneeRole::NewHire => Some(employee.email.clone()),
        AssigneeRole::Manager => ctx.manager_of(&employee).await?.map(|m| m.email),
        AssigneeRole::Hr => ctx.department_admin("HR").await?.map(|a| a.email),
        AssigneeRole::It => ctx.department_admin("IT").await?.map(|a| a.email),
    }
    .ok_or_else(|| {
        HrmsError::validation(format!(
            "no recipient for {:?} task '{}'",
            task.assignee_role, task.title
        ))
    })?;

    let subject = format!("Onboarding task {due}: {}", task.title);
    let body = format!(
        "Onboarding task for {} is {due}.\n\n{}\n{}\nDue date: {}\n",
        employee.full_name, task.title, task.description, task.due_date
    );
    ctx.notify(Email::new(recipient.clone(), subject, body)).await;
    Ok(recipient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskType};
    use crate::notify::OutboxMailer;
    use crate::services::testing::{admin, auth, context, staff};
    use crate::test_support::{date, employee};

    async fn seeded() -> (HrmsContext, OutboxMailer) {
        let (ctx, outbox) = context().await;
        ctx.store.users.create(admin("hr@example.sa", "HR")).await.unwrap();
        ctx.store.users.create(admin("it@example.sa", "IT")).await.unwrap();
        ctx.store.employees.create(employee("emp_001", "Saudi")).await.unwrap();
        let mut hire = employee("emp_009", "Saudi");
        hire.hire_date = date(2025, 1, 1);
        hire.manager_id = Some("emp_001".to_string());
        ctx.store.employees.create(hire).await.unwrap();
        (ctx, outbox)
    }

    fn assignment(employee_id: &str) -> OnboardingAssignment {
        OnboardingAssignment {
            employee_id: employee_id.to_string(),
            start_date: None,
            checklist_id: None,
        }
    }

    fn task(id: &str, role: AssigneeRole, due_date: NaiveDate, status: TaskStatus) -> OnboardingTask {
        OnboardingTask {
            id: id.to_string(),
            employee_id: "emp_009".to_string(),
            checklist_id: None,
            title: format!("Task {id}"),
            description: "Do it".to_string(),
            task_type: TaskType::Documentation,
            assignee_role: role,
            priority: TaskPriority::Medium,
            day_number: 0,
            due_date,
            status,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_assign_creates_checklist_from_hire_date() {
        let (ctx, outbox) = seeded().await;
        let hr = admin("hr@example.sa", "HR");

        let plan = assign_onboarding_tasks(&ctx, &auth(&hr), assignment("emp_009"))
            .await
            .unwrap();

        assert_eq!(plan.tasks.len(), 10);
        assert_eq!(plan.start_date, date(2025, 1, 1));
        assert_eq!(plan.checklist_id, "standard_onboarding");
        let check_in = plan.tasks.iter().find(|t| t.day_number == 30).unwrap();
        assert_eq!(check_in.due_date, date(2025, 1, 31));
        for task in &plan.tasks {
            assert_eq!(task.status, TaskStatus::NotStarted);
            assert_eq!(
                task.due_date,
                date(2025, 1, 1) + chrono::Duration::days(i64::from(task.day_number))
            );
        }

        let welcome = outbox.sent_to("emp_009@example.sa").await;
        assert_eq!(welcome.len(), 1);
        assert!(welcome[0].body.contains("30-day check-in (due 2025-01-31)"));
    }

    #[tokio::test]
    async fn test_assign_honours_explicit_start_date() {
        let (ctx, _) = seeded().await;
        let hr = admin("hr@example.sa", "HR");
        let mut request = assignment("emp_009");
        request.start_date = Some(date(2025, 2, 2));

        let plan = assign_onboarding_tasks(&ctx, &auth(&hr), request).await.unwrap();
        assert_eq!(plan.tasks[0].due_date, date(2025, 2, 2));
    }

    #[tokio::test]
    async fn test_assign_twice_is_rejected() {
        let (ctx, _) = seeded().await;
        let hr = admin("hr@example.sa", "HR");
        assign_onboarding_tasks(&ctx, &auth(&hr), assignment("emp_009"))
            .await
            .unwrap();

        let result = assign_onboarding_tasks(&ctx, &auth(&hr), assignment("emp_009")).await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
        assert_eq!(ctx.store.onboarding_tasks.list().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_assign_errors() {
        let (ctx, _) = seeded().await;
        let hr = admin("hr@example.sa", "HR");

        let result = assign_onboarding_tasks(&ctx, &auth(&hr), assignment("emp_404")).await;
        assert!(matches!(result, Err(HrmsError::NotFound { .. })));

        let mut unknown = assignment("emp_009");
        unknown.checklist_id = Some("executive".to_string());
        let result = assign_onboarding_tasks(&ctx, &auth(&hr), unknown).await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));

        let caller = staff("emp_009@example.sa");
        let result = assign_onboarding_tasks(&ctx, &auth(&caller), assignment("emp_009")).await;
        assert!(matches!(result, Err(HrmsError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_new_hire_completes_task() {
        let (ctx, _) = seeded().await;
        ctx.store
            .onboarding_tasks
            .create(task("t1", AssigneeRole::NewHire, date(2025, 1, 1), TaskStatus::NotStarted))
            .await
            .unwrap();
        let hire = staff("emp_009@example.sa");

        let started = update_task_status(
            &ctx,
            &auth(&hire),
            TaskStatusUpdate {
                task_id: "t1".to_string(),
                status: TaskStatus::InProgress,
            },
        )
        .await
        .unwrap();
        assert_eq!(started.status, TaskStatus::InProgress);
        assert!(started.completed_at.is_none());

        let done = update_task_status(
            &ctx,
            &auth(&hire),
            TaskStatusUpdate {
                task_id: "t1".to_string(),
                status: TaskStatus::Completed,
            },
        )
        .await
        .unwrap();
        assert!(done.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_task_update_rules() {
        let (ctx, _) = seeded().await;
        ctx.store
            .onboarding_tasks
            .create(task("t1", AssigneeRole::NewHire, date(2025, 1, 1), TaskStatus::Completed))
            .await
            .unwrap();

        let colleague = staff("emp_001@example.sa");
        let result = update_task_status(
            &ctx,
            &auth(&colleague),
            TaskStatusUpdate {
                task_id: "t1".to_string(),
                status: TaskStatus::InProgress,
            },
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Forbidden { .. })));

        let hr = admin("hr@example.sa", "HR");
        let result = update_task_status(
            &ctx,
            &auth(&hr),
            TaskStatusUpdate {
                task_id: "t1".to_string(),
                status: TaskStatus::InProgress,
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(HrmsError::InvalidTransition { ref from, ref to })
                if from == "completed" && to == "in_progress"
        ));

        let result = update_task_status(
            &ctx,
            &auth(&hr),
            TaskStatusUpdate {
                task_id: "t404".to_string(),
                status: TaskStatus::Completed,
            },
        )
        .await;
        assert!(matches!(result, Err(HrmsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_reminders_mark_overdue_and_route_by_role() {
        let (ctx, outbox) = seeded().await;
        let today = date(2025, 1, 10);
        let tasks = [
            task("late", AssigneeRole::NewHire, date(2025, 1, 8), TaskStatus::NotStarted),
            task("today", AssigneeRole::It, today, TaskStatus::InProgress),
            task("tomorrow", AssigneeRole::Manager, date(2025, 1, 11), TaskStatus::NotStarted),
            task("later", AssigneeRole::Hr, date(2025, 1, 20), TaskStatus::NotStarted),
            task("done", AssigneeRole::NewHire, date(2025, 1, 2), TaskStatus::Completed),
        ];
        for t in tasks {
            ctx.store.onboarding_tasks.create(t).await.unwrap();
        }
        let hr = admin("hr@example.sa", "HR");

        let summary = send_onboarding_reminders(&ctx, &auth(&hr), ReminderRun { today: Some(today) })
            .await
            .unwrap();

        assert_eq!(summary.tasks_checked, 4);
        assert_eq!(summary.marked_overdue, 1);
        assert_eq!(summary.reminders_sent, 3);
        assert!(summary.errors.is_empty());

        let late = ctx.store.onboarding_tasks.require("late").await.unwrap();
        assert_eq!(late.status, TaskStatus::Overdue);
        let done = ctx.store.onboarding_tasks.require("done").await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);

        assert_eq!(outbox.sent_to("emp_009@example.sa").await.len(), 1);
        assert_eq!(outbox.sent_to("it@example.sa").await.len(), 1);
        assert_eq!(outbox.sent_to("emp_001@example.sa").await.len(), 1);
        let hr_mail = outbox.sent_to("hr@example.sa").await;
        assert_eq!(hr_mail.len(), 1);
        assert_eq!(hr_mail[0].subject, "Onboarding reminder digest");
        assert!(hr_mail[0].body.contains("[overdue] Task late"));
    }

    #[tokio::test]
    async fn test_reminder_without_recipient_is_reported() {
        let (ctx, _) = seeded().await;
        let mut orphan = task("t1", AssigneeRole::Manager, date(2025, 1, 10), TaskStatus::NotStarted);
        orphan.employee_id = "emp_001".to_string();
        ctx.store.onboarding_tasks.create(orphan).await.unwrap();
        let hr = admin("hr@example.sa", "HR");

        let summary = send_onboarding_reminders(
            &ctx,
            &auth(&hr),
            ReminderRun {
                today: Some(date(2025, 1, 10)),
            },
        )
        .await
        .unwrap();

        assert_eq!(summary.reminders_sent, 0);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].id, "t1");
    }

    #[tokio::test]
    async fn test_reminders_require_admin() {
        let (ctx, _) = seeded().await;
        let caller = staff("emp_009@example.sa");
        let result = send_onboarding_reminders(&ctx, &auth(&caller), ReminderRun::default()).await;
        assert!(matches!(result, Err(HrmsError::Forbidden { .. })));
    }
}
