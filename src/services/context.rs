//! Process-wide dependencies and the per-request caller identity.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::config::HrmsConfig;
use crate::error::{HrmsError, HrmsResult};
use crate::integrations::{GovApiClient, QIWA, SINAD};
use crate::models::{Employee, User, UserRole};
use crate::notify::{Email, Mailer, deliver};
use crate::store::{EmployeeQuery, Store, UserQuery};

/// Everything a service needs, built once at process start.
#[derive(Clone)]
pub struct HrmsContext {
    /// Repositories.
    pub store: Store,
    /// Loaded configuration.
    pub config: HrmsConfig,
    /// Outgoing e-mail.
    pub mailer: Arc<dyn Mailer>,
    /// QIWA API client.
    pub qiwa: GovApiClient,
    /// SINAD API client.
    pub sinad: GovApiClient,
}

impl HrmsContext {
    /// Builds the context, creating the government API clients from
    /// `config`.
    pub fn new(store: Store, config: HrmsConfig, mailer: Arc<dyn Mailer>) -> HrmsResult<Self> {
        let qiwa = GovApiClient::new(QIWA, &config.integrations().qiwa)?;
        let sinad = GovApiClient::new(SINAD, &config.integrations().sinad)?;
        Ok(Self {
            store,
            config,
            mailer,
            qiwa,
            sinad,
        })
    }

    /// Resolves the caller from the e-mail presented with the request.
    ///
    /// The role always comes from the stored account.
    pub async fn authenticate(&self, email: Option<&str>) -> HrmsResult<AuthContext> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| HrmsError::Unauthenticated {
                message: "caller e-mail is missing".to_string(),
            })?;

        let user = self
            .store
            .users
            .find_one(&UserQuery::new().email(email))
            .await?
            .ok_or_else(|| HrmsError::Unauthenticated {
                message: format!("no account for {email}"),
            })?;

        Ok(AuthContext { user })
    }

    /// Every admin account, in store order.
    pub async fn admins(&self) -> HrmsResult<Vec<User>> {
        self.store
            .users
            .find(&UserQuery::new().role(UserRole::Admin))
            .await
    }

    /// The first admin in `department`, falling back to the first admin.
    pub async fn department_admin(&self, department: &str) -> HrmsResult<Option<User>> {
        let admins = self.admins().await?;
        let in_department = admins.iter().find(|a| a.in_department(department)).cloned();
        Ok(in_department.or_else(|| admins.into_iter().next()))
    }

    /// The employee record of `employee`'s manager, if one is set and exists.
    pub async fn manager_of(&self, employee: &Employee) -> HrmsResult<Option<Employee>> {
        match &employee.manager_id {
            Some(manager_id) => self.store.employees.get(manager_id).await,
            None => Ok(None),
        }
    }

    /// The employee record whose e-mail matches the caller's login.
    pub async fn employee_for(&self, user: &User) -> HrmsResult<Option<Employee>> {
        self.store
            .employees
            .find_one(&EmployeeQuery::new().email(user.email.as_str()))
            .await
    }

    /// Sends one e-mail, logging instead of failing.
    pub async fn notify(&self, email: Email) {
        deliver(self.mailer.as_ref(), email).await;
    }

    /// Sends the same message to every admin.
    pub async fn notify_admins(&self, subject: &str, body: &str) {
        match self.admins().await {
            Ok(admins) => {
                for admin in admins {
                    self.notify(Email::new(admin.email, subject, body)).await;
                }
            }
            Err(error) => warn!(error = %error, "Could not load admins for notification"),
        }
    }
}

/// The authenticated caller of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The caller's account.
    pub user: User,
}

impl AuthContext {
    /// The caller's login e-mail.
    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// True if the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Fails with [`HrmsError::Forbidden`] unless the caller is an admin.
    pub fn require_admin(&self) -> HrmsResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(HrmsError::forbidden("admin role required"))
        }
    }

    /// True if the caller is `employee` (same e-mail).
    pub fn is_employee(&self, employee: &Employee) -> bool {
        self.user.email.eq_ignore_ascii_case(&employee.email)
    }
}

/// A fresh record identifier with the given prefix.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
