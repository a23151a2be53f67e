//! In-memory repository backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{HrmsError, HrmsResult};

use super::repository::{Entity, RecordQuery, Repository};

/// A [`Repository`] over a vector guarded by an async read-write lock.
///
/// Records keep their insertion order; updates replace in place.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `records`.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn get(&self, id: &str) -> HrmsResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn list(&self) -> HrmsResult<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn find(&self, query: &T::Query) -> HrmsResult<Vec<T>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
    }

    async fn create(&self, record: T) -> HrmsResult<T> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(HrmsError::Store {
                message: format!("{} with id '{}' already exists", T::NAME, record.id()),
            });
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> HrmsResult<T> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| HrmsError::not_found(T::NAME, record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str) -> HrmsResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| HrmsError::not_found(T::NAME, id))?;
        records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, User, UserRole};
    use crate::store::{EmployeeQuery, UserQuery};
    use crate::test_support::employee;

    fn user(id: &str, email: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            full_name: id.to_string(),
            role,
            department: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryRepository::new();
        repo.create(employee("emp_001", "Saudi")).await.unwrap();

        let found = repo.get("emp_001").await.unwrap();
        assert_eq!(found.map(|e| e.id), Some("emp_001".to_string()));
        assert!(repo.get("emp_999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_id_fails() {
        let repo = InMemoryRepository::with_records(vec![employee("emp_001", "Saudi")]);
        let result = repo.create(employee("emp_001", "Saudi")).await;
        assert!(matches!(result, Err(HrmsError::Store { .. })));
    }

    #[tokio::test]
    async fn test_require_missing_is_not_found() {
        let repo: InMemoryRepository<crate::models::Employee> = InMemoryRepository::new();
        match repo.require("emp_404").await {
            Err(HrmsError::NotFound { entity, id }) => {
                assert_eq!(entity, "Employee");
                assert_eq!(id, "emp_404");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = InMemoryRepository::with_records(vec![
            employee("emp_001", "Saudi"),
            employee("emp_002", "Saudi"),
        ]);
        let mut updated = employee("emp_001", "Saudi");
        updated.status = EmployeeStatus::Terminated;
        repo.update(updated).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all[0].id, "emp_001");
        assert_eq!(all[0].status, EmployeeStatus::Terminated);
        assert_eq!(all[1].id, "emp_002");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryRepository::new();
        let result = repo.update(employee("emp_001", "Saudi")).await;
        assert!(matches!(result, Err(HrmsError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryRepository::with_records(vec![employee("emp_001", "Saudi")]);
        repo.delete("emp_001").await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.delete("emp_001").await.is_err());
    }

    #[tokio::test]
    async fn test_find_with_typed_query() {
        let mut terminated = employee("emp_002", "Saudi");
        terminated.status = EmployeeStatus::Terminated;
        let repo = InMemoryRepository::with_records(vec![
            employee("emp_001", "Saudi"),
            terminated,
            employee("emp_003", "Saudi"),
        ]);

        let active = repo
            .find(&EmployeeQuery::new().status(EmployeeStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 2);

        let subset = repo
            .find(
                &EmployeeQuery::new()
                    .status(EmployeeStatus::Active)
                    .ids(vec!["emp_002".to_string(), "emp_003".to_string()]),
            )
            .await
            .unwrap();
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "emp_003");
    }

    #[tokio::test]
    async fn test_find_one_and_exists() {
        let repo = InMemoryRepository::with_records(vec![
            user("u1", "hr@example.sa", UserRole::Admin),
            user("u2", "staff@example.sa", UserRole::User),
        ]);

        let found = repo
            .find_one(&UserQuery::new().email("HR@example.sa"))
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some("u1".to_string()));
        assert!(!repo.exists(&UserQuery::new().email("nobody@example.sa")).await.unwrap());
    }
}
