use std::sync::Arc;

use crate::model::ValidationErrors;
use crate::model::employee::{Employee, NewEmployee};
use crate::store::{Collection, DocumentStore, StoreResult, Subscription};

use super::WriteTicket;

/// Employee documents keyed by `employee_id`.
#[derive(Clone)]
pub struct EmployeeRegistry {
    store: Arc<dyn DocumentStore>,
}

impl EmployeeRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Validates, then starts the "add employee" write.
    pub fn add_employee(&self, input: NewEmployee) -> Result<WriteTicket<Employee>, ValidationErrors> {
        let input = input.validated()?;
        let store = self.store.clone();
        let key = input.employee_id.clone();
        Ok(WriteTicket::spawn("create_employee", key, async move {
            store.create_employee(input).await
        }))
    }

    /// Validates, then starts a merge-write of `input`.
    pub fn upsert_employee(&self, input: NewEmployee) -> Result<WriteTicket<Employee>, ValidationErrors> {
        let input = input.validated()?;
        let store = self.store.clone();
        let key = input.employee_id.clone();
        Ok(WriteTicket::spawn("upsert_employee", key, async move {
            store.upsert_employee(input).await
        }))
    }

    /// Starts the delete; the ticket resolves to whether a document existed.
    pub fn delete_employee(&self, employee_id: &str) -> WriteTicket<bool> {
        let store = self.store.clone();
        let key = employee_id.to_string();
        let id = key.clone();
        WriteTicket::spawn("delete_employee", key, async move {
            store.delete_employee(&id).await
        })
    }

    pub async fn get_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        self.store.get_employee(employee_id).await
    }

    pub async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        self.store.list_employees().await
    }

    /// Live, identifier-ordered employee list.
    pub fn subscribe_employees<C>(&self, deliver: C) -> Subscription
    where
        C: FnMut(StoreResult<Vec<Employee>>) + Send + 'static,
    {
        let store = self.store.clone();
        self.store.feed().subscribe(
            Collection::Employees,
            move || {
                let store = store.clone();
                async move { store.list_employees().await }
            },
            deliver,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn registry() -> EmployeeRegistry {
        EmployeeRegistry::new(Arc::new(MemoryStore::new()))
    }

    fn alice() -> NewEmployee {
        NewEmployee::new("E001", "Alice Johnson", "alice.j@company.com", "Engineering")
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<usize>) -> Option<usize> {
        timeout(Duration::from_secs(1), rx.recv()).await.ok().flatten()
    }

    #[actix_web::test]
    async fn invalid_input_never_reaches_the_store() {
        let registry = registry();
        let bad = NewEmployee::new("E001", "Alice", "alice-at-company", "Engineering");

        assert!(registry.add_employee(bad).is_err());
        assert!(registry.list_employees().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn upsert_is_idempotent() {
        let registry = registry();
        registry.upsert_employee(alice()).unwrap().wait().await.unwrap();
        registry.upsert_employee(alice()).unwrap().wait().await.unwrap();

        let all = registry.list_employees().await.unwrap();
        assert_eq!(all.iter().filter(|e| e.employee_id == "E001").count(), 1);
    }

    #[actix_web::test]
    async fn add_reports_duplicates_through_the_ticket() {
        let registry = registry();
        registry.add_employee(alice()).unwrap().wait().await.unwrap();

        let err = registry.add_employee(alice()).unwrap().wait().await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmployee(_)));
    }

    #[actix_web::test]
    async fn dropped_delete_ticket_still_deletes() {
        let registry = registry();
        registry.upsert_employee(alice()).unwrap().wait().await.unwrap();

        drop(registry.delete_employee("E001"));
        // Let the spawned write run.
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(registry.get_employee("E001").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn subscription_sees_additions_and_deletions() {
        let registry = registry();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = registry.subscribe_employees(move |r| {
            let _ = tx.send(r.map(|list| list.len()).unwrap_or(usize::MAX));
        });

        assert_eq!(next(&mut rx).await, Some(0));

        registry.upsert_employee(alice()).unwrap().wait().await.unwrap();
        assert_eq!(next(&mut rx).await, Some(1));

        registry.delete_employee("E001").wait().await.unwrap();
        assert_eq!(next(&mut rx).await, Some(0));

        sub.cancel();
    }
}
