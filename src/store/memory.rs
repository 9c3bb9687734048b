use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::EventStore;
use crate::error::{AppError, AppResult};
use crate::schemas::{Event, Expense};

#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<IndexMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, event: Event) -> AppResult<()> {
        self.events.write().await.insert(event.id.clone(), event);
        Ok(())
    }

    async fn get_event(&self, id: &str) -> AppResult<Event> {
        self.events
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(AppError::EventNotFound)
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        Ok(self.events.read().await.values().cloned().collect())
    }

    async fn delete_event(&self, id: &str) -> AppResult<()> {
        self.events
            .write()
            .await
            .shift_remove(id)
            .map(|_| ())
            .ok_or(AppError::EventNotFound)
    }

    async fn add_participant(&self, id: &str, name: &str) -> AppResult<()> {
        let mut events = self.events.write().await;
        let event = events.get_mut(id).ok_or(AppError::EventNotFound)?;
        if event.has_participant(name) {
            return Err(AppError::ParticipantExists);
        }
        event.participants.push(name.to_string());
        Ok(())
    }

    async fn remove_participant(&self, id: &str, name: &str) -> AppResult<()> {
        let mut events = self.events.write().await;
        let event = events.get_mut(id).ok_or(AppError::EventNotFound)?;
        if event.remove_participant(name) {
            Ok(())
        } else {
            Err(AppError::ParticipantNotFound(name.to_string()))
        }
    }

    async fn add_expense(&self, id: &str, expense: Expense) -> AppResult<()> {
        let mut events = self.events.write().await;
        let event = events.get_mut(id).ok_or(AppError::EventNotFound)?;
        event.expenses.push(expense);
        Ok(())
    }

    async fn remove_expense(&self, id: &str, expense_id: &str) -> AppResult<()> {
        let mut events = self.events.write().await;
        let event = events.get_mut(id).ok_or(AppError::EventNotFound)?;
        let position = event
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or(AppError::ExpenseNotFound)?;
        event.expenses.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(paid_by: &str, split_with: &[&str]) -> Expense {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: "Taxi".to_string(),
            amount: 12.0,
            paid_by: paid_by.to_string(),
            split_with: split_with.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    async fn store_with_event() -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let event = Event::new("Trip".to_string(), String::new());
        let id = event.id.clone();
        store.create_event(event).await.unwrap();
        for name in ["A", "B", "C"] {
            store.add_participant(&id, name).await.unwrap();
        }
        (store, id)
    }

    #[actix_web::test]
    async fn duplicate_participant_is_rejected() {
        let (store, id) = store_with_event().await;
        let result = store.add_participant(&id, "A").await;
        assert!(matches!(result, Err(AppError::ParticipantExists)));
        // Names are case sensitive.
        store.add_participant(&id, "a").await.unwrap();
    }

    #[actix_web::test]
    async fn removing_participant_cascades() {
        let (store, id) = store_with_event().await;
        store.add_expense(&id, expense("A", &["A", "B"])).await.unwrap();
        store.add_expense(&id, expense("B", &["A", "C"])).await.unwrap();
        store.add_expense(&id, expense("C", &["A"])).await.unwrap();

        store.remove_participant(&id, "A").await.unwrap();

        let event = store.get_event(&id).await.unwrap();
        assert_eq!(event.participants, ["B", "C"]);
        assert_eq!(event.expenses.len(), 2);
        assert_eq!(event.expenses[0].split_with, ["C"]);
        assert!(event.expenses[1].split_with.is_empty());
    }

    #[actix_web::test]
    async fn missing_records_are_reported() {
        let (store, id) = store_with_event().await;
        assert!(matches!(
            store.get_event("nope").await,
            Err(AppError::EventNotFound)
        ));
        assert!(matches!(
            store.remove_participant(&id, "Z").await,
            Err(AppError::ParticipantNotFound(_))
        ));
        assert!(matches!(
            store.remove_expense(&id, "nope").await,
            Err(AppError::ExpenseNotFound)
        ));
    }

    #[actix_web::test]
    async fn deleting_event_removes_it() {
        let (store, id) = store_with_event().await;
        store.delete_event(&id).await.unwrap();
        assert!(store.list_events().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_event(&id).await,
            Err(AppError::EventNotFound)
        ));
    }
}
