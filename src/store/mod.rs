//! Where events live between requests.
//!
//! - [`MongoStore`] keeps one document per event in MongoDB
//! - [`MemoryStore`] keeps events in process, for tests and local runs
//!
//! Both apply the same cascade when a participant leaves: expenses they
//! paid are dropped and their name is pulled from every split.
use async_trait::async_trait;

use crate::error::AppResult;
use crate::schemas::{Event, Expense};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, event: Event) -> AppResult<()>;

    async fn get_event(&self, id: &str) -> AppResult<Event>;

    async fn list_events(&self) -> AppResult<Vec<Event>>;

    async fn delete_event(&self, id: &str) -> AppResult<()>;

    async fn add_participant(&self, id: &str, name: &str) -> AppResult<()>;

    async fn remove_participant(&self, id: &str, name: &str) -> AppResult<()>;

    async fn add_expense(&self, id: &str, expense: Expense) -> AppResult<()>;

    async fn remove_expense(&self, id: &str, expense_id: &str) -> AppResult<()>;
}
