use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Client, Collection,
};

use super::EventStore;
use crate::error::{AppError, AppResult};
use crate::schemas::{Event, Expense};

const EVENTS: &str = "Events";

pub struct MongoStore {
    events: Collection<Event>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(&client, database))
    }

    pub fn new(client: &Client, database: &str) -> Self {
        MongoStore {
            events: client.database(database).collection(EVENTS),
        }
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.events.count_documents(doc! { "id": id }, None).await? > 0)
    }

    async fn ensure_exists(&self, id: &str) -> AppResult<()> {
        if self.exists(id).await? {
            Ok(())
        } else {
            Err(AppError::EventNotFound)
        }
    }

    async fn update(&self, filter: Document, update: Document) -> AppResult<bool> {
        let result = self.events.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn create_event(&self, event: Event) -> AppResult<()> {
        self.events.insert_one(event, None).await?;
        Ok(())
    }

    async fn get_event(&self, id: &str) -> AppResult<Event> {
        self.events
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or(AppError::EventNotFound)
    }

    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let cursor = self.events.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_event(&self, id: &str) -> AppResult<()> {
        let result = self.events.delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(AppError::EventNotFound);
        }
        Ok(())
    }

    async fn add_participant(&self, id: &str, name: &str) -> AppResult<()> {
        // The filter only matches when the name is free, so the check and the
        // push happen in one document update.
        let added = self
            .update(
                doc! { "id": id, "participants": { "$ne": name } },
                doc! { "$push": { "participants": name } },
            )
            .await?;
        if added {
            return Ok(());
        }
        self.ensure_exists(id).await?;
        Err(AppError::ParticipantExists)
    }

    async fn remove_participant(&self, id: &str, name: &str) -> AppResult<()> {
        let removed = self
            .update(
                doc! { "id": id, "participants": name },
                doc! { "$pull": { "participants": name, "expenses": { "paid_by": name } } },
            )
            .await?;
        if !removed {
            self.ensure_exists(id).await?;
            return Err(AppError::ParticipantNotFound(name.to_string()));
        }
        // A second update: MongoDB rejects `expenses` and `expenses.$[]` in
        // the same one.
        self.update(
            doc! { "id": id },
            doc! { "$pull": { "expenses.$[].split_with": name } },
        )
        .await?;
        Ok(())
    }

    async fn add_expense(&self, id: &str, expense: Expense) -> AppResult<()> {
        let expense = bson::to_bson(&expense)?;
        if self
            .update(doc! { "id": id }, doc! { "$push": { "expenses": expense } })
            .await?
        {
            Ok(())
        } else {
            Err(AppError::EventNotFound)
        }
    }

    async fn remove_expense(&self, id: &str, expense_id: &str) -> AppResult<()> {
        let removed = self
            .update(
                doc! { "id": id, "expenses.id": expense_id },
                doc! { "$pull": { "expenses": { "id": expense_id } } },
            )
            .await?;
        if removed {
            return Ok(());
        }
        self.ensure_exists(id).await?;
        Err(AppError::ExpenseNotFound)
    }
}
