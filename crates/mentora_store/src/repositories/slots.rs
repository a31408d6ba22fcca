//! Repository for bookable slots.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::models::{DbSlot, Slot, SlotStatus};
use bson::{doc, DateTime as BsonDateTime, Document, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mentora_common::services::BoxFuture;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::Deserialize;

const COLLECTION: &str = "slots";

/// Partial update applied to a slot by the admin.
///
/// `None` fields are left untouched. Clearing a field is not supported;
/// the admin deletes and recreates the slot instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotUpdate {
    pub service_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<SlotStatus>,
}

/// Repository for slots.
pub trait SlotRepository: Send + Sync {
    /// Insert a slot and return it with its id set.
    fn insert(&self, slot: Slot) -> BoxFuture<'_, Slot, StoreError>;

    /// Find a slot by id.
    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Slot>, StoreError>;

    /// All slots regardless of status, sorted by start time.
    fn find_all(&self) -> BoxFuture<'_, Vec<Slot>, StoreError>;

    /// All free slots, sorted by start time.
    fn find_free(&self) -> BoxFuture<'_, Vec<Slot>, StoreError>;

    /// Free slots starting within `[start, end)`, sorted by start time.
    fn find_free_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Slot>, StoreError>;

    /// Apply a partial update; returns the updated slot, `None` when the
    /// id does not exist.
    fn update(&self, id: &str, update: SlotUpdate) -> BoxFuture<'_, Option<Slot>, StoreError>;

    /// Set the slot status. Returns `false` when the id does not exist.
    fn set_status(&self, id: &str, status: SlotStatus) -> BoxFuture<'_, bool, StoreError>;

    /// Delete a slot. Returns `false` when the id does not exist.
    fn delete(&self, id: &str) -> BoxFuture<'_, bool, StoreError>;
}

/// MongoDB-backed slot repository.
pub struct MongoSlotRepository {
    collection: Collection<DbSlot>,
}

impl MongoSlotRepository {
    pub fn new(client: &StoreClient) -> Self {
        Self {
            collection: client.database().collection(COLLECTION),
        }
    }

    async fn collect_sorted(&self, filter: Document) -> Result<Vec<Slot>, StoreError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "start_time": 1 })
            .await?;
        let slots: Vec<DbSlot> = cursor.try_collect().await?;
        Ok(slots.into_iter().map(Slot::from).collect())
    }
}

impl SlotRepository for MongoSlotRepository {
    fn insert(&self, slot: Slot) -> BoxFuture<'_, Slot, StoreError> {
        Box::pin(async move {
            let mut db_slot = DbSlot::from(slot);
            db_slot.id = None;
            let result = self.collection.insert_one(&db_slot).await?;
            db_slot.id = result.inserted_id.as_object_id();
            Ok(Slot::from(db_slot))
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Slot>, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let found = self.collection.find_one(doc! { "_id": oid? }).await?;
            Ok(found.map(Slot::from))
        })
    }

    fn find_all(&self) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        Box::pin(self.collect_sorted(doc! {}))
    }

    fn find_free(&self) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        Box::pin(self.collect_sorted(doc! { "status": SlotStatus::Free.as_str() }))
    }

    fn find_free_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        let filter = doc! {
            "status": SlotStatus::Free.as_str(),
            "start_time": {
                "$gte": BsonDateTime::from_chrono(start),
                "$lt": BsonDateTime::from_chrono(end),
            },
        };
        Box::pin(self.collect_sorted(filter))
    }

    fn update(&self, id: &str, update: SlotUpdate) -> BoxFuture<'_, Option<Slot>, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let oid = oid?;

            let mut set = Document::new();
            if let Some(service_id) = update.service_id {
                set.insert("service_id", ObjectId::parse_str(&service_id)?);
            }
            if let Some(start_time) = update.start_time {
                set.insert("start_time", BsonDateTime::from_chrono(start_time));
            }
            if let Some(end_time) = update.end_time {
                set.insert("end_time", BsonDateTime::from_chrono(end_time));
            }
            if let Some(status) = update.status {
                set.insert("status", status.as_str());
            }

            if set.is_empty() {
                let found = self.collection.find_one(doc! { "_id": oid }).await?;
                return Ok(found.map(Slot::from));
            }

            let found = self
                .collection
                .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
                .return_document(ReturnDocument::After)
                .await?;
            Ok(found.map(Slot::from))
        })
    }

    fn set_status(&self, id: &str, status: SlotStatus) -> BoxFuture<'_, bool, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let result = self
                .collection
                .update_one(
                    doc! { "_id": oid? },
                    doc! { "$set": { "status": status.as_str() } },
                )
                .await?;
            Ok(result.matched_count > 0)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, bool, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let result = self.collection.delete_one(doc! { "_id": oid? }).await?;
            Ok(result.deleted_count > 0)
        })
    }
}
