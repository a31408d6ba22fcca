//! Repository for the service catalog.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::models::{DbService, Service};
use bson::{doc, oid::ObjectId};
use mentora_common::services::BoxFuture;
use mongodb::Collection;

const COLLECTION: &str = "services";

/// Repository for bookable services.
///
/// Services are immutable reference data: inserted once (seeding) and read
/// afterwards. There is deliberately no update or delete.
pub trait ServiceRepository: Send + Sync {
    /// Insert a service and return it with its id set.
    fn insert(&self, service: Service) -> BoxFuture<'_, Service, StoreError>;

    /// Find a service by id.
    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Service>, StoreError>;

    /// Find a service by its title. Used to keep seeding idempotent.
    fn find_by_title(&self, title: &str) -> BoxFuture<'_, Option<Service>, StoreError>;
}

/// MongoDB-backed service repository.
pub struct MongoServiceRepository {
    collection: Collection<DbService>,
}

impl MongoServiceRepository {
    pub fn new(client: &StoreClient) -> Self {
        Self {
            collection: client.database().collection(COLLECTION),
        }
    }
}

impl ServiceRepository for MongoServiceRepository {
    fn insert(&self, service: Service) -> BoxFuture<'_, Service, StoreError> {
        Box::pin(async move {
            let mut db_service = DbService::from(service);
            db_service.id = None;
            let result = self.collection.insert_one(&db_service).await?;
            db_service.id = result.inserted_id.as_object_id();
            Ok(Service::from(db_service))
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Service>, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let found = self.collection.find_one(doc! { "_id": oid? }).await?;
            Ok(found.map(Service::from))
        })
    }

    fn find_by_title(&self, title: &str) -> BoxFuture<'_, Option<Service>, StoreError> {
        let filter = doc! { "title": title };
        Box::pin(async move {
            let found = self.collection.find_one(filter).await?;
            Ok(found.map(Service::from))
        })
    }
}
