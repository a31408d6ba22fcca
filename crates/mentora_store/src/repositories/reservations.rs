//! Repository for reservations.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::models::{DbReservation, Reservation, ReservationStatus};
use bson::{doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mentora_common::services::BoxFuture;
use mongodb::Collection;

const COLLECTION: &str = "reservations";

/// Repository for reservations.
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation and return it with its id set.
    fn insert(&self, reservation: Reservation) -> BoxFuture<'_, Reservation, StoreError>;

    /// Find a reservation by id.
    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Reservation>, StoreError>;

    /// All reservations, newest first.
    fn find_all(&self) -> BoxFuture<'_, Vec<Reservation>, StoreError>;

    /// Flip a `pending` reservation to `paid` and record the checkout
    /// session. Returns `false` when the reservation does not exist or is
    /// not pending, so repeated confirmations stay idempotent.
    fn mark_paid(&self, id: &str, checkout_session_id: &str) -> BoxFuture<'_, bool, StoreError>;

    /// Store the meeting link. Returns `false` when the id does not exist.
    fn set_meeting_link(&self, id: &str, link: &str) -> BoxFuture<'_, bool, StoreError>;

    /// Delete a reservation. Returns `false` when the id does not exist.
    fn delete(&self, id: &str) -> BoxFuture<'_, bool, StoreError>;
}

/// MongoDB-backed reservation repository.
pub struct MongoReservationRepository {
    collection: Collection<DbReservation>,
}

impl MongoReservationRepository {
    pub fn new(client: &StoreClient) -> Self {
        Self {
            collection: client.database().collection(COLLECTION),
        }
    }
}

impl ReservationRepository for MongoReservationRepository {
    fn insert(&self, reservation: Reservation) -> BoxFuture<'_, Reservation, StoreError> {
        Box::pin(async move {
            let mut db_reservation = DbReservation::try_from(reservation)?;
            db_reservation.id = None;
            let result = self.collection.insert_one(&db_reservation).await?;
            db_reservation.id = result.inserted_id.as_object_id();
            Ok(Reservation::from(db_reservation))
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let oid = ObjectId::parse_str(id);
        Box::pin(async move {
            let found = self.collection.find_one(doc! { "_id": oid? }).await?;
            Ok(found.map(Reservation::from))
        })
    }

    fn find_all(&self) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        Box::pin(async move {
            let cursor = self
                .collection
                .find(doc! {})
                .sort(doc! { "created_at": -1 })
                .await?;
            let reservations: Vec<DbReservation> = cursor.try_collect().await?;
            Ok(reservations.into_iter().map(Reservation::from).collect())
        })
    }

    fn mark_paid(&self, id: &str, checkout_session_id: &str) -> BoxFuture<'_, bool, StoreError> {
        let oid = ObjectId::parse_str(id);
        let session_id = checkout_session_id.to_string();
        Box::pin(async move {
            let result = self
                .collection
                .update_one(
                    doc! {
                        "_id": oid?,
                        "status": ReservationStatus::Pending.as_str(),
                    },
                    doc! { "$set": {
                        "status": ReservationStatus::Paid.as_str(),
                        "checkout_session_id": session_id,
                    }},
                )
                .await?;
            Ok(result.matched_count > 0)
        })
    }

    fn set_meeting_link(&self, id: &str, link: &str) -> BoxFuture<'_, bool, StoreError> {
        let oid = ObjectId::parse_str(id);
        let link = link.to_string();
        Box::pin(async move {
            let result = self
                .collection
                .update_one(
                    doc! { "_id": oid? },
                    doc! { "$set": { "meeting_link": link } },
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
