//! Domain models for the booking store.
//!
//! Each model comes in two shapes: the domain struct used by the rest of
//! the application (string ids, chrono timestamps, JSON-friendly) and a
//! `Db*` twin with ObjectId/BSON datetime fields as stored in MongoDB.

use bson::{oid::ObjectId, DateTime as BsonDateTime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a bookable slot.
///
/// `free → booked` happens when a reservation is created (optimistic hold)
/// or when a payment is confirmed. A booked slot never reverts on its own;
/// only the admin can free it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Free => "free",
            SlotStatus::Booked => "booked",
        }
    }
}

/// Lifecycle of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Paid => "paid",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// A bookable service. Immutable reference data seeded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: i64,
    pub mentor_email: String,
}

/// A time slot offered for booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Option<String>,
    /// Service this slot is dedicated to, if any.
    pub service_id: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Optional; when absent the service duration determines the window.
    pub end_time: Option<DateTime<Utc>>,
    pub status: SlotStatus,
}

/// A customer reservation for a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Option<String>,
    pub service_id: String,
    pub slot_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub note: Option<String>,
    pub status: ReservationStatus,
    /// Video meeting link, set after payment fulfillment.
    pub meeting_link: Option<String>,
    /// Checkout session the customer was sent to.
    pub checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- MongoDB document twins ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbService {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub duration_minutes: i64,
    pub price: i64,
    pub mentor_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSlot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ObjectId>,
    pub start_time: BsonDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<BsonDateTime>,
    pub status: SlotStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbReservation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub service_id: ObjectId,
    pub slot_id: ObjectId,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: ReservationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_session_id: Option<String>,
    pub created_at: BsonDateTime,
}

// --- Conversions ---

fn oid_to_hex(id: Option<ObjectId>) -> Option<String> {
    id.map(|oid| oid.to_hex())
}

fn hex_to_oid(id: Option<&String>) -> Option<ObjectId> {
    id.and_then(|s| ObjectId::parse_str(s).ok())
}

impl From<DbService> for Service {
    fn from(db: DbService) -> Self {
        Self {
            id: oid_to_hex(db.id),
            title: db.title,
            description: db.description,
            duration_minutes: db.duration_minutes,
            price: db.price,
            mentor_email: db.mentor_email,
        }
    }
}

impl From<Service> for DbService {
    fn from(service: Service) -> Self {
        Self {
            id: hex_to_oid(service.id.as_ref()),
            title: service.title,
            description: service.description,
            duration_minutes: service.duration_minutes,
            price: service.price,
            mentor_email: service.mentor_email,
        }
    }
}

impl From<DbSlot> for Slot {
    fn from(db: DbSlot) -> Self {
        Self {
            id: oid_to_hex(db.id),
            service_id: oid_to_hex(db.service_id),
            start_time: db.start_time.to_chrono(),
            end_time: db.end_time.map(|t| t.to_chrono()),
            status: db.status,
        }
    }
}

impl From<Slot> for DbSlot {
    fn from(slot: Slot) -> Self {
        Self {
            id: hex_to_oid(slot.id.as_ref()),
            service_id: hex_to_oid(slot.service_id.as_ref()),
            start_time: BsonDateTime::from_chrono(slot.start_time),
            end_time: slot.end_time.map(BsonDateTime::from_chrono),
            status: slot.status,
        }
    }
}

impl From<DbReservation> for Reservation {
    fn from(db: DbReservation) -> Self {
        Self {
            id: oid_to_hex(db.id),
            service_id: db.service_id.to_hex(),
            slot_id: db.slot_id.to_hex(),
            customer_name: db.customer_name,
            customer_email: db.customer_email,
            customer_phone: db.customer_phone,
            note: db.note,
            status: db.status,
            meeting_link: db.meeting_link,
            checkout_session_id: db.checkout_session_id,
            created_at: db.created_at.to_chrono(),
        }
    }
}

impl TryFrom<Reservation> for DbReservation {
    type Error = bson::oid::Error;

    fn try_from(reservation: Reservation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: hex_to_oid(reservation.id.as_ref()),
            service_id: ObjectId::parse_str(&reservation.service_id)?,
            slot_id: ObjectId::parse_str(&reservation.slot_id)?,
            customer_name: reservation.customer_name,
            customer_email: reservation.customer_email,
            customer_phone: reservation.customer_phone,
            note: reservation.note,
            status: reservation.status,
            meeting_link: reservation.meeting_link,
            checkout_session_id: reservation.checkout_session_id,
            created_at: BsonDateTime::from_chrono(reservation.created_at),
        })
    }
}
