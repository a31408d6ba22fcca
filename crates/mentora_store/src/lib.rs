//! MongoDB persistence for Mentora.
//!
//! Holds the three booking collections (services, slots, reservations)
//! behind object-safe repository traits, so the domain crates work the
//! same against MongoDB in production and against the in-memory doubles
//! in tests.

pub mod client;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;


pub use client::StoreClient;
pub use error::StoreError;
pub use models::{
    DbReservation, DbService, DbSlot, Reservation, ReservationStatus, Service, Slot, SlotStatus,
};
pub use repositories::{
    MemoryReservationRepository, MemoryServiceRepository, MemorySlotRepository,
    MongoReservationRepository, MongoServiceRepository, MongoSlotRepository,
    ReservationRepository, ServiceRepository, SlotRepository, SlotUpdate,
};
pub use seed::seed_services;
