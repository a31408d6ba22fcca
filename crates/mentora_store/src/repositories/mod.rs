//! Repositories for the booking store.
//!
//! Each entity gets an object-safe trait plus its MongoDB implementation;
//! the `memory` module provides in-process implementations used as test
//! doubles by dependent crates.

pub mod memory;
pub mod reservations;
pub mod services;
pub mod slots;

pub use memory::{MemoryReservationRepository, MemoryServiceRepository, MemorySlotRepository};
pub use reservations::{MongoReservationRepository, ReservationRepository};
pub use services::{MongoServiceRepository, ServiceRepository};
pub use slots::{MongoSlotRepository, SlotRepository, SlotUpdate};
