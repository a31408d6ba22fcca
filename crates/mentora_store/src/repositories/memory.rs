//! In-memory repository implementations.
//!
//! Behave like their MongoDB counterparts over a `Vec` behind a mutex.
//! Used as test doubles by dependent crates; ids are opaque uuid strings
//! rather than ObjectIds, so id-format validation only happens in the
//! Mongo implementations.

use crate::error::StoreError;
use crate::models::{Reservation, ReservationStatus, Service, Slot, SlotStatus};
use crate::repositories::{ReservationRepository, ServiceRepository, SlotRepository, SlotUpdate};
use chrono::{DateTime, Utc};
use mentora_common::services::BoxFuture;
use tokio::sync::Mutex;
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// In-memory service repository.
#[derive(Default)]
pub struct MemoryServiceRepository {
    items: Mutex<Vec<Service>>,
}

impl MemoryServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceRepository for MemoryServiceRepository {
    fn insert(&self, mut service: Service) -> BoxFuture<'_, Service, StoreError> {
        Box::pin(async move {
            service.id = Some(new_id());
            self.items.lock().await.push(service.clone());
            Ok(service)
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Service>, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(items
                .iter()
                .find(|s| s.id.as_deref() == Some(id.as_str()))
                .cloned())
        })
    }

    fn find_by_title(&self, title: &str) -> BoxFuture<'_, Option<Service>, StoreError> {
        let title = title.to_string();
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(items.iter().find(|s| s.title == title).cloned())
        })
    }
}

/// In-memory slot repository.
#[derive(Default)]
pub struct MemorySlotRepository {
    items: Mutex<Vec<Slot>>,
}

impl MemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_start(mut slots: Vec<Slot>) -> Vec<Slot> {
    slots.sort_by_key(|s| s.start_time);
    slots
}

impl SlotRepository for MemorySlotRepository {
    fn insert(&self, mut slot: Slot) -> BoxFuture<'_, Slot, StoreError> {
        Box::pin(async move {
            slot.id = Some(new_id());
            self.items.lock().await.push(slot.clone());
            Ok(slot)
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Slot>, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(items
                .iter()
                .find(|s| s.id.as_deref() == Some(id.as_str()))
                .cloned())
        })
    }

    fn find_all(&self) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(sorted_by_start(items.clone()))
        })
    }

    fn find_free(&self) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        Box::pin(async move {
            let items = self.items.lock().await;
            let free = items
                .iter()
                .filter(|s| s.status == SlotStatus::Free)
                .cloned()
                .collect();
            Ok(sorted_by_start(free))
        })
    }

    fn find_free_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Slot>, StoreError> {
        Box::pin(async move {
            let items = self.items.lock().await;
            let free = items
                .iter()
                .filter(|s| {
                    s.status == SlotStatus::Free && s.start_time >= start && s.start_time < end
                })
                .cloned()
                .collect();
            Ok(sorted_by_start(free))
        })
    }

    fn update(&self, id: &str, update: SlotUpdate) -> BoxFuture<'_, Option<Slot>, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            let slot = items
                .iter_mut()
                .find(|s| s.id.as_deref() == Some(id.as_str()));
            Ok(slot.map(|slot| {
                if let Some(service_id) = update.service_id {
                    slot.service_id = Some(service_id);
                }
                if let Some(start_time) = update.start_time {
                    slot.start_time = start_time;
                }
                if let Some(end_time) = update.end_time {
                    slot.end_time = Some(end_time);
                }
                if let Some(status) = update.status {
                    slot.status = status;
                }
                slot.clone()
            }))
        })
    }

    fn set_status(&self, id: &str, status: SlotStatus) -> BoxFuture<'_, bool, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            match items
                .iter_mut()
                .find(|s| s.id.as_deref() == Some(id.as_str()))
            {
                Some(slot) => {
                    slot.status = status;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, bool, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            let before = items.len();
            items.retain(|s| s.id.as_deref() != Some(id.as_str()));
            Ok(items.len() < before)
        })
    }
}

/// In-memory reservation repository.
#[derive(Default)]
pub struct MemoryReservationRepository {
    items: Mutex<Vec<Reservation>>,
}

impl MemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReservationRepository for MemoryReservationRepository {
    fn insert(&self, mut reservation: Reservation) -> BoxFuture<'_, Reservation, StoreError> {
        Box::pin(async move {
            reservation.id = Some(new_id());
            self.items.lock().await.push(reservation.clone());
            Ok(reservation)
        })
    }

    fn find_by_id(&self, id: &str) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let items = self.items.lock().await;
            Ok(items
                .iter()
                .find(|r| r.id.as_deref() == Some(id.as_str()))
                .cloned())
        })
    }

    fn find_all(&self) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        Box::pin(async move {
            let items = self.items.lock().await;
            let mut all = items.clone();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        })
    }

    fn mark_paid(&self, id: &str, checkout_session_id: &str) -> BoxFuture<'_, bool, StoreError> {
        let id = id.to_string();
        let session_id = checkout_session_id.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            match items.iter_mut().find(|r| {
                r.id.as_deref() == Some(id.as_str()) && r.status == ReservationStatus::Pending
            }) {
                Some(reservation) => {
                    reservation.status = ReservationStatus::Paid;
                    reservation.checkout_session_id = Some(session_id);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn set_meeting_link(&self, id: &str, link: &str) -> BoxFuture<'_, bool, StoreError> {
        let id = id.to_string();
        let link = link.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            match items
                .iter_mut()
                .find(|r| r.id.as_deref() == Some(id.as_str()))
            {
                Some(reservation) => {
                    reservation.meeting_link = Some(link);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, bool, StoreError> {
        let id = id.to_string();
        Box::pin(async move {
            let mut items = self.items.lock().await;
            let before = items.len();
            items.retain(|r| r.id.as_deref() != Some(id.as_str()));
            Ok(items.len() < before)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot_at(hour: u32, status: SlotStatus) -> Slot {
        Slot {
            id: None,
            service_id: None,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            end_time: None,
            status,
        }
    }

    fn pending_reservation(slot_id: &str) -> Reservation {
        Reservation {
            id: None,
            service_id: "svc".to_string(),
            slot_id: slot_id.to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: None,
            note: None,
            status: ReservationStatus::Pending,
            meeting_link: None,
            checkout_session_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn free_slot_queries_filter_and_sort() {
        let repo = MemorySlotRepository::new();
        repo.insert(slot_at(14, SlotStatus::Free)).await.unwrap();
        repo.insert(slot_at(9, SlotStatus::Free)).await.unwrap();
        repo.insert(slot_at(11, SlotStatus::Booked)).await.unwrap();

        let free = repo.find_free().await.unwrap();
        assert_eq!(free.len(), 2, "booked slot must not be listed");
        assert!(free[0].start_time < free[1].start_time);

        let window = repo
            .find_free_between(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(
            window[0].start_time,
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn set_status_books_a_slot() {
        let repo = MemorySlotRepository::new();
        let slot = repo.insert(slot_at(9, SlotStatus::Free)).await.unwrap();
        let id = slot.id.unwrap();

        assert!(repo.set_status(&id, SlotStatus::Booked).await.unwrap());
        let reloaded = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, SlotStatus::Booked);

        assert!(!repo.set_status("missing", SlotStatus::Free).await.unwrap());
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields() {
        let repo = MemorySlotRepository::new();
        let slot = repo.insert(slot_at(9, SlotStatus::Free)).await.unwrap();
        let id = slot.id.unwrap();

        let updated = repo
            .update(
                &id,
                SlotUpdate {
                    status: Some(SlotStatus::Booked),
                    ..SlotUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, SlotStatus::Booked);
        assert_eq!(updated.start_time, slot.start_time);
        assert!(updated.end_time.is_none());
    }

    #[tokio::test]
    async fn mark_paid_flips_pending_exactly_once() {
        let repo = MemoryReservationRepository::new();
        let reservation = repo.insert(pending_reservation("slot-1")).await.unwrap();
        let id = reservation.id.unwrap();

        assert!(repo.mark_paid(&id, "cs_123").await.unwrap());
        let paid = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(paid.status, ReservationStatus::Paid);
        assert_eq!(paid.checkout_session_id.as_deref(), Some("cs_123"));

        // second confirmation is a no-op
        assert!(!repo.mark_paid(&id, "cs_456").await.unwrap());
        let still_paid = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(still_paid.checkout_session_id.as_deref(), Some("cs_123"));
    }

    #[tokio::test]
    async fn reservations_list_newest_first() {
        let repo = MemoryReservationRepository::new();
        let mut first = pending_reservation("slot-1");
        first.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut second = pending_reservation("slot-2");
        second.created_at = Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap();
        repo.insert(first).await.unwrap();
        repo.insert(second).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].slot_id, "slot-2");
        assert_eq!(all[1].slot_id, "slot-1");
    }

    #[tokio::test]
    async fn seeding_lookup_finds_by_title() {
        let repo = MemoryServiceRepository::new();
        repo.insert(Service {
            id: None,
            title: "Career mentoring".to_string(),
            description: "1:1 session".to_string(),
            duration_minutes: 60,
            price: 9000,
            mentor_email: "mentor@example.com".to_string(),
        })
        .await
        .unwrap();

        assert!(repo
            .find_by_title("Career mentoring")
            .await
            .unwrap()
            .is_some());
        assert!(repo.find_by_title("Unknown").await.unwrap().is_none());
    }
}
