// --- File: crates/mentora_booking/src/logic.rs ---
//! Core booking logic: reservation creation and post-payment fulfillment.
//!
//! `ReservationOrchestrator` is the only place where several state
//! transitions must agree: it marks the reservation paid, books the slot
//! and runs the follow-up side effects (meeting creation, confirmation
//! email). Side-effect failures after payment are logged and swallowed,
//! never rolled back.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use mentora_common::services::{
    BoxFuture, BoxedError, CheckoutRequest, CheckoutService, FulfillmentService, MeetingRequest,
    NotificationService, PaymentConfirmation, SchedulerService,
};
use mentora_config::AppConfig;
use mentora_notify::confirmation_email;
use mentora_store::{
    Reservation, ReservationRepository, ReservationStatus, Service, ServiceRepository, Slot,
    SlotRepository, SlotStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Payload of `POST /reservations`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateReservationRequest {
    pub service_id: String,
    pub slot_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
}

/// Response of `POST /reservations`: where to send the customer next.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateReservationResponse {
    pub reservation_id: String,
    pub checkout_url: String,
}

/// One row of the public availability summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DaySummary {
    /// Calendar day in the display timezone, `YYYY-MM-DD`.
    pub date: String,
    pub free_count: usize,
}

use crate::error::BookingError;

/// Timezone slot times are rendered and grouped in.
///
/// Uses `gcal.time_zone` when set (it is the zone the meetings live in),
/// UTC otherwise.
pub fn display_timezone(config: &AppConfig) -> Tz {
    config
        .gcal
        .as_ref()
        .and_then(|g| g.time_zone.as_deref())
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(chrono_tz::UTC)
}

/// UTC window covering one calendar day in the given zone.
///
/// `None` for dates that do not exist in the zone (DST edge at midnight).
pub fn day_window(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()?;
    let end = tz
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Group free slots by calendar day in the given zone, sorted by date.
pub fn summarize_free_slots(slots: &[Slot], tz: Tz) -> Vec<DaySummary> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for slot in slots {
        let day = slot.start_time.with_timezone(&tz).date_naive();
        *by_day.entry(day).or_default() += 1;
    }
    by_day
        .into_iter()
        .map(|(date, free_count)| DaySummary {
            date: date.format("%Y-%m-%d").to_string(),
            free_count,
        })
        .collect()
}

fn validate_customer(name: &str, email: &str) -> Result<(), BookingError> {
    if name.trim().is_empty() {
        return Err(BookingError::Validation("name must not be empty".to_string()));
    }
    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !plausible {
        return Err(BookingError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(())
}

/// Coordinates the slot-reservation/payment state machine.
pub struct ReservationOrchestrator {
    config: Arc<AppConfig>,
    services: Arc<dyn ServiceRepository>,
    slots: Arc<dyn SlotRepository>,
    reservations: Arc<dyn ReservationRepository>,
    scheduler: Option<Arc<dyn SchedulerService<Error = BoxedError>>>,
    notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
    checkout: Option<Arc<dyn CheckoutService<Error = BoxedError>>>,
}

impl ReservationOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<AppConfig>,
        services: Arc<dyn ServiceRepository>,
        slots: Arc<dyn SlotRepository>,
        reservations: Arc<dyn ReservationRepository>,
        scheduler: Option<Arc<dyn SchedulerService<Error = BoxedError>>>,
        notifier: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
        checkout: Option<Arc<dyn CheckoutService<Error = BoxedError>>>,
    ) -> Self {
        Self {
            config,
            services,
            slots,
            reservations,
            scheduler,
            notifier,
            checkout,
        }
    }

    /// Book a free slot and open a checkout session for it.
    ///
    /// The slot is marked `booked` before payment (optimistic hold, no
    /// expiry). There is deliberately no compare-and-swap between the
    /// status read and the write: two overlapping requests can both
    /// observe `free` and both proceed. The sequential case is caught and
    /// answered with a conflict.
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> Result<CreateReservationResponse, BookingError> {
        validate_customer(&request.name, &request.email)?;

        let service = self
            .services
            .find_by_id(&request.service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(request.service_id.clone()))?;
        let slot = self
            .slots
            .find_by_id(&request.slot_id)
            .await?
            .ok_or_else(|| BookingError::SlotNotFound(request.slot_id.clone()))?;
        if slot.status != SlotStatus::Free {
            return Err(BookingError::SlotUnavailable(request.slot_id.clone()));
        }

        self.slots
            .set_status(&request.slot_id, SlotStatus::Booked)
            .await?;

        let reservation = self
            .reservations
            .insert(Reservation {
                id: None,
                service_id: request.service_id.clone(),
                slot_id: request.slot_id.clone(),
                customer_name: request.name.clone(),
                customer_email: request.email.clone(),
                customer_phone: request.phone.clone(),
                note: request.note.clone(),
                status: ReservationStatus::Pending,
                meeting_link: None,
                checkout_session_id: None,
                created_at: Utc::now(),
            })
            .await?;
        let reservation_id = reservation
            .id
            .ok_or_else(|| BookingError::Internal("inserted reservation has no id".to_string()))?;

        info!(
            "Reservation {} created for slot {} ({})",
            reservation_id, request.slot_id, service.title
        );

        let checkout = self
            .checkout
            .as_ref()
            .ok_or_else(|| BookingError::Checkout("checkout service is not configured".to_string()))?;
        let currency = self
            .config
            .stripe
            .as_ref()
            .and_then(|s| s.default_currency.clone())
            .unwrap_or_else(|| "usd".to_string());

        // A failure here leaves the slot booked and the reservation pending;
        // the admin cleans up. No rollback anywhere in this flow.
        let session = checkout
            .create_checkout(CheckoutRequest {
                product_name: service.title.clone(),
                amount: service.price,
                currency,
                customer_email: Some(request.email.clone()),
                reservation_id: reservation_id.clone(),
                slot_id: request.slot_id.clone(),
            })
            .await
            .map_err(|e| BookingError::Checkout(e.to_string()))?;

        Ok(CreateReservationResponse {
            reservation_id,
            checkout_url: session.url,
        })
    }

    /// §4.1 orchestration: runs once a checkout session is known paid.
    async fn fulfill(&self, confirmation: PaymentConfirmation) -> Result<(), BookingError> {
        let reservation = self
            .reservations
            .find_by_id(&confirmation.reservation_id)
            .await?
            .ok_or_else(|| {
                BookingError::ReservationNotFound(confirmation.reservation_id.clone())
            })?;

        // Webhook and /stripe/verify can both deliver the same confirmation.
        if reservation.status == ReservationStatus::Paid {
            info!(
                "Reservation {} already fulfilled, skipping",
                confirmation.reservation_id
            );
            return Ok(());
        }

        let flipped = self
            .reservations
            .mark_paid(
                &confirmation.reservation_id,
                &confirmation.checkout_session_id,
            )
            .await?;
        if !flipped {
            warn!(
                "Reservation {} was not pending when payment arrived",
                confirmation.reservation_id
            );
        }
        // No-op when the optimistic hold already booked it.
        self.slots
            .set_status(&confirmation.slot_id, SlotStatus::Booked)
            .await?;
        info!(
            "Reservation {} marked paid, slot {} booked (session {})",
            confirmation.reservation_id, confirmation.slot_id, confirmation.checkout_session_id
        );

        // Everything below is best effort: the payment state stays as it is
        // whatever happens to the meeting or the email.
        let (slot, service) = match self.load_booking_context(&reservation).await {
            Ok(pair) => pair,
            Err(e) => {
                error!(
                    "Could not load slot/service for reservation {} after payment: {}",
                    confirmation.reservation_id, e
                );
                return Ok(());
            }
        };

        if let Some(scheduler) = &self.scheduler {
            match self
                .create_meeting(scheduler.as_ref(), &reservation, &service, &slot)
                .await
            {
                Ok(Some(link)) => {
                    if let Err(e) = self
                        .reservations
                        .set_meeting_link(&confirmation.reservation_id, &link)
                        .await
                    {
                        error!(
                            "Failed to store meeting link for reservation {}: {}",
                            confirmation.reservation_id, e
                        );
                    }
                }
                Ok(None) => warn!(
                    "Meeting created without a link for reservation {}",
                    confirmation.reservation_id
                ),
                Err(e) => error!(
                    "Meeting creation failed for reservation {}: {}",
                    confirmation.reservation_id, e
                ),
            }
        }

        if let Some(notifier) = &self.notifier {
            // Reload so the email carries the stored meeting link.
            match self
                .reservations
                .find_by_id(&confirmation.reservation_id)
                .await
            {
                Ok(Some(fresh)) => {
                    let email =
                        confirmation_email(&fresh, &service, &slot, display_timezone(&self.config));
                    if let Err(e) = notifier
                        .send_email(&fresh.customer_email, &email.subject, &email.html_body, true)
                        .await
                    {
                        error!(
                            "Confirmation email failed for reservation {}: {}",
                            confirmation.reservation_id, e
                        );
                    }
                }
                Ok(None) => warn!(
                    "Reservation {} vanished before the confirmation email",
                    confirmation.reservation_id
                ),
                Err(e) => error!(
                    "Could not reload reservation {} for the email: {}",
                    confirmation.reservation_id, e
                ),
            }
        }

        Ok(())
    }

    async fn load_booking_context(
        &self,
        reservation: &Reservation,
    ) -> Result<(Slot, Service), BookingError> {
        let slot = self
            .slots
            .find_by_id(&reservation.slot_id)
            .await?
            .ok_or_else(|| BookingError::SlotNotFound(reservation.slot_id.clone()))?;
        let service = self
            .services
            .find_by_id(&reservation.service_id)
            .await?
            .ok_or_else(|| BookingError::ServiceNotFound(reservation.service_id.clone()))?;
        Ok((slot, service))
    }

    async fn create_meeting(
        &self,
        scheduler: &dyn SchedulerService<Error = BoxedError>,
        reservation: &Reservation,
        service: &Service,
        slot: &Slot,
    ) -> Result<Option<String>, BoxedError> {
        // Slot end falls back to start + service duration.
        let end_time = slot
            .end_time
            .unwrap_or(slot.start_time + Duration::minutes(service.duration_minutes));
        let result = scheduler
            .create_meeting(MeetingRequest {
                summary: format!("{} with {}", service.title, reservation.customer_name),
                description: reservation.note.clone(),
                start_time: slot.start_time,
                end_time,
                attendees: vec![
                    reservation.customer_email.clone(),
                    service.mentor_email.clone(),
                ],
            })
            .await?;
        Ok(result.meeting_link)
    }
}

impl FulfillmentService for ReservationOrchestrator {
    type Error = BoxedError;

    fn fulfill_paid_reservation(
        &self,
        confirmation: PaymentConfirmation,
    ) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.fulfill(confirmation)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}
