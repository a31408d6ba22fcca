// --- File: crates/mentora_booking/src/handlers.rs ---
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use mentora_common::HttpStatusCode;
use mentora_config::AppConfig;
use mentora_store::{
    Reservation, ReservationRepository, ServiceRepository, Slot, SlotRepository, SlotStatus,
    SlotUpdate,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::auth::{issue_admin_token, verify_admin_credentials};
use crate::error::BookingError;
use crate::logic::{
    day_window, display_timezone, summarize_free_slots, CreateReservationRequest,
    CreateReservationResponse, DaySummary, ReservationOrchestrator,
};

// --- State for Booking Handlers ---
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub services: Arc<dyn ServiceRepository>,
    pub slots: Arc<dyn SlotRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub orchestrator: Arc<ReservationOrchestrator>,
}

fn error_response(e: BookingError) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("Booking request failed: {}", e);
    }
    (status, e.to_string())
}

// --- Login ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// `POST /login` — fixed-credential admin login issuing a bearer token.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/login", // Path relative to /api
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Admin"
))]
pub async fn login_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    verify_admin_credentials(&payload.username, &payload.password).map_err(error_response)?;
    let (token, expires_in) =
        issue_admin_token(&payload.username, state.config.auth.token_ttl_minutes)
            .map_err(error_response)?;
    Ok(Json(LoginResponse { token, expires_in }))
}

// --- Public booking surface ---

/// `POST /reservations` — hold a free slot and open a checkout session.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/reservations", // Path relative to /api
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created, redirect to checkout", body = CreateReservationResponse),
        (status = 400, description = "Invalid customer data"),
        (status = 404, description = "Unknown service or slot"),
        (status = 409, description = "Slot is no longer free"),
        (status = 502, description = "Checkout session could not be created")
    ),
    tag = "Booking"
))]
pub async fn create_reservation_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), (StatusCode, String)> {
    let response = state
        .orchestrator
        .create_reservation(payload)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /slots/summary` — free-slot counts grouped by day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots/summary", // Path relative to /api
    responses(
        (status = 200, description = "Free slots per calendar day", body = [DaySummary])
    ),
    tag = "Booking"
))]
pub async fn slots_summary_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<DaySummary>>, (StatusCode, String)> {
    let free = state
        .slots
        .find_free()
        .await
        .map_err(|e| error_response(e.into()))?;
    let tz = display_timezone(&state.config);
    Ok(Json(summarize_free_slots(&free, tz)))
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotsQuery {
    /// Calendar day in the display timezone, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// `GET /slots?date=YYYY-MM-DD` — free slots for one day, sorted by start.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots", // Path relative to /api
    params(("date" = String, Query, description = "Day to list, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Free slots on that day, ascending by start"),
        (status = 400, description = "Missing or malformed date")
    ),
    tag = "Booking"
))]
pub async fn free_slots_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<Slot>>, (StatusCode, String)> {
    let date = query.date.as_deref().ok_or((
        StatusCode::BAD_REQUEST,
        "Missing 'date' query parameter".to_string(),
    ))?;
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("'{}' is not a valid date (expected YYYY-MM-DD)", date),
        )
    })?;
    let tz = display_timezone(&state.config);
    let (start, end) = day_window(day, tz).ok_or((
        StatusCode::BAD_REQUEST,
        format!("'{}' does not exist in timezone {}", date, tz),
    ))?;

    let slots = state
        .slots
        .find_free_between(start, end)
        .await
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(slots))
}

// --- Admin surface (behind the bearer middleware) ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateSlotRequest {
    pub service_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-10T10:00:00Z"))]
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// `GET /admin/slots` — every slot regardless of status.
#[axum::debug_handler]
pub async fn admin_list_slots_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<Slot>>, (StatusCode, String)> {
    let slots = state
        .slots
        .find_all()
        .await
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(slots))
}

/// `POST /admin/slots` — create a slot, always `free`.
#[axum::debug_handler]
pub async fn admin_create_slot_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<Slot>), (StatusCode, String)> {
    let slot = state
        .slots
        .insert(Slot {
            id: None,
            service_id: payload.service_id,
            start_time: payload.start_time,
            end_time: payload.end_time,
            status: SlotStatus::Free,
        })
        .await
        .map_err(|e| error_response(e.into()))?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// `PUT /admin/slots/{id}` — partial update; the admin may flip status.
#[axum::debug_handler]
pub async fn admin_update_slot_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
    Json(payload): Json<SlotUpdate>,
) -> Result<Json<Slot>, (StatusCode, String)> {
    let updated = state
        .slots
        .update(&id, payload)
        .await
        .map_err(|e| error_response(e.into()))?
        .ok_or_else(|| error_response(BookingError::SlotNotFound(id)))?;
    Ok(Json(updated))
}

/// `DELETE /admin/slots/{id}`.
#[axum::debug_handler]
pub async fn admin_delete_slot_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    let deleted = state
        .slots
        .delete(&id)
        .await
        .map_err(|e| error_response(e.into()))?;
    if !deleted {
        return Err(error_response(BookingError::SlotNotFound(id)));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

/// `GET /admin/reservations` — every reservation, newest first.
#[axum::debug_handler]
pub async fn admin_list_reservations_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<Vec<Reservation>>, (StatusCode, String)> {
    let reservations = state
        .reservations
        .find_all()
        .await
        .map_err(|e| error_response(e.into()))?;
    Ok(Json(reservations))
}

/// `DELETE /admin/reservations/{id}` — removes the record only; the slot
/// keeps whatever status it has.
#[axum::debug_handler]
pub async fn admin_delete_reservation_handler(
    State(state): State<Arc<BookingState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, (StatusCode, String)> {
    let deleted = state
        .reservations
        .delete(&id)
        .await
        .map_err(|e| error_response(e.into()))?;
    if !deleted {
        return Err(error_response(BookingError::ReservationNotFound(id)));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
