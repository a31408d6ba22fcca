// --- File: crates/mentora_booking/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    CreateSlotRequest, DeletedResponse, LoginRequest, LoginResponse, SlotsQuery,
};
use crate::logic::{CreateReservationRequest, CreateReservationResponse, DaySummary};

#[utoipa::path(
    post,
    path = "/login", // Path relative to /api
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Admin"
)]
fn doc_login_handler() {}

#[utoipa::path(
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
)]
fn doc_create_reservation_handler() {}

#[utoipa::path(
    get,
    path = "/slots/summary", // Path relative to /api
    responses(
        (status = 200, description = "Free slots per calendar day", body = [DaySummary])
    ),
    tag = "Booking"
)]
fn doc_slots_summary_handler() {}

#[utoipa::path(
    get,
    path = "/slots", // Path relative to /api
    params(("date" = String, Query, description = "Day to list, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Free slots on that day, ascending by start"),
        (status = 400, description = "Missing or malformed date")
    ),
    tag = "Booking"
)]
fn doc_free_slots_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_login_handler,
        doc_create_reservation_handler,
        doc_slots_summary_handler,
        doc_free_slots_handler
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            CreateReservationRequest,
            CreateReservationResponse,
            CreateSlotRequest,
            DeletedResponse,
            SlotsQuery,
            DaySummary
        )
    ),
    tags(
        (name = "Booking", description = "Public booking and availability API"),
        (name = "Admin", description = "Admin login and slot/reservation management")
    )
)]
pub struct BookingApiDoc;
