// --- File: crates/mentora_booking/src/routes.rs ---

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::auth::admin_auth_middleware;
use crate::handlers::{
    admin_create_slot_handler, admin_delete_reservation_handler, admin_delete_slot_handler,
    admin_list_reservations_handler, admin_list_slots_handler, admin_update_slot_handler,
    create_reservation_handler, free_slots_handler, login_handler, slots_summary_handler,
    BookingState,
};

/// Creates a router containing all routes for the booking feature.
///
/// The `/admin` subtree sits behind the bearer-token middleware; the rest
/// is public.
pub fn routes(state: BookingState) -> Router {
    let state = Arc::new(state);

    let admin = Router::new()
        .route(
            "/admin/slots",
            get(admin_list_slots_handler).post(admin_create_slot_handler),
        )
        .route(
            "/admin/slots/{id}",
            put(admin_update_slot_handler).delete(admin_delete_slot_handler),
        )
        .route("/admin/reservations", get(admin_list_reservations_handler))
        .route(
            "/admin/reservations/{id}",
            delete(admin_delete_reservation_handler),
        )
        .layer(middleware::from_fn(admin_auth_middleware));

    Router::new()
        .route("/login", post(login_handler))
        .route("/reservations", post(create_reservation_handler))
        .route("/slots/summary", get(slots_summary_handler))
        .route("/slots", get(free_slots_handler))
        .merge(admin)
        .with_state(state)
}
