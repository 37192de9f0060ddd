pub mod admin;
pub mod calendar;
pub mod health;
pub mod schedule;
pub mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/rules", get(schedule::get_rules))
        .route("/api/calendar/:year/:month", get(schedule::get_month))
        .route("/api/slots/:date", get(schedule::get_slots))
        .route("/api/sessions", post(session::create_session))
        .route("/api/sessions/:id", get(session::get_session))
        .route("/api/sessions/:id/month/next", post(session::next_month))
        .route("/api/sessions/:id/month/prev", post(session::prev_month))
        .route("/api/sessions/:id/date", post(session::select_date))
        .route("/api/sessions/:id/time", post(session::select_time))
        .route("/api/sessions/:id/advance", post(session::advance))
        .route("/api/sessions/:id/back", post(session::go_back))
        .route("/api/sessions/:id/submit", post(session::submit))
        .route("/calendar/:booking_id", get(calendar::download_ics))
        .route("/api/admin/bookings", get(admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(admin::cancel_booking),
        )
        .route("/api/admin/blocked", get(admin::get_blocked))
        .route("/api/admin/block", post(admin::block_slot))
        .route("/api/admin/unblock", post(admin::unblock_slot))
        .with_state(state)
}
