use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingStatus, CalendarDate, TimeOfDay};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    date: CalendarDate,
    time: TimeOfDay,
    name: String,
    email: String,
    role: String,
    status: String,
    created_at: String,
    updated_at: String,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = query.status.as_deref();

    let bookings = {
        let db = state.lock_db()?;
        queries::get_all_bookings(&db, status_filter, limit)?
    };

    let response: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| BookingResponse {
            id: b.id,
            date: b.date,
            time: b.time,
            name: b.requester.name,
            email: b.requester.email,
            role: b.requester.role,
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let db = state.lock_db()?;
        queries::update_booking_status(&db, &id, &BookingStatus::Cancelled)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    tracing::info!(booking_id = %id, "booking cancelled");
    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/blocked
#[derive(Serialize)]
pub struct BlockedResponse {
    date: CalendarDate,
    time: TimeOfDay,
    reason: Option<String>,
}

pub async fn get_blocked(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlockedResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let blocked = {
        let db = state.lock_db()?;
        queries::list_blocked(&db)?
    };

    let response = blocked
        .into_iter()
        .map(|b| BlockedResponse {
            date: b.date,
            time: b.time,
            reason: b.reason,
        })
        .collect();

    Ok(Json(response))
}

// POST /api/admin/block
#[derive(Deserialize)]
pub struct BlockRequest {
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub reason: Option<String>,
}

pub async fn block_slot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<BlockRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    {
        let db = state.lock_db()?;
        queries::block_slot(&db, body.date, body.time, body.reason.as_deref())?;
    }

    tracing::info!(date = %body.date, time = %body.time, "slot blocked");
    Ok(Json(serde_json::json!({"ok": true})))
}

// POST /api/admin/unblock
#[derive(Deserialize)]
pub struct UnblockRequest {
    pub date: CalendarDate,
    pub time: TimeOfDay,
}

pub async fn unblock_slot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UnblockRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let removed = {
        let db = state.lock_db()?;
        queries::unblock_slot(&db, body.date, body.time)?
    };

    if !removed {
        return Err(AppError::NotFound("slot is not blocked".to_string()));
    }
    Ok(Json(serde_json::json!({"ok": true})))
}
