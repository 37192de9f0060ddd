use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    BookingLedger, BookingRequest, CalendarDate, RequesterDetails, TimeOfDay, WizardStep,
};
use crate::services::session::{BookingSession, SelectionError, SessionSnapshot};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    id: String,
    #[serde(flatten)]
    snapshot: SessionSnapshot,
}

fn respond(state: &AppState, id: &str, session: &BookingSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        id: id.to_string(),
        snapshot: session.snapshot(state.today()),
    })
}

// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let id = state.create_session()?;
    tracing::info!(session = %id, "booking session started");
    let response = state.with_session(&id, |s| Ok(respond(&state, &id, s)))?;
    Ok((StatusCode::CREATED, response))
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| Ok(respond(&state, &id, s)))
}

// POST /api/sessions/:id/month/next
pub async fn next_month(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        s.next_month()?;
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/month/prev
pub async fn prev_month(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        s.prev_month()?;
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/date
#[derive(Deserialize)]
pub struct SelectDateRequest {
    pub date: CalendarDate,
}

pub async fn select_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SelectDateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        let ledger = {
            let db = state.lock_db()?;
            queries::load_ledger_for_date(&db, body.date)?
        };
        s.select_date(body.date, state.today(), &ledger)?;
        tracing::info!(session = %id, date = %body.date, "date selected");
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/time
#[derive(Deserialize)]
pub struct SelectTimeRequest {
    pub time: TimeOfDay,
}

pub async fn select_time(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<SelectTimeRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        let date = s.selection().selected_date.ok_or_else(|| {
            SelectionError::InvalidSelection("select a date first".to_string())
        })?;
        let ledger = {
            let db = state.lock_db()?;
            queries::load_ledger_for_date(&db, date)?
        };
        s.select_time(body.time, &ledger)?;
        tracing::info!(session = %id, date = %date, time = %body.time, "time selected");
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/advance
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        s.advance()?;
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/back
#[derive(Deserialize)]
pub struct GoBackRequest {
    pub step: WizardStep,
}

pub async fn go_back(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<GoBackRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    state.with_session(&id, |s| {
        s.go_back(body.step)?;
        Ok(respond(&state, &id, s))
    })
}

// POST /api/sessions/:id/submit
#[derive(Serialize)]
pub struct SubmitResponse {
    booking: BookingRequest,
    confirmation: String,
    calendar_url: String,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(details): Json<RequesterDetails>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let request = state.with_session(&id, |s| {
        // The ledger check and the insert happen under one database lock,
        // and the session only moves to confirmed once the insert succeeded.
        let db = state.lock_db()?;
        let ledger = match s.selection().selected_date {
            Some(date) => queries::load_ledger_for_date(&db, date)?,
            None => BookingLedger::new(),
        };
        let mut next = s.clone();
        let request = next.submit(details, state.validator.as_ref(), &ledger)?;
        queries::create_booking(&db, &request)?;
        *s = next;
        Ok(request)
    });

    let request = match request {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(session = %id, error = %e, "submission rejected");
            return Err(e);
        }
    };

    tracing::info!(session = %id, booking_id = %request.id, "booking recorded");

    if let Err(e) = state.notifier.booking_confirmed(&request).await {
        tracing::error!(
            error = %e,
            booking_id = %request.id,
            "failed to send booking notification"
        );
    }

    let confirmation = format!(
        "{} at {} for {} ({})",
        request.date.to_long_string(),
        request.time,
        request.requester.name,
        request.requester.role,
    );
    let calendar_url = format!("/calendar/{}.ics", request.id);

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            booking: request,
            confirmation,
            calendar_url,
        }),
    ))
}
