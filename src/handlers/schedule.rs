use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{CalendarDate, RuleSet};
use crate::services::navigator::{self, MonthView};
use crate::services::slots::{self, Slot, SlotSummary};
use crate::state::AppState;

// GET /api/rules
#[derive(Serialize)]
pub struct RulesResponse {
    rules: RuleSet,
    summary: String,
}

pub async fn get_rules(State(state): State<Arc<AppState>>) -> Json<RulesResponse> {
    Json(RulesResponse {
        rules: state.rules.as_ref().clone(),
        summary: state.rules.to_human_readable(),
    })
}

// GET /api/calendar/:year/:month
pub async fn get_month(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthView>, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::NotFound(format!("month {year}-{month}")));
    }
    Ok(Json(navigator::eligible_days(
        year,
        month,
        state.today(),
        &state.rules,
    )))
}

// GET /api/slots/:date
#[derive(Serialize)]
pub struct SlotsResponse {
    date: CalendarDate,
    slots: Vec<Slot>,
    summary: SlotSummary,
    message: &'static str,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(raw_date): Path<String>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = CalendarDate::parse_key(&raw_date)?;
    let ledger = {
        let db = state.lock_db()?;
        queries::load_ledger_for_date(&db, date)?
    };

    let day = slots::generate(date, &state.rules, &ledger);
    Ok(Json(SlotsResponse {
        date,
        summary: day.summary(),
        message: day.message(),
        slots: day.slots,
    }))
}
