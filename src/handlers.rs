use crate::errors::AppError;
use crate::form::FormEdit;
use crate::models::{SelectWeekRequest, SessionResponse, WeekOption};
use crate::overview::{WeekOverview, build_overview};
use crate::session::DebriefSession;
use crate::state::AppState;
use crate::storage::JsonFileStore;
use crate::week::{WeekKey, recent_weeks};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::Local;

const WEEK_OPTIONS: usize = 8;

pub async fn list_weeks(State(state): State<AppState>) -> Json<Vec<WeekOption>> {
    let statuses = state.store.statuses().await;
    let weeks = recent_weeks(Local::now().date_naive(), WEEK_OPTIONS)
        .into_iter()
        .map(|week| WeekOption {
            week,
            label: week.label(),
            status: statuses.get(&week).copied(),
        })
        .collect();
    Json(weeks)
}

pub async fn get_overview(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<Json<WeekOverview>, AppError> {
    let week: WeekKey = week.parse()?;
    Ok(Json(build_overview(
        &state.dashboard,
        week,
        state.reference_year,
        &state.classifiers,
    )))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(to_response(&session))
}

pub async fn select_week(
    State(state): State<AppState>,
    payload: Result<Json<SelectWeekRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(payload) = payload?;
    let mut session = state.session.lock().await;
    session.select_week(payload.week).await;
    Ok(Json(to_response(&session)))
}

pub async fn edit(
    State(state): State<AppState>,
    edit: Result<Json<FormEdit>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(edit) = edit?;
    let mut session = state.session.lock().await;
    session.edit(edit)?;
    Ok(Json(to_response(&session)))
}

pub async fn finalize(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.finalize().await?;
    Ok(Json(to_response(&session)))
}

pub async fn close(State(state): State<AppState>) -> Json<SessionResponse> {
    let mut session = state.session.lock().await;
    session.close();
    Json(to_response(&session))
}

fn to_response(session: &DebriefSession<JsonFileStore>) -> SessionResponse {
    SessionResponse {
        week: session.week(),
        record: session.record().cloned(),
        save_status: session.save_status(),
    }
}
