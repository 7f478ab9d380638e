use axum::{
    Json,
    extract::{Query, State},
    response::{Html, IntoResponse},
};

use crate::{
    AppState,
    error::ApiError,
    render,
    validation::validate_user_filter,
    view::{LoadOutcome, Trigger},
};

#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// No `user_id` means a fresh page load; any value, even empty, is a filter change.
fn trigger_for(query: HistoryQuery) -> Result<Trigger, ApiError> {
    match query.user_id {
        Some(value) => {
            validate_user_filter(&value)?;
            Ok(Trigger::FilterChanged(value))
        }
        None => Ok(Trigger::PageReady),
    }
}

async fn refresh(state: &AppState, query: HistoryQuery) -> Result<LoadOutcome, ApiError> {
    let trigger = trigger_for(query)?;
    Ok(state.view.handle(trigger).await)
}

#[utoipa::path(
    get,
    path = "/",
    params(
        ("user_id" = Option<String>, Query, description = "User to filter by; empty shows all users")
    ),
    responses(
        (status = 200, description = "Workout history page", content_type = "text/html"),
        (status = 400, description = "Invalid user filter")
    ),
    tag = "history"
)]
pub async fn history_page(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = refresh(&state, query).await?;
    let page = render::render_page(
        &state.settings.user_options(),
        &outcome.user_id,
        outcome.state.html(),
    )?;
    Ok(Html(page))
}

#[utoipa::path(
    get,
    path = "/workouts/list",
    params(
        ("user_id" = Option<String>, Query, description = "User to filter by; empty shows all users")
    ),
    responses(
        (status = 200, description = "Contents of the workout list region", content_type = "text/html"),
        (status = 400, description = "Invalid user filter")
    ),
    tag = "history"
)]
pub async fn workout_list(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = refresh(&state, query).await?;
    Ok(Html(outcome.state.html().to_string()))
}

#[utoipa::path(get, path = "/healthz/live", tag = "health")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "health")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}
