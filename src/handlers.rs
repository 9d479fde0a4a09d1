use crate::controller::{search_daily, search_monthly};
use crate::errors::AppError;
use crate::models::{PageState, SearchQuery, SearchView};
use crate::report_config::read_gate;
use crate::sanitize::sanitize_digits;
use crate::state::AppState;
use crate::ui::{render_daily_page, render_landing, render_monthly_page};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let gate = read_gate(state.config.as_ref()).await;
    Html(render_landing(&gate))
}

pub async fn daily_page(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Html<String> {
    let (prefill, view) = match query.dni {
        Some(raw) => (
            sanitize_digits(&raw),
            search_daily(state.daily_records.as_ref(), &raw).await,
        ),
        None => (String::new(), SearchView::idle()),
    };
    Html(render_daily_page(&prefill, &view))
}

pub async fn monthly_page(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Html<String> {
    let (prefill, view) = match query.dni {
        Some(raw) => (
            sanitize_digits(&raw),
            search_monthly(state.monthly_records.as_ref(), state.config.as_ref(), &raw).await,
        ),
        None => (String::new(), SearchView::idle()),
    };
    Html(render_monthly_page(&prefill, &view))
}

pub async fn daily_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<(StatusCode, Json<SearchView>), AppError> {
    let raw = required_dni(query)?;
    let view = search_daily(state.daily_records.as_ref(), &raw).await;
    Ok((status_for(&view), Json(view)))
}

pub async fn monthly_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<(StatusCode, Json<SearchView>), AppError> {
    let raw = required_dni(query)?;
    let view = search_monthly(state.monthly_records.as_ref(), state.config.as_ref(), &raw).await;
    Ok((status_for(&view), Json(view)))
}

fn required_dni(query: SearchQuery) -> Result<String, AppError> {
    query
        .dni
        .ok_or_else(|| AppError::bad_request("missing dni query parameter"))
}

fn status_for(view: &SearchView) -> StatusCode {
    match view.state {
        PageState::Idle => StatusCode::BAD_REQUEST,
        PageState::Success => StatusCode::OK,
        PageState::NotFound => StatusCode::NOT_FOUND,
        PageState::Error => StatusCode::BAD_GATEWAY,
    }
}
