//! HTTP request handlers

use super::state::AppState;
use crate::query::FilterState;
use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// "My Documents" listing for the authenticated user
pub async fn my_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let user = match state.users.current_user(&headers) {
        Some(user) => user,
        None => return error_response(StatusCode::UNAUTHORIZED, "no authenticated user"),
    };

    let filters = FilterState::from_query_str(query.as_deref().unwrap_or_default());
    let view = state.views.for_user(&user).await;

    match view.set_filters(filters).await {
        Ok(outcome) => Json(outcome.into_results()).into_response(),
        Err(e) => {
            tracing::error!(user = %user.email, error = %e, "Listing failed");
            let message = if state.settings.general.debug {
                e.to_string()
            } else {
                "search service unavailable".to_string()
            };
            error_response(StatusCode::BAD_GATEWAY, message)
        }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Source statistics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let active_views = state.views.len().await;
    Json(json!({
        "totalListings": state.metrics.get_total_listings(),
        "activeViews": active_views,
        "sources": state.metrics.get_source_stats(),
    }))
}
