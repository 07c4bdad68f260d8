//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{Duration, Utc};
use reading_tracker_core::{
    achievements::milestones_reached,
    activity::activity_summary,
    challenge::{challenge_progress, challenge_window},
    ports::PortError,
    timezone::TimezoneResolver,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        stats_handler,
        challenge_progress_handler,
    ),
    components(
        schemas(StatsResponse, ChallengeProgressResponse)
    ),
    tags(
        (name = "Reading Tracker API", description = "API endpoints for reading activity aggregation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Derived activity metrics for the authenticated user.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    reading_streak: u32,
    days_read_this_week: u32,
    days_read_this_month: u32,
}

/// The recomputed progress of one challenge for the authenticated user.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgressResponse {
    challenge_id: Uuid,
    progress: u64,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Current streak and trailing-period activity counts.
///
/// Resolves the user's timezone preference, fetches their reading logs over
/// the configured lookback window, and runs the aggregation engine. Newly
/// crossed streak milestones are recorded as achievements on the way out.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Aggregated activity metrics", body = StatsResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn stats_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let now = Utc::now();
    let mut resolver = TimezoneResolver::new(app_state.db.clone());
    let tz = resolver.resolve(user_id).await;

    let since = now - Duration::days(app_state.config.streak_lookback_days);
    let logs = app_state
        .db
        .get_reading_logs_since(user_id, since)
        .await
        .map_err(|e| {
            error!("Failed to fetch reading logs: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch reading logs".to_string(),
            )
        })?;

    let summary = activity_summary(&logs, tz, now);

    // Award any milestones this streak has crossed. A failure here is
    // logged but never fails the stats response.
    for milestone in milestones_reached(summary.reading_streak) {
        match app_state.db.record_streak_achievement(user_id, milestone).await {
            Ok(true) => info!("User {} reached streak milestone {}", user_id, milestone),
            Ok(false) => {}
            Err(e) => error!("Failed to record streak milestone {}: {:?}", milestone, e),
        }
    }

    Ok(Json(StatsResponse {
        reading_streak: summary.reading_streak,
        days_read_this_week: summary.days_read_this_week,
        days_read_this_month: summary.days_read_this_month,
    }))
}

/// Recompute and persist the authenticated user's progress in a challenge.
#[utoipa::path(
    post,
    path = "/challenges/{challenge_id}/progress",
    params(
        ("challenge_id" = Uuid, Path, description = "The challenge to recompute.")
    ),
    responses(
        (status = 200, description = "Progress recomputed", body = ChallengeProgressResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "Challenge not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn challenge_progress_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(challenge_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let challenge = app_state
        .db
        .get_challenge_by_id(challenge_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            other => {
                error!("Failed to fetch challenge {}: {:?}", challenge_id, other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch challenge".to_string(),
                )
            }
        })?;

    // Fetch over the widened window so logs late on the end day count.
    let (start, end) = challenge_window(&challenge);
    let db = &app_state.db;
    let rows = async {
        let logs = db.get_reading_logs_between(user_id, start, end).await?;
        let books = db.get_books_for_user(user_id).await?;
        Ok::<_, PortError>((logs, books))
    }
    .await;

    let (logs, books) = rows.map_err(|e| {
        error!("Failed to fetch challenge inputs: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch challenge inputs".to_string(),
        )
    })?;

    let progress = challenge_progress(&challenge, &logs, &books);

    app_state
        .db
        .update_challenge_progress(challenge.id, user_id, progress as i64)
        .await
        .map_err(|e| {
            error!("Failed to persist challenge progress: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist challenge progress".to_string(),
            )
        })?;

    Ok(Json(ChallengeProgressResponse {
        challenge_id: challenge.id,
        progress,
    }))
}
