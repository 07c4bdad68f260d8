//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes. Session issuance lives
//! elsewhere; this only validates an existing session cookie.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use reading_tracker_core::ports::PortError;
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// Middleware that validates the auth session cookie and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let auth_session_id = session_cookie(cookie_header).ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = state
        .db
        .validate_session(auth_session_id)
        .await
        .map_err(|e| {
            if !matches!(e, PortError::Unauthorized) {
                error!("Failed to validate auth session: {:?}", e);
            }
            StatusCode::UNAUTHORIZED
        })?;

    req.extensions_mut().insert(user_id);
    Ok(next.run(req).await)
}

/// Pulls the `session=` value out of a Cookie header.
fn session_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|c| c.trim().strip_prefix("session="))
}

#[cfg(test)]
mod tests {
    use super::session_cookie;

    #[test]
    fn finds_session_among_other_cookies() {
        assert_eq!(
            session_cookie("theme=dark; session=abc123; lang=en"),
            Some("abc123")
        );
    }

    #[test]
    fn missing_session_cookie_is_none() {
        assert_eq!(session_cookie("theme=dark"), None);
        assert_eq!(session_cookie(""), None);
    }
}
