//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ReadingStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reading_tracker_core::domain::{BookRow, BookStatus, Challenge, ChallengeKind, ReadingLogEntry};
use reading_tracker_core::ports::{PortError, PortResult, ReadingStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ReadingStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ReadingLogRecord {
    date: DateTime<Utc>,
    pages_read: i32,
}
impl ReadingLogRecord {
    fn to_domain(self) -> ReadingLogEntry {
        ReadingLogEntry {
            date: self.date,
            // Negative page counts cannot pass the API's validation; clamp
            // rather than poison the aggregate if one slips in.
            pages_read: self.pages_read.max(0) as u32,
        }
    }
}

#[derive(FromRow)]
struct BookRecord {
    status: String,
    completed_at: Option<DateTime<Utc>>,
}
impl BookRecord {
    fn to_domain(self) -> BookRow {
        BookRow {
            status: BookStatus::from_str(&self.status),
            completed_at: self.completed_at,
        }
    }
}

#[derive(FromRow)]
struct ChallengeRecord {
    id: Uuid,
    challenge_type: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
}
impl ChallengeRecord {
    fn to_domain(self) -> Challenge {
        Challenge {
            id: self.id,
            kind: ChallengeKind::from_str(&self.challenge_type),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

//=========================================================================================
// `ReadingStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReadingStore for DbAdapter {
    async fn validate_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn get_user_timezone(&self, user_id: Uuid) -> PortResult<Option<String>> {
        let timezone = sqlx::query_scalar::<_, Option<String>>(
            "SELECT timezone FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // A missing user and a user without a preference both resolve to
        // the default zone upstream.
        Ok(timezone.flatten())
    }

    async fn get_reading_logs_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> PortResult<Vec<ReadingLogEntry>> {
        let records = sqlx::query_as::<_, ReadingLogRecord>(
            "SELECT date, pages_read FROM reading_logs WHERE user_id = $1 AND date >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_reading_logs_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<ReadingLogEntry>> {
        let records = sqlx::query_as::<_, ReadingLogRecord>(
            "SELECT date, pages_read FROM reading_logs \
             WHERE user_id = $1 AND date >= $2 AND date < $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_books_for_user(&self, user_id: Uuid) -> PortResult<Vec<BookRow>> {
        let records = sqlx::query_as::<_, BookRecord>(
            "SELECT status, completed_at FROM books WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_challenge_by_id(&self, challenge_id: Uuid) -> PortResult<Challenge> {
        let record = sqlx::query_as::<_, ChallengeRecord>(
            "SELECT id, challenge_type, start_date, end_date FROM challenges WHERE id = $1",
        )
        .bind(challenge_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Challenge {} not found", challenge_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn update_challenge_progress(
        &self,
        challenge_id: Uuid,
        user_id: Uuid,
        progress: i64,
    ) -> PortResult<()> {
        sqlx::query(
            "UPDATE challenge_participants SET progress = $1 \
             WHERE challenge_id = $2 AND user_id = $3",
        )
        .bind(progress)
        .bind(challenge_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn record_streak_achievement(&self, user_id: Uuid, milestone: u32) -> PortResult<bool> {
        let result = sqlx::query(
            "INSERT INTO achievements (id, user_id, type, milestone) \
             VALUES ($1, $2, 'streak', $3) \
             ON CONFLICT (user_id, type, milestone) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(milestone as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
