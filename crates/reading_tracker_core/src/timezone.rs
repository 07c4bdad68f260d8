//! crates/reading_tracker_core/src/timezone.rs
//!
//! Resolves a user's IANA timezone preference, with request-scoped
//! memoization. Resolution never fails: a missing preference, a storage
//! error, or an unparseable zone name all degrade to the default zone.

use std::collections::HashMap;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing::warn;
use uuid::Uuid;

use crate::ports::ReadingStore;

/// The zone users get at signup until they pick one in their profile.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// A per-request timezone resolver.
///
/// Construct one per inbound request and drop it with the request; the
/// memo map never outlives a single logical request, so there is no
/// cross-request staleness to manage.
pub struct TimezoneResolver {
    store: Arc<dyn ReadingStore>,
    cache: HashMap<Uuid, Tz>,
}

impl TimezoneResolver {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    /// Looks up the user's stored timezone, memoized for this request.
    pub async fn resolve(&mut self, user_id: Uuid) -> Tz {
        if let Some(tz) = self.cache.get(&user_id) {
            return *tz;
        }
        let tz = self.lookup(user_id).await;
        self.cache.insert(user_id, tz);
        tz
    }

    async fn lookup(&self, user_id: Uuid) -> Tz {
        let stored = match self.store.get_user_timezone(user_id).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Timezone lookup failed for user {}: {:?}", user_id, e);
                return DEFAULT_TIMEZONE;
            }
        };
        match stored {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                warn!("User {} has invalid timezone {:?}", user_id, name);
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookRow, Challenge, ReadingLogEntry};
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A store stub that serves a canned timezone answer and counts lookups.
    struct StubStore {
        timezone: PortResult<Option<String>>,
        lookups: AtomicUsize,
    }

    impl StubStore {
        fn returning(timezone: PortResult<Option<String>>) -> Arc<Self> {
            Arc::new(Self {
                timezone,
                lookups: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReadingStore for StubStore {
        async fn validate_session(&self, _session_id: &str) -> PortResult<Uuid> {
            Err(PortError::Unauthorized)
        }

        async fn get_user_timezone(&self, _user_id: Uuid) -> PortResult<Option<String>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match &self.timezone {
                Ok(tz) => Ok(tz.clone()),
                Err(_) => Err(PortError::Unexpected("db down".into())),
            }
        }

        async fn get_reading_logs_since(
            &self,
            _user_id: Uuid,
            _since: DateTime<Utc>,
        ) -> PortResult<Vec<ReadingLogEntry>> {
            Ok(Vec::new())
        }

        async fn get_reading_logs_between(
            &self,
            _user_id: Uuid,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> PortResult<Vec<ReadingLogEntry>> {
            Ok(Vec::new())
        }

        async fn get_books_for_user(&self, _user_id: Uuid) -> PortResult<Vec<BookRow>> {
            Ok(Vec::new())
        }

        async fn get_challenge_by_id(&self, challenge_id: Uuid) -> PortResult<Challenge> {
            Err(PortError::NotFound(challenge_id.to_string()))
        }

        async fn update_challenge_progress(
            &self,
            _challenge_id: Uuid,
            _user_id: Uuid,
            _progress: i64,
        ) -> PortResult<()> {
            Ok(())
        }

        async fn record_streak_achievement(
            &self,
            _user_id: Uuid,
            _milestone: u32,
        ) -> PortResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn resolves_stored_preference() {
        let store = StubStore::returning(Ok(Some("America/New_York".into())));
        let mut resolver = TimezoneResolver::new(store);
        let tz = resolver.resolve(Uuid::new_v4()).await;
        assert_eq!(tz, chrono_tz::America::New_York);
    }

    #[tokio::test]
    async fn missing_preference_falls_back_to_default() {
        let store = StubStore::returning(Ok(None));
        let mut resolver = TimezoneResolver::new(store);
        assert_eq!(resolver.resolve(Uuid::new_v4()).await, DEFAULT_TIMEZONE);
    }

    #[tokio::test]
    async fn store_failure_falls_back_to_default() {
        let store = StubStore::returning(Err(PortError::Unexpected("db down".into())));
        let mut resolver = TimezoneResolver::new(store);
        assert_eq!(resolver.resolve(Uuid::new_v4()).await, DEFAULT_TIMEZONE);
    }

    #[tokio::test]
    async fn invalid_zone_name_falls_back_to_default() {
        let store = StubStore::returning(Ok(Some("Not/A_Zone".into())));
        let mut resolver = TimezoneResolver::new(store);
        assert_eq!(resolver.resolve(Uuid::new_v4()).await, DEFAULT_TIMEZONE);
    }

    #[tokio::test]
    async fn repeated_resolution_hits_the_memo() {
        let store = StubStore::returning(Ok(Some("Europe/Paris".into())));
        let mut resolver = TimezoneResolver::new(store.clone());
        let user = Uuid::new_v4();
        resolver.resolve(user).await;
        resolver.resolve(user).await;
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }
}
