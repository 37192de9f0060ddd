use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Local, Utc};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{CalendarDate, RuleSet};
use crate::services::notify::Notifier;
use crate::services::session::BookingSession;
use crate::services::validation::RequesterValidator;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub rules: Arc<RuleSet>,
    pub sessions: Mutex<HashMap<String, BookingSession>>,
    pub validator: Box<dyn RequesterValidator>,
    pub notifier: Box<dyn Notifier>,
}

impl AppState {
    pub fn new(
        conn: Connection,
        config: AppConfig,
        validator: Box<dyn RequesterValidator>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            rules: Arc::new(config.rules.clone()),
            config,
            sessions: Mutex::new(HashMap::new()),
            validator,
            notifier,
        }
    }

    pub fn today(&self) -> CalendarDate {
        CalendarDate::from(Local::now().date_naive())
    }

    pub fn lock_db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }

    pub fn lock_sessions(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, BookingSession>>, AppError> {
        self.sessions
            .lock()
            .map_err(|_| AppError::Internal("session lock poisoned".to_string()))
    }

    pub fn create_session(&self) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = BookingSession::new(Arc::clone(&self.rules), self.today());
        let mut sessions = self.lock_sessions()?;
        purge_idle(&mut sessions, self.config.session_ttl_minutes);
        sessions.insert(id.clone(), session);
        Ok(id)
    }

    /// Runs `f` against one session while holding the session lock, so
    /// commands on a session never interleave.
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut BookingSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock_sessions()?;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
        f(session)
    }
}

fn purge_idle(sessions: &mut HashMap<String, BookingSession>, ttl_minutes: i64) {
    let cutoff = Utc::now().naive_utc() - Duration::minutes(ttl_minutes);
    let before = sessions.len();
    sessions.retain(|_, s| s.last_activity > cutoff);
    let purged = before - sessions.len();
    if purged > 0 {
        tracing::info!(purged, "expired idle booking sessions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::notify::LogNotifier;
    use crate::services::validation::BasicValidator;

    fn test_state(ttl: i64) -> AppState {
        let config = AppConfig {
            port: 3000,
            database_url: ":memory:".to_string(),
            admin_token: "test-token".to_string(),
            business_name: "Interviews".to_string(),
            rules: RuleSet::interview_default(),
            session_ttl_minutes: ttl,
        };
        AppState::new(
            db::init_db(":memory:").unwrap(),
            config,
            Box::new(BasicValidator),
            Box::new(LogNotifier),
        )
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let state = test_state(30);
        let result = state.with_session("nope", |_| Ok(()));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_idle_sessions_are_purged() {
        let state = test_state(30);
        let stale = state.create_session().unwrap();
        state
            .with_session(&stale, |s| {
                s.last_activity = Utc::now().naive_utc() - Duration::minutes(31);
                Ok(())
            })
            .unwrap();

        let fresh = state.create_session().unwrap();

        assert!(state.with_session(&stale, |_| Ok(())).is_err());
        assert!(state.with_session(&fresh, |_| Ok(())).is_ok());
    }
}
