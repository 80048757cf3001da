//! Paste lifecycle operations: create, read-and-count, sweep, stats.
//!
//! Every operation takes `now` from the caller so expiry behavior is fully
//! determined by its inputs.

use crate::constants::MAX_ID_ATTEMPTS;
use crate::db::Database;
use crate::error::AppError;
use crate::expiry::{compute_expiry, validate_positive};
use crate::id::{IdSource, RandomIds};
use crate::models::paste::{Paste, PasteStats};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Owner of all paste mutations.
pub struct PasteStore {
    db: Database,
    ids: Arc<dyn IdSource>,
    max_id_attempts: usize,
    sweep_lock: Mutex<()>,
}

impl PasteStore {
    /// Build a store over an open database with random ids.
    pub fn new(db: Database) -> Self {
        Self::with_id_source(db, Arc::new(RandomIds))
    }

    /// Build a store with a custom id source.
    pub fn with_id_source(db: Database, ids: Arc<dyn IdSource>) -> Self {
        Self {
            db,
            ids,
            max_id_attempts: MAX_ID_ATTEMPTS,
            sweep_lock: Mutex::new(()),
        }
    }

    /// Override the id retry budget (minimum one attempt).
    pub fn with_max_id_attempts(mut self, attempts: usize) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }

    /// Create a paste at `now`.
    ///
    /// # Arguments
    /// - `content`: Raw content; surrounding whitespace is trimmed.
    /// - `ttl_seconds`: Optional lifetime in seconds, must be >= 1.
    /// - `max_views`: Optional view limit, must be >= 1.
    /// - `now`: Creation instant.
    ///
    /// # Returns
    /// The persisted paste with `views = 0`.
    ///
    /// # Errors
    /// - [`AppError::InvalidArgument`] for empty content or non-positive limits.
    /// - [`AppError::ExhaustedRetries`] when every generated id collided.
    /// - [`AppError::StoreUnavailable`] when the substrate fails.
    pub fn create(
        &self,
        content: &str,
        ttl_seconds: Option<i64>,
        max_views: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Paste, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::InvalidArgument(
                "content is required and must be a non-empty string".to_string(),
            ));
        }
        let max_views = validate_positive("max_views", max_views)?;
        let expires_at = compute_expiry(ttl_seconds, now)?;
        let ttl_seconds = validate_positive("ttl_seconds", ttl_seconds)?;

        let mut paste = Paste {
            id: String::new(),
            content: content.to_string(),
            ttl_seconds,
            max_views,
            views: 0,
            created_at: now,
            expires_at,
        };

        for attempt in 1..=self.max_id_attempts {
            paste.id = self.ids.next_id();
            if self.db.pastes.insert_new(&paste)? {
                debug!(id = %paste.id, attempt, "Created paste");
                return Ok(paste);
            }
            warn!(id = %paste.id, attempt, "Paste id collision; regenerating");
        }

        Err(AppError::ExhaustedRetries {
            attempts: self.max_id_attempts,
        })
    }

    /// Read a paste at `now`, counting the view.
    ///
    /// The liveness check and the increment are one atomic unit: concurrent
    /// reads of a paste with `max_views = n` yield at most `n` successes.
    ///
    /// # Returns
    /// The paste with its post-increment view count, or `None` when it does
    /// not exist or is no longer live.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when the substrate fails.
    pub fn read(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Paste>, AppError> {
        Ok(self.db.pastes.record_view(id, now)?.into_paste())
    }

    /// Look up a paste without counting a view or checking liveness.
    pub fn peek(&self, id: &str) -> Result<Option<Paste>, AppError> {
        self.db.pastes.get(id)
    }

    /// Remove every paste that is not live at `now`.
    ///
    /// Sweeps are serialized; a second caller waits for the running sweep and
    /// then finds nothing left to remove.
    ///
    /// # Returns
    /// Number of pastes removed.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when the substrate fails or the
    /// sweep lock is poisoned.
    pub fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let _sweep = self
            .sweep_lock
            .lock()
            .map_err(|_| AppError::StoreMessage("Sweep lock poisoned".to_string()))?;
        self.db.pastes.delete_expired(now)
    }

    /// Total and live paste counts at `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> Result<PasteStats, AppError> {
        self.db.pastes.stats(now)
    }

    /// Check that the substrate answers.
    pub fn ping(&self) -> Result<(), AppError> {
        self.db.ping()
    }
}
