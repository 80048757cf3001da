//! Shared test-only helpers for pastelite_core.

use crate::id::IdSource;
use crate::models::paste::Paste;
use crate::Database;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Fixed reference instant used as `created_at` in tests.
pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
}

/// Build a paste row directly, bypassing store validation.
pub(crate) fn paste_row(
    id: &str,
    expires_at: Option<DateTime<Utc>>,
    views: u64,
    max_views: Option<u64>,
) -> Paste {
    Paste {
        id: id.to_string(),
        content: format!("content of {}", id),
        ttl_seconds: expires_at.map(|at| (at - t0()).num_seconds().max(1) as u64),
        max_views,
        views,
        created_at: t0(),
        expires_at,
    }
}

/// Id source that replays a fixed list, repeating the last entry.
pub(crate) struct ScriptedIds {
    ids: Mutex<Vec<String>>,
}

impl ScriptedIds {
    pub(crate) fn new(ids: &[&str]) -> Self {
        let mut ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        ids.reverse();
        Self {
            ids: Mutex::new(ids),
        }
    }
}

impl IdSource for ScriptedIds {
    fn next_id(&self) -> String {
        let mut ids = self.ids.lock().expect("scripted ids lock");
        if ids.len() > 1 {
            ids.pop().expect("non-empty")
        } else {
            ids.last().cloned().expect("at least one scripted id")
        }
    }
}
