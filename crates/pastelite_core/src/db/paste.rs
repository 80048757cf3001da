//! Paste storage operations backed by redb.
//!
//! redb runs one write transaction at a time, so every read-check-write
//! sequence below that happens inside a single write transaction is atomic
//! with respect to every other mutation of the same row.

use crate::constants::SWEEP_BATCH_SIZE;
use crate::{db::tables::*, error::AppError, expiry, models::paste::*};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of an attempted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// No row with that id.
    Missing,
    /// Row exists but is no longer live; nothing was written.
    Expired,
    /// Row was live; carries the post-increment record.
    Viewed(Paste),
}

impl ViewOutcome {
    /// Collapse into the paste when the view succeeded.
    pub fn into_paste(self) -> Option<Paste> {
        match self {
            Self::Viewed(paste) => Some(paste),
            Self::Missing | Self::Expired => None,
        }
    }
}

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

fn expiry_key(expires_at: DateTime<Utc>) -> i64 {
    expires_at.timestamp_millis()
}

/// Index entries that put an id up for a sweep.
#[derive(Debug, Default)]
struct SweepCandidate {
    expiry_key: Option<i64>,
    exhausted: bool,
}

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_EXPIRY)?;
        write_txn.open_table(PASTES_EXHAUSTED)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row and its expiry index row atomically.
    ///
    /// # Returns
    /// `Ok(true)` when inserted, `Ok(false)` when the id is already taken. An
    /// existing row is never overwritten.
    ///
    /// # Errors
    /// Returns an error when serialization or storage fails.
    pub fn insert_new(&self, paste: &Paste) -> Result<bool, AppError> {
        let encoded_paste = bincode::serialize(paste)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            if pastes.get(paste.id.as_str())?.is_some() {
                return Ok(false);
            }
            pastes.insert(paste.id.as_str(), encoded_paste.as_slice())?;

            if let Some(expires_at) = paste.expires_at {
                let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;
                by_expiry.insert((expiry_key(expires_at), paste.id.as_str()), ())?;
            }
        }
        write_txn.commit()?;
        Ok(true)
    }

    /// Fetch a paste by id without touching its view count.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Count a view of `id` at `now` if, and only if, the paste is live.
    ///
    /// The liveness check and the increment share one write transaction.
    /// When the increment reaches `max_views` the id is recorded in the
    /// exhausted index so the sweep can find it without a scan.
    ///
    /// # Errors
    /// Returns an error when storage access or (de)serialization fails; no
    /// partial update is committed in that case.
    pub fn record_view(&self, id: &str, now: DateTime<Utc>) -> Result<ViewOutcome, AppError> {
        let write_txn = self.db.begin_write()?;
        let viewed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut paste = match pastes.get(id)? {
                Some(value) => deserialize_paste(value.value())?,
                None => return Ok(ViewOutcome::Missing),
            };
            if !paste.is_live(now) {
                return Ok(ViewOutcome::Expired);
            }

            paste.views = paste.views.saturating_add(1);
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(id, encoded.as_slice())?;

            if expiry::is_view_expired(paste.views, paste.max_views) {
                let mut exhausted = write_txn.open_table(PASTES_EXHAUSTED)?;
                exhausted.insert(id, ())?;
            }
            paste
        };
        write_txn.commit()?;
        Ok(ViewOutcome::Viewed(viewed))
    }

    /// Remove every paste that is not live at `now`.
    ///
    /// Candidates come from the expiry index (entries at or before `now`) and
    /// the exhausted index, read from one snapshot. They are then removed in
    /// batches of [`SWEEP_BATCH_SIZE`], one write transaction per batch, so
    /// reads and creates interleave with a long sweep.
    ///
    /// # Returns
    /// Number of paste rows removed.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails. Batches
    /// committed before the failure stay committed.
    pub fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        self.delete_expired_in_batches(now, SWEEP_BATCH_SIZE)
    }

    pub(crate) fn delete_expired_in_batches(
        &self,
        now: DateTime<Utc>,
        batch_size: usize,
    ) -> Result<usize, AppError> {
        let candidates: Vec<(String, SweepCandidate)> =
            self.sweep_candidates(now)?.into_iter().collect();

        let mut removed = 0usize;
        for batch in candidates.chunks(batch_size.max(1)) {
            removed += self.sweep_batch(batch, now)?;
        }
        Ok(removed)
    }

    fn sweep_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, SweepCandidate>, AppError> {
        let cutoff = expiry_key(now).saturating_add(1);
        let read_txn = self.db.begin_read()?;
        let by_expiry = read_txn.open_table(PASTES_BY_EXPIRY)?;
        let exhausted = read_txn.open_table(PASTES_EXHAUSTED)?;

        let mut candidates: BTreeMap<String, SweepCandidate> = BTreeMap::new();
        for item in by_expiry.range(..(cutoff, ""))? {
            let (key, _) = item?;
            let (millis, id) = key.value();
            candidates.entry(id.to_string()).or_default().expiry_key = Some(millis);
        }
        for item in exhausted.iter()? {
            let (key, _) = item?;
            candidates
                .entry(key.value().to_string())
                .or_default()
                .exhausted = true;
        }
        Ok(candidates)
    }

    /// Re-check each candidate inside one write transaction and remove the
    /// non-live ones together with their index rows.
    fn sweep_batch(
        &self,
        batch: &[(String, SweepCandidate)],
        now: DateTime<Utc>,
    ) -> Result<usize, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;
            let mut exhausted = write_txn.open_table(PASTES_EXHAUSTED)?;

            let mut removed = 0usize;
            for (id, candidate) in batch {
                let id = id.as_str();
                let paste = match pastes.get(id)? {
                    Some(value) => Some(deserialize_paste(value.value())?),
                    None => None,
                };
                match paste {
                    Some(paste) if paste.is_live(now) => {}
                    Some(paste) => {
                        let _ = pastes.remove(id)?;
                        if let Some(expires_at) = paste.expires_at {
                            let _ = by_expiry.remove((expiry_key(expires_at), id))?;
                        }
                        let _ = exhausted.remove(id)?;
                        removed += 1;
                    }
                    // Index rows left behind by a row that is already gone.
                    None => {
                        if let Some(millis) = candidate.expiry_key {
                            let _ = by_expiry.remove((millis, id))?;
                        }
                        if candidate.exhausted {
                            let _ = exhausted.remove(id)?;
                        }
                    }
                }
            }
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Count all rows and the rows live at `now`.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn stats(&self, now: DateTime<Utc>) -> Result<PasteStats, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let mut stats = PasteStats::default();
        for item in pastes.iter()? {
            let (_, value) = item?;
            let paste = deserialize_paste(value.value())?;
            stats.total += 1;
            if paste.is_live(now) {
                stats.active += 1;
            }
        }
        Ok(stats)
    }
}
