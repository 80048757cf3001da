//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical paste rows (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
/// Expiry index ordered by `expires_at` millis then id.
pub const PASTES_BY_EXPIRY: TableDefinition<(i64, &str), ()> =
    TableDefinition::new("pastes_by_expiry");
/// Ids whose view count has reached `max_views`.
pub const PASTES_EXHAUSTED: TableDefinition<&str, ()> = TableDefinition::new("pastes_exhausted");
