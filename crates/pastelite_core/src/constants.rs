//! Shared constants used across PasteLite crates.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 1024 * 1024;

/// Default interval between reaper sweeps, in seconds.
pub const DEFAULT_REAP_INTERVAL_SECS: u64 = 60 * 60;

/// Length of every generated paste id.
pub const ID_LENGTH: usize = 10;

/// Id alphabet: digits, upper-case, then lower-case ASCII letters.
pub const ID_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// How many fresh ids the store tries before giving up on a create.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Candidates removed per sweep write transaction.
pub const SWEEP_BATCH_SIZE: usize = 256;

/// Header carrying an injected request time (unix millis) in test mode.
pub const TEST_NOW_HEADER: &str = "x-test-now-ms";
