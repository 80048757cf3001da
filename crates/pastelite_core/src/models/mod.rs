//! Data models shared by storage and the HTTP layer.

/// Paste records, request payloads, and response views.
pub mod paste;
