//! Paste-related data models.

use crate::expiry;
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paste record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub ttl_seconds: Option<u64>,
    pub max_views: Option<u64>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    /// Derived once from `created_at + ttl_seconds`.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_whole_number")]
    pub ttl_seconds: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_whole_number")]
    pub max_views: Option<i64>,
}

/// Accepts any JSON number with no fractional part (`60` and `60.0`), or null.
///
/// Range checks (`>= 1`) happen in the store so the error names the field.
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<WholeNumber>::deserialize(deserializer).map(|value| value.map(|number| number.0))
}

struct WholeNumber(i64);

impl<'de> Deserialize<'de> for WholeNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WholeNumberVisitor)
    }
}

struct WholeNumberVisitor;

impl<'de> Visitor<'de> for WholeNumberVisitor {
    type Value = WholeNumber;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(WholeNumber(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        i64::try_from(value)
            .map(WholeNumber)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // 2^63 is the first float above i64::MAX.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
            Ok(WholeNumber(value as i64))
        } else {
            Err(E::invalid_value(Unexpected::Float(value), &self))
        }
    }
}

/// Response returned after a paste is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPaste {
    pub id: String,
    pub url: String,
}

/// Public view of a paste after a successful read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteView {
    pub content: String,
    pub views: u64,
    pub max_views: Option<u64>,
    pub remaining_views: Option<u64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Advisory row counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteStats {
    pub total: u64,
    pub active: u64,
}

impl Paste {
    /// Whether this paste may still be read at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        expiry::is_live(self.expires_at, self.views, self.max_views, now)
    }

    /// Views left before the view limit is reached, if there is one.
    pub fn remaining_views(&self) -> Option<u64> {
        self.max_views
            .map(|max_views| max_views.saturating_sub(self.views))
    }
}

impl From<&Paste> for PasteView {
    fn from(value: &Paste) -> Self {
        Self {
            content: value.content.clone(),
            views: value.views,
            max_views: value.max_views,
            remaining_views: value.remaining_views(),
            expires_at: value.expires_at,
        }
    }
}

impl From<Paste> for PasteView {
    fn from(value: Paste) -> Self {
        let remaining_views = value.remaining_views();
        Self {
            content: value.content,
            views: value.views,
            max_views: value.max_views,
            remaining_views,
            expires_at: value.expires_at,
        }
    }
}
