use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::Page;

/// The durable key namespace. String keys, string/JSON values, no TTL,
/// no schema versioning; writes are last-write-wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrefKey {
    CurrentPage,
    Language,
    PageViews,
    EmergencyLogs,
}

impl PrefKey {
    pub const ALL: [Self; 4] = [
        Self::CurrentPage,
        Self::Language,
        Self::PageViews,
        Self::EmergencyLogs,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentPage => "currentPage",
            Self::Language => "language",
            Self::PageViews => "pageViews",
            Self::EmergencyLogs => "emergencyLogs",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "currentPage" => Some(Self::CurrentPage),
            "language" => Some(Self::Language),
            "pageViews" => Some(Self::PageViews),
            "emergencyLogs" => Some(Self::EmergencyLogs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrefsError {
    #[error("serialization error for '{key}': {message}")]
    Serialization { key: &'static str, message: String },

    #[error("deserialization error for '{key}': {message}")]
    Deserialization { key: &'static str, message: String },

    #[error("value for '{key}' is not valid UTF-8")]
    NotUtf8 { key: &'static str },
}

/// Per-page view counters, persisted as a JSON object (page id → count).
/// Keys are stored as raw strings so entries written by older builds
/// survive a read-modify-write even if the page set has since changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PageViews(BTreeMap<String, u64>);

impl PageViews {
    #[must_use]
    pub fn count(&self, page: Page) -> u64 {
        self.0.get(page.as_str()).copied().unwrap_or(0)
    }

    /// Read-modify-write increment; returns the new count.
    pub fn increment(&mut self, page: Page) -> u64 {
        let entry = self.0.entry(page.as_str().to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One emergency dial, appended to the `emergencyLogs` JSON array after a
/// call was placed. The `timestamp` field carries epoch milliseconds from
/// the shell clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyLogEntry {
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    pub number: String,
    pub service: String,
    pub location: String,
}

pub fn encode_json<T: Serialize>(key: PrefKey, value: &T) -> Result<Vec<u8>, PrefsError> {
    serde_json::to_vec(value).map_err(|e| PrefsError::Serialization {
        key: key.as_str(),
        message: e.to_string(),
    })
}

pub fn decode_json<T: DeserializeOwned>(key: PrefKey, bytes: &[u8]) -> Result<T, PrefsError> {
    serde_json::from_slice(bytes).map_err(|e| PrefsError::Deserialization {
        key: key.as_str(),
        message: e.to_string(),
    })
}

/// Plain string values (`currentPage`, `language`) are stored as raw
/// UTF-8, not JSON.
pub fn decode_str(key: PrefKey, bytes: &[u8]) -> Result<String, PrefsError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| PrefsError::NotUtf8 { key: key.as_str() })
}

#[must_use]
pub fn encode_str(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}
