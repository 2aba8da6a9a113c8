use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const CACHE_VERSION: &str = "arogya-sathi-v1";

/// Resource paths pre-fetched at install time. Changing `CACHE_VERSION`
/// makes the previous bundle unreachable; it is not deleted (see
/// `CacheStore::stale_versions`).
pub const CACHE_MANIFEST: &[&str] = &[
    "/",
    "/static/js/bundle.js",
    "/static/css/main.css",
    "/manifest.json",
];

pub const MAX_RESOURCE_KEY_LENGTH: usize = 2048;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CacheError {
    #[error("invalid resource key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("no bundle installed for version '{version}'")]
    UnknownVersion { version: String },

    #[error("install is not settled: {outstanding} resources still in flight")]
    InstallIncomplete { outstanding: usize },

    #[error("install failed: {failures:?}")]
    InstallFailed { failures: Vec<String> },
}

/// A fetch either produced a response (of any status) or never reached
/// the network. Non-success statuses are ordinary responses on the
/// interception path and failures on the install path.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String },
}

pub type FetchOutcome = Result<StoredResponse, FetchError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(key: impl Into<String>) -> Result<Self, CacheError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CacheError::InvalidKey {
                key,
                reason: "key cannot be empty".into(),
            });
        }
        if key.len() > MAX_RESOURCE_KEY_LENGTH {
            return Err(CacheError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {MAX_RESOURCE_KEY_LENGTH} bytes"),
            });
        }
        if key.chars().any(char::is_control) {
            return Err(CacheError::InvalidKey {
                key: key.escape_default().to_string(),
                reason: "key contains control characters".into(),
            });
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl StoredResponse {
    #[must_use]
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    version: String,
    resources: Vec<ResourceKey>,
}

impl CacheManifest {
    pub fn new(
        version: impl Into<String>,
        resources: Vec<ResourceKey>,
    ) -> Result<Self, CacheError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(CacheError::InvalidKey {
                key: version,
                reason: "version tag cannot be empty".into(),
            });
        }
        Ok(Self { version, resources })
    }

    /// The fixed manifest this build ships with.
    pub fn bundled() -> Result<Self, CacheError> {
        let resources = CACHE_MANIFEST
            .iter()
            .map(ResourceKey::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(CACHE_VERSION, resources)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn resources(&self) -> &[ResourceKey] {
        &self.resources
    }
}

/// An installed bundle: an immutable set of (resource key → response)
/// pairs under one version tag. There is no mutation API; a new version
/// is a new bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBundle {
    version: String,
    entries: BTreeMap<ResourceKey, StoredResponse>,
}

impl CacheBundle {
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn get(&self, key: &ResourceKey) -> Option<&StoredResponse> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates install-time fetches for one manifest. The bundle is
/// committed all-or-nothing: a single failed resource aborts the whole
/// install, matching the batch semantics of the underlying cache API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInstall {
    version: String,
    outstanding: BTreeSet<ResourceKey>,
    fetched: BTreeMap<ResourceKey, StoredResponse>,
    failures: Vec<String>,
}

impl PendingInstall {
    #[must_use]
    pub fn begin(manifest: &CacheManifest) -> Self {
        Self {
            version: manifest.version().to_string(),
            outstanding: manifest.resources().iter().cloned().collect(),
            fetched: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Records one fetch result. Results for keys outside the manifest
    /// (or duplicates) are ignored and reported back as `false`.
    pub fn record(&mut self, key: &ResourceKey, outcome: FetchOutcome) -> bool {
        if !self.outstanding.remove(key) {
            return false;
        }
        match outcome {
            Ok(response) if response.is_success() => {
                self.fetched.insert(key.clone(), response);
            }
            Ok(response) => {
                self.failures
                    .push(format!("{key}: HTTP {}", response.status()));
            }
            Err(e) => {
                self.failures.push(format!("{key}: {e}"));
            }
        }
        true
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// All-or-nothing commit. Only callable once every manifest resource
    /// has settled; any recorded failure discards the whole install.
    pub fn finish(self) -> Result<CacheBundle, CacheError> {
        if !self.outstanding.is_empty() {
            return Err(CacheError::InstallIncomplete {
                outstanding: self.outstanding.len(),
            });
        }
        if !self.failures.is_empty() {
            return Err(CacheError::InstallFailed {
                failures: self.failures,
            });
        }
        Ok(CacheBundle {
            version: self.version,
            entries: self.fetched,
        })
    }
}

/// How to satisfy an intercepted request: serve the stored response, or
/// forward to a live fetch. A miss is never written back to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDecision<'a> {
    Cached(&'a StoredResponse),
    Forward,
}

/// All installed bundles, keyed by version tag, with at most one active.
/// Stale versions are kept — purging them on activation is an open
/// question this design deliberately leaves unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheStore {
    bundles: BTreeMap<String, CacheBundle>,
    active: Option<String>,
}

impl CacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a bundle and activates its version. Re-installing an
    /// existing version replaces that bundle wholesale; it never mutates
    /// entries in place.
    pub fn install(&mut self, bundle: CacheBundle) {
        let version = bundle.version().to_string();
        self.bundles.insert(version.clone(), bundle);
        self.active = Some(version);
    }

    pub fn activate(&mut self, version: &str) -> Result<(), CacheError> {
        if !self.bundles.contains_key(version) {
            return Err(CacheError::UnknownVersion {
                version: version.to_string(),
            });
        }
        self.active = Some(version.to_string());
        Ok(())
    }

    #[must_use]
    pub fn active_version(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn active_bundle(&self) -> Option<&CacheBundle> {
        self.active.as_ref().and_then(|v| self.bundles.get(v))
    }

    /// Installed versions that are no longer active. Exposed so a shell
    /// can observe the accumulation; nothing in the core deletes them.
    #[must_use]
    pub fn stale_versions(&self) -> Vec<&str> {
        self.bundles
            .keys()
            .map(String::as_str)
            .filter(|v| Some(*v) != self.active.as_deref())
            .collect()
    }

    /// The interception path: a hit in the active bundle is served with
    /// no network access; anything else forwards to a live fetch.
    #[must_use]
    pub fn handle(&self, key: &ResourceKey) -> FetchDecision<'_> {
        match self.active_bundle().and_then(|b| b.get(key)) {
            Some(response) => FetchDecision::Cached(response),
            None => FetchDecision::Forward,
        }
    }
}
