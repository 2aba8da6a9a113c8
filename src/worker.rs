//! The background cache context: install, fetch interception and the
//! offline data channel. Runs as its own Crux app because the platform
//! hosts it in a separate execution context from the foreground app;
//! each incoming event is independent and there is no shared state
//! between the two apps.

use serde::{Deserialize, Serialize};

use crate::cache::{
    CacheManifest, CacheStore, FetchDecision, FetchError, FetchOutcome, PendingInstall,
    ResourceKey, StoredResponse,
};
use crate::capabilities::Port;
use crate::channel::{ChannelRequest, ReplyPort, RequestId};
use crate::content;

pub use crux_http::Http;

/// Origin the worker resolves host-relative resource paths against
/// before they reach the network capability.
pub const APP_ORIGIN: &str = "https://app.arogya-sathi.org";

fn absolute_url(path: &str) -> String {
    if path.starts_with('/') {
        format!("{APP_ORIGIN}{path}")
    } else {
        path.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum WorkerEvent {
    #[default]
    Noop,

    /// Pre-fetch the bundled manifest into a fresh cache bundle.
    InstallRequested,
    ResourceFetched {
        key: ResourceKey,
        outcome: FetchOutcome,
    },

    /// An outbound content request intercepted at the platform boundary.
    FetchRequested {
        request_id: RequestId,
        key: String,
    },
    ForwardCompleted {
        request_id: RequestId,
        outcome: FetchOutcome,
    },

    /// A message posted on the process-local data channel.
    ChannelMessageReceived {
        request_id: RequestId,
        tag: String,
    },
}

impl WorkerEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::InstallRequested => "install_requested",
            Self::ResourceFetched { .. } => "resource_fetched",
            Self::FetchRequested { .. } => "fetch_requested",
            Self::ForwardCompleted { .. } => "forward_completed",
            Self::ChannelMessageReceived { .. } => "channel_message_received",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkerModel {
    pub store: CacheStore,
    pub pending_install: Option<PendingInstall>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerViewModel {
    pub active_version: Option<String>,
    pub cached_resources: usize,
    pub installing: bool,
    pub stale_versions: Vec<String>,
}

#[derive(crux_core::macros::Effect)]
#[effect(name = "WorkerEffect", app = "CacheWorker")]
pub struct WorkerCapabilities {
    pub http: Http<WorkerEvent>,
    pub port: Port<WorkerEvent>,
}

#[derive(Default)]
pub struct CacheWorker;

impl CacheWorker {
    fn forward(caps: &WorkerCapabilities, request_id: RequestId, path: &str) {
        caps.http
            .get(absolute_url(path))
            .send(move |result| WorkerEvent::ForwardCompleted {
                request_id: request_id.clone(),
                outcome: into_outcome(result),
            });
    }
}

impl crux_core::App for CacheWorker {
    type Event = WorkerEvent;
    type Model = WorkerModel;
    type ViewModel = WorkerViewModel;
    type Capabilities = WorkerCapabilities;

    fn update(&self, event: WorkerEvent, model: &mut WorkerModel, caps: &WorkerCapabilities) {
        match event {
            WorkerEvent::Noop => {}

            WorkerEvent::InstallRequested => {
                if model.pending_install.is_some() {
                    tracing::warn!("install already in progress, ignoring");
                    return;
                }
                match CacheManifest::bundled() {
                    Ok(manifest) => {
                        for key in manifest.resources() {
                            let key = key.clone();
                            caps.http.get(absolute_url(key.as_str())).send(move |result| {
                                WorkerEvent::ResourceFetched {
                                    key: key.clone(),
                                    outcome: into_outcome(result),
                                }
                            });
                        }
                        model.pending_install = Some(PendingInstall::begin(&manifest));
                    }
                    Err(e) => tracing::error!(error = %e, "bundled manifest rejected"),
                }
            }

            WorkerEvent::ResourceFetched { key, outcome } => {
                let Some(pending) = model.pending_install.as_mut() else {
                    tracing::warn!(key = %key, "fetch result with no install in progress");
                    return;
                };
                if !pending.record(&key, outcome) {
                    tracing::warn!(key = %key, "ignoring result for a key outside the manifest");
                }
                if pending.is_settled() {
                    if let Some(settled) = model.pending_install.take() {
                        match settled.finish() {
                            Ok(bundle) => {
                                tracing::debug!(
                                    version = bundle.version(),
                                    resources = bundle.len(),
                                    "cache bundle installed"
                                );
                                model.store.install(bundle);
                            }
                            // All-or-nothing: the store stays as it was.
                            Err(e) => tracing::warn!(error = %e, "cache install aborted"),
                        }
                    }
                }
            }

            WorkerEvent::FetchRequested { request_id, key } => {
                match ResourceKey::new(key.as_str()) {
                    Ok(resource) => match model.store.handle(&resource) {
                        FetchDecision::Cached(response) => {
                            caps.port.serve(request_id, Ok(response.clone()));
                        }
                        FetchDecision::Forward => {
                            Self::forward(caps, request_id, &key);
                        }
                    },
                    Err(e) => {
                        // A key the cache can't hold is still a valid
                        // pass-through request.
                        tracing::warn!(error = %e, "unservable resource key, forwarding");
                        Self::forward(caps, request_id, &key);
                    }
                }
            }

            WorkerEvent::ForwardCompleted {
                request_id,
                outcome,
            } => {
                // Pass the live result through unmodified, failures
                // included; no cache population on a miss.
                caps.port.serve(request_id, outcome);
            }

            WorkerEvent::ChannelMessageReceived { request_id, tag } => {
                match ChannelRequest::parse(&tag) {
                    Some(ChannelRequest::GetOfflineFirstAid) => {
                        let port = ReplyPort::new(request_id);
                        caps.port.reply(port.send(content::offline_first_aid()));
                    }
                    None => tracing::debug!(tag = %tag, "ignoring unrecognized channel tag"),
                }
            }
        }
    }

    fn view(&self, model: &WorkerModel) -> WorkerViewModel {
        WorkerViewModel {
            active_version: model.store.active_version().map(str::to_string),
            cached_resources: model.store.active_bundle().map_or(0, |b| b.len()),
            installing: model.pending_install.is_some(),
            stale_versions: model
                .store
                .stale_versions()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

fn into_outcome(result: crux_http::Result<crux_http::Response<Vec<u8>>>) -> FetchOutcome {
    match result {
        Ok(mut response) => {
            let status = u16::from(response.status());
            let content_type = response.header("content-type").map(|h| h.to_string());
            let body = response.take_body().unwrap_or_default();
            Ok(StoredResponse::new(status, content_type, body))
        }
        Err(e) => Err(FetchError::Network {
            message: e.to_string(),
        }),
    }
}
