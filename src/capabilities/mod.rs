mod intents;
mod port;

pub use self::intents::{IntentError, IntentOperation, IntentOutput, IntentResult, Intents};
pub use self::port::{Port, PortOperation};

pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::Sathi;
use crate::event::Event;

pub type AppRender = Render<Event>;
pub type AppKv = KeyValue<Event>;
pub type AppIntents = Intents<Event>;

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("storage error: {0}")]
    Prefs(#[from] crate::prefs::PrefsError),

    #[error("cache error: {0}")]
    Cache(#[from] crate::cache::CacheError),

    #[error("intent error: {0}")]
    Intent(#[from] IntentError),
}

/// Capabilities of the foreground app. The cache worker has its own set
/// (see `worker::WorkerCapabilities`); the two run in separate platform
/// contexts and never share an effect stream.
#[derive(crux_core::macros::Effect)]
#[effect(app = "Sathi")]
pub struct Capabilities {
    pub render: AppRender,
    pub kv: AppKv,
    pub intents: AppIntents,
}
