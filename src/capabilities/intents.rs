use crux_core::capability::{Capability, CapabilityContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platform intent handlers: place a phone call, hand a URL to the
/// system browser/maps application. Dialing is a request/response pair;
/// opening a URL is fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum IntentOperation {
    Dial { number: String },
    OpenUrl { url: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntentError {
    #[error("telephony is not available on this platform")]
    Unavailable,

    #[error("intent failed: {reason}")]
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum IntentOutput {
    DialPlaced,
    Opened,
}

pub type IntentResult = Result<IntentOutput, IntentError>;

#[derive(Debug, Clone)]
pub struct Intents<E> {
    context: CapabilityContext<IntentOperation, E>,
}

impl<Ev> Capability<Ev> for Intents<Ev> {
    type Operation = IntentOperation;
    type MappedSelf<MappedEv> = Intents<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + Copy + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Intents::new(self.context.map_event(f))
    }
}

impl<E> Intents<E> {
    pub fn new(context: CapabilityContext<IntentOperation, E>) -> Self {
        Self { context }
    }

    pub fn dial<F>(&self, number: String, callback: F)
    where
        F: Fn(IntentResult) -> E + Send + Sync + 'static,
    {
        self.context
            .request_from_shell(IntentOperation::Dial { number }, callback);
    }

    pub fn open_url(&self, url: String) {
        self.context.notify_shell(IntentOperation::OpenUrl { url });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_serialization_roundtrips() {
        let op = IntentOperation::Dial {
            number: "108".into(),
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: IntentOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            IntentError::Unavailable.to_string(),
            "telephony is not available on this platform"
        );
        let failed = IntentError::Failed {
            reason: "no dialer".into(),
        };
        assert_eq!(failed.to_string(), "intent failed: no dialer");
    }
}
