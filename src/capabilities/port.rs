use crux_core::capability::{Capability, CapabilityContext};
use serde::{Deserialize, Serialize};

use crate::cache::FetchOutcome;
use crate::channel::{ChannelReply, RequestId};

/// The worker's outbound side of the platform boundary: responses to
/// intercepted fetches and replies on the data channel. Both are one-way
/// notifications; the shell correlates them by `RequestId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum PortOperation {
    Serve {
        request_id: RequestId,
        outcome: FetchOutcome,
    },
    Reply(ChannelReply),
}

#[derive(Debug, Clone)]
pub struct Port<E> {
    context: CapabilityContext<PortOperation, E>,
}

impl<Ev> Capability<Ev> for Port<Ev> {
    type Operation = PortOperation;
    type MappedSelf<MappedEv> = Port<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + Copy + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Port::new(self.context.map_event(f))
    }
}

impl<E> Port<E> {
    pub fn new(context: CapabilityContext<PortOperation, E>) -> Self {
        Self { context }
    }

    pub fn serve(&self, request_id: RequestId, outcome: FetchOutcome) {
        self.context.notify_shell(PortOperation::Serve {
            request_id,
            outcome,
        });
    }

    pub fn reply(&self, reply: ChannelReply) {
        self.context.notify_shell(PortOperation::Reply(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoredResponse;

    #[test]
    fn serve_operation_serialization_roundtrips() {
        let op = PortOperation::Serve {
            request_id: RequestId::new("req-7"),
            outcome: Ok(StoredResponse::new(
                200,
                Some("text/css".into()),
                b"body{}".to_vec(),
            )),
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: PortOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }
}
