use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::OfflineContentItem;

pub const TAG_GET_OFFLINE_FIRST_AID: &str = "GET_OFFLINE_FIRST_AID";

/// Correlates a channel message (or intercepted fetch) with its reply;
/// allocated by the shell side of the port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed request union for the data channel. One tag today;
/// unrecognized tags fail to parse and are silently ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelRequest {
    GetOfflineFirstAid,
}

impl ChannelRequest {
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            TAG_GET_OFFLINE_FIRST_AID => Some(Self::GetOfflineFirstAid),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::GetOfflineFirstAid => TAG_GET_OFFLINE_FIRST_AID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelReply {
    pub request_id: RequestId,
    pub items: Vec<OfflineContentItem>,
}

/// One half of a reply channel. `send` consumes the port, so a request
/// can be answered at most once; the compiler enforces the invariant.
#[derive(Debug, PartialEq, Eq)]
pub struct ReplyPort {
    request_id: RequestId,
}

impl ReplyPort {
    #[must_use]
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }

    #[must_use]
    pub fn send(self, items: Vec<OfflineContentItem>) -> ChannelReply {
        ChannelReply {
            request_id: self.request_id,
            items,
        }
    }
}
