use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a remote resource. While offline, a freshly created resource
/// only has a local placeholder id; once the queued create is acknowledged,
/// every later entry pointing at the placeholder is rewritten to the
/// server-assigned id before it is replayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ResourceRef {
    Local(String),
    Server(String),
}

impl ResourceRef {
    pub fn id(&self) -> &str {
        match self {
            ResourceRef::Local(id) | ResourceRef::Server(id) => id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ResourceRef::Local(_))
    }

    /// Returns the server ref when this points at the given placeholder.
    pub fn resolved(&self, local_id: &str, server_id: &str) -> Option<ResourceRef> {
        match self {
            ResourceRef::Local(id) if id == local_id => {
                Some(ResourceRef::Server(server_id.to_string()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
