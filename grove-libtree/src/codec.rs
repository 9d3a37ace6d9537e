use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::path::NodePath;

/// Render-safe identifier for one namespace entry.
///
/// Identifiers contain no slash and no padding characters, so they can be
/// used verbatim as element ids or row keys by a render engine.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Bidirectional mapping between namespace paths and render-safe node
/// identifiers.
///
/// Every codec instance carries its own identifier prefix, so identifiers
/// from different tree instances never collide and re-encoding an already
/// encoded identifier can be detected and skipped.
#[derive(Debug, Clone)]
pub struct PathCodec {
    prefix: String,
}

impl PathCodec {
    /// Create a codec with a random instance prefix.
    pub fn new() -> Self {
        let instance = Uuid::new_v4().simple().to_string();
        Self {
            prefix: format!("gn{}_", &instance[..8]),
        }
    }

    /// Create a codec with a fixed prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Return the instance prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Encode a namespace path into its node identifier.
    pub fn encode(&self, path: &NodePath) -> NodeId {
        self.encode_raw(path.as_str())
    }

    /// Encode a list of path segments, joined with `/` first.
    pub fn encode_segments<'a, I>(&self, segments: I) -> NodeId
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.encode(&NodePath::from_segments(segments))
    }

    /// Encode a raw string, skipping inputs that already carry this
    /// instance's prefix.
    pub fn encode_raw(&self, raw: &str) -> NodeId {
        if raw.starts_with(&self.prefix) {
            return NodeId(raw.to_string());
        }

        NodeId(format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Decode an identifier back into its namespace path.
    ///
    /// Returns `None` for identifiers minted by another instance or
    /// otherwise malformed input.
    pub fn decode(&self, id: &NodeId) -> Option<NodePath> {
        let encoded = id.0.strip_prefix(&self.prefix)?;
        let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        Some(NodePath::new(&raw))
    }
}

impl Default for PathCodec {
    fn default() -> Self {
        Self::new()
    }
}
