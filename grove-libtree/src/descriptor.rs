use serde::{Deserialize, Serialize};

use crate::codec::NodeId;
use crate::path::NodePath;

/// Broad classification of a namespace entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An entry that may hold children.
    Container,
    /// A leaf entry (document, binary, property sheet).
    Leaf,
    /// Anything the console does not know; treated as a leaf.
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Return whether entries of this kind may hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container)
    }
}

/// Server-side state markers attached to a namespace entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct StateFlags {
    pub locked: bool,
    pub versioned: bool,
    pub checked_out: bool,
}

/// Remote-truth record for one namespace entry plus its direct children.
///
/// Descriptors arrive one level deep: `children` holds shallow descriptors
/// whose own `children` lists are empty. A descriptor is replaced wholesale
/// on every refresh; partial merges do not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub path: NodePath,
    /// Render-safe identifier, stamped by the data source after a fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<NodeId>,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "treeTypeTag", default, skip_serializing_if = "Option::is_none")]
    pub tree_tag: Option<String>,
    #[serde(rename = "stateFlags", default)]
    pub flags: StateFlags,
    #[serde(default)]
    pub children: Vec<NodeDescriptor>,
}

impl NodeDescriptor {
    /// Create a bare descriptor with no children and default flags.
    pub fn new(path: NodePath, kind: NodeKind) -> Self {
        Self {
            path,
            identifier: None,
            kind,
            content_type: None,
            tree_tag: None,
            flags: StateFlags::default(),
            children: Vec::new(),
        }
    }

    /// Return the entry name (last path segment).
    pub fn name(&self) -> &str {
        self.path.name()
    }
}
