use uuid::Uuid;

use crate::descriptor::NodeDescriptor;
use crate::path::NodePath;

/// Placement of a dropped node relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    /// Insert before the target, as its sibling.
    Before,
    /// Insert after the target, as its sibling.
    After,
    /// Insert as the last child of the target.
    Into,
}

/// Commands dispatched to the tree browser reducer.
///
/// Commands are the only way to mutate browser state. Structural commands
/// (selection, mutation notifications, configuration changes) are queued
/// while another structural operation holds the selection lock and are
/// replayed once it completes.
#[derive(Debug, Clone)]
pub enum BrowserCommand {
    /// Drill down to a path, opening every unopened ancestor, and select
    /// it.
    SelectNode {
        path: NodePath,
        /// Suppress the selection-changed notification for this selection.
        suppress_notification: bool,
        /// Originating-event token handed back in the notification so
        /// callers can detect their own selections.
        origin: Option<Uuid>,
    },
    /// A tree row was clicked. Selects the node and toggles containers.
    NodePressed { path: NodePath },
    /// The cursor entered or left a tree row.
    NodeHovered { path: Option<NodePath> },
    /// A node was dragged onto another node.
    NodeDropped {
        dragged: NodePath,
        target: NodePath,
        position: DropPosition,
    },
    /// Reload the root and every open node, keeping the selection if it
    /// survives.
    Refresh,
    /// Change the configured root path and refresh.
    SetRoot { root: NodePath },
    /// Change the configured content filter and refresh.
    SetFilter { filter: Option<String> },
    /// A collaborator created `name` under `parent` remotely.
    Inserted { parent: NodePath, name: String },
    /// A collaborator changed the entry at `path` remotely.
    Changed { path: NodePath },
    /// A collaborator moved an entry from `from` to `to` remotely.
    Moved { from: NodePath, to: NodePath },
    /// A collaborator deleted the entry at `path` remotely.
    Deleted {
        path: NodePath,
        /// Node to select instead, when the deleted node was selected.
        replacement: Option<NodePath>,
    },
    /// A requested load finished. `descriptor` is `None` when the load was
    /// abandoned after its retry failed.
    LoadCompleted {
        path: NodePath,
        descriptor: Option<NodeDescriptor>,
    },
}
