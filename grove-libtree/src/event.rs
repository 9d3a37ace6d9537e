use uuid::Uuid;

use crate::command::DropPosition;
use crate::descriptor::NodeDescriptor;
use crate::path::NodePath;

/// Effects produced by the tree browser reducer.
///
/// The reducer never performs I/O itself: every suspension point surfaces
/// as a `LoadRequested` effect the host answers with a
/// [`BrowserCommand::LoadCompleted`](crate::BrowserCommand::LoadCompleted)
/// command. All other effects are outward notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEffect {
    /// Fetch the descriptor for `path` and feed the result back as a
    /// `LoadCompleted` command. Must be answered even when the load fails.
    LoadRequested {
        path: NodePath,
        filter: Option<String>,
    },
    /// A user-driven selection succeeded. Emitted at most once per
    /// structural operation.
    SelectionChanged {
        path: NodePath,
        descriptor: NodeDescriptor,
        origin: Option<Uuid>,
    },
    /// A structurally valid drag-and-drop gesture was accepted. The remote
    /// write and the follow-up `Moved` notification are the host's job.
    MoveRequested {
        dragged: NodePath,
        target: NodePath,
        position: DropPosition,
        is_reorder: bool,
    },
    /// Bring the row at `path` into the viewport.
    ScrollIntoView { path: NodePath },
    /// Move keyboard focus to the row at `path`.
    FocusNode { path: NodePath },
    /// A structural operation finished and released the selection lock.
    /// Emitted exactly once per operation; this is the authoritative
    /// completion signal.
    OperationCompleted {
        reason: String,
        selected: Option<NodePath>,
    },
}
