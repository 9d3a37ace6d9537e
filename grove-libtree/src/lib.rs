//! Tree-view synchronization engine for a remote hierarchical namespace.
//!
//! `grove-libtree` keeps a lazily loaded, client-rendered tree of
//! slash-delimited paths consistent with a remote data source while
//! handling selection drill-down, drag-and-drop gestures and externally
//! raised insert/change/move/delete notifications.
//!
//! The engine is a plain state machine: every input is a
//! [`BrowserCommand`], every output is a [`BrowserEffect`], and
//! [`TreeBrowser::reduce`] is the only entry point that mutates state.
//! Suspension points (network fetches) surface as
//! [`BrowserEffect::LoadRequested`] effects the host answers with
//! [`BrowserCommand::LoadCompleted`]; the engine itself performs no I/O
//! and holds no timers. Structural operations are serialized by a
//! per-instance [`SelectionLock`] with timeout self-healing, and commands
//! arriving while one is in flight wait on a queue instead of failing.
//!
//! Hosts without their own runtime can drive a blocking [`NodeSource`]
//! through [`run`], which pumps load effects to quiescence:
//!
//! ```
//! use grove_libtree::{
//!     BrowserCommand, BrowserConfig, NodeDescriptor, NodeKind, NodePath,
//!     NodeSource, SourceError, TreeBrowser, run,
//! };
//!
//! struct SingleFolder;
//!
//! impl NodeSource for SingleFolder {
//!     fn fetch(
//!         &self,
//!         path: &NodePath,
//!         _filter: Option<&str>,
//!     ) -> Result<NodeDescriptor, SourceError> {
//!         let mut descriptor =
//!             NodeDescriptor::new(path.clone(), NodeKind::Container);
//!         if path.is_root() {
//!             descriptor.children = vec![NodeDescriptor::new(
//!                 path.join("docs"),
//!                 NodeKind::Leaf,
//!             )];
//!         }
//!         Ok(descriptor)
//!     }
//! }
//!
//! let mut browser = TreeBrowser::new(BrowserConfig::new());
//! let effects = run(
//!     &mut browser,
//!     &SingleFolder,
//!     BrowserCommand::SetRoot {
//!         root: NodePath::root(),
//!     },
//! );
//! assert!(!effects.is_empty());
//! assert!(browser.tree().contains(&NodePath::new("/docs")));
//! ```

mod codec;
mod command;
mod config;
mod descriptor;
mod driver;
mod errors;
mod event;
mod lock;
mod path;
mod reducer;
mod source;
mod state;
mod tree;

pub use codec::{NodeId, PathCodec};
pub use command::{BrowserCommand, DropPosition};
pub use config::BrowserConfig;
pub use descriptor::{NodeDescriptor, NodeKind, StateFlags};
pub use driver::run;
pub use errors::SourceError;
pub use event::BrowserEffect;
pub use lock::{DEFAULT_LOCK_TIMEOUT, SelectionLock};
pub use path::NodePath;
pub use source::{NodeSource, load_node, node_url};
pub use tree::{RenderedNode, RenderedTree};

use state::BrowserState;

/// One browser instance over one remote namespace.
///
/// Instances are fully independent: each owns its rendered tree, its
/// identifier codec and its selection lock, so several browsers on the
/// same page never interfere.
pub struct TreeBrowser {
    state: BrowserState,
}

impl TreeBrowser {
    /// Create a browser with a random identifier prefix.
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            state: BrowserState::new(config),
        }
    }

    /// Create a browser with a caller-supplied codec.
    pub fn with_codec(config: BrowserConfig, codec: PathCodec) -> Self {
        Self {
            state: BrowserState::with_codec(config, codec),
        }
    }

    /// Reduce a command into state updates and effects.
    pub fn reduce(&mut self, command: BrowserCommand) -> Vec<BrowserEffect> {
        reducer::reduce(&mut self.state, command)
    }

    /// Return the rendered tree mirror.
    pub fn tree(&self) -> &RenderedTree {
        self.state.tree()
    }

    /// Return the selected path, if any.
    pub fn selected_path(&self) -> Option<&NodePath> {
        self.state.tree().selected_path()
    }

    /// Return the hovered path, if any.
    pub fn hovered_path(&self) -> Option<&NodePath> {
        self.state.hovered_path()
    }

    /// Return the runtime configuration.
    pub fn config(&self) -> &BrowserConfig {
        self.state.config()
    }

    /// Return the identifier codec of this instance.
    pub fn codec(&self) -> &PathCodec {
        self.state.codec()
    }

    /// Return whether a structural operation currently holds the
    /// selection lock. A stale hold is cleared by this check.
    pub fn is_locked(&mut self) -> bool {
        self.state.lock_mut().is_locked()
    }

    /// Return whether nothing is in flight and nothing is queued.
    pub fn is_idle(&self) -> bool {
        self.state.operation().is_none() && self.state.pending().is_empty()
    }
}
