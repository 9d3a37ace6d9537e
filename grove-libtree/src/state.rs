use std::collections::VecDeque;

use crate::codec::PathCodec;
use crate::command::BrowserCommand;
use crate::config::BrowserConfig;
use crate::lock::SelectionLock;
use crate::path::NodePath;
use crate::reducer::Operation;
use crate::tree::RenderedTree;

/// Runtime state of one tree browser instance.
///
/// Every instance owns its rendered tree, its codec, and its selection
/// lock; instances on the same page never share state. At most one
/// structural operation is in flight at a time, and commands arriving while
/// it runs wait on the pending queue.
#[derive(Debug)]
pub(crate) struct BrowserState {
    config: BrowserConfig,
    codec: PathCodec,
    tree: RenderedTree,
    lock: SelectionLock,
    hovered: Option<NodePath>,
    operation: Option<Operation>,
    pending: VecDeque<BrowserCommand>,
}

impl BrowserState {
    pub(crate) fn new(config: BrowserConfig) -> Self {
        Self::with_codec(config, PathCodec::new())
    }

    pub(crate) fn with_codec(config: BrowserConfig, codec: PathCodec) -> Self {
        let lock = SelectionLock::new(config.lock_timeout());
        Self {
            config,
            codec,
            tree: RenderedTree::new(),
            lock,
            hovered: None,
            operation: None,
            pending: VecDeque::new(),
        }
    }

    // --- Read access ---

    pub(crate) fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub(crate) fn codec(&self) -> &PathCodec {
        &self.codec
    }

    pub(crate) fn tree(&self) -> &RenderedTree {
        &self.tree
    }

    pub(crate) fn lock(&self) -> &SelectionLock {
        &self.lock
    }

    pub(crate) fn hovered_path(&self) -> Option<&NodePath> {
        self.hovered.as_ref()
    }

    pub(crate) fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub(crate) fn pending(&self) -> &VecDeque<BrowserCommand> {
        &self.pending
    }

    // --- Write access ---

    pub(crate) fn config_mut(&mut self) -> &mut BrowserConfig {
        &mut self.config
    }

    pub(crate) fn tree_mut(&mut self) -> &mut RenderedTree {
        &mut self.tree
    }

    pub(crate) fn lock_mut(&mut self) -> &mut SelectionLock {
        &mut self.lock
    }

    pub(crate) fn set_hovered(&mut self, path: Option<NodePath>) {
        self.hovered = path;
    }

    pub(crate) fn set_operation(&mut self, operation: Operation) {
        self.operation = Some(operation);
    }

    pub(crate) fn take_operation(&mut self) -> Option<Operation> {
        self.operation.take()
    }

    pub(crate) fn pending_mut(&mut self) -> &mut VecDeque<BrowserCommand> {
        &mut self.pending
    }
}
