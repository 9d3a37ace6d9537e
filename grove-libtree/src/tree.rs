use crate::descriptor::NodeDescriptor;
use crate::path::NodePath;

/// Client-local mirror of one loaded namespace entry.
#[derive(Debug, Clone)]
pub struct RenderedNode {
    descriptor: NodeDescriptor,
    children: Vec<RenderedNode>,
    open: bool,
    loaded: bool,
}

impl RenderedNode {
    /// Build a node from a freshly fetched descriptor; its one level of
    /// child descriptors becomes shallow, unloaded child nodes.
    fn loaded(mut descriptor: NodeDescriptor) -> Self {
        let children = std::mem::take(&mut descriptor.children)
            .into_iter()
            .map(RenderedNode::shallow)
            .collect();

        Self {
            descriptor,
            children,
            open: false,
            loaded: true,
        }
    }

    /// Build a shallow node whose children have not been fetched yet.
    fn shallow(mut descriptor: NodeDescriptor) -> Self {
        descriptor.children.clear();

        Self {
            descriptor,
            children: Vec::new(),
            open: false,
            loaded: false,
        }
    }

    /// Return the entry name.
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Return the absolute namespace path.
    pub fn path(&self) -> &NodePath {
        &self.descriptor.path
    }

    /// Return the remote-truth descriptor.
    pub fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    /// Return the rendered children.
    pub fn children(&self) -> &[RenderedNode] {
        &self.children
    }

    /// Return whether children are currently expanded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Return whether children have been fetched and are current.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Client-local mirror of the loaded portion of the namespace.
///
/// This is the narrow surface the drill-down walker and the mutation
/// reconciler operate on: node lookup, open/close, selection, wholesale
/// child replacement, and the sibling/render-order queries behind the
/// deleted-node fallback rule. At most one node is selected at a time, and
/// only nodes that are actually rendered can be selected.
#[derive(Debug, Default)]
pub struct RenderedTree {
    root: Option<RenderedNode>,
    selected: Option<NodePath>,
}

impl RenderedTree {
    /// Create an empty tree with nothing rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return whether nothing has been rendered yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the rendered root node.
    pub fn root_node(&self) -> Option<&RenderedNode> {
        self.root.as_ref()
    }

    /// Return the path of the rendered root.
    pub fn root_path(&self) -> Option<&NodePath> {
        self.root.as_ref().map(RenderedNode::path)
    }

    /// Replace the whole tree with a freshly loaded root descriptor.
    ///
    /// The root starts open; any previous content and selection is gone.
    pub fn install_root(&mut self, descriptor: NodeDescriptor) {
        let mut root = RenderedNode::loaded(descriptor);
        root.open = true;
        self.root = Some(root);
        self.prune_selection();
    }

    /// Look up a rendered node by path.
    pub fn node(&self, path: &NodePath) -> Option<&RenderedNode> {
        let root = self.root.as_ref()?;
        let relative = relative_segments(path, root.path())?;
        find_node(root, relative)
    }

    /// Return whether a node is rendered.
    pub fn contains(&self, path: &NodePath) -> bool {
        self.node(path).is_some()
    }

    /// Return whether a rendered node is currently open.
    pub fn is_open(&self, path: &NodePath) -> bool {
        self.node(path).is_some_and(RenderedNode::is_open)
    }

    /// Open or close a rendered node.
    ///
    /// Closing discards the node's child descriptors, so a later reopen
    /// fetches them again. Returns `false` when the node is not rendered.
    pub fn set_open(&mut self, path: &NodePath, open: bool) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };

        node.open = open;
        if !open {
            node.children.clear();
            node.loaded = false;
        }
        self.prune_selection();
        true
    }

    /// Mark a node's children as stale so they are refetched, not reused.
    pub fn mark_stale(&mut self, path: &NodePath) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };

        node.loaded = false;
        true
    }

    /// Replace a node's descriptor and children wholesale from a freshly
    /// loaded descriptor. The node's open flag is preserved.
    pub fn apply_children(
        &mut self,
        path: &NodePath,
        descriptor: NodeDescriptor,
    ) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };

        let open = node.open;
        *node = RenderedNode::loaded(descriptor);
        node.open = open;
        self.prune_selection();
        true
    }

    /// Swap a node's descriptor in place, keeping children and open state.
    pub fn apply_descriptor(
        &mut self,
        path: &NodePath,
        mut descriptor: NodeDescriptor,
    ) -> bool {
        let Some(node) = self.node_mut(path) else {
            return false;
        };

        descriptor.children.clear();
        node.descriptor = descriptor;
        true
    }

    /// Remove a rendered node from its parent.
    pub fn remove(&mut self, path: &NodePath) -> bool {
        let Some(parent_path) = path.parent() else {
            return false;
        };
        let Some(parent) = self.node_mut(&parent_path) else {
            return false;
        };

        let before = parent.children.len();
        parent.children.retain(|child| child.path() != path);
        let removed = parent.children.len() != before;
        if removed {
            self.prune_selection();
        }
        removed
    }

    /// Select a rendered node. Fails when the path is not rendered.
    pub fn select(&mut self, path: &NodePath) -> bool {
        if !self.contains(path) {
            return false;
        }

        self.selected = Some(path.clone());
        true
    }

    /// Clear the selection (a no-op when nothing is selected).
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Return the selected path, if any.
    pub fn selected_path(&self) -> Option<&NodePath> {
        self.selected.as_ref()
    }

    /// Return the next sibling of a node in render order.
    pub fn next_sibling(&self, path: &NodePath) -> Option<NodePath> {
        self.sibling(path, 1)
    }

    /// Return the previous sibling of a node in render order.
    pub fn prev_sibling(&self, path: &NodePath) -> Option<NodePath> {
        self.sibling(path, -1)
    }

    /// Return every visible path in depth-first render order.
    ///
    /// Children are visible only under open ancestors; sibling order is the
    /// order the server delivered.
    pub fn visible_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        if let Some(root) = &self.root {
            collect_visible(root, &mut paths);
        }
        paths
    }

    /// Return the nearest node before `path` in render order.
    pub fn nearest_preceding(&self, path: &NodePath) -> Option<NodePath> {
        let visible = self.visible_paths();
        let index = visible.iter().position(|entry| entry == path)?;
        if index == 0 {
            return None;
        }
        Some(visible[index - 1].clone())
    }

    /// Return every open node path in depth-first (top-down) order.
    pub fn open_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        if let Some(root) = &self.root {
            collect_open(root, &mut paths);
        }
        paths
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut RenderedNode> {
        let root = self.root.as_mut()?;
        let relative = relative_segments(path, root.path())?;
        find_node_mut(root, relative)
    }

    fn sibling(&self, path: &NodePath, offset: isize) -> Option<NodePath> {
        let parent = self.node(&path.parent()?)?;
        let index = parent
            .children
            .iter()
            .position(|child| child.path() == path)?;
        let sibling = index.checked_add_signed(offset)?;
        Some(parent.children.get(sibling)?.path().clone())
    }

    fn prune_selection(&mut self) {
        if let Some(selected) = self.selected.clone() {
            if !self.contains(&selected) {
                self.selected = None;
            }
        }
    }
}

/// Split `path` into segments relative to `root`, or `None` when the path
/// is not under the rendered root.
fn relative_segments<'a>(
    path: &'a NodePath,
    root: &NodePath,
) -> Option<Vec<&'a str>> {
    if !path.starts_with(root) {
        return None;
    }

    let skip = root.segments().count();
    Some(path.segments().skip(skip).collect())
}

fn find_node<'a>(
    node: &'a RenderedNode,
    relative: Vec<&str>,
) -> Option<&'a RenderedNode> {
    let mut current = node;
    for segment in relative {
        current = current
            .children
            .iter()
            .find(|child| child.name() == segment)?;
    }
    Some(current)
}

fn find_node_mut<'a>(
    node: &'a mut RenderedNode,
    relative: Vec<&str>,
) -> Option<&'a mut RenderedNode> {
    let mut current = node;
    for segment in relative {
        current = current
            .children
            .iter_mut()
            .find(|child| child.name() == segment)?;
    }
    Some(current)
}

fn collect_visible(node: &RenderedNode, paths: &mut Vec<NodePath>) {
    paths.push(node.path().clone());
    if node.open {
        for child in &node.children {
            collect_visible(child, paths);
        }
    }
}

fn collect_open(node: &RenderedNode, paths: &mut Vec<NodePath>) {
    if node.open {
        paths.push(node.path().clone());
    }
    for child in &node.children {
        collect_open(child, paths);
    }
}
