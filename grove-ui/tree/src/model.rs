/// Key of one rendered row: the absolute namespace path of its node.
///
/// Keys are unique across the whole tree, so they identify rows without
/// positional paths even while siblings are reordered remotely.
pub type NodeKey = String;

/// Trait implemented by tree node types consumable by this crate.
pub trait TreeNode {
    /// Display name of the node within its parent.
    fn name(&self) -> &str;
    /// Absolute path of the node, used as its row key.
    fn key(&self) -> &str;
    /// Whether this node may hold children.
    fn is_container(&self) -> bool;
    /// Whether the node's children are currently expanded.
    fn is_open(&self) -> bool;
    /// Children of the node, in the order the server delivered them.
    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// Flattened representation of a visible tree row.
pub struct TreeRow<'a, T: TreeNode> {
    /// Zero-based tree depth (`0` for root-level rows).
    pub depth: usize,
    /// Borrowed source node.
    pub node: &'a T,
    /// Absolute-path key of this row.
    pub key: NodeKey,
}

/// Flatten a tree into a depth-first list of visible rows.
///
/// Sibling order is preserved exactly as delivered: the namespace order is
/// authoritative and reordering is a remote operation, so the client never
/// sorts. Children are included only under open containers.
pub fn flatten_tree<'a, T: TreeNode>(nodes: &'a [T]) -> Vec<TreeRow<'a, T>> {
    let mut rows = Vec::new();
    for node in nodes {
        push_node(node, 0, &mut rows);
    }
    rows
}

fn push_node<'a, T: TreeNode>(
    node: &'a T,
    depth: usize,
    rows: &mut Vec<TreeRow<'a, T>>,
) {
    rows.push(TreeRow {
        depth,
        node,
        key: node.key().to_string(),
    });

    if node.is_container() && node.is_open() {
        for child in node.children() {
            push_node(child, depth + 1, rows);
        }
    }
}
