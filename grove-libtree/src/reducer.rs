use std::collections::VecDeque;

use uuid::Uuid;

use crate::command::{BrowserCommand, DropPosition};
use crate::descriptor::NodeDescriptor;
use crate::event::BrowserEffect;
use crate::path::NodePath;
use crate::state::BrowserState;

/// One structural operation in flight.
///
/// An operation owns the selection lock from the moment it is created until
/// [`finish_op`] runs. There is no path out of an operation that skips
/// `finish_op`, so the lock is released and the completion effect is
/// emitted exactly once on every branch.
#[derive(Debug)]
pub(crate) enum Operation {
    DrillDown(DrillDown),
    Reload(Reload),
}

impl Operation {
    fn kind(&self) -> &'static str {
        match self {
            Operation::DrillDown(_) => "drill-down",
            Operation::Reload(_) => "reload",
        }
    }
}

/// Ancestor walk towards a selection target.
#[derive(Debug)]
pub(crate) struct DrillDown {
    target: NodePath,
    suppress_notification: bool,
    origin: Option<Uuid>,
    /// Ancestors between the configured root and the target, in order, not
    /// yet confirmed open.
    ancestors: VecDeque<NodePath>,
    awaiting: Option<NodePath>,
}

/// Shared reload primitive behind refresh, inserted, changed, moved and
/// deleted: an ordered queue of load steps, a selection plan applied once
/// all steps finish, an optional focus hint and an optional follow-up
/// command.
#[derive(Debug)]
pub(crate) struct Reload {
    steps: VecDeque<LoadStep>,
    awaiting: Option<LoadStep>,
    /// Selection at operation start, restored when it still exists.
    prior_selection: Option<NodePath>,
    /// Fallback candidates tried in order when the prior selection is gone.
    prefer: Vec<NodePath>,
    focus: Option<NodePath>,
    follow_up: Option<Box<BrowserCommand>>,
}

/// One load in a reload plan. Steps whose path is no longer rendered when
/// their turn comes are skipped, never treated as errors.
#[derive(Debug, Clone)]
enum LoadStep {
    /// Load the configured root and replace the whole tree.
    InstallRoot(NodePath),
    /// Load a node's children unless they are already loaded; keeps the
    /// open flag as it is.
    EnsureLoaded(NodePath),
    /// Load a node's children unless they are loaded and open; opens the
    /// node.
    EnsureOpen(NodePath),
    /// Load a node's children and replace them wholesale.
    RefreshChildren(NodePath),
    /// Load a node's descriptor only and swap it in place.
    RefreshDescriptor(NodePath),
}

impl LoadStep {
    fn path(&self) -> &NodePath {
        match self {
            LoadStep::InstallRoot(path)
            | LoadStep::EnsureLoaded(path)
            | LoadStep::EnsureOpen(path)
            | LoadStep::RefreshChildren(path)
            | LoadStep::RefreshDescriptor(path) => path,
        }
    }
}

/// Reduce a browser command into state updates and effects.
pub(crate) fn reduce(
    state: &mut BrowserState,
    command: BrowserCommand,
) -> Vec<BrowserEffect> {
    if requires_lock(&command) && state.lock_mut().is_locked() {
        log::debug!(
            "selection lock held by \"{}\", queueing {command:?}",
            state.lock().reason()
        );
        state.pending_mut().push_back(command);
        return Vec::new();
    }

    match command {
        BrowserCommand::SelectNode {
            path,
            suppress_notification,
            origin,
        } => reduce_select_node(state, path, suppress_notification, origin),
        BrowserCommand::NodePressed { path } => {
            reduce_node_pressed(state, path)
        },
        BrowserCommand::NodeHovered { path } => {
            state.set_hovered(path);
            Vec::new()
        },
        BrowserCommand::NodeDropped {
            dragged,
            target,
            position,
        } => reduce_node_dropped(state, dragged, target, position),
        BrowserCommand::Refresh => {
            let reason = format!("refresh {}", state.config().root());
            begin(state, &reason);
            full_refresh(state)
        },
        BrowserCommand::SetRoot { root } => reduce_set_root(state, root),
        BrowserCommand::SetFilter { filter } => {
            reduce_set_filter(state, filter)
        },
        BrowserCommand::Inserted { parent, name } => {
            reduce_inserted(state, parent, &name)
        },
        BrowserCommand::Changed { path } => reduce_changed(state, path),
        BrowserCommand::Moved { from, to } => reduce_moved(state, from, to),
        BrowserCommand::Deleted { path, replacement } => {
            reduce_deleted(state, path, replacement)
        },
        BrowserCommand::LoadCompleted { path, descriptor } => {
            reduce_load_completed(state, path, descriptor)
        },
    }
}

/// Return whether a command mutates tree structure and therefore needs the
/// selection lock. Reads (hover) and gesture validation never take it.
fn requires_lock(command: &BrowserCommand) -> bool {
    matches!(
        command,
        BrowserCommand::SelectNode { .. }
            | BrowserCommand::NodePressed { .. }
            | BrowserCommand::Refresh
            | BrowserCommand::SetRoot { .. }
            | BrowserCommand::SetFilter { .. }
            | BrowserCommand::Inserted { .. }
            | BrowserCommand::Changed { .. }
            | BrowserCommand::Moved { .. }
            | BrowserCommand::Deleted { .. }
    )
}

/// Acquire the selection lock for a new operation.
///
/// An operation left behind by a stale-lock recovery is discarded here;
/// its late load completion will be dropped as stale.
fn begin(state: &mut BrowserState, reason: &str) {
    if let Some(abandoned) = state.take_operation() {
        log::warn!(
            "discarding abandoned {} operation after stale lock recovery",
            abandoned.kind()
        );
    }

    let _ = state.lock_mut().lock(reason, false);
}

/// Release the lock, emit the completion effect and replay queued commands.
///
/// For reload operations this also applies the selection plan: the prior
/// selection is restored when it still exists, otherwise the preference
/// list is tried in order, otherwise the selection stays cleared.
fn finish_op(
    state: &mut BrowserState,
    operation: Option<Operation>,
) -> Vec<BrowserEffect> {
    let mut effects = Vec::new();

    if let Some(Operation::Reload(reload)) = operation {
        if let Some(prior) = reload.prior_selection {
            if state.tree().contains(&prior) {
                state.tree_mut().select(&prior);
            } else if let Some(candidate) = reload
                .prefer
                .iter()
                .find(|candidate| state.tree().contains(candidate))
            {
                let candidate = candidate.clone();
                state.tree_mut().select(&candidate);
            }
        }

        if let Some(focus) = reload.focus {
            if state.tree().contains(&focus) {
                effects.push(BrowserEffect::FocusNode { path: focus });
            }
        }

        if let Some(follow_up) = reload.follow_up {
            state.pending_mut().push_front(*follow_up);
        }
    }

    let reason = state.lock().reason().to_string();
    state.lock_mut().unlock(Some(&reason));
    effects.push(BrowserEffect::OperationCompleted {
        reason,
        selected: state.tree().selected_path().cloned(),
    });

    while state.operation().is_none() {
        let Some(command) = state.pending_mut().pop_front() else {
            break;
        };
        effects.extend(reduce(state, command));
    }

    effects
}

/// Emit the load request for `path` with the configured filter.
fn request_load(state: &BrowserState, path: NodePath) -> BrowserEffect {
    BrowserEffect::LoadRequested {
        path,
        filter: state.config().filter().map(str::to_string),
    }
}

fn reduce_select_node(
    state: &mut BrowserState,
    path: NodePath,
    suppress_notification: bool,
    origin: Option<Uuid>,
) -> Vec<BrowserEffect> {
    begin(state, path.as_str());

    let root = state.config().root().clone();
    let Some(ancestors) = path.ancestor_chain(&root) else {
        log::warn!(
            "selection target {path} is outside the configured root {root}"
        );
        return finish_op(state, None);
    };

    state.tree_mut().clear_selection();
    let walk = DrillDown {
        target: path,
        suppress_notification,
        origin,
        ancestors: ancestors.into(),
        awaiting: None,
    };
    continue_drill_down(state, walk)
}

/// Walk the remaining ancestors of a drill-down, parking on the first one
/// whose children still need a load.
fn continue_drill_down(
    state: &mut BrowserState,
    mut walk: DrillDown,
) -> Vec<BrowserEffect> {
    loop {
        let Some(ancestor) = walk.ancestors.front().cloned() else {
            break;
        };

        let status = state
            .tree()
            .node(&ancestor)
            .map(|node| (node.is_open(), node.is_loaded()));
        let Some((is_open, is_loaded)) = status else {
            log::warn!(
                "drill-down to {} stopped: ancestor {ancestor} is not \
                 rendered",
                walk.target
            );
            return finish_op(state, Some(Operation::DrillDown(walk)));
        };

        if is_open {
            walk.ancestors.pop_front();
            continue;
        }

        if is_loaded {
            // loaded but collapsed: reopen without refetching
            state.tree_mut().set_open(&ancestor, true);
            walk.ancestors.pop_front();
            continue;
        }

        walk.awaiting = Some(ancestor.clone());
        let effect = request_load(state, ancestor);
        state.set_operation(Operation::DrillDown(walk));
        return vec![effect];
    }

    let mut effects = Vec::new();
    let target_descriptor = state
        .tree()
        .node(&walk.target)
        .map(|node| node.descriptor().clone());
    if let Some(descriptor) = target_descriptor {
        state.tree_mut().select(&walk.target);
        if !walk.suppress_notification {
            effects.push(BrowserEffect::SelectionChanged {
                path: walk.target.clone(),
                descriptor,
                origin: walk.origin,
            });
        }
        effects.push(BrowserEffect::ScrollIntoView {
            path: walk.target.clone(),
        });
    } else {
        log::warn!(
            "selection target {} is not rendered after drill-down",
            walk.target
        );
    }

    effects.extend(finish_op(state, Some(Operation::DrillDown(walk))));
    effects
}

fn reduce_node_pressed(
    state: &mut BrowserState,
    path: NodePath,
) -> Vec<BrowserEffect> {
    begin(state, &format!("pressed {path}"));

    let pressed = state
        .tree()
        .node(&path)
        .map(|node| (node.descriptor().clone(), node.is_open()));
    let Some((descriptor, is_open)) = pressed else {
        log::debug!("press on {path} ignored: node is not rendered");
        return finish_op(state, None);
    };
    let is_container = descriptor.kind.is_container();

    state.tree_mut().select(&path);
    let mut effects = vec![BrowserEffect::SelectionChanged {
        path: path.clone(),
        descriptor,
        origin: None,
    }];

    if is_container && is_open {
        state.tree_mut().set_open(&path, false);
        effects.extend(finish_op(state, None));
    } else if is_container {
        let reload = Reload {
            steps: VecDeque::from([LoadStep::EnsureOpen(path.clone())]),
            awaiting: None,
            prior_selection: Some(path),
            prefer: Vec::new(),
            focus: None,
            follow_up: None,
        };
        effects.extend(advance_reload(state, reload));
    } else {
        effects.extend(finish_op(state, None));
    }

    effects
}

fn reduce_node_dropped(
    state: &mut BrowserState,
    dragged: NodePath,
    target: NodePath,
    position: DropPosition,
) -> Vec<BrowserEffect> {
    if dragged == target {
        log::debug!("drop of {dragged} onto itself ignored");
        return Vec::new();
    }
    if target.starts_with(&dragged) {
        log::warn!("drop of {dragged} into its own subtree {target} refused");
        return Vec::new();
    }
    if !state.tree().contains(&dragged) || !state.tree().contains(&target) {
        log::debug!("drop of {dragged} onto {target} ignored: not rendered");
        return Vec::new();
    }

    let destination = match position {
        DropPosition::Into => Some(target.clone()),
        DropPosition::Before | DropPosition::After => target.parent(),
    };
    let Some(destination) = destination else {
        return Vec::new();
    };

    let is_reorder = dragged.parent().as_ref() == Some(&destination);
    vec![BrowserEffect::MoveRequested {
        dragged,
        target,
        position,
        is_reorder,
    }]
}

fn reduce_set_root(
    state: &mut BrowserState,
    root: NodePath,
) -> Vec<BrowserEffect> {
    if state.config().root() == &root && !state.tree().is_empty() {
        log::debug!("root unchanged at {root}, skipping refresh");
        return Vec::new();
    }

    begin(state, &format!("set-root {root}"));
    state.config_mut().set_root(root);
    full_refresh(state)
}

fn reduce_set_filter(
    state: &mut BrowserState,
    filter: Option<String>,
) -> Vec<BrowserEffect> {
    if state.config().filter() == filter.as_deref() {
        log::debug!("filter unchanged, skipping refresh");
        return Vec::new();
    }

    begin(state, &format!("set-filter {}", filter.as_deref().unwrap_or("-")));
    state.config_mut().set_filter(filter);
    full_refresh(state)
}

/// Reload the root and every previously open node top-down, restoring the
/// prior selection when it survives. Expects the lock to be held already.
fn full_refresh(state: &mut BrowserState) -> Vec<BrowserEffect> {
    let root = state.config().root().clone();
    let prior_selection = state
        .tree()
        .selected_path()
        .filter(|selected| selected.starts_with(&root))
        .cloned();

    let mut steps = VecDeque::from([LoadStep::InstallRoot(root.clone())]);
    for open in state.tree().open_paths() {
        if open != root && open.starts_with(&root) {
            steps.push_back(LoadStep::EnsureOpen(open));
        }
    }

    let reload = Reload {
        steps,
        awaiting: None,
        prior_selection,
        prefer: Vec::new(),
        focus: None,
        follow_up: None,
    };
    advance_reload(state, reload)
}

fn reduce_inserted(
    state: &mut BrowserState,
    parent: NodePath,
    name: &str,
) -> Vec<BrowserEffect> {
    begin(state, &format!("inserted {}", parent.join(name)));

    let root = state.config().root().clone();
    let Some(between) = parent.ancestor_chain(&root) else {
        log::warn!(
            "insert under {parent} ignored: outside the configured root \
             {root}"
        );
        return finish_op(state, None);
    };

    // never load a child's container before its own parent is present
    let was_empty = state.tree().is_empty();
    let mut steps = VecDeque::new();
    if was_empty {
        steps.push_back(LoadStep::InstallRoot(root.clone()));
    }
    for ancestor in between {
        steps.push_back(LoadStep::EnsureLoaded(ancestor));
    }
    if parent != root {
        steps.push_back(LoadStep::RefreshChildren(parent));
    } else if !was_empty {
        steps.push_back(LoadStep::RefreshChildren(root));
    }

    let reload = Reload {
        steps,
        awaiting: None,
        prior_selection: state.tree().selected_path().cloned(),
        prefer: Vec::new(),
        focus: None,
        follow_up: None,
    };
    advance_reload(state, reload)
}

fn reduce_changed(
    state: &mut BrowserState,
    path: NodePath,
) -> Vec<BrowserEffect> {
    begin(state, &format!("changed {path}"));

    if !state.tree().contains(&path) {
        log::debug!("change of {path} ignored: node is not rendered");
        return finish_op(state, None);
    }

    let reload = Reload {
        steps: VecDeque::from([LoadStep::RefreshDescriptor(path)]),
        awaiting: None,
        prior_selection: state.tree().selected_path().cloned(),
        prefer: Vec::new(),
        focus: None,
        follow_up: None,
    };
    advance_reload(state, reload)
}

fn reduce_moved(
    state: &mut BrowserState,
    from: NodePath,
    to: NodePath,
) -> Vec<BrowserEffect> {
    begin(state, &format!("moved {from} -> {to}"));

    let was_selected = state.tree().selected_path() == Some(&from);
    if let Some(new_parent) = to.parent() {
        state.tree_mut().mark_stale(&new_parent);
    }

    let mut steps = VecDeque::new();
    match (from.parent(), to.parent()) {
        (Some(old_parent), Some(new_parent)) if old_parent == new_parent => {
            steps.push_back(LoadStep::RefreshChildren(old_parent));
        },
        (old_parent, new_parent) => {
            if let Some(old_parent) = old_parent {
                steps.push_back(LoadStep::RefreshChildren(old_parent));
            }
            if let Some(new_parent) = new_parent {
                steps.push_back(LoadStep::RefreshChildren(new_parent));
            }
        },
    }

    // reselect only after both refreshes: selecting first would target a
    // rendered node that no longer matches the remote truth
    let (prior_selection, follow_up) = if was_selected {
        let select = BrowserCommand::SelectNode {
            path: to,
            suppress_notification: false,
            origin: None,
        };
        (None, Some(Box::new(select)))
    } else {
        (state.tree().selected_path().cloned(), None)
    };

    let reload = Reload {
        steps,
        awaiting: None,
        prior_selection,
        prefer: Vec::new(),
        focus: None,
        follow_up,
    };
    advance_reload(state, reload)
}

fn reduce_deleted(
    state: &mut BrowserState,
    path: NodePath,
    replacement: Option<NodePath>,
) -> Vec<BrowserEffect> {
    begin(state, &format!("deleted {path}"));

    // the fallback must be computed before the refresh removes the node:
    // sibling metadata is not retrievable once the entry is gone
    let was_selected = state.tree().selected_path() == Some(&path);
    let fallback = state
        .tree()
        .next_sibling(&path)
        .or_else(|| state.tree().prev_sibling(&path))
        .or_else(|| state.tree().nearest_preceding(&path));

    let mut steps = VecDeque::new();
    if let Some(parent) = path.parent() {
        steps.push_back(LoadStep::RefreshChildren(parent));
    }

    let prefer = if was_selected {
        replacement.into_iter().chain(fallback.clone()).collect()
    } else {
        Vec::new()
    };

    let reload = Reload {
        steps,
        awaiting: None,
        prior_selection: state.tree().selected_path().cloned(),
        prefer,
        focus: fallback,
        follow_up: None,
    };
    advance_reload(state, reload)
}

/// Pop reload steps until one needs a load, then park on it. Steps whose
/// node is gone or already satisfied are skipped.
fn advance_reload(
    state: &mut BrowserState,
    mut reload: Reload,
) -> Vec<BrowserEffect> {
    loop {
        let Some(step) = reload.steps.pop_front() else {
            return finish_op(state, Some(Operation::Reload(reload)));
        };

        let request = match &step {
            LoadStep::InstallRoot(path) => Some(path.clone()),
            LoadStep::EnsureLoaded(path) => {
                let loaded = state
                    .tree()
                    .node(path)
                    .map(|node| node.is_loaded());
                match loaded {
                    Some(false) => Some(path.clone()),
                    _ => None,
                }
            },
            LoadStep::EnsureOpen(path) => {
                let status = state
                    .tree()
                    .node(path)
                    .map(|node| (node.is_loaded(), node.is_open()));
                match status {
                    Some((true, true)) | None => None,
                    Some((true, false)) => {
                        state.tree_mut().set_open(path, true);
                        None
                    },
                    Some((false, _)) => Some(path.clone()),
                }
            },
            LoadStep::RefreshChildren(path)
            | LoadStep::RefreshDescriptor(path) => {
                if state.tree().contains(path) {
                    Some(path.clone())
                } else {
                    log::debug!("reload step for {path} skipped: not rendered");
                    None
                }
            },
        };

        if let Some(path) = request {
            reload.awaiting = Some(step);
            let effect = request_load(state, path);
            state.set_operation(Operation::Reload(reload));
            return vec![effect];
        }
    }
}

fn reduce_load_completed(
    state: &mut BrowserState,
    path: NodePath,
    descriptor: Option<NodeDescriptor>,
) -> Vec<BrowserEffect> {
    let Some(operation) = state.take_operation() else {
        log::warn!("stale load completion for {path} dropped");
        return Vec::new();
    };

    match operation {
        Operation::DrillDown(mut walk) => {
            if walk.awaiting.as_ref() != Some(&path) {
                log::warn!(
                    "stale load completion for {path} dropped during \
                     drill-down to {}",
                    walk.target
                );
                state.set_operation(Operation::DrillDown(walk));
                return Vec::new();
            }
            walk.awaiting = None;

            let Some(descriptor) = descriptor else {
                // the walk cannot continue past a failed ancestor
                return finish_op(state, Some(Operation::DrillDown(walk)));
            };

            state.tree_mut().apply_children(&path, descriptor);
            state.tree_mut().set_open(&path, true);
            continue_drill_down(state, walk)
        },
        Operation::Reload(mut reload) => {
            let Some(step) = reload.awaiting.take() else {
                log::warn!("stale load completion for {path} dropped");
                state.set_operation(Operation::Reload(reload));
                return Vec::new();
            };
            if step.path() != &path {
                log::warn!(
                    "stale load completion for {path} dropped while \
                     awaiting {}",
                    step.path()
                );
                reload.awaiting = Some(step);
                state.set_operation(Operation::Reload(reload));
                return Vec::new();
            }

            if let Some(descriptor) = descriptor {
                match step {
                    LoadStep::InstallRoot(_) => {
                        state.tree_mut().install_root(descriptor);
                    },
                    LoadStep::EnsureLoaded(path) => {
                        state.tree_mut().apply_children(&path, descriptor);
                    },
                    LoadStep::EnsureOpen(path) => {
                        state.tree_mut().apply_children(&path, descriptor);
                        state.tree_mut().set_open(&path, true);
                    },
                    LoadStep::RefreshChildren(path) => {
                        state.tree_mut().apply_children(&path, descriptor);
                    },
                    LoadStep::RefreshDescriptor(path) => {
                        state.tree_mut().apply_descriptor(&path, descriptor);
                    },
                }
            }

            advance_reload(state, reload)
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::reduce;
    use crate::codec::PathCodec;
    use crate::command::{BrowserCommand, DropPosition};
    use crate::config::BrowserConfig;
    use crate::descriptor::{NodeDescriptor, NodeKind};
    use crate::event::BrowserEffect;
    use crate::path::NodePath;
    use crate::state::BrowserState;

    fn container(path: &str, children: &[&str]) -> NodeDescriptor {
        let path = NodePath::new(path);
        let mut descriptor =
            NodeDescriptor::new(path.clone(), NodeKind::Container);
        descriptor.children = children
            .iter()
            .map(|name| {
                NodeDescriptor::new(path.join(name), NodeKind::Container)
            })
            .collect();
        descriptor
    }

    fn browser_state() -> BrowserState {
        let config =
            BrowserConfig::new().with_root(NodePath::new("/content"));
        BrowserState::with_codec(config, PathCodec::with_prefix("gnode_"))
    }

    /// Root `/content` with children `a`, `b`; `a` is open with children
    /// `b`, `c`.
    fn seeded_state() -> BrowserState {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a", "b"]));
        state.tree_mut().apply_children(
            &NodePath::new("/content/a"),
            container("/content/a", &["b", "c"]),
        );
        state.tree_mut().set_open(&NodePath::new("/content/a"), true);
        state
    }

    fn select(path: &str) -> BrowserCommand {
        BrowserCommand::SelectNode {
            path: NodePath::new(path),
            suppress_notification: false,
            origin: None,
        }
    }

    fn completed(path: &str, descriptor: NodeDescriptor) -> BrowserCommand {
        BrowserCommand::LoadCompleted {
            path: NodePath::new(path),
            descriptor: Some(descriptor),
        }
    }

    fn selection_changes(effects: &[BrowserEffect]) -> Vec<&NodePath> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                BrowserEffect::SelectionChanged { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn completions(effects: &[BrowserEffect]) -> usize {
        effects
            .iter()
            .filter(|effect| {
                matches!(effect, BrowserEffect::OperationCompleted { .. })
            })
            .count()
    }

    #[test]
    fn given_open_ancestors_when_selected_then_notification_fires_once() {
        let mut state = seeded_state();

        let effects = reduce(&mut state, select("/content/a/c"));

        let target = NodePath::new("/content/a/c");
        assert_eq!(selection_changes(&effects), vec![&target]);
        assert_eq!(completions(&effects), 1);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            BrowserEffect::ScrollIntoView { path } if path == &target
        )));
        assert_eq!(state.tree().selected_path(), Some(&target));
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_target_outside_root_when_selected_then_selection_is_unchanged() {
        let mut state = seeded_state();
        state.tree_mut().select(&NodePath::new("/content/a/b"));

        let effects = reduce(&mut state, select("/etc/passwd"));

        assert!(selection_changes(&effects).is_empty());
        assert_eq!(completions(&effects), 1);
        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/a/b"))
        );
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_closed_ancestor_when_selected_then_load_gates_the_walk() {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a", "b"]));

        let effects = reduce(&mut state, select("/content/a/b"));

        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );
        assert!(state.operation().is_some());

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c"])),
        );

        let target = NodePath::new("/content/a/b");
        assert_eq!(selection_changes(&effects), vec![&target]);
        assert_eq!(completions(&effects), 1);
        assert_eq!(state.tree().selected_path(), Some(&target));
        assert!(state.tree().is_open(&NodePath::new("/content/a")));
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_missing_ancestor_when_selected_then_walk_completes_unselected() {
        let mut state = seeded_state();

        let effects = reduce(&mut state, select("/content/missing/x"));

        assert!(selection_changes(&effects).is_empty());
        assert_eq!(completions(&effects), 1);
        assert_eq!(state.tree().selected_path(), None);
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_failed_ancestor_load_when_completed_then_walk_aborts_cleanly() {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a"]));
        let _ = reduce(&mut state, select("/content/a/b"));

        let effects = reduce(
            &mut state,
            BrowserCommand::LoadCompleted {
                path: NodePath::new("/content/a"),
                descriptor: None,
            },
        );

        assert!(selection_changes(&effects).is_empty());
        assert_eq!(completions(&effects), 1);
        assert_eq!(state.tree().selected_path(), None);
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_busy_browser_when_commanded_then_latest_selection_wins() {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a"]));
        let _ = reduce(&mut state, select("/content/a/b"));

        // arrives while the first drill-down waits on its ancestor load
        let effects = reduce(&mut state, select("/content/a/c"));
        assert!(effects.is_empty());
        assert_eq!(state.pending().len(), 1);

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c"])),
        );

        assert_eq!(
            selection_changes(&effects),
            vec![
                &NodePath::new("/content/a/b"),
                &NodePath::new("/content/a/c"),
            ]
        );
        assert_eq!(completions(&effects), 2);
        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/a/c"))
        );
        assert!(state.pending().is_empty());
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_idle_browser_when_stale_completion_arrives_then_it_is_dropped() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["z"])),
        );

        assert!(effects.is_empty());
        assert!(state.tree().contains(&NodePath::new("/content/a/b")));
        assert!(!state.tree().contains(&NodePath::new("/content/a/z")));
    }

    #[test]
    fn given_mismatched_completion_when_awaiting_then_operation_stays_parked()
    {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a"]));
        let _ = reduce(&mut state, select("/content/a/b"));

        let effects = reduce(
            &mut state,
            completed("/content/b", container("/content/b", &[])),
        );

        assert!(effects.is_empty());
        assert!(state.operation().is_some());
        assert!(state.lock_mut().is_locked());
    }

    #[test]
    fn given_closed_container_when_pressed_then_children_load_lazily() {
        let mut state = seeded_state();
        let b = NodePath::new("/content/b");

        let effects =
            reduce(&mut state, BrowserCommand::NodePressed { path: b.clone() });

        assert_eq!(selection_changes(&effects), vec![&b]);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            BrowserEffect::LoadRequested { path, .. } if path == &b
        )));

        let effects =
            reduce(&mut state, completed("/content/b", container("/content/b", &["x"])));

        assert_eq!(completions(&effects), 1);
        assert!(state.tree().is_open(&b));
        assert!(state.tree().contains(&NodePath::new("/content/b/x")));
        assert_eq!(state.tree().selected_path(), Some(&b));
    }

    #[test]
    fn given_open_container_when_pressed_then_it_closes_without_loading() {
        let mut state = seeded_state();
        let a = NodePath::new("/content/a");

        let effects =
            reduce(&mut state, BrowserCommand::NodePressed { path: a.clone() });

        assert_eq!(selection_changes(&effects), vec![&a]);
        assert_eq!(completions(&effects), 1);
        assert!(!state.tree().is_open(&a));
        assert!(!state.tree().contains(&NodePath::new("/content/a/b")));
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_empty_tree_when_insert_notified_then_chain_loads_top_down() {
        let mut state = browser_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::Inserted {
                parent: NodePath::new("/content/a"),
                name: String::from("d"),
            },
        );

        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content", container("/content", &["a", "b"])),
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c", "d"])),
        );
        assert_eq!(completions(&effects), 1);
        assert!(state.tree().contains(&NodePath::new("/content/a/d")));
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_loaded_parent_when_insert_notified_then_only_parent_refreshes() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::Inserted {
                parent: NodePath::new("/content/a"),
                name: String::from("d"),
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c", "d"])),
        );
        assert_eq!(completions(&effects), 1);
        assert!(state.tree().contains(&NodePath::new("/content/a/d")));
    }

    #[test]
    fn given_change_notification_then_descriptor_swaps_in_place() {
        let mut state = seeded_state();
        let a = NodePath::new("/content/a");
        state.tree_mut().select(&a);

        let _ = reduce(&mut state, BrowserCommand::Changed { path: a.clone() });
        let mut replacement =
            NodeDescriptor::new(a.clone(), NodeKind::Container);
        replacement.tree_tag = Some(String::from("folder"));
        let effects = reduce(&mut state, completed("/content/a", replacement));

        assert_eq!(completions(&effects), 1);
        let node = state.tree().node(&a).expect("node should stay rendered");
        assert_eq!(node.descriptor().tree_tag.as_deref(), Some("folder"));
        assert!(state.tree().contains(&NodePath::new("/content/a/b")));
        assert_eq!(state.tree().selected_path(), Some(&a));
    }

    #[test]
    fn given_selected_node_moved_then_refresh_precedes_reselection() {
        let mut state = seeded_state();
        let from = NodePath::new("/content/a/b");
        state.tree_mut().select(&from);

        let effects = reduce(
            &mut state,
            BrowserCommand::Moved {
                from: from.clone(),
                to: NodePath::new("/content/b/b"),
            },
        );
        // both parents differ, so both refresh, old parent first
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["c"])),
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/b"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/b", container("/content/b", &["b"])),
        );

        let to = NodePath::new("/content/b/b");
        assert!(!state.tree().contains(&from));
        assert_eq!(selection_changes(&effects), vec![&to]);
        assert_eq!(completions(&effects), 2);
        assert_eq!(state.tree().selected_path(), Some(&to));
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_reorder_move_then_single_parent_refreshes_once() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::Moved {
                from: NodePath::new("/content/a/b"),
                to: NodePath::new("/content/a/b"),
            },
        );

        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );
        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["c", "b"])),
        );
        assert_eq!(completions(&effects), 1);
    }

    #[test]
    fn given_selected_node_deleted_then_next_sibling_takes_selection() {
        let mut state = seeded_state();
        let b = NodePath::new("/content/a/b");
        state.tree_mut().select(&b);

        let effects = reduce(
            &mut state,
            BrowserCommand::Deleted {
                path: b.clone(),
                replacement: None,
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["c"])),
        );

        let c = NodePath::new("/content/a/c");
        assert!(!state.tree().contains(&b));
        assert_eq!(state.tree().selected_path(), Some(&c));
        assert!(effects.iter().any(|effect| matches!(
            effect,
            BrowserEffect::FocusNode { path } if path == &c
        )));
        assert_eq!(completions(&effects), 1);
    }

    #[test]
    fn given_last_sibling_deleted_then_previous_sibling_takes_selection() {
        let mut state = seeded_state();
        let c = NodePath::new("/content/a/c");
        state.tree_mut().select(&c);

        let _ = reduce(
            &mut state,
            BrowserCommand::Deleted {
                path: c,
                replacement: None,
            },
        );
        let _ = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b"])),
        );

        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/a/b"))
        );
    }

    #[test]
    fn given_only_child_deleted_then_nearest_preceding_takes_selection() {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a"]));
        state.tree_mut().apply_children(
            &NodePath::new("/content/a"),
            container("/content/a", &["x"]),
        );
        state.tree_mut().set_open(&NodePath::new("/content/a"), true);
        let x = NodePath::new("/content/a/x");
        state.tree_mut().select(&x);

        let _ = reduce(
            &mut state,
            BrowserCommand::Deleted {
                path: x,
                replacement: None,
            },
        );
        let _ = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &[])),
        );

        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/a"))
        );
    }

    #[test]
    fn given_replacement_path_when_deleted_then_it_wins_but_focus_stays() {
        let mut state = seeded_state();
        let b = NodePath::new("/content/a/b");
        state.tree_mut().select(&b);

        let _ = reduce(
            &mut state,
            BrowserCommand::Deleted {
                path: b,
                replacement: Some(NodePath::new("/content/b")),
            },
        );
        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["c"])),
        );

        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/b"))
        );
        // keyboard focus follows the nearest node, not the selection
        assert!(effects.iter().any(|effect| matches!(
            effect,
            BrowserEffect::FocusNode { path }
                if path == &NodePath::new("/content/a/c")
        )));
    }

    #[test]
    fn given_unselected_node_deleted_then_selection_is_preserved() {
        let mut state = seeded_state();
        let c = NodePath::new("/content/a/c");
        state.tree_mut().select(&c);

        let _ = reduce(
            &mut state,
            BrowserCommand::Deleted {
                path: NodePath::new("/content/a/b"),
                replacement: None,
            },
        );
        let _ = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["c"])),
        );

        assert_eq!(state.tree().selected_path(), Some(&c));
    }

    #[test]
    fn given_filter_change_then_open_nodes_reload_and_selection_survives() {
        let mut state = seeded_state();
        let c = NodePath::new("/content/a/c");
        state.tree_mut().select(&c);

        let effects = reduce(
            &mut state,
            BrowserCommand::SetFilter {
                filter: Some(String::from("pages")),
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content"),
                filter: Some(String::from("pages")),
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content", container("/content", &["a", "b"])),
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content/a"),
                filter: Some(String::from("pages")),
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c"])),
        );
        assert_eq!(completions(&effects), 1);
        assert!(state.tree().is_open(&NodePath::new("/content/a")));
        assert_eq!(state.tree().selected_path(), Some(&c));
    }

    #[test]
    fn given_fresh_instance_when_root_set_then_initial_load_runs() {
        let mut state = browser_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::SetRoot {
                root: NodePath::new("/content"),
            },
        );
        assert_eq!(
            effects,
            vec![BrowserEffect::LoadRequested {
                path: NodePath::new("/content"),
                filter: None,
            }]
        );

        let effects = reduce(
            &mut state,
            completed("/content", container("/content", &["a"])),
        );
        assert_eq!(completions(&effects), 1);
        assert!(state.tree().is_open(&NodePath::new("/content")));
        assert!(state.tree().contains(&NodePath::new("/content/a")));
    }

    #[test]
    fn given_unchanged_root_when_set_then_nothing_happens() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::SetRoot {
                root: NodePath::new("/content"),
            },
        );

        assert!(effects.is_empty());
        assert!(!state.lock_mut().is_locked());
    }

    #[test]
    fn given_drop_into_own_subtree_then_gesture_is_refused() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::NodeDropped {
                dragged: NodePath::new("/content/a"),
                target: NodePath::new("/content/a/b"),
                position: DropPosition::Into,
            },
        );

        assert!(effects.is_empty());
    }

    #[test]
    fn given_sibling_drop_then_move_request_marks_reorder() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::NodeDropped {
                dragged: NodePath::new("/content/a/c"),
                target: NodePath::new("/content/a/b"),
                position: DropPosition::Before,
            },
        );

        assert_eq!(
            effects,
            vec![BrowserEffect::MoveRequested {
                dragged: NodePath::new("/content/a/c"),
                target: NodePath::new("/content/a/b"),
                position: DropPosition::Before,
                is_reorder: true,
            }]
        );
    }

    #[test]
    fn given_drop_into_other_container_then_move_request_is_not_reorder() {
        let mut state = seeded_state();

        let effects = reduce(
            &mut state,
            BrowserCommand::NodeDropped {
                dragged: NodePath::new("/content/a/c"),
                target: NodePath::new("/content/b"),
                position: DropPosition::Into,
            },
        );

        assert_eq!(
            effects,
            vec![BrowserEffect::MoveRequested {
                dragged: NodePath::new("/content/a/c"),
                target: NodePath::new("/content/b"),
                position: DropPosition::Into,
                is_reorder: false,
            }]
        );
    }

    #[test]
    fn given_expired_lock_when_new_selection_arrives_then_it_recovers() {
        let config = BrowserConfig::new()
            .with_root(NodePath::new("/content"))
            .with_lock_timeout(Duration::ZERO);
        let mut state = BrowserState::with_codec(
            config,
            PathCodec::with_prefix("gnode_"),
        );
        state.tree_mut().install_root(container("/content", &["a"]));

        // park a drill-down; its lock hold expires immediately
        let _ = reduce(&mut state, select("/content/a/b"));
        assert!(state.operation().is_some());

        let effects = reduce(&mut state, select("/content/a"));

        // the abandoned walk was discarded, the new selection went through
        assert_eq!(
            selection_changes(&effects),
            vec![&NodePath::new("/content/a")]
        );
        assert_eq!(completions(&effects), 1);

        let late = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c"])),
        );
        assert!(late.is_empty());
        assert_eq!(
            state.tree().selected_path(),
            Some(&NodePath::new("/content/a"))
        );
    }

    #[test]
    fn given_pending_queue_then_commands_replay_in_arrival_order() {
        let mut state = browser_state();
        state.tree_mut().install_root(container("/content", &["a"]));
        let _ = reduce(&mut state, select("/content/a/b"));

        let _ = reduce(
            &mut state,
            BrowserCommand::Changed {
                path: NodePath::new("/content/a"),
            },
        );
        let _ = reduce(&mut state, select("/content/a/c"));
        assert_eq!(state.pending().len(), 2);

        let effects = reduce(
            &mut state,
            completed("/content/a", container("/content/a", &["b", "c"])),
        );

        // first the drill-down completes, then the queued change parks on
        // its own load; the queued selection stays behind it
        assert_eq!(completions(&effects), 1);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            BrowserEffect::LoadRequested { path, .. }
                if path == &NodePath::new("/content/a")
        )));
        assert!(matches!(
            state.operation(),
            Some(super::Operation::Reload(_))
        ));
        assert_eq!(state.pending().len(), 1);
        assert!(matches!(
            state.pending().front(),
            Some(BrowserCommand::SelectNode { path, .. })
                if path == &NodePath::new("/content/a/c")
        ));
    }
}
