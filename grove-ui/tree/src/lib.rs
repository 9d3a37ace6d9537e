//! Tree data helpers and a lightweight [`iced`] tree widget for the grove
//! console.
//!
//! This crate is split into three layers:
//! - model helpers ([`TreeNode`], [`flatten_tree`]) that are UI-agnostic
//!   and preserve server-delivered sibling order;
//! - view helpers ([`TreeView`], [`TreeRowContext`]) that render rows in
//!   `iced` and expose the press/hover/release hooks a drag-and-drop
//!   gesture needs;
//! - the [`scroll_adjustment`] deadband heuristic for bringing a row into
//!   comfortable view after a selection.
//!
//! The recommended flow for interactive trees:
//! 1. store selected/hovered/drop-target keys in your app state;
//! 2. feed them into [`TreeView::selected`], [`TreeView::hovered`] and
//!    [`TreeView::drop_target`];
//! 3. update that state from callbacks like [`TreeView::on_press`] and
//!    [`TreeView::on_hover`].
//!
//! # Quick Example
//!
//! ```no_run
//! use grove_ui_tree::{NodeKey, TreeNode, TreeView};
//! use iced::widget::{container, text};
//! use iced::{Element, Length};
//!
//! #[derive(Clone)]
//! struct Node {
//!     name: String,
//!     key: String,
//!     open: bool,
//!     children: Vec<Node>,
//! }
//!
//! impl TreeNode for Node {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!
//!     fn key(&self) -> &str {
//!         &self.key
//!     }
//!
//!     fn is_container(&self) -> bool {
//!         !self.children.is_empty()
//!     }
//!
//!     fn is_open(&self) -> bool {
//!         self.open
//!     }
//!
//!     fn children(&self) -> &[Self] {
//!         &self.children
//!     }
//! }
//!
//! #[derive(Clone)]
//! enum Message {
//!     RowPressed(NodeKey),
//!     RowHovered(Option<NodeKey>),
//! }
//!
//! struct State {
//!     nodes: Vec<Node>,
//!     selected: Option<NodeKey>,
//!     hovered: Option<NodeKey>,
//! }
//!
//! fn view(state: &State) -> Element<'_, Message> {
//!     TreeView::new(&state.nodes, |ctx| {
//!         container(text(ctx.row.node.name()))
//!             .width(Length::Fill)
//!             .into()
//!     })
//!     .selected(state.selected.as_deref())
//!     .hovered(state.hovered.as_deref())
//!     .on_press(Message::RowPressed)
//!     .on_hover(Message::RowHovered)
//!     .view()
//! }
//! ```

mod model;
mod scroll;
mod view;

pub use model::{NodeKey, TreeNode, TreeRow, flatten_tree};
pub use scroll::scroll_adjustment;
pub use view::{TreeRowContext, TreeView};
