use iced::alignment;
use iced::widget::{Column, Row, Space, container, mouse_area};
use iced::{Element, Length, mouse};

use crate::model::{NodeKey, TreeNode, TreeRow, flatten_tree};

/// Rendering context passed to row callbacks.
pub struct TreeRowContext<'a, T: TreeNode> {
    pub row: TreeRow<'a, T>,
    pub is_selected: bool,
    pub is_hovered: bool,
    /// Whether this row is the current drop target of a drag gesture.
    pub is_drop_target: bool,
}

type RowRenderer<'a, T, Message> =
    dyn Fn(&TreeRowContext<'a, T>) -> Element<'a, Message> + 'a;
type RowStyle<'a, T> = dyn Fn(&TreeRowContext<'a, T>) -> container::Style + 'a;
type ToggleContent<'a, T, Message> =
    dyn Fn(&TreeRowContext<'a, T>) -> Element<'a, Message> + 'a;
type DropHint<'a, Message> = dyn Fn(&str) -> Element<'a, Message> + 'a;
type RowAction<'a, Message> = dyn Fn(NodeKey) -> Message + 'a;
type HoverAction<'a, Message> = dyn Fn(Option<NodeKey>) -> Message + 'a;

/// Lightweight tree view helper that wires selection, hover and
/// drag-and-drop gestures to row rendering.
///
/// The view itself is stateless: selected, hovered and drop-target keys
/// come from the host, and the press/hover/release callbacks are enough
/// for the host to express a full drag gesture.
pub struct TreeView<'a, T: TreeNode, Message: Clone + 'a> {
    nodes: &'a [T],
    selected: Option<&'a str>,
    hovered: Option<&'a str>,
    drop_target: Option<&'a str>,
    on_press: Option<Box<RowAction<'a, Message>>>,
    on_release: Option<Box<RowAction<'a, Message>>>,
    on_right_press: Option<Box<RowAction<'a, Message>>>,
    on_hover: Option<Box<HoverAction<'a, Message>>>,
    on_toggle: Option<Box<RowAction<'a, Message>>>,
    render_row: Box<RowRenderer<'a, T, Message>>,
    row_style: Option<Box<RowStyle<'a, T>>>,
    toggle_content: Option<Box<ToggleContent<'a, T, Message>>>,
    drop_hint: Option<Box<DropHint<'a, Message>>>,
    spacing: f32,
    indent_width: f32,
    toggle_width: f32,
}

impl<'a, T, Message> TreeView<'a, T, Message>
where
    T: TreeNode + 'a,
    Message: Clone + 'a,
{
    /// Create a tree view that renders each row using `render_row`.
    pub fn new(
        nodes: &'a [T],
        render_row: impl Fn(&TreeRowContext<'a, T>) -> Element<'a, Message> + 'a,
    ) -> Self {
        Self {
            nodes,
            selected: None,
            hovered: None,
            drop_target: None,
            on_press: None,
            on_release: None,
            on_right_press: None,
            on_hover: None,
            on_toggle: None,
            render_row: Box::new(render_row),
            row_style: None,
            toggle_content: None,
            drop_hint: None,
            spacing: 0.0,
            indent_width: 0.0,
            toggle_width: 0.0,
        }
    }

    /// Provide the currently selected row key.
    pub fn selected(mut self, key: Option<&'a str>) -> Self {
        self.selected = key;
        self
    }

    /// Provide the currently hovered row key.
    pub fn hovered(mut self, key: Option<&'a str>) -> Self {
        self.hovered = key;
        self
    }

    /// Provide the row key a drag gesture currently points at.
    pub fn drop_target(mut self, key: Option<&'a str>) -> Self {
        self.drop_target = key;
        self
    }

    /// Emit a message when a row receives a left press.
    pub fn on_press(
        mut self,
        on_press: impl Fn(NodeKey) -> Message + 'a,
    ) -> Self {
        self.on_press = Some(Box::new(on_press));
        self
    }

    /// Emit a message when a row receives a left release.
    pub fn on_release(
        mut self,
        on_release: impl Fn(NodeKey) -> Message + 'a,
    ) -> Self {
        self.on_release = Some(Box::new(on_release));
        self
    }

    /// Emit a message when a row receives a right press.
    pub fn on_right_press(
        mut self,
        on_right_press: impl Fn(NodeKey) -> Message + 'a,
    ) -> Self {
        self.on_right_press = Some(Box::new(on_right_press));
        self
    }

    /// Emit a message when the pointer enters or leaves a row.
    pub fn on_hover(
        mut self,
        on_hover: impl Fn(Option<NodeKey>) -> Message + 'a,
    ) -> Self {
        self.on_hover = Some(Box::new(on_hover));
        self
    }

    /// Emit a message when a container's toggle area is clicked.
    pub fn on_toggle(
        mut self,
        on_toggle: impl Fn(NodeKey) -> Message + 'a,
    ) -> Self {
        self.on_toggle = Some(Box::new(on_toggle));
        self
    }

    /// Provide a row style callback for background/text styling.
    pub fn row_style(
        mut self,
        row_style: impl Fn(&TreeRowContext<'a, T>) -> container::Style + 'a,
    ) -> Self {
        self.row_style = Some(Box::new(row_style));
        self
    }

    /// Provide content to render inside the toggle area.
    pub fn toggle_content(
        mut self,
        toggle_content: impl Fn(&TreeRowContext<'a, T>) -> Element<'a, Message> + 'a,
    ) -> Self {
        self.toggle_content = Some(Box::new(toggle_content));
        self
    }

    /// Provide content rendered directly above the drop-target row.
    pub fn drop_hint(
        mut self,
        drop_hint: impl Fn(&str) -> Element<'a, Message> + 'a,
    ) -> Self {
        self.drop_hint = Some(Box::new(drop_hint));
        self
    }

    /// Set indentation width per tree depth level.
    pub fn indent_width(mut self, width: f32) -> Self {
        self.indent_width = width.max(0.0);
        self
    }

    /// Set the width reserved for the toggle area.
    pub fn toggle_width(mut self, width: f32) -> Self {
        self.toggle_width = width.max(0.0);
        self
    }

    /// Vertical spacing between rows.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Build the `Element` for the tree view.
    pub fn view(self) -> Element<'a, Message> {
        let mut column = Column::new().spacing(self.spacing);

        for row in flatten_tree(self.nodes) {
            let key = row.key.clone();
            let context = TreeRowContext {
                is_selected: self.selected == Some(key.as_str()),
                is_hovered: self.hovered == Some(key.as_str()),
                is_drop_target: self.drop_target == Some(key.as_str()),
                row,
            };

            if context.is_drop_target {
                if let Some(ref drop_hint) = self.drop_hint {
                    column = column.push(drop_hint(&key));
                }
            }

            let content = wrap_mouse_area(
                (self.render_row)(&context),
                self.on_press.as_deref(),
                self.on_release.as_deref(),
                self.on_right_press.as_deref(),
                self.on_hover.as_deref(),
                &key,
            );

            let mut rendered = Row::new().spacing(0.0);

            if self.indent_width > 0.0 {
                let indent = context.row.depth as f32 * self.indent_width;
                if indent > 0.0 {
                    rendered = rendered
                        .push(Space::new().width(Length::Fixed(indent)));
                }
            }

            if self.toggle_width > 0.0 || self.toggle_content.is_some() {
                rendered = rendered.push(build_toggle_slot(
                    &context, &self, &key,
                ));
            }

            rendered = rendered.push(content);

            let mut row_element: Element<'a, Message> = rendered.into();
            if let Some(ref row_style) = self.row_style {
                let style = row_style(&context);
                row_element =
                    container(row_element).style(move |_| style).into();
            }

            column = column.push(row_element);
        }

        column.into()
    }
}

fn wrap_mouse_area<'a, Message: Clone + 'a>(
    element: Element<'a, Message>,
    on_press: Option<&(dyn Fn(NodeKey) -> Message + 'a)>,
    on_release: Option<&(dyn Fn(NodeKey) -> Message + 'a)>,
    on_right_press: Option<&(dyn Fn(NodeKey) -> Message + 'a)>,
    on_hover: Option<&(dyn Fn(Option<NodeKey>) -> Message + 'a)>,
    key: &str,
) -> Element<'a, Message> {
    if on_press.is_none()
        && on_release.is_none()
        && on_right_press.is_none()
        && on_hover.is_none()
    {
        return element;
    }

    let mut area = mouse_area(element);

    if let Some(on_press) = on_press {
        area = area.on_press(on_press(key.to_string()));
    }

    if let Some(on_release) = on_release {
        area = area.on_release(on_release(key.to_string()));
    }

    if let Some(on_right_press) = on_right_press {
        area = area.on_right_press(on_right_press(key.to_string()));
    }

    if let Some(on_hover) = on_hover {
        area = area
            .on_enter(on_hover(Some(key.to_string())))
            .on_exit(on_hover(None));
    }

    area.interaction(mouse::Interaction::Pointer).into()
}

fn build_toggle_slot<'a, T, Message>(
    context: &TreeRowContext<'a, T>,
    view: &TreeView<'a, T, Message>,
    key: &str,
) -> Element<'a, Message>
where
    T: TreeNode + 'a,
    Message: Clone + 'a,
{
    let content = view
        .toggle_content
        .as_ref()
        .map(|toggle| toggle(context))
        .unwrap_or_else(|| Space::new().into());

    let content = container(content)
        .width(Length::Fixed(view.toggle_width.max(0.0)))
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into();

    if context.row.node.is_container() {
        if let Some(on_toggle) = view.on_toggle.as_ref() {
            return wrap_mouse_area(
                content,
                Some(on_toggle),
                None,
                None,
                view.on_hover.as_deref(),
                key,
            );
        }
    }

    if view.on_hover.is_some() {
        wrap_mouse_area(
            content,
            None,
            None,
            None,
            view.on_hover.as_deref(),
            key,
        )
    } else {
        content
    }
}
