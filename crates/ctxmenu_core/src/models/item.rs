//! Menu item definitions.
//!
//! A menu is an ordered list of [`MenuItem`]s, top to bottom. The kind of an
//! item is fixed when it is constructed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::event::{PointerEvent, RowEvent};
use crate::value::Value;

/// Handler invoked when an action row is clicked.
pub type ActionHandler = Arc<dyn Fn(&PointerEvent) + Send + Sync + 'static>;

/// Extra listener registered on a rendered row.
pub type RowEventHandler = Arc<dyn Fn(RowEvent) + Send + Sync + 'static>;

/// Hook that may rewrite a menu right before it is shown for a trigger event.
pub type BeforeRender =
    Arc<dyn Fn(MenuDefinition, &PointerEvent) -> MenuDefinition + Send + Sync + 'static>;

/// An ordered menu, top to bottom.
pub type MenuDefinition = Vec<MenuItem>;

// ============================================================================
// Content
// ============================================================================

/// A caller-supplied element used as row content instead of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Element tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Text content.
    pub text: String,
}

impl Fragment {
    /// Create an element fragment with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: Vec::new(), text: String::new() }
    }

    /// Builder: add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder: set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Extra row listeners keyed by event.
#[derive(Clone, Default)]
pub struct ItemEvents(Vec<(RowEvent, RowEventHandler)>);

impl ItemEvents {
    /// Register a listener.
    pub fn push(&mut self, event: RowEvent, handler: RowEventHandler) {
        self.0.push((event, handler));
    }

    /// Invoke every listener registered for `event`, in registration order.
    pub fn dispatch(&self, event: RowEvent) {
        for (registered, handler) in &self.0 {
            if *registered == event {
                handler(event);
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ItemEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(|(event, _)| event)).finish()
    }
}

/// Content shared by every non-divider item.
#[derive(Debug, Clone, Default)]
pub struct ItemContent {
    /// Row text, escaped on render.
    pub text: Option<Value<String>>,
    /// Hover tooltip.
    pub tooltip: Option<Value<String>>,
    /// Raw markup used instead of the text.
    pub html: Option<Value<String>>,
    /// Element used instead of markup or text.
    pub element: Option<Value<Fragment>>,
    /// Icon URL or data URL.
    pub icon: Option<Value<String>>,
    /// Inline style applied to the row.
    pub style: Option<Value<String>>,
    /// Extra row listeners.
    pub events: ItemEvents,
}

impl ItemContent {
    /// Content with a text label.
    pub fn text(text: impl Into<Value<String>>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    /// Whether the row displays caller-supplied markup or an element.
    pub fn is_custom(&self) -> bool {
        self.html.is_some() || self.element.is_some()
    }
}

/// Resolved hyperlink of an anchor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// URL or fragment the row points to.
    pub href: String,
    /// Browsing context, e.g. `_blank`.
    pub target: Option<String>,
    /// Suggested filename when the link is a download.
    pub download: Option<String>,
}

// ============================================================================
// MenuItem
// ============================================================================

/// The semantic kind of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Visual separator.
    Divider,
    /// Plain, emphasized label.
    Heading,
    /// Label with caller-supplied markup or element.
    Custom,
    /// Clickable row running a handler.
    Action,
    /// Clickable row navigating to a URL.
    Anchor,
    /// Row opening a nested menu.
    SubMenu,
}

/// One entry of a menu definition.
#[derive(Clone)]
pub enum MenuItem {
    /// A visual separator.
    Divider,
    /// A non-interactive label (or custom content when `html`/`element` is set).
    Heading(ItemContent),
    /// A row that runs `action` when clicked.
    Action {
        content: ItemContent,
        disabled: Value<bool>,
        action: ActionHandler,
    },
    /// A row wrapping its content in a hyperlink.
    Anchor {
        content: ItemContent,
        disabled: Value<bool>,
        href: Value<String>,
        target: Option<Value<String>>,
        download: Option<Value<String>>,
    },
    /// A row opening a nested menu on hover.
    SubMenu {
        content: ItemContent,
        disabled: Value<bool>,
        items: Value<MenuDefinition>,
    },
}

impl MenuItem {
    // ========== Constructors ==========

    /// Create a divider.
    pub fn divider() -> Self {
        Self::Divider
    }

    /// Create a heading.
    pub fn heading(text: impl Into<Value<String>>) -> Self {
        Self::Heading(ItemContent::text(text))
    }

    /// Create a row with raw markup content.
    pub fn custom_html(html: impl Into<Value<String>>) -> Self {
        Self::Heading(ItemContent { html: Some(html.into()), ..Default::default() })
    }

    /// Create a row with a caller-supplied element.
    pub fn custom_element(element: impl Into<Value<Fragment>>) -> Self {
        Self::Heading(ItemContent { element: Some(element.into()), ..Default::default() })
    }

    /// Create an action item.
    pub fn action(
        text: impl Into<Value<String>>,
        action: impl Fn(&PointerEvent) + Send + Sync + 'static,
    ) -> Self {
        Self::Action {
            content: ItemContent::text(text),
            disabled: Value::Literal(false),
            action: Arc::new(action),
        }
    }

    /// Create an anchor item.
    pub fn anchor(text: impl Into<Value<String>>, href: impl Into<Value<String>>) -> Self {
        Self::Anchor {
            content: ItemContent::text(text),
            disabled: Value::Literal(false),
            href: href.into(),
            target: None,
            download: None,
        }
    }

    /// Create a submenu item.
    pub fn submenu(
        text: impl Into<Value<String>>,
        items: impl Into<Value<MenuDefinition>>,
    ) -> Self {
        Self::SubMenu {
            content: ItemContent::text(text),
            disabled: Value::Literal(false),
            items: items.into(),
        }
    }

    // ========== Builders ==========

    /// Builder: set a tooltip.
    pub fn tooltip(mut self, tooltip: impl Into<Value<String>>) -> Self {
        if let Some(content) = self.content_mut() {
            content.tooltip = Some(tooltip.into());
        }
        self
    }

    /// Builder: set an icon.
    pub fn icon(mut self, icon: impl Into<Value<String>>) -> Self {
        if let Some(content) = self.content_mut() {
            content.icon = Some(icon.into());
        }
        self
    }

    /// Builder: set an inline style.
    pub fn style(mut self, style: impl Into<Value<String>>) -> Self {
        if let Some(content) = self.content_mut() {
            content.style = Some(style.into());
        }
        self
    }

    /// Builder: replace the content with raw markup.
    pub fn html(mut self, html: impl Into<Value<String>>) -> Self {
        if let Some(content) = self.content_mut() {
            content.html = Some(html.into());
        }
        self
    }

    /// Builder: replace the content with an element.
    pub fn element(mut self, element: impl Into<Value<Fragment>>) -> Self {
        if let Some(content) = self.content_mut() {
            content.element = Some(element.into());
        }
        self
    }

    /// Builder: register an extra row listener.
    pub fn on(
        mut self,
        event: RowEvent,
        handler: impl Fn(RowEvent) + Send + Sync + 'static,
    ) -> Self {
        if let Some(content) = self.content_mut() {
            content.events.push(event, Arc::new(handler));
        }
        self
    }

    /// Builder: set disabled state. Has no effect on dividers and headings.
    pub fn disabled(mut self, value: impl Into<Value<bool>>) -> Self {
        match &mut self {
            Self::Action { disabled, .. }
            | Self::Anchor { disabled, .. }
            | Self::SubMenu { disabled, .. } => *disabled = value.into(),
            Self::Divider | Self::Heading(_) => {}
        }
        self
    }

    /// Builder: set the anchor's browsing context.
    pub fn target(mut self, value: impl Into<Value<String>>) -> Self {
        if let Self::Anchor { target, .. } = &mut self {
            *target = Some(value.into());
        }
        self
    }

    /// Builder: mark the anchor as a download with the given filename.
    pub fn download(mut self, value: impl Into<Value<String>>) -> Self {
        if let Self::Anchor { download, .. } = &mut self {
            *download = Some(value.into());
        }
        self
    }

    // ========== Queries ==========

    /// The semantic kind of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Divider => ItemKind::Divider,
            Self::Heading(content) if content.is_custom() => ItemKind::Custom,
            Self::Heading(_) => ItemKind::Heading,
            Self::Action { .. } => ItemKind::Action,
            Self::Anchor { .. } => ItemKind::Anchor,
            Self::SubMenu { .. } => ItemKind::SubMenu,
        }
    }

    /// Shared content, `None` for dividers.
    pub fn content(&self) -> Option<&ItemContent> {
        match self {
            Self::Divider => None,
            Self::Heading(content)
            | Self::Action { content, .. }
            | Self::Anchor { content, .. }
            | Self::SubMenu { content, .. } => Some(content),
        }
    }

    fn content_mut(&mut self) -> Option<&mut ItemContent> {
        match self {
            Self::Divider => None,
            Self::Heading(content)
            | Self::Action { content, .. }
            | Self::Anchor { content, .. }
            | Self::SubMenu { content, .. } => Some(content),
        }
    }

    /// Check if this item is a divider.
    pub fn is_divider(&self) -> bool {
        matches!(self, Self::Divider)
    }

    /// Check if this item is a submenu.
    pub fn is_submenu(&self) -> bool {
        matches!(self, Self::SubMenu { .. })
    }

    /// Whether the item displays caller-supplied markup or an element.
    pub fn is_custom(&self) -> bool {
        self.content().is_some_and(ItemContent::is_custom)
    }

    /// Action, anchor, submenu and custom rows react to the pointer.
    pub fn is_interactive(&self) -> bool {
        match self.kind() {
            ItemKind::Action | ItemKind::Anchor | ItemKind::SubMenu | ItemKind::Custom => true,
            ItemKind::Divider | ItemKind::Heading => false,
        }
    }

    /// Resolve the disabled state.
    ///
    /// A submenu whose resolved children are empty is always disabled.
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Action { disabled, .. } | Self::Anchor { disabled, .. } => disabled.resolve(),
            Self::SubMenu { disabled, items, .. } => {
                disabled.resolve() || items.resolve().is_empty()
            }
            Self::Divider | Self::Heading(_) => false,
        }
    }

    /// Resolve the nested menu of a submenu item.
    pub fn resolve_submenu(&self) -> Option<MenuDefinition> {
        match self {
            Self::SubMenu { items, .. } => Some(items.resolve()),
            _ => None,
        }
    }

    /// Resolve the hyperlink of an anchor item.
    pub fn resolve_link(&self) -> Option<Link> {
        match self {
            Self::Anchor { href, target, download, .. } => Some(Link {
                href: href.resolve(),
                target: target.as_ref().map(Value::resolve),
                download: download.as_ref().map(Value::resolve),
            }),
            _ => None,
        }
    }

    /// The click handler of an action item.
    pub fn action_handler(&self) -> Option<&ActionHandler> {
        match self {
            Self::Action { action, .. } => Some(action),
            _ => None,
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Divider => f.write_str("Divider"),
            Self::Heading(content) => f.debug_tuple("Heading").field(content).finish(),
            Self::Action { content, disabled, .. } => f
                .debug_struct("Action")
                .field("content", content)
                .field("disabled", disabled)
                .finish_non_exhaustive(),
            Self::Anchor { content, disabled, href, target, download } => f
                .debug_struct("Anchor")
                .field("content", content)
                .field("disabled", disabled)
                .field("href", href)
                .field("target", target)
                .field("download", download)
                .finish(),
            Self::SubMenu { content, disabled, items } => f
                .debug_struct("SubMenu")
                .field("content", content)
                .field("disabled", disabled)
                .field("items", items)
                .finish(),
        }
    }
}
