//! Context menu controller.
//!
//! [`ContextMenu`] owns all mutable menu state:
//! - the attachment registry (selector → menu, before-render hook, listener)
//! - the open menu tree, at most one root with one open submenu per level
//! - the direction state shared by the open chain
//! - the scroll guard and the debounce timers
//!
//! The host document feeds events in through the `context_menu`, `click`,
//! `pointer_*`, `wheel*`, `resize` and `advance` entry points.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ctxmenu_core::position::{place_at_pointer, place_beside};
use ctxmenu_core::{
    ActionHandler, AnchorBox, BeforeRender, CtxMenuError, Directions, ItemEvents, Link,
    MenuConfig, MenuDefinition, MenuItem, PointerEvent, RowEvent, SubmenuOffsets,
};
use kurbo::{Point, Rect, Size};
use understory_responder::hover::{HoverEvent, HoverState};

use crate::host::{ElementId, Host, ListenerId, ReadyState, RowProbe};
use crate::render::render_row;
use crate::scheduler::{Scheduler, TaskKey};
use crate::snapshot::MenuSnapshot;
use crate::styles::{RowClasses, BOX_METRICS, STYLES};
use crate::tree::{LevelId, MenuLevel, Row, RowId};

// ============================================================================
// Public types
// ============================================================================

/// Where a menu opens.
#[derive(Debug)]
pub enum Origin<'a> {
    /// At the pointer; the event is consumed (propagation stopped, default prevented).
    Pointer(&'a mut PointerEvent),
    /// Beside an element of the host document.
    Element(ElementId),
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A row of the open menu tree.
    Row(RowId),
    /// Inside a menu level, but not on a row.
    Menu,
    /// Anywhere else in the document.
    Outside,
}

/// The hook and menu of an attachment, taken out for a trigger event.
#[derive(Clone)]
pub struct PendingTrigger {
    menu: MenuDefinition,
    before_render: BeforeRender,
}

impl PendingTrigger {
    /// Run the before-render hook on a copy of the attached menu.
    pub fn build(self, event: &PointerEvent) -> MenuDefinition {
        (self.before_render)(self.menu, event)
    }
}

#[derive(Clone)]
enum Activation {
    Ignore,
    Action(ActionHandler),
    Navigate(Link),
    Close,
}

/// The outcome of a click, split so caller callbacks can run unlocked.
///
/// Produced by [`ContextMenu::plan_click`]; run the callbacks with
/// [`ClickPlan::run_callbacks`], then hand it back to
/// [`ContextMenu::finish_click`].
#[derive(Clone)]
pub struct ClickPlan {
    row_events: Option<ItemEvents>,
    activation: Activation,
}

impl ClickPlan {
    fn ignore() -> Self {
        Self { row_events: None, activation: Activation::Ignore }
    }

    fn close() -> Self {
        Self { row_events: None, activation: Activation::Close }
    }

    /// Whether finishing this click closes the menu.
    pub fn closes_menu(&self) -> bool {
        !matches!(self.activation, Activation::Ignore)
    }

    /// Run the row's click listeners and the action handler, if any.
    pub fn run_callbacks(&self, event: &PointerEvent) {
        if let Some(events) = &self.row_events {
            events.dispatch(RowEvent::Click);
        }
        if let Activation::Action(action) = &self.activation {
            action(event);
        }
    }
}

/// A registered context menu.
struct Attachment {
    menu: MenuDefinition,
    before_render: BeforeRender,
    element: ElementId,
    listener: ListenerId,
}

enum Placement {
    Pointer(Point),
    Beside(AnchorBox),
}

fn identity() -> BeforeRender {
    Arc::new(|menu: MenuDefinition, _: &PointerEvent| menu)
}

fn report(err: CtxMenuError) -> Result<(), CtxMenuError> {
    tracing::error!(category = err.category(), "{err}");
    Err(err)
}

// ============================================================================
// ContextMenu
// ============================================================================

/// The menu controller.
pub struct ContextMenu<H: Host> {
    host: H,
    config: MenuConfig,
    registry: HashMap<String, Attachment>,
    root: Option<MenuLevel>,
    directions: Directions,
    prevent_close_on_scroll: bool,
    scheduler: Scheduler,
    hover: HoverState<RowId>,
    next_id: u64,
    styles_installed: bool,
    styles_pending: bool,
}

impl<H: Host> ContextMenu<H> {
    /// Create a controller with the default configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, MenuConfig::default())
    }

    /// Create a controller and install the default stylesheet (if configured).
    pub fn with_config(host: H, config: MenuConfig) -> Self {
        let mut menu = Self {
            host,
            config,
            registry: HashMap::new(),
            root: None,
            directions: Directions::default(),
            prevent_close_on_scroll: false,
            scheduler: Scheduler::new(),
            hover: HoverState::new(),
            next_id: 1,
            styles_installed: false,
            styles_pending: false,
        };
        menu.install_styles();
        menu
    }

    // ========== Accessors ==========

    /// The host document.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host document.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Whether a top-level menu is open.
    pub fn is_open(&self) -> bool {
        self.root.is_some()
    }

    /// The open top-level menu.
    pub fn root(&self) -> Option<&MenuLevel> {
        self.root.as_ref()
    }

    /// A rendered row of the open tree.
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.root.as_ref()?.find_row(id)
    }

    /// Direction state of the open chain.
    pub fn directions(&self) -> Directions {
        self.directions
    }

    /// Whether the next wheel check will keep the menu open.
    pub fn prevents_close_on_scroll(&self) -> bool {
        self.prevent_close_on_scroll
    }

    /// Whether a menu is registered for the selector.
    pub fn is_attached(&self, selector: &str) -> bool {
        self.registry.contains_key(selector)
    }

    /// The menu registered for the selector.
    pub fn attached_menu(&self, selector: &str) -> Option<&MenuDefinition> {
        self.registry.get(selector).map(|a| &a.menu)
    }

    /// The before-render hook registered for the selector.
    pub fn attached_before_render(&self, selector: &str) -> Option<&BeforeRender> {
        self.registry.get(selector).map(|a| &a.before_render)
    }

    /// Whether the default stylesheet has been inserted.
    pub fn styles_installed(&self) -> bool {
        self.styles_installed
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of timers waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Serializable view of the open tree.
    pub fn snapshot(&self) -> Option<MenuSnapshot> {
        self.root.as_ref().map(|root| MenuSnapshot::capture(root, self.directions))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ========== Registry ==========

    /// Bind `menu` to the element matching `selector`.
    pub fn attach(&mut self, selector: &str, menu: MenuDefinition) -> Result<(), CtxMenuError> {
        self.attach_with(selector, menu, identity())
    }

    /// Bind `menu` to the element matching `selector`, rewriting it with
    /// `before_render` on every trigger.
    ///
    /// Fails without changing anything if the selector is already registered
    /// or matches no element.
    pub fn attach_with(
        &mut self,
        selector: &str,
        menu: MenuDefinition,
        before_render: BeforeRender,
    ) -> Result<(), CtxMenuError> {
        if self.registry.contains_key(selector) {
            return report(CtxMenuError::already_attached(selector));
        }
        let Some(element) = self.host.query_selector(selector) else {
            return report(CtxMenuError::target_not_found(selector));
        };

        let listener = ListenerId(self.next_id());
        self.host.add_context_menu_listener(element, listener);
        tracing::debug!(selector, %element, items = menu.len(), "Context menu attached");
        self.registry
            .insert(selector.to_string(), Attachment { menu, before_render, element, listener });
        Ok(())
    }

    /// Replace the menu and/or hook of a selector, attaching it if needed.
    ///
    /// Missing arguments fall back to the previous registration, or to an
    /// empty menu and the identity hook.
    pub fn update(
        &mut self,
        selector: &str,
        menu: Option<MenuDefinition>,
        before_render: Option<BeforeRender>,
    ) -> Result<(), CtxMenuError> {
        let previous = self.registry.remove(selector);
        if let Some(old) = &previous {
            if self.host.contains(old.element) {
                self.host.remove_context_menu_listener(old.element, old.listener);
            }
        }

        let (old_menu, old_hook) = match previous {
            Some(old) => (Some(old.menu), Some(old.before_render)),
            None => (None, None),
        };
        let menu = menu.or(old_menu).unwrap_or_default();
        let before_render = before_render.or(old_hook).unwrap_or_else(identity);
        tracing::debug!(selector, "Context menu updated");
        self.attach_with(selector, menu, before_render)
    }

    /// Remove the menu bound to `selector`.
    pub fn delete(&mut self, selector: &str) -> Result<(), CtxMenuError> {
        let Some(attachment) = self.registry.get(selector) else {
            return report(CtxMenuError::not_attached(selector));
        };
        // The bound element may have been re-rendered; the selector decides.
        if self.host.query_selector(selector).is_none() {
            return report(CtxMenuError::target_removed(selector));
        }

        let (element, listener) = (attachment.element, attachment.listener);
        if self.host.contains(element) {
            self.host.remove_context_menu_listener(element, listener);
        }
        self.registry.remove(selector);
        tracing::debug!(selector, "Context menu deleted");
        Ok(())
    }

    // ========== Show / hide ==========

    /// Open `menu` as the new top-level menu, closing any open one.
    ///
    /// Fails only when opening beside an element that is not in the document.
    pub fn show(&mut self, menu: MenuDefinition, origin: Origin<'_>) -> Result<(), CtxMenuError> {
        match origin {
            Origin::Pointer(event) => {
                self.show_at_pointer(&menu, event);
                Ok(())
            }
            Origin::Element(element) => {
                let Some(rect) = self.host.element_rect(element) else {
                    return report(CtxMenuError::target_not_found(element.to_string()));
                };
                let anchor = AnchorBox {
                    rect: self.host.viewport().client_rect_to_layout(rect),
                    is_submenu_row: self.host.has_class(element, "submenu"),
                };
                self.hide();
                self.root = Some(self.render_level(&menu, Placement::Beside(anchor), None));
                tracing::debug!(%element, items = menu.len(), "Menu shown beside element");
                Ok(())
            }
        }
    }

    pub(crate) fn show_at_pointer(&mut self, menu: &[MenuItem], event: &mut PointerEvent) {
        // Keep the document click listener from closing the menu being opened.
        event.stop_propagation();
        self.hide();
        self.root = Some(self.render_level(menu, Placement::Pointer(event.position), None));
        event.prevent_default();
        let (x, y) = (event.position.x, event.position.y);
        tracing::debug!(x, y, items = menu.len(), "Menu shown at pointer");
    }

    /// Close the open menu chain and reset the direction state.
    pub fn hide(&mut self) {
        self.directions.reset();
        if let Some(root) = self.root.take() {
            self.hover.clear();
            tracing::debug!(level = root.id.0, depth = root.depth(), "Menu hidden");
        }
    }

    /// Close one level (and its subtree). Closing the root closes everything.
    pub fn close_level(&mut self, id: LevelId) {
        let Some(root) = self.root.as_mut() else {
            return;
        };
        if root.id == id {
            self.hide();
            return;
        }
        if let Some(parent) = root.parent_of_level_mut(id) {
            parent.open_child = None;
            tracing::debug!(level = id.0, "Submenu closed");
        }
    }

    /// Open the submenu of an enabled submenu row, closing a sibling's first.
    pub fn open_submenu(&mut self, row_id: RowId) {
        let Some(row) = self.row(row_id) else {
            return;
        };
        if !row.opens_submenu() {
            return;
        }
        let anchor = AnchorBox { rect: row.rect, is_submenu_row: true };
        let items = row.item.resolve_submenu().unwrap_or_default();

        if let Some(level) = self.root.as_mut().and_then(|r| r.level_of_row_mut(row_id)) {
            match level.open_child_owner() {
                Some(owner) if owner == row_id => return,
                Some(owner) => {
                    level.open_child = None;
                    tracing::debug!(row = owner.0, "Sibling submenu closed");
                }
                None => {}
            }
        }

        let child = self.render_level(&items, Placement::Beside(anchor), Some(row_id));
        if let Some(level) = self.root.as_mut().and_then(|r| r.level_of_row_mut(row_id)) {
            let items = items.len();
            tracing::debug!(row = row_id.0, level = child.id.0, items, "Submenu opened");
            level.open_child = Some(Box::new(child));
        }
    }

    fn render_level(
        &mut self,
        items: &[MenuItem],
        placement: Placement,
        owner: Option<RowId>,
    ) -> MenuLevel {
        let id = LevelId(self.next_id());
        let mut rows: Vec<Row> = Vec::with_capacity(items.len());
        for item in items {
            let row_id = RowId(self.next_id());
            rows.push(render_row(row_id, item));
        }

        // Measure off-screen, then position the container.
        let sizes: Vec<(RowClasses, Size)> = rows
            .iter()
            .map(|row| {
                let probe = RowProbe { classes: row.classes, content: &row.content };
                (row.classes, self.host.measure_row(probe))
            })
            .collect();
        let size = BOX_METRICS.container_size(&sizes);

        let viewport = self.host.viewport();
        let origin = match placement {
            Placement::Pointer(client) => {
                place_at_pointer(self.directions, &viewport, size, client)
            }
            Placement::Beside(anchor) => {
                let offsets = SubmenuOffsets {
                    down: self.config.submenu_offset_down,
                    up: self.config.submenu_offset_up,
                };
                place_beside(&mut self.directions, &viewport, size, anchor, offsets)
            }
        };
        let rect = Rect::from_origin_size(origin, size);

        let inner_width = (size.width - 2.0 * BOX_METRICS.border).max(0.0);
        let left = rect.x0 + BOX_METRICS.border;
        let mut y = rect.y0 + BOX_METRICS.border + BOX_METRICS.padding_y;
        for (row, (classes, row_size)) in rows.iter_mut().zip(&sizes) {
            let margin = BOX_METRICS.margin_for(*classes);
            y += margin;
            row.rect = Rect::new(left, y, left + inner_width, y + row_size.height);
            y += row_size.height + margin;
        }

        tracing::trace!(
            level = id.0,
            x = rect.x0,
            y = rect.y0,
            width = size.width,
            height = size.height,
            "Level laid out"
        );
        MenuLevel { id, owner, rows, rect, hidden: items.is_empty(), open_child: None }
    }

    // ========== Trigger ==========

    /// The attachment listening on `element`, ready to be built.
    ///
    /// When several selectors resolve to the same element, the earliest
    /// attachment wins, as its listener stops the event first.
    pub fn prepare_trigger(&self, element: ElementId) -> Option<PendingTrigger> {
        self.registry
            .values()
            .filter(|a| a.element == element)
            .min_by_key(|a| a.listener)
            .map(|a| PendingTrigger {
                menu: a.menu.clone(),
                before_render: Arc::clone(&a.before_render),
            })
    }

    /// Handle a context-menu event on a host element.
    ///
    /// Returns whether a registered menu was shown. A right-click on the open
    /// menu itself is consumed and shows nothing.
    pub fn context_menu(&mut self, element: ElementId, event: &mut PointerEvent) -> bool {
        if self.swallow_on_menu(event) {
            return false;
        }
        let Some(trigger) = self.prepare_trigger(element) else {
            return false;
        };
        let menu = trigger.build(event);
        self.show_at_pointer(&menu, event);
        true
    }

    /// Stop and cancel a context-menu event that lands on the open menu.
    pub(crate) fn swallow_on_menu(&self, event: &mut PointerEvent) -> bool {
        let point = self.host.viewport().client_to_layout(event.position);
        if !self.root.as_ref().is_some_and(|root| root.contains_point(point)) {
            return false;
        }
        event.stop_propagation();
        event.prevent_default();
        tracing::trace!(x = point.x, y = point.y, "Context menu event on open menu ignored");
        true
    }

    // ========== Click ==========

    /// Work out what a click on `target` does, without running caller code.
    pub fn plan_click(&mut self, target: ClickTarget, event: &mut PointerEvent) -> ClickPlan {
        let Some(root) = self.root.as_ref() else {
            return ClickPlan::ignore();
        };
        match target {
            ClickTarget::Row(id) => {
                let Some(row) = root.find_row(id) else {
                    return ClickPlan::close();
                };
                let row_events = row.item.content().map(|c| c.events.clone());
                let activation = if row.is_interactive() && !row.opens_submenu() {
                    match (&row.item, &row.link) {
                        (MenuItem::Action { action, .. }, _) => {
                            Activation::Action(Arc::clone(action))
                        }
                        (_, Some(link)) => Activation::Navigate(link.clone()),
                        _ => Activation::Close,
                    }
                } else {
                    // Non-interactive rows swallow the click so the menu stays open.
                    event.stop_propagation();
                    Activation::Ignore
                };
                ClickPlan { row_events, activation }
            }
            ClickTarget::Menu => {
                event.stop_propagation();
                ClickPlan::ignore()
            }
            ClickTarget::Outside => ClickPlan::close(),
        }
    }

    /// Apply the menu side of a planned click: navigate and/or close.
    pub fn finish_click(&mut self, plan: ClickPlan) {
        match plan.activation {
            Activation::Ignore => {}
            Activation::Action(_) | Activation::Close => self.hide(),
            Activation::Navigate(link) => {
                tracing::debug!(href = %link.href, "Anchor activated");
                self.host.navigate(&link);
                self.hide();
            }
        }
    }

    /// Handle a click on `target`.
    pub fn click(&mut self, target: ClickTarget, event: &mut PointerEvent) {
        let plan = self.plan_click(target, event);
        plan.run_callbacks(event);
        self.finish_click(plan);
    }

    /// Resolve a client point to a click target.
    pub fn click_target_at(&self, client: Point) -> ClickTarget {
        let Some(root) = self.root.as_ref() else {
            return ClickTarget::Outside;
        };
        let point = self.host.viewport().client_to_layout(client);
        match root.hit_test(point) {
            Some(row) => ClickTarget::Row(row),
            None if root.contains_point(point) => ClickTarget::Menu,
            None => ClickTarget::Outside,
        }
    }

    /// Handle a click at a client point.
    pub fn click_at(&mut self, client: Point, event: &mut PointerEvent) {
        let target = self.click_target_at(client);
        self.click(target, event);
    }

    // ========== Hover ==========

    /// The pointer entered a row: debounce closing other submenus on its
    /// level and, for submenu rows, opening its own.
    pub fn pointer_enter(&mut self, row_id: RowId) {
        if let Some(listeners) = self.enter_row(row_id) {
            listeners.dispatch(RowEvent::PointerEnter);
        }
    }

    /// The pointer left a row: cancel its pending hover work.
    pub fn pointer_leave(&mut self, row_id: RowId) {
        if let Some(listeners) = self.leave_row(row_id) {
            listeners.dispatch(RowEvent::PointerLeave);
        }
    }

    /// The pointer moved to a client point; derive row enter/leave transitions.
    pub fn pointer_move(&mut self, client: Point) {
        for (event, listeners) in self.track_pointer(client) {
            listeners.dispatch(event);
        }
    }

    /// Schedule the hover work of a row, returning its listeners to notify.
    pub(crate) fn enter_row(&mut self, row_id: RowId) -> Option<ItemEvents> {
        let row = self.row(row_id)?;
        let opens_submenu = row.opens_submenu();
        let listeners = row.item.content().map(|c| c.events.clone());

        let delay = self.config.hover_delay();
        self.scheduler.schedule(TaskKey::CloseSiblings(row_id), delay);
        if opens_submenu {
            self.scheduler.schedule(TaskKey::OpenSubmenu(row_id), delay);
        }
        listeners
    }

    /// Cancel the hover work of a row, returning its listeners to notify.
    pub(crate) fn leave_row(&mut self, row_id: RowId) -> Option<ItemEvents> {
        self.scheduler.cancel(TaskKey::CloseSiblings(row_id));
        self.scheduler.cancel(TaskKey::OpenSubmenu(row_id));
        self.row(row_id).and_then(|r| r.item.content()).map(|c| c.events.clone())
    }

    /// Apply hover transitions for a pointer position, returning the row
    /// listeners to notify in order.
    pub(crate) fn track_pointer(&mut self, client: Point) -> Vec<(RowEvent, ItemEvents)> {
        let path = match self.root.as_ref() {
            Some(root) => root.hover_path(self.host.viewport().client_to_layout(client)),
            None => Vec::new(),
        };
        let mut notify = Vec::new();
        for transition in self.hover.update_path(&path) {
            tracing::trace!(?transition, "Hover transition");
            let listeners = match transition {
                HoverEvent::Enter(row) => {
                    self.enter_row(row).map(|l| (RowEvent::PointerEnter, l))
                }
                HoverEvent::Leave(row) => {
                    self.leave_row(row).map(|l| (RowEvent::PointerLeave, l))
                }
            };
            notify.extend(listeners);
        }
        notify
    }

    // ========== Global dismissal ==========

    /// A wheel event reached the document.
    ///
    /// When it happened over the open menu, the next check keeps the menu
    /// open so an overflowing menu can scroll.
    pub fn wheel(&mut self, over_menu: bool) {
        if over_menu && self.root.is_some() {
            self.prevent_close_on_scroll = true;
        }
        self.scheduler.schedule(TaskKey::WheelCheck, self.config.wheel_check_delay());
    }

    /// A wheel event at a client point.
    pub fn wheel_at(&mut self, client: Point) {
        let point = self.host.viewport().client_to_layout(client);
        let over_menu = self.root.as_ref().is_some_and(|root| root.contains_point(point));
        self.wheel(over_menu);
    }

    /// The window was resized: positions are stale, close the menu.
    pub fn resize(&mut self) {
        if self.root.is_some() {
            tracing::debug!("Closing menu on resize");
        }
        self.hide();
    }

    /// Advance the virtual clock and run every timer that came due.
    pub fn advance(&mut self, by: Duration) {
        self.scheduler.advance(by);
        while let Some(task) = self.scheduler.pop_due() {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: TaskKey) {
        match task {
            TaskKey::CloseSiblings(row_id) => {
                let level = self.root.as_mut().and_then(|r| r.level_of_row_mut(row_id));
                let Some(level) = level else {
                    return;
                };
                if let Some(owner) = level.open_child_owner().filter(|owner| *owner != row_id) {
                    level.open_child = None;
                    tracing::debug!(row = owner.0, "Stale submenu closed on hover");
                }
            }
            TaskKey::OpenSubmenu(row_id) => self.open_submenu(row_id),
            TaskKey::WheelCheck => {
                if self.prevent_close_on_scroll {
                    self.prevent_close_on_scroll = false;
                } else {
                    self.hide();
                }
            }
        }
    }

    // ========== Stylesheet ==========

    /// The document finished loading; insert the stylesheet if it was deferred.
    pub fn document_ready(&mut self) {
        if self.styles_pending {
            self.install_styles();
        }
    }

    fn install_styles(&mut self) {
        if self.styles_installed || !self.config.inject_styles {
            return;
        }
        if self.host.ready_state() == ReadyState::Loading {
            self.styles_pending = true;
            return;
        }
        self.host.insert_style(STYLES);
        self.styles_installed = true;
        self.styles_pending = false;
        tracing::trace!("Default stylesheet installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessDocument, HeadlessElement};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn document() -> HeadlessDocument {
        let mut doc = HeadlessDocument::new(800.0, 600.0);
        doc.insert(HeadlessElement::new("div").id("x").rect(Rect::new(0.0, 0.0, 400.0, 300.0)));
        doc
    }

    fn open_at(menu: &mut ContextMenu<HeadlessDocument>, items: MenuDefinition, x: f64, y: f64) {
        menu.show(items, Origin::Pointer(&mut PointerEvent::at(x, y))).unwrap();
    }

    fn first_row(menu: &ContextMenu<HeadlessDocument>, index: usize) -> RowId {
        menu.root().unwrap().rows[index].id
    }

    #[test]
    fn attach_registers_listener() {
        let mut menu = ContextMenu::new(document());
        menu.attach("#x", vec![MenuItem::heading("Title")]).unwrap();
        let element = menu.host().query_selector("#x").unwrap();
        assert_eq!(menu.host().listeners(element).len(), 1);
        assert!(menu.is_attached("#x"));
    }

    #[test]
    fn duplicate_attach_is_rejected_without_change() {
        let mut menu = ContextMenu::new(document());
        menu.attach("#x", vec![MenuItem::heading("First")]).unwrap();
        let err = menu.attach("#x", vec![]).unwrap_err();
        assert!(matches!(err, CtxMenuError::AlreadyAttached { .. }));
        assert_eq!(menu.attached_menu("#x").map(Vec::len), Some(1));
    }

    #[test]
    fn attach_to_missing_element_fails() {
        let mut menu = ContextMenu::new(document());
        let err = menu.attach("#nope", vec![]).unwrap_err();
        assert!(matches!(err, CtxMenuError::TargetNotFound { .. }));
        assert!(!menu.is_attached("#nope"));
    }

    #[test]
    fn update_without_prior_record_attaches_empty_menu() {
        let mut menu = ContextMenu::new(document());
        menu.update("#x", None, None).unwrap();
        assert_eq!(menu.attached_menu("#x").map(Vec::len), Some(0));
    }

    #[test]
    fn update_replaces_listener() {
        let mut menu = ContextMenu::new(document());
        menu.attach("#x", vec![MenuItem::heading("A")]).unwrap();
        menu.update("#x", Some(vec![MenuItem::heading("B"), MenuItem::divider()]), None).unwrap();
        let element = menu.host().query_selector("#x").unwrap();
        assert_eq!(menu.host().listeners(element).len(), 1);
        assert_eq!(menu.attached_menu("#x").map(Vec::len), Some(2));
    }

    #[test]
    fn delete_removes_listener() {
        let mut menu = ContextMenu::new(document());
        menu.attach("#x", vec![]).unwrap();
        menu.delete("#x").unwrap();
        let element = menu.host().query_selector("#x").unwrap();
        assert!(menu.host().listeners(element).is_empty());
        assert!(!menu.is_attached("#x"));
    }

    #[test]
    fn delete_of_removed_element_keeps_record() {
        let mut menu = ContextMenu::new(document());
        menu.attach("#x", vec![]).unwrap();
        let element = menu.host().query_selector("#x").unwrap();
        menu.host_mut().remove(element);
        let err = menu.delete("#x").unwrap_err();
        assert!(matches!(err, CtxMenuError::TargetRemoved { .. }));
        assert!(menu.is_attached("#x"));
    }

    #[test]
    fn trigger_runs_before_render_on_a_copy() {
        let mut menu = ContextMenu::new(document());
        let hook: BeforeRender = Arc::new(|mut items: MenuDefinition, event: &PointerEvent| {
            items.push(MenuItem::heading(format!("at {}", event.position.x)));
            items
        });
        menu.attach_with("#x", vec![MenuItem::heading("Title")], hook).unwrap();
        let element = menu.host().query_selector("#x").unwrap();

        let mut event = PointerEvent::at(20.0, 30.0);
        assert!(menu.context_menu(element, &mut event));
        assert!(event.propagation_stopped && event.default_prevented);
        assert_eq!(menu.root().unwrap().rows.len(), 2);
        assert_eq!(menu.attached_menu("#x").map(Vec::len), Some(1));
    }

    #[test]
    fn show_closes_previous_root() {
        let mut menu = ContextMenu::new(document());
        open_at(&mut menu, vec![MenuItem::heading("One")], 10.0, 10.0);
        let first = menu.root().unwrap().id;
        open_at(&mut menu, vec![MenuItem::heading("Two")], 20.0, 20.0);
        assert_ne!(menu.root().unwrap().id, first);
        assert_eq!(menu.root().unwrap().depth(), 1);
    }

    #[test]
    fn show_beside_element() {
        let mut menu = ContextMenu::new(document());
        let element = menu.host().query_selector("#x").unwrap();
        menu.show(vec![MenuItem::heading("Title")], Origin::Element(element)).unwrap();
        assert_eq!(menu.root().unwrap().rect.x0, 400.0);
        assert_eq!(menu.root().unwrap().rect.y0, 0.0);
    }

    #[test]
    fn show_beside_missing_element_fails() {
        let mut menu = ContextMenu::new(document());
        let err = menu.show(vec![], Origin::Element(ElementId(999))).unwrap_err();
        assert!(matches!(err, CtxMenuError::TargetNotFound { .. }));
        assert!(!menu.is_open());
    }

    #[test]
    fn empty_menu_renders_hidden() {
        let mut menu = ContextMenu::new(document());
        open_at(&mut menu, Vec::new(), 10.0, 10.0);
        let root = menu.root().unwrap();
        assert!(root.hidden);
        assert_eq!(root.rect.size(), Size::ZERO);
    }

    #[test]
    fn submenu_hover_is_debounced() {
        let mut menu = ContextMenu::new(document());
        let items = vec![MenuItem::submenu("More", vec![MenuItem::heading("Inner")])];
        open_at(&mut menu, items, 10.0, 10.0);
        let row = first_row(&menu, 0);

        menu.pointer_enter(row);
        menu.advance(Duration::from_millis(100));
        menu.pointer_leave(row);
        menu.advance(Duration::from_millis(100));
        assert_eq!(menu.root().unwrap().depth(), 1);

        menu.pointer_enter(row);
        menu.advance(Duration::from_millis(150));
        assert_eq!(menu.root().unwrap().depth(), 2);
        assert_eq!(menu.root().unwrap().open_child_owner(), Some(row));
    }

    #[test]
    fn close_level_drops_subtree() {
        let mut menu = ContextMenu::new(document());
        let items = vec![MenuItem::submenu("More", vec![MenuItem::heading("Inner")])];
        open_at(&mut menu, items, 10.0, 10.0);
        menu.open_submenu(first_row(&menu, 0));
        let child = menu.root().unwrap().open_child.as_ref().unwrap().id;

        menu.close_level(child);
        assert_eq!(menu.root().unwrap().depth(), 1);

        let root = menu.root().unwrap().id;
        menu.close_level(root);
        assert!(!menu.is_open());
    }

    #[test]
    fn click_on_heading_keeps_menu_open() {
        let mut menu = ContextMenu::new(document());
        open_at(&mut menu, vec![MenuItem::heading("Title")], 10.0, 10.0);
        let mut click = PointerEvent::at(0.0, 0.0);
        menu.click(ClickTarget::Row(first_row(&menu, 0)), &mut click);
        assert!(click.propagation_stopped);
        assert!(menu.is_open());
    }

    #[test]
    fn click_on_action_runs_handler_then_closes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut menu = ContextMenu::new(document());
        let items = vec![MenuItem::action("Go", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })];
        open_at(&mut menu, items, 10.0, 10.0);
        menu.click(ClickTarget::Row(first_row(&menu, 0)), &mut PointerEvent::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!menu.is_open());
    }

    #[test]
    fn anchor_click_navigates() {
        let mut menu = ContextMenu::new(document());
        let items = vec![MenuItem::anchor("Docs", "/docs").download("docs.html")];
        open_at(&mut menu, items, 10.0, 10.0);
        menu.click(ClickTarget::Row(first_row(&menu, 0)), &mut PointerEvent::default());
        assert_eq!(menu.host().navigations().len(), 1);
        assert_eq!(menu.host().navigations()[0].download.as_deref(), Some("docs.html"));
        assert!(!menu.is_open());
    }

    #[test]
    fn outside_click_and_resize_close() {
        let mut menu = ContextMenu::new(document());
        open_at(&mut menu, vec![MenuItem::heading("a")], 10.0, 10.0);
        menu.click(ClickTarget::Outside, &mut PointerEvent::default());
        assert!(!menu.is_open());

        open_at(&mut menu, vec![MenuItem::heading("a")], 10.0, 10.0);
        menu.resize();
        assert!(!menu.is_open());
    }

    #[test]
    fn wheel_over_menu_keeps_it_open_once() {
        let mut menu = ContextMenu::new(document());
        open_at(&mut menu, vec![MenuItem::heading("a")], 10.0, 10.0);

        menu.wheel(true);
        assert!(menu.prevents_close_on_scroll());
        menu.advance(Duration::ZERO);
        assert!(menu.is_open());
        assert!(!menu.prevents_close_on_scroll());

        menu.wheel(false);
        menu.advance(Duration::ZERO);
        assert!(!menu.is_open());
    }

    #[test]
    fn styles_are_installed_once() {
        let menu = ContextMenu::new(document());
        assert!(menu.styles_installed());
        assert_eq!(menu.host().styles().len(), 1);
    }

    #[test]
    fn styles_wait_for_loading_document() {
        let mut doc = document();
        doc.set_ready_state(ReadyState::Loading);
        let mut menu = ContextMenu::new(doc);
        assert!(menu.host().styles().is_empty());

        menu.host_mut().set_ready_state(ReadyState::Interactive);
        menu.document_ready();
        menu.document_ready();
        assert_eq!(menu.host().styles().len(), 1);
    }

    #[test]
    fn styles_can_be_disabled() {
        let config = MenuConfig { inject_styles: false, ..Default::default() };
        let menu = ContextMenu::with_config(document(), config);
        assert!(!menu.styles_installed());
        assert!(menu.host().styles().is_empty());
    }
}
