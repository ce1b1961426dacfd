//! Process-wide controller handle.
//!
//! The first call to [`ContextMenuHandle::instance_or_init`] creates the one
//! shared controller; later calls return handles to the same state.
//! Caller callbacks (actions, before-render hooks, row listeners) run with
//! the lock released, so they may call back into the handle. Value
//! producers are evaluated while rendering, under the lock.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use ctxmenu_core::{
    BeforeRender, CtxMenuError, MenuConfig, MenuDefinition, PointerEvent, RowEvent,
};
use kurbo::Point;
use parking_lot::{Mutex, MutexGuard};

use crate::context_menu::{ClickTarget, ContextMenu, Origin};
use crate::host::{ElementId, Host};
use crate::snapshot::MenuSnapshot;
use crate::tree::RowId;

/// A dynamically typed host that can cross threads.
pub type SharedHost = Box<dyn Host + Send>;

static INSTANCE: OnceLock<ContextMenuHandle> = OnceLock::new();

/// Shared handle to a [`ContextMenu`].
pub struct ContextMenuHandle<H: Host = SharedHost> {
    inner: Arc<Mutex<ContextMenu<H>>>,
}

impl<H: Host> Clone for ContextMenuHandle<H> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl ContextMenuHandle {
    /// The process-wide controller, created from `host` on first use.
    ///
    /// `host` is only called when no instance exists yet.
    pub fn instance_or_init(host: impl FnOnce() -> SharedHost) -> Self {
        INSTANCE
            .get_or_init(|| {
                tracing::info!("Context menu controller initialized");
                Self::new(host())
            })
            .clone()
    }

    /// The process-wide controller, if it was created.
    pub fn instance() -> Option<Self> {
        INSTANCE.get().cloned()
    }
}

impl<H: Host> ContextMenuHandle<H> {
    /// A standalone controller (not the process-wide one).
    pub fn new(host: H) -> Self {
        Self::with_config(host, MenuConfig::default())
    }

    /// A standalone controller with a custom configuration.
    pub fn with_config(host: H, config: MenuConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(ContextMenu::with_config(host, config))) }
    }

    /// Lock the controller for direct inspection.
    ///
    /// Do not hold the guard across calls into this handle.
    pub fn lock(&self) -> MutexGuard<'_, ContextMenu<H>> {
        self.inner.lock()
    }

    // ========== Registry ==========

    /// See [`ContextMenu::attach`].
    pub fn attach(&self, selector: &str, menu: MenuDefinition) -> Result<(), CtxMenuError> {
        self.inner.lock().attach(selector, menu)
    }

    /// See [`ContextMenu::attach_with`].
    pub fn attach_with(
        &self,
        selector: &str,
        menu: MenuDefinition,
        before_render: BeforeRender,
    ) -> Result<(), CtxMenuError> {
        self.inner.lock().attach_with(selector, menu, before_render)
    }

    /// See [`ContextMenu::update`].
    pub fn update(
        &self,
        selector: &str,
        menu: Option<MenuDefinition>,
        before_render: Option<BeforeRender>,
    ) -> Result<(), CtxMenuError> {
        self.inner.lock().update(selector, menu, before_render)
    }

    /// See [`ContextMenu::delete`].
    pub fn delete(&self, selector: &str) -> Result<(), CtxMenuError> {
        self.inner.lock().delete(selector)
    }

    // ========== Show / hide ==========

    /// See [`ContextMenu::show`].
    pub fn show(&self, menu: MenuDefinition, origin: Origin<'_>) -> Result<(), CtxMenuError> {
        self.inner.lock().show(menu, origin)
    }

    /// See [`ContextMenu::hide`].
    pub fn hide(&self) {
        self.inner.lock().hide();
    }

    /// Whether a menu is open.
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }

    /// Serializable view of the open tree.
    pub fn snapshot(&self) -> Option<MenuSnapshot> {
        self.inner.lock().snapshot()
    }

    // ========== Events ==========

    /// See [`ContextMenu::context_menu`]. The before-render hook runs unlocked.
    pub fn context_menu(&self, element: ElementId, event: &mut PointerEvent) -> bool {
        let trigger = {
            let menu = self.inner.lock();
            if menu.swallow_on_menu(event) {
                return false;
            }
            menu.prepare_trigger(element)
        };
        let Some(trigger) = trigger else {
            return false;
        };
        let menu = trigger.build(event);
        self.inner.lock().show_at_pointer(&menu, event);
        true
    }

    /// See [`ContextMenu::click`]. Row listeners and the action run unlocked.
    pub fn click(&self, target: ClickTarget, event: &mut PointerEvent) {
        let plan = self.inner.lock().plan_click(target, event);
        plan.run_callbacks(event);
        self.inner.lock().finish_click(plan);
    }

    /// See [`ContextMenu::click_at`].
    pub fn click_at(&self, client: Point, event: &mut PointerEvent) {
        let target = self.inner.lock().click_target_at(client);
        self.click(target, event);
    }

    /// See [`ContextMenu::pointer_enter`]. Row listeners run unlocked.
    pub fn pointer_enter(&self, row: RowId) {
        let listeners = self.inner.lock().enter_row(row);
        if let Some(listeners) = listeners {
            listeners.dispatch(RowEvent::PointerEnter);
        }
    }

    /// See [`ContextMenu::pointer_leave`]. Row listeners run unlocked.
    pub fn pointer_leave(&self, row: RowId) {
        let listeners = self.inner.lock().leave_row(row);
        if let Some(listeners) = listeners {
            listeners.dispatch(RowEvent::PointerLeave);
        }
    }

    /// See [`ContextMenu::pointer_move`]. Row listeners run unlocked.
    pub fn pointer_move(&self, client: Point) {
        let notify = self.inner.lock().track_pointer(client);
        for (event, listeners) in notify {
            listeners.dispatch(event);
        }
    }

    /// See [`ContextMenu::wheel_at`].
    pub fn wheel_at(&self, client: Point) {
        self.inner.lock().wheel_at(client);
    }

    /// See [`ContextMenu::wheel`].
    pub fn wheel(&self, over_menu: bool) {
        self.inner.lock().wheel(over_menu);
    }

    /// See [`ContextMenu::resize`].
    pub fn resize(&self) {
        self.inner.lock().resize();
    }

    /// See [`ContextMenu::document_ready`].
    pub fn document_ready(&self) {
        self.inner.lock().document_ready();
    }

    /// See [`ContextMenu::advance`].
    pub fn advance(&self, by: Duration) {
        self.inner.lock().advance(by);
    }
}
