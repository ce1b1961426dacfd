//! The seam between the controller and the document it renders into.

use std::fmt;

use ctxmenu_core::{Link, Viewport};
use kurbo::{Rect, Size};
use serde::Serialize;

use crate::render::RowContent;
use crate::styles::RowClasses;

/// Handle of an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Handle of a context-menu listener bound by `attach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Document loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still parsing; the head may not exist yet.
    Loading,
    /// Parsed, subresources may still load.
    #[default]
    Interactive,
    /// Fully loaded.
    Complete,
}

/// A row handed to the host for measurement.
#[derive(Debug, Clone, Copy)]
pub struct RowProbe<'a> {
    /// Classes the row will carry.
    pub classes: RowClasses,
    /// The row's content.
    pub content: &'a RowContent,
}

/// Everything the controller needs from the document.
pub trait Host {
    /// Resolve a selector to the first matching element.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Whether the element is still part of the document.
    fn contains(&self, element: ElementId) -> bool;

    /// Bounding rectangle of an element in client coordinates.
    fn element_rect(&self, element: ElementId) -> Option<Rect>;

    /// Whether the element carries a class.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Natural border-box size of a row, measured off-screen.
    fn measure_row(&self, row: RowProbe<'_>) -> Size;

    /// Route context-menu events on `element` to the controller under `listener`.
    fn add_context_menu_listener(&mut self, element: ElementId, listener: ListenerId);

    /// Undo [`Host::add_context_menu_listener`].
    fn remove_context_menu_listener(&mut self, element: ElementId, listener: ListenerId);

    /// Document loading state.
    fn ready_state(&self) -> ReadyState;

    /// Insert a stylesheet as the first child of the document head.
    fn insert_style(&mut self, css: &str);

    /// Follow an anchor row's link.
    fn navigate(&mut self, link: &Link);
}

impl<H: Host + ?Sized> Host for Box<H> {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        (**self).query_selector(selector)
    }

    fn contains(&self, element: ElementId) -> bool {
        (**self).contains(element)
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        (**self).element_rect(element)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        (**self).has_class(element, class)
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn measure_row(&self, row: RowProbe<'_>) -> Size {
        (**self).measure_row(row)
    }

    fn add_context_menu_listener(&mut self, element: ElementId, listener: ListenerId) {
        (**self).add_context_menu_listener(element, listener)
    }

    fn remove_context_menu_listener(&mut self, element: ElementId, listener: ListenerId) {
        (**self).remove_context_menu_listener(element, listener)
    }

    fn ready_state(&self) -> ReadyState {
        (**self).ready_state()
    }

    fn insert_style(&mut self, css: &str) {
        (**self).insert_style(css)
    }

    fn navigate(&mut self, link: &Link) {
        (**self).navigate(link)
    }
}
