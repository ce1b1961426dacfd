//! Pointer events flowing from the host document into the controller.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A pointer event as delivered by the host (context menu, click, wheel).
///
/// The controller may stop its propagation or prevent its default action;
/// the host reads the flags back after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Viewport (client) coordinates of the pointer.
    pub position: Point,
    /// Set when the event must not reach further listeners.
    pub propagation_stopped: bool,
    /// Set when the host's default action (native menu, navigation) is suppressed.
    pub default_prevented: bool,
}

impl PointerEvent {
    /// Create an event at the given client coordinates.
    pub fn at(x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), ..Default::default() }
    }

    /// Stop the event from propagating to other listeners.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Suppress the host's default action for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Row-level events an item can register extra listeners for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowEvent {
    /// The row was clicked.
    Click,
    /// The pointer entered the row.
    PointerEnter,
    /// The pointer left the row.
    PointerLeave,
}
