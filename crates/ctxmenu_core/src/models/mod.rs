//! Data models for ctxmenu.
//!
//! - `item` - MenuItem, ItemContent, ItemKind, Link, ItemEvents
//! - `event` - PointerEvent, RowEvent

pub mod event;
pub mod item;

pub use event::{PointerEvent, RowEvent};
pub use item::{
    ActionHandler, BeforeRender, Fragment, ItemContent, ItemEvents, ItemKind, Link, MenuDefinition,
    MenuItem, RowEventHandler,
};
