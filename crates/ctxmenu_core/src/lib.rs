//! Core types and utilities for ctxmenu.
//!
//! This crate holds everything that does not need a document:
//!
//! - **error**: Usage and configuration errors
//! - **models**: Menu items, value-or-producer content, pointer events
//! - **position**: Direction state and viewport-aware placement
//! - **config**: Controller tunables
//! - **logging**: Structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod position;
pub mod value;

pub use config::MenuConfig;
pub use error::{CtxMenuError, ErrorInfo};
pub use models::{
    ActionHandler, BeforeRender, Fragment, ItemContent, ItemEvents, ItemKind, Link, MenuDefinition,
    MenuItem, PointerEvent, RowEvent, RowEventHandler,
};
pub use position::{
    AnchorBox, Directions, HorizontalDirection, SubmenuOffsets, VerticalDirection, Viewport,
};
pub use value::Value;

pub use kurbo::{Point, Rect, Size, Vec2};
