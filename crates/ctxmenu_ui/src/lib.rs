//! Context menu controller, rendering and host integration for ctxmenu.

pub mod context_menu;
pub mod global;
pub mod headless;
pub mod host;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod styles;
pub mod tree;


pub use context_menu::{ClickPlan, ClickTarget, ContextMenu, Origin, PendingTrigger};
pub use global::{ContextMenuHandle, SharedHost};
pub use headless::{HeadlessDocument, HeadlessElement, TextMetrics};
pub use host::{ElementId, Host, ListenerId, ReadyState, RowProbe};
pub use render::RowContent;
pub use snapshot::{LevelSnapshot, MenuSnapshot, RowSnapshot};
pub use styles::{RowClasses, MENU_CLASS, STYLES};
pub use tree::{LevelId, MenuLevel, Row, RowId};
