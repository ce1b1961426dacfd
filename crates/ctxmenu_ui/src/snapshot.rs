//! Serializable view of the open menu tree.

use ctxmenu_core::{CtxMenuError, Directions, ItemKind, Link};
use serde::Serialize;

use crate::render::RowContent;
use crate::tree::{MenuLevel, Row};

/// The open chain, root first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuSnapshot {
    /// Direction state of the chain.
    pub directions: Directions,
    /// Open levels, root first.
    pub levels: Vec<LevelSnapshot>,
}

/// One open level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSnapshot {
    /// Level identifier.
    pub id: u64,
    /// Row this level hangs off.
    pub owner: Option<u64>,
    /// Left edge, layout coordinates.
    pub x: f64,
    /// Top edge, layout coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Set for empty menus.
    pub hidden: bool,
    /// Rows, top to bottom.
    pub rows: Vec<RowSnapshot>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    /// Row identifier.
    pub id: u64,
    /// Kind of the item the row was rendered from.
    pub kind: ItemKind,
    /// The row's `class` attribute.
    pub classes: String,
    /// Text as displayed.
    pub text: String,
    /// The row's `title` attribute.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tooltip: String,
    /// The row's `style` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Inner markup.
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl RowSnapshot {
    fn capture(row: &Row) -> Self {
        Self {
            id: row.id.0,
            kind: row.item.kind(),
            classes: row.classes.class_name(),
            text: match &row.content {
                RowContent::Empty => String::new(),
                content => content.display_text(),
            },
            tooltip: row.tooltip.clone(),
            style: row.style.clone(),
            html: row.markup(),
            link: row.link.clone(),
        }
    }
}

impl MenuSnapshot {
    /// Capture the chain starting at `root`.
    pub fn capture(root: &MenuLevel, directions: Directions) -> Self {
        let levels = root
            .chain()
            .into_iter()
            .map(|level| LevelSnapshot {
                id: level.id.0,
                owner: level.owner.map(|row| row.0),
                x: level.rect.x0,
                y: level.rect.y0,
                width: level.rect.width(),
                height: level.rect.height(),
                hidden: level.hidden,
                rows: level.rows.iter().map(RowSnapshot::capture).collect(),
            })
            .collect();
        Self { directions, levels }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CtxMenuError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
