//! The tree of open menu levels.
//!
//! The root level is the top-level menu; every level owns at most one open
//! child level, which belongs to one of its rows. Closing a level drops its
//! whole subtree.

use ctxmenu_core::{Link, MenuItem};
use kurbo::{Point, Rect};

use crate::render::{escape_html, RowContent};
use crate::styles::RowClasses;

/// Identifier of a rendered row. Never reused within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

/// Identifier of a rendered menu level. Never reused within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(pub u64);

/// One rendered list entry.
#[derive(Debug, Clone)]
pub struct Row {
    /// Row identifier.
    pub id: RowId,
    /// The item this row was rendered from.
    pub item: MenuItem,
    /// State classes.
    pub classes: RowClasses,
    /// Resolved content.
    pub content: RowContent,
    /// Resolved tooltip, empty when unset.
    pub tooltip: String,
    /// Resolved inline style.
    pub style: Option<String>,
    /// Resolved icon source.
    pub icon: Option<String>,
    /// Resolved link of an enabled anchor row.
    pub link: Option<Link>,
    /// Border box in layout coordinates.
    pub rect: Rect,
}

impl Row {
    /// Enabled action, anchor, submenu or custom row.
    pub fn is_interactive(&self) -> bool {
        self.classes.contains(RowClasses::INTERACTIVE)
    }

    /// Enabled row that opens a nested menu.
    pub fn opens_submenu(&self) -> bool {
        self.classes.contains(RowClasses::INTERACTIVE | RowClasses::SUBMENU)
    }

    /// Inner markup of the row: content, optional link wrapper and icon.
    pub fn markup(&self) -> String {
        let mut body = self.content.markup();
        if let Some(link) = &self.link {
            let mut open = format!("<a href=\"{}\"", escape_html(&link.href));
            if let Some(target) = &link.target {
                open.push_str(&format!(" target=\"{}\"", escape_html(target)));
            }
            if let Some(download) = &link.download {
                open.push_str(&format!(" download=\"{}\"", escape_html(download)));
            }
            body = format!("{open}>{body}</a>");
        }
        if let Some(icon) = &self.icon {
            body.push_str(&format!("<img class=\"icon\" src=\"{}\" />", escape_html(icon)));
        }
        body
    }
}

/// One open menu level: a positioned list of rows.
#[derive(Debug, Clone)]
pub struct MenuLevel {
    /// Level identifier.
    pub id: LevelId,
    /// Row of the parent level this level hangs off, `None` for the root.
    pub owner: Option<RowId>,
    /// Rows, top to bottom.
    pub rows: Vec<Row>,
    /// Border box in layout coordinates.
    pub rect: Rect,
    /// Empty menus are rendered but hidden.
    pub hidden: bool,
    /// The one open submenu of this level.
    pub open_child: Option<Box<MenuLevel>>,
}

impl MenuLevel {
    /// Number of levels in this subtree's open chain, this one included.
    pub fn depth(&self) -> usize {
        1 + self.open_child.as_ref().map_or(0, |child| child.depth())
    }

    /// This level followed by its chain of open descendants.
    pub fn chain(&self) -> Vec<&MenuLevel> {
        let mut out = vec![self];
        let mut current = self;
        while let Some(child) = current.open_child.as_deref() {
            out.push(child);
            current = child;
        }
        out
    }

    /// The row with the given id in this subtree.
    pub fn find_row(&self, id: RowId) -> Option<&Row> {
        self.chain().into_iter().find_map(|level| level.rows.iter().find(|row| row.id == id))
    }

    /// The level in this subtree holding the given row.
    pub fn level_of_row_mut(&mut self, id: RowId) -> Option<&mut MenuLevel> {
        if self.rows.iter().any(|row| row.id == id) {
            return Some(self);
        }
        self.open_child.as_deref_mut()?.level_of_row_mut(id)
    }

    /// The level in this subtree whose open child has the given id.
    pub fn parent_of_level_mut(&mut self, id: LevelId) -> Option<&mut MenuLevel> {
        let child_id = self.open_child.as_ref()?.id;
        if child_id == id {
            return Some(self);
        }
        self.open_child.as_deref_mut()?.parent_of_level_mut(id)
    }

    /// Owner of the open child, if one is open.
    pub fn open_child_owner(&self) -> Option<RowId> {
        self.open_child.as_ref().and_then(|child| child.owner)
    }

    /// Whether a visible level of this subtree covers the point.
    pub fn contains_point(&self, point: Point) -> bool {
        self.chain().into_iter().any(|level| !level.hidden && level.rect.contains(point))
    }

    /// Deepest visible row under the point.
    ///
    /// Submenus are drawn above their parents, so deeper levels win.
    pub fn hit_test(&self, point: Point) -> Option<RowId> {
        self.chain().into_iter().rev().filter(|level| !level.hidden).find_map(|level| {
            level.rows.iter().find(|row| row.rect.contains(point)).map(|row| row.id)
        })
    }

    /// Root→target row path under the point.
    ///
    /// A row contains its open submenu, so pointing into a submenu keeps the
    /// owning rows of every ancestor level on the path.
    pub fn hover_path(&self, point: Point) -> Vec<RowId> {
        let chain = self.chain();
        for (depth, level) in chain.iter().enumerate().rev() {
            if level.hidden || !level.rect.contains(point) {
                continue;
            }
            let mut path: Vec<RowId> = chain[1..=depth].iter().filter_map(|l| l.owner).collect();
            if let Some(row) = level.rows.iter().find(|row| row.rect.contains(point)) {
                path.push(row.id);
            }
            return path;
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_row;

    fn level(id: u64, owner: Option<u64>, rect: Rect, rows: &[(u64, Rect)]) -> MenuLevel {
        MenuLevel {
            id: LevelId(id),
            owner: owner.map(RowId),
            rows: rows
                .iter()
                .map(|(row_id, rect)| {
                    let mut row = render_row(RowId(*row_id), &MenuItem::heading("row"));
                    row.rect = *rect;
                    row
                })
                .collect(),
            rect,
            hidden: false,
            open_child: None,
        }
    }

    fn two_levels() -> MenuLevel {
        let mut root = level(
            1,
            None,
            Rect::new(0.0, 0.0, 100.0, 60.0),
            &[(1, Rect::new(1.0, 3.0, 99.0, 25.0)), (2, Rect::new(1.0, 27.0, 99.0, 49.0))],
        );
        root.open_child = Some(Box::new(level(
            2,
            Some(2),
            Rect::new(100.0, 30.0, 200.0, 60.0),
            &[(3, Rect::new(101.0, 33.0, 199.0, 55.0))],
        )));
        root
    }

    #[test]
    fn chain_and_depth() {
        let root = two_levels();
        assert_eq!(root.depth(), 2);
        let ids: Vec<LevelId> = root.chain().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![LevelId(1), LevelId(2)]);
        assert_eq!(root.open_child_owner(), Some(RowId(2)));
    }

    #[test]
    fn find_rows_across_levels() {
        let mut root = two_levels();
        assert!(root.find_row(RowId(3)).is_some());
        assert!(root.find_row(RowId(9)).is_none());
        assert_eq!(root.level_of_row_mut(RowId(3)).map(|l| l.id), Some(LevelId(2)));
        assert_eq!(root.parent_of_level_mut(LevelId(2)).map(|l| l.id), Some(LevelId(1)));
        assert!(root.parent_of_level_mut(LevelId(1)).is_none());
    }

    #[test]
    fn hit_test_prefers_deeper_levels() {
        let root = two_levels();
        assert_eq!(root.hit_test(Point::new(10.0, 10.0)), Some(RowId(1)));
        assert_eq!(root.hit_test(Point::new(150.0, 40.0)), Some(RowId(3)));
        assert_eq!(root.hit_test(Point::new(300.0, 300.0)), None);
        assert!(root.contains_point(Point::new(150.0, 58.0)));
    }

    #[test]
    fn hover_path_includes_owner_rows() {
        let root = two_levels();
        assert_eq!(root.hover_path(Point::new(150.0, 40.0)), vec![RowId(2), RowId(3)]);
        assert_eq!(root.hover_path(Point::new(10.0, 10.0)), vec![RowId(1)]);
        // Submenu padding: still inside the owner row's subtree.
        assert_eq!(root.hover_path(Point::new(150.0, 58.0)), vec![RowId(2)]);
        assert!(root.hover_path(Point::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn row_markup_wraps_links_and_icons() {
        let item = MenuItem::anchor("Docs", "/docs?a=1&b=2").target("_blank");
        let mut row = render_row(RowId(1), &item);
        row.icon = Some("doc.png".into());
        assert_eq!(
            row.markup(),
            concat!(
                "<a href=\"/docs?a=1&amp;b=2\" target=\"_blank\"><span>Docs</span></a>",
                "<img class=\"icon\" src=\"doc.png\" />"
            )
        );
    }
}
