//! Viewport-aware placement of menu levels.
//!
//! All functions here are pure apart from the [`Directions`] they may flip.
//! Coordinates passed in and returned are *layout* coordinates: the space
//! fixed-position menus are laid out in. That equals client coordinates,
//! except when the document body carries a transform, in which case fixed
//! layout is relative to the body and the page scroll has to be added (see
//! [`Viewport::client_to_layout`]).

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Horizontal opening direction of the menu chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalDirection {
    /// Submenus open to the right of their row.
    #[default]
    Right,
    /// Submenus open to the left of their row.
    Left,
}

impl HorizontalDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

/// Vertical opening direction of the menu chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalDirection {
    /// Menus grow downwards from their origin.
    #[default]
    Down,
    /// Menus were pushed up against the bottom edge.
    Up,
}

impl VerticalDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }
}

/// Direction state shared by every level of one open menu chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Directions {
    /// Horizontal direction (`hdir`).
    pub horizontal: HorizontalDirection,
    /// Vertical direction (`vdir`).
    pub vertical: VerticalDirection,
}

impl Directions {
    /// Back to right/down.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Visible area of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Inner size of the window.
    pub size: Size,
    /// Current page scroll offset.
    pub scroll: Vec2,
    /// Whether the document body carries a CSS transform.
    pub body_transformed: bool,
}

impl Viewport {
    /// An unscrolled, untransformed viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self { size: Size::new(width, height), scroll: Vec2::ZERO, body_transformed: false }
    }

    /// Offset between client and layout coordinates.
    fn layout_offset(&self) -> Vec2 {
        if self.body_transformed {
            self.scroll
        } else {
            Vec2::ZERO
        }
    }

    /// The region a menu must stay inside, in layout coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.layout_offset().to_point(), self.size)
    }

    /// Convert a client point into layout coordinates.
    pub fn client_to_layout(&self, point: Point) -> Point {
        point + self.layout_offset()
    }

    /// Convert a client rectangle into layout coordinates.
    pub fn client_rect_to_layout(&self, rect: Rect) -> Rect {
        rect + self.layout_offset()
    }
}

/// Which sides a menu would spill over when placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overflow {
    /// Crosses the edge the horizontal direction is heading towards.
    pub horizontal: bool,
    /// Crosses the edge the vertical direction is heading towards.
    pub vertical: bool,
}

/// Check `pos` against the edge each direction is heading towards.
pub fn overflow(directions: Directions, viewport: &Viewport, size: Size, pos: Point) -> Overflow {
    let bounds = viewport.bounds();
    let horizontal = match directions.horizontal {
        HorizontalDirection::Right => pos.x + size.width > bounds.x1,
        HorizontalDirection::Left => pos.x < bounds.x0,
    };
    let vertical = match directions.vertical {
        VerticalDirection::Down => pos.y + size.height > bounds.y1,
        VerticalDirection::Up => pos.y < bounds.y0,
    };
    Overflow { horizontal, vertical }
}

/// Pull `pos` back inside the edge each direction is heading towards.
pub fn clamp_directional(
    directions: Directions,
    viewport: &Viewport,
    size: Size,
    pos: Point,
) -> Point {
    let bounds = viewport.bounds();
    let over = overflow(directions, viewport, size, pos);
    let x = match (over.horizontal, directions.horizontal) {
        (false, _) => pos.x,
        (true, HorizontalDirection::Right) => bounds.x1 - size.width,
        (true, HorizontalDirection::Left) => bounds.x0,
    };
    let y = match (over.vertical, directions.vertical) {
        (false, _) => pos.y,
        (true, VerticalDirection::Down) => bounds.y1 - size.height,
        (true, VerticalDirection::Up) => bounds.y0,
    };
    Point::new(x, y)
}

/// Final pass: keep the whole menu inside the viewport on every side.
///
/// A menu larger than the viewport is pinned to the top-left edge.
pub fn clamp_to_viewport(viewport: &Viewport, size: Size, pos: Point) -> Point {
    let bounds = viewport.bounds();
    let max_x = (bounds.x1 - size.width).max(bounds.x0);
    let max_y = (bounds.y1 - size.height).max(bounds.y0);
    Point::new(pos.x.clamp(bounds.x0, max_x), pos.y.clamp(bounds.y0, max_y))
}

/// Place a menu at a pointer position given in client coordinates.
pub fn place_at_pointer(
    directions: Directions,
    viewport: &Viewport,
    size: Size,
    client: Point,
) -> Point {
    let pos = clamp_directional(directions, viewport, size, viewport.client_to_layout(client));
    clamp_to_viewport(viewport, size, pos)
}

/// The element a menu opens beside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorBox {
    /// Bounds of the element in layout coordinates.
    pub rect: Rect,
    /// Whether the element is itself a submenu row.
    pub is_submenu_row: bool,
}

/// Vertical nudges applied when a menu opens beside a submenu row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmenuOffsets {
    /// Added to the row top while the chain grows downwards.
    pub down: f64,
    /// Added to the row top while the chain grows upwards.
    pub up: f64,
}

impl Default for SubmenuOffsets {
    fn default() -> Self {
        Self { down: 4.0, up: -12.0 }
    }
}

/// Place a menu beside an element, flipping `directions` on overflow.
///
/// Flips stay in `directions` so later levels of the same chain open the
/// same way; the caller resets them when the whole chain closes.
pub fn place_beside(
    directions: &mut Directions,
    viewport: &Viewport,
    size: Size,
    anchor: AnchorBox,
    offsets: SubmenuOffsets,
) -> Point {
    let x_for = |horizontal: HorizontalDirection| match horizontal {
        HorizontalDirection::Right => anchor.rect.x1,
        HorizontalDirection::Left => anchor.rect.x0 - size.width,
    };

    let mut y = anchor.rect.y0;
    if anchor.is_submenu_row {
        y += match directions.vertical {
            VerticalDirection::Down => offsets.down,
            VerticalDirection::Up => offsets.up,
        };
    }
    let mut pos = Point::new(x_for(directions.horizontal), y);

    let over = overflow(*directions, viewport, size, pos);
    let safe = clamp_directional(*directions, viewport, size, pos);
    if over.horizontal {
        directions.horizontal = directions.horizontal.flipped();
        pos.x = x_for(directions.horizontal);
        tracing::debug!(direction = ?directions.horizontal, "Menu flipped horizontally");
    }
    if over.vertical {
        directions.vertical = directions.vertical.flipped();
        pos.y = safe.y;
        tracing::debug!(direction = ?directions.vertical, "Menu flipped vertically");
    }

    clamp_to_viewport(viewport, size, pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn at_pointer(vp: &Viewport, width: f64, height: f64, x: f64, y: f64) -> Point {
        place_at_pointer(Directions::default(), vp, Size::new(width, height), Point::new(x, y))
    }

    fn beside(dirs: &mut Directions, anchor: AnchorBox, width: f64, height: f64) -> Point {
        let size = Size::new(width, height);
        place_beside(dirs, &viewport(), size, anchor, SubmenuOffsets::default())
    }

    fn submenu_row(x0: f64, y0: f64, x1: f64, y1: f64) -> AnchorBox {
        AnchorBox { rect: Rect::new(x0, y0, x1, y1), is_submenu_row: true }
    }

    #[test]
    fn pointer_inside_viewport_is_untouched() {
        let pos = at_pointer(&viewport(), 120.0, 80.0, 50.0, 50.0);
        assert_eq!(pos, Point::new(50.0, 50.0));
    }

    #[test]
    fn pointer_near_right_edge_is_pulled_in() {
        let pos = at_pointer(&viewport(), 120.0, 80.0, 780.0, 50.0);
        assert_eq!(pos.x, 680.0);
        assert!(pos.x + 120.0 <= 800.0);
    }

    #[test]
    fn pointer_near_bottom_edge_is_pulled_up() {
        let pos = at_pointer(&viewport(), 100.0, 200.0, 10.0, 590.0);
        assert_eq!(pos, Point::new(10.0, 400.0));
    }

    #[test]
    fn oversized_menu_is_pinned_to_origin() {
        let pos = at_pointer(&viewport(), 900.0, 700.0, 400.0, 300.0);
        assert_eq!(pos, Point::ZERO);
    }

    #[test]
    fn transformed_body_adds_scroll() {
        let vp = Viewport { scroll: Vec2::new(0.0, 1000.0), body_transformed: true, ..viewport() };
        let pos = at_pointer(&vp, 100.0, 100.0, 20.0, 30.0);
        assert_eq!(pos, Point::new(20.0, 1030.0));

        let bottom = at_pointer(&vp, 100.0, 100.0, 20.0, 590.0);
        assert_eq!(bottom.y, 1500.0);
    }

    #[test]
    fn scroll_is_ignored_without_transform() {
        let vp = Viewport { scroll: Vec2::new(0.0, 1000.0), ..viewport() };
        let pos = at_pointer(&vp, 100.0, 100.0, 20.0, 30.0);
        assert_eq!(pos, Point::new(20.0, 30.0));
    }

    #[test]
    fn submenu_opens_right_of_row_with_offset() {
        let mut dirs = Directions::default();
        let pos = beside(&mut dirs, submenu_row(100.0, 100.0, 220.0, 122.0), 100.0, 50.0);
        assert_eq!(pos, Point::new(220.0, 104.0));
        assert_eq!(dirs, Directions::default());
    }

    #[test]
    fn plain_element_gets_no_offset() {
        let mut dirs = Directions::default();
        let anchor = AnchorBox { is_submenu_row: false, ..submenu_row(100.0, 100.0, 220.0, 122.0) };
        let pos = beside(&mut dirs, anchor, 100.0, 50.0);
        assert_eq!(pos, Point::new(220.0, 100.0));
    }

    #[test]
    fn submenu_flips_left_at_right_edge() {
        let mut dirs = Directions::default();
        let pos = beside(&mut dirs, submenu_row(600.0, 100.0, 750.0, 122.0), 100.0, 50.0);
        assert_eq!(dirs.horizontal, HorizontalDirection::Left);
        assert_eq!(pos.x, 500.0);
    }

    #[test]
    fn left_direction_is_sticky() {
        let mut dirs = Directions { horizontal: HorizontalDirection::Left, ..Default::default() };
        // Plenty of room on the right, but the chain already opens left.
        let pos = beside(&mut dirs, submenu_row(300.0, 100.0, 400.0, 122.0), 100.0, 50.0);
        assert_eq!(dirs.horizontal, HorizontalDirection::Left);
        assert_eq!(pos.x, 200.0);
    }

    #[test]
    fn left_direction_flips_back_at_left_edge() {
        let mut dirs = Directions { horizontal: HorizontalDirection::Left, ..Default::default() };
        let pos = beside(&mut dirs, submenu_row(20.0, 100.0, 120.0, 122.0), 100.0, 50.0);
        assert_eq!(dirs.horizontal, HorizontalDirection::Right);
        assert_eq!(pos.x, 120.0);
    }

    #[test]
    fn submenu_flips_up_at_bottom_edge() {
        let mut dirs = Directions::default();
        let pos = beside(&mut dirs, submenu_row(100.0, 560.0, 200.0, 582.0), 100.0, 120.0);
        assert_eq!(dirs.vertical, VerticalDirection::Up);
        assert_eq!(pos.y, 480.0);
    }

    #[test]
    fn upward_chain_uses_up_offset() {
        let mut dirs = Directions { vertical: VerticalDirection::Up, ..Default::default() };
        let pos = beside(&mut dirs, submenu_row(100.0, 300.0, 200.0, 322.0), 100.0, 50.0);
        assert_eq!(pos.y, 288.0);
        assert_eq!(dirs.vertical, VerticalDirection::Up);
    }

    #[test]
    fn result_never_leaves_viewport() {
        let mut dirs = Directions::default();
        // Wider than the space on either side of the anchor.
        let anchor = AnchorBox { rect: Rect::new(300.0, 10.0, 500.0, 32.0), is_submenu_row: false };
        let pos = beside(&mut dirs, anchor, 350.0, 50.0);
        assert!(pos.x >= 0.0 && pos.x + 350.0 <= 800.0);
        assert!(pos.y >= 0.0 && pos.y + 50.0 <= 600.0);
    }

    #[test]
    fn reset_restores_right_down() {
        let mut dirs =
            Directions { horizontal: HorizontalDirection::Left, vertical: VerticalDirection::Up };
        dirs.reset();
        assert_eq!(dirs, Directions::default());
    }
}
