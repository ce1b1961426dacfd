//! Default stylesheet and the row class-name contract.
//!
//! The controller drives row state exclusively through the classes below;
//! the stylesheet only gives them a look. It is inserted as the first child
//! of the document head so any page rule overrides it.

use kurbo::Size;

/// Class of every menu container.
pub const MENU_CLASS: &str = "ctxmenu";

bitflags::bitflags! {
    /// Classes toggled on a rendered row.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RowClasses: u8 {
        /// Separator line.
        const DIVIDER     = 0b0000_0001;
        /// Emphasized, non-interactive label.
        const HEADING     = 0b0000_0010;
        /// Reacts to hover and click.
        const INTERACTIVE = 0b0000_0100;
        /// Greyed out, ignores clicks.
        const DISABLED    = 0b0000_1000;
        /// Shows the nested-menu chevron.
        const SUBMENU     = 0b0001_0000;
        /// Has an icon image.
        const ICON        = 0b0010_0000;
    }
}

impl RowClasses {
    /// Class names in stylesheet order.
    pub fn names(self) -> Vec<&'static str> {
        const NAMES: [(RowClasses, &str); 6] = [
            (RowClasses::DIVIDER, "divider"),
            (RowClasses::HEADING, "heading"),
            (RowClasses::ICON, "icon"),
            (RowClasses::INTERACTIVE, "interactive"),
            (RowClasses::DISABLED, "disabled"),
            (RowClasses::SUBMENU, "submenu"),
        ];
        NAMES.iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, name)| *name).collect()
    }

    /// The `class` attribute value.
    pub fn class_name(self) -> String {
        self.names().join(" ")
    }
}

/// Box metrics the stylesheet gives menus and rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    /// Container border width.
    pub border: f64,
    /// Container vertical padding.
    pub padding_y: f64,
    /// Vertical margin around ordinary rows.
    pub row_margin: f64,
    /// Vertical margin around dividers.
    pub divider_margin: f64,
}

/// Metrics matching [`STYLES`].
pub const BOX_METRICS: BoxMetrics =
    BoxMetrics { border: 1.0, padding_y: 2.0, row_margin: 1.0, divider_margin: 5.0 };

impl BoxMetrics {
    /// Vertical margin applied above and below a row.
    pub fn margin_for(&self, classes: RowClasses) -> f64 {
        if classes.contains(RowClasses::DIVIDER) {
            self.divider_margin
        } else {
            self.row_margin
        }
    }

    /// Outer size of a container holding rows of the given border-box sizes.
    pub fn container_size(&self, rows: &[(RowClasses, Size)]) -> Size {
        if rows.is_empty() {
            return Size::ZERO;
        }
        let width = rows.iter().map(|(_, size)| size.width).fold(0.0, f64::max);
        let height: f64 =
            rows.iter().map(|(classes, size)| size.height + 2.0 * self.margin_for(*classes)).sum();
        Size::new(width + 2.0 * self.border, height + 2.0 * (self.border + self.padding_y))
    }
}

/// Default stylesheet.
pub const STYLES: &str = concat!(
    ".ctxmenu{position:fixed;max-height:100vh;border:1px solid #999;padding:2px 0;",
    "box-shadow:#aaa 3px 3px 3px;background:#fff;margin:0;z-index:9999;overflow-y:auto;",
    "font:15px Verdana, sans-serif}",
    ".ctxmenu li{margin:1px 0;display:block;position:relative;user-select:none}",
    ".ctxmenu li.heading{font-weight:bold;margin-left:-5px}",
    ".ctxmenu li span{display:block;padding:2px 20px;cursor:default}",
    ".ctxmenu li a{color:inherit;text-decoration:none}",
    ".ctxmenu li.icon{padding-left:15px}",
    ".ctxmenu img.icon{position:absolute;width:18px;left:10px;top:2px}",
    ".ctxmenu li.disabled{color:#ccc}",
    ".ctxmenu li.divider{border-bottom:1px solid #aaa;margin:5px 0}",
    ".ctxmenu li.interactive:hover{background:rgba(0, 0, 0, 0.1)}",
    ".ctxmenu li.submenu::after{content:\"\";position:absolute;display:block;top:0;bottom:0;",
    "right:.4em;margin:auto .1rem auto auto;border-right:1px solid #000;",
    "border-top:1px solid #000;transform:rotate(45deg);width:.3rem;height:.3rem}",
    ".ctxmenu li.submenu.disabled::after{border-color:#ccc}",
);
