//! Turning menu items into rendered rows.

use ctxmenu_core::{Fragment, ItemKind, MenuItem, Value};
use kurbo::Rect;

use crate::styles::RowClasses;
use crate::tree::{Row, RowId};

/// What a row displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowContent {
    /// Nothing (dividers).
    Empty,
    /// Plain text, escaped when turned into markup.
    Text(String),
    /// Caller-supplied markup, inserted verbatim.
    Html(String),
    /// Caller-supplied element.
    Element(Fragment),
}

impl RowContent {
    /// Resolve the content of an item: element over markup over text.
    pub fn resolve(item: &MenuItem) -> Self {
        let Some(content) = item.content() else {
            return Self::Empty;
        };
        if let Some(element) = &content.element {
            return Self::Element(element.resolve());
        }
        if let Some(html) = &content.html {
            return Self::Html(html.resolve());
        }
        Self::Text(content.text.as_ref().map(Value::resolve).unwrap_or_default())
    }

    /// Text as the user reads it, tags removed.
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Html(html) => strip_tags(html),
            Self::Element(fragment) => fragment.text.clone(),
        }
    }

    /// Markup for the row body.
    pub fn markup(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => format!("<span>{}</span>", escape_html(text)),
            Self::Html(html) => html.clone(),
            Self::Element(fragment) => {
                let mut out = format!("<{}", fragment.tag);
                for (name, value) in &fragment.attributes {
                    out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
                }
                out.push('>');
                out.push_str(&escape_html(&fragment.text));
                out.push_str(&format!("</{}>", fragment.tag));
                out
            }
        }
    }
}

/// Escape text for use in markup and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Classify an item into its row classes.
///
/// Resolves the disabled state (and with it, for submenus, the children).
pub fn row_classes(item: &MenuItem, has_icon: bool) -> RowClasses {
    if item.is_divider() {
        return RowClasses::DIVIDER;
    }

    let mut classes = RowClasses::empty();
    if has_icon {
        classes |= RowClasses::ICON;
    }

    if !item.is_interactive() {
        if item.kind() == ItemKind::Heading {
            classes |= RowClasses::HEADING;
        }
        return classes;
    }

    if item.is_disabled() {
        classes |= RowClasses::DISABLED;
        if item.is_submenu() {
            classes |= RowClasses::SUBMENU;
        }
        return classes;
    }

    classes |= RowClasses::INTERACTIVE;
    if item.is_submenu() {
        classes |= RowClasses::SUBMENU;
    }
    classes
}

/// Build the row for one item. Every value producer is evaluated here.
pub fn render_row(id: RowId, item: &MenuItem) -> Row {
    let content = RowContent::resolve(item);
    let fields = item.content();
    let tooltip = fields.and_then(|c| c.tooltip.as_ref()).map(Value::resolve).unwrap_or_default();
    let style = fields.and_then(|c| c.style.as_ref()).map(Value::resolve);
    let icon = fields.and_then(|c| c.icon.as_ref()).map(Value::resolve);
    let classes = row_classes(item, icon.is_some());
    let link = if classes.contains(RowClasses::INTERACTIVE) { item.resolve_link() } else { None };

    Row {
        id,
        item: item.clone(),
        classes,
        content,
        tooltip,
        style,
        icon,
        link,
        rect: Rect::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn text_is_escaped() {
        let content = RowContent::Text("<b>bold</b> & co".into());
        assert_eq!(content.markup(), "<span>&lt;b&gt;bold&lt;/b&gt; &amp; co</span>");
        assert_eq!(content.display_text(), "<b>bold</b> & co");
    }

    #[test]
    fn html_is_verbatim() {
        let content = RowContent::Html("<b>bold</b>".into());
        assert_eq!(content.markup(), "<b>bold</b>");
        assert_eq!(content.display_text(), "bold");
    }

    #[test]
    fn element_wins_over_html_and_text() {
        let item = MenuItem::heading("text")
            .html("<i>html</i>")
            .element(Fragment::new("canvas").attr("width", "10").text("el"));
        let content = RowContent::resolve(&item);
        assert_eq!(content.markup(), "<canvas width=\"10\">el</canvas>");
    }

    #[test]
    fn classes_for_each_kind() {
        assert_eq!(row_classes(&MenuItem::divider(), false), RowClasses::DIVIDER);
        assert_eq!(row_classes(&MenuItem::heading("Title"), false), RowClasses::HEADING);
        assert_eq!(row_classes(&MenuItem::custom_html("<hr>"), false), RowClasses::INTERACTIVE);
        assert_eq!(
            row_classes(&MenuItem::action("Go", |_| {}), true),
            RowClasses::INTERACTIVE | RowClasses::ICON
        );
        assert_eq!(
            row_classes(&MenuItem::submenu("More", vec![MenuItem::divider()]), false),
            RowClasses::INTERACTIVE | RowClasses::SUBMENU
        );
        assert_eq!(
            row_classes(&MenuItem::submenu("Empty", Vec::new()), false),
            RowClasses::DISABLED | RowClasses::SUBMENU
        );
        let disabled = MenuItem::anchor("Docs", "/").disabled(true);
        assert_eq!(row_classes(&disabled, false), RowClasses::DISABLED);
    }

    #[test]
    fn render_row_resolves_producers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let item = MenuItem::anchor(
            Value::producer(move || format!("Open #{}", counter.fetch_add(1, Ordering::SeqCst))),
            "/item",
        )
        .tooltip("Opens the item")
        .target("_blank");

        let row = render_row(RowId(1), &item);
        assert_eq!(row.content, RowContent::Text("Open #0".into()));
        assert_eq!(row.tooltip, "Opens the item");
        assert_eq!(row.link.as_ref().map(|l| l.href.as_str()), Some("/item"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_anchor_has_no_link() {
        let row = render_row(RowId(1), &MenuItem::anchor("Docs", "/docs").disabled(true));
        assert!(row.link.is_none());
        assert!(row.markup().contains("<span>Docs</span>"));
        assert!(!row.markup().contains("<a "));
    }
}
