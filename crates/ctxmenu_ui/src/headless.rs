//! An in-memory document implementing [`Host`].
//!
//! Elements live in an arena keyed by [`ElementId`]; selectors support the
//! `#id`, `.class` and `tag` forms. Row measurement uses fixed text metrics,
//! so layouts are deterministic. Listener changes, stylesheets and
//! navigations are recorded for inspection.

use std::collections::{BTreeMap, HashMap};

use ctxmenu_core::{Link, Viewport};
use kurbo::{Rect, Size, Vec2};

use crate::host::{ElementId, Host, ListenerId, ReadyState, RowProbe};
use crate::styles::RowClasses;

/// Fixed text metrics used to measure rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance of one character.
    pub char_width: f64,
    /// Height of one text row.
    pub line_height: f64,
    /// Left plus right padding of a row.
    pub horizontal_padding: f64,
    /// Extra width taken by an icon.
    pub icon_width: f64,
    /// Height of a divider.
    pub divider_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 22.0,
            horizontal_padding: 40.0,
            icon_width: 15.0,
            divider_height: 1.0,
        }
    }
}

impl TextMetrics {
    /// Border-box size of a row.
    pub fn measure(&self, row: RowProbe<'_>) -> Size {
        if row.classes.contains(RowClasses::DIVIDER) {
            return Size::new(0.0, self.divider_height);
        }
        let chars = row.content.display_text().chars().count() as f64;
        let mut width = chars * self.char_width + self.horizontal_padding;
        if row.classes.contains(RowClasses::ICON) {
            width += self.icon_width;
        }
        Size::new(width, self.line_height)
    }
}

/// One element of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessElement {
    /// Tag name, lowercase.
    pub tag: String,
    /// `id` attribute.
    pub id: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Bounding rectangle in client coordinates.
    pub rect: Rect,
}

impl HeadlessElement {
    /// Create an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        Self { tag, id: None, classes: Vec::new(), rect: Rect::ZERO }
    }

    /// Builder: set the `id` attribute.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set the bounding rectangle.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            self.tag.eq_ignore_ascii_case(selector)
        }
    }
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct HeadlessDocument {
    viewport: Viewport,
    ready_state: ReadyState,
    metrics: TextMetrics,
    elements: BTreeMap<ElementId, HeadlessElement>,
    next_id: u64,
    listeners: HashMap<ElementId, Vec<ListenerId>>,
    styles: Vec<String>,
    navigations: Vec<Link>,
}

impl HeadlessDocument {
    /// Create an empty, interactive document with a `width × height` viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ready_state: ReadyState::default(),
            metrics: TextMetrics::default(),
            elements: BTreeMap::new(),
            next_id: 1,
            listeners: HashMap::new(),
            styles: Vec::new(),
            navigations: Vec::new(),
        }
    }

    /// Builder: use different text metrics.
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    // ========== Elements ==========

    /// Add an element to the document.
    pub fn insert(&mut self, element: HeadlessElement) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, element);
        id
    }

    /// Remove an element. Its listeners go with it.
    pub fn remove(&mut self, id: ElementId) -> Option<HeadlessElement> {
        self.listeners.remove(&id);
        self.elements.remove(&id)
    }

    /// An element by handle.
    pub fn element(&self, id: ElementId) -> Option<&HeadlessElement> {
        self.elements.get(&id)
    }

    /// Mutable access to an element.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut HeadlessElement> {
        self.elements.get_mut(&id)
    }

    // ========== Window ==========

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.size = Size::new(width, height);
    }

    /// Scroll the page.
    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.viewport.scroll = Vec2::new(x, y);
    }

    /// Toggle a CSS transform on the body.
    pub fn set_body_transformed(&mut self, transformed: bool) {
        self.viewport.body_transformed = transformed;
    }

    /// Change the loading state.
    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    // ========== Recorded effects ==========

    /// Listeners bound to an element, in binding order.
    pub fn listeners(&self, id: ElementId) -> &[ListenerId] {
        self.listeners.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Inserted stylesheets, first child of head first.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Followed links, oldest first.
    pub fn navigations(&self) -> &[Link] {
        &self.navigations
    }
}

impl Host for HeadlessDocument {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        self.elements.iter().find(|(_, element)| element.matches(selector)).map(|(id, _)| *id)
    }

    fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        self.elements.get(&element).map(|e| e.rect)
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements.get(&element).is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn measure_row(&self, row: RowProbe<'_>) -> Size {
        self.metrics.measure(row)
    }

    fn add_context_menu_listener(&mut self, element: ElementId, listener: ListenerId) {
        self.listeners.entry(element).or_default().push(listener);
    }

    fn remove_context_menu_listener(&mut self, element: ElementId, listener: ListenerId) {
        if let Some(bound) = self.listeners.get_mut(&element) {
            bound.retain(|l| *l != listener);
        }
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn insert_style(&mut self, css: &str) {
        self.styles.insert(0, css.to_string());
    }

    fn navigate(&mut self, link: &Link) {
        tracing::debug!(href = %link.href, "Navigating");
        self.navigations.push(link.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RowContent;

    #[test]
    fn selectors_by_id_class_and_tag() {
        let mut doc = HeadlessDocument::new(800.0, 600.0);
        let a = doc.insert(HeadlessElement::new("div").id("a").class("box"));
        let b = doc.insert(HeadlessElement::new("SPAN").class("box"));
        assert_eq!(doc.query_selector("#a"), Some(a));
        assert_eq!(doc.query_selector(".box"), Some(a));
        assert_eq!(doc.query_selector("span"), Some(b));
        assert_eq!(doc.query_selector("#missing"), None);
    }

    #[test]
    fn removing_element_drops_listeners() {
        let mut doc = HeadlessDocument::new(800.0, 600.0);
        let a = doc.insert(HeadlessElement::new("div"));
        doc.add_context_menu_listener(a, ListenerId(1));
        doc.add_context_menu_listener(a, ListenerId(2));
        doc.remove_context_menu_listener(a, ListenerId(1));
        assert_eq!(doc.listeners(a), &[ListenerId(2)]);

        doc.remove(a);
        assert!(!doc.contains(a));
        assert!(doc.listeners(a).is_empty());
    }

    #[test]
    fn measures_rows_with_fixed_metrics() {
        let metrics = TextMetrics::default();
        let text = RowContent::Text("Copy".into());
        let plain = metrics.measure(RowProbe { classes: RowClasses::INTERACTIVE, content: &text });
        assert_eq!(plain, Size::new(72.0, 22.0));
        let classes = RowClasses::INTERACTIVE | RowClasses::ICON;
        let with_icon = metrics.measure(RowProbe { classes, content: &text });
        assert_eq!(with_icon.width, 87.0);
        let divider =
            metrics.measure(RowProbe { classes: RowClasses::DIVIDER, content: &RowContent::Empty });
        assert_eq!(divider, Size::new(0.0, 1.0));
    }

    #[test]
    fn styles_are_prepended() {
        let mut doc = HeadlessDocument::new(800.0, 600.0);
        doc.insert_style("a {}");
        doc.insert_style("b {}");
        assert_eq!(doc.styles(), &["b {}".to_string(), "a {}".to_string()]);
    }
}
