//! Minimal in-memory document used as the rendering surface.

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.write_text(out);
                }
            }
            Node::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["input", "meta", "br"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    /// Serialized markup of the children only.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            // Empty values render as boolean attributes
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// State of the single text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value: String,
    pub disabled: bool,
    pub placeholder: Option<String>,
    pub focused: bool,
}

/// The page surface: one entry field, one results container, the
/// explanatory text, a prefix hint and a status banner.
#[derive(Debug, Clone)]
pub struct Page {
    entry: Entry,
    explanation: String,
    explanation_visible: bool,
    hint: Option<String>,
    status: Option<String>,
    results: Element,
}

impl Page {
    /// A fresh page: entry disabled, explanation visible, no results.
    pub fn new(explanation: impl Into<String>) -> Self {
        Self {
            entry: Entry {
                value: String::new(),
                disabled: true,
                placeholder: None,
                focused: false,
            },
            explanation: explanation.into(),
            explanation_visible: true,
            hint: None,
            status: None,
            results: Element::new("div").with_id("results"),
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn is_entry_enabled(&self) -> bool {
        !self.entry.disabled
    }

    /// Enable the entry, set its placeholder and move focus to it.
    pub fn enable_entry(&mut self, placeholder: &str) {
        self.entry.disabled = false;
        self.entry.placeholder = Some(placeholder.to_string());
        self.entry.focused = true;
    }

    pub fn set_entry_value(&mut self, value: &str) {
        self.entry.value = value.to_string();
    }

    pub fn results(&self) -> &Element {
        &self.results
    }

    pub fn clear_results(&mut self) {
        self.results.clear_children();
    }

    pub fn append_results(&mut self, fragment: Element) {
        self.results.push(fragment);
    }

    pub fn explanation_visible(&self) -> bool {
        self.explanation_visible
    }

    pub fn show_explanation(&mut self) {
        self.explanation_visible = true;
    }

    pub fn hide_explanation(&mut self) {
        self.explanation_visible = false;
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn results_html(&self) -> String {
        self.results.to_html()
    }

    /// Markup of what is currently visible below the entry field.
    pub fn view_html(&self) -> String {
        self.view_elements()
            .iter()
            .map(Element::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full document markup.
    pub fn to_html(&self) -> String {
        let head = Element::new("head")
            .with_child(Element::new("meta").with_attr("charset", "utf-8"))
            .with_child(Element::new("title").with_text("toki sama"));

        let mut body = Element::new("body");
        if let Some(status) = &self.status {
            body.push(
                Element::new("p")
                    .with_id("status")
                    .with_class("error")
                    .with_attr("role", "alert")
                    .with_text(status.clone()),
            );
        }
        body.push(self.entry_element());
        let mut explanation = Element::new("p")
            .with_id("explanation")
            .with_text(self.explanation.clone());
        if !self.explanation_visible {
            explanation.set_attr("hidden", "");
        }
        body.push(explanation);
        if let Some(hint) = &self.hint {
            body.push(Element::new("p").with_id("hint").with_text(hint.clone()));
        }
        body.push(self.results.clone());

        let html = Element::new("html")
            .with_attr("lang", "en")
            .with_child(head)
            .with_child(body);
        format!("<!DOCTYPE html>\n{}", html.to_html())
    }

    fn entry_element(&self) -> Element {
        let mut input = Element::new("input")
            .with_id("entry")
            .with_attr("type", "text")
            .with_attr("autocomplete", "off");
        if !self.entry.value.is_empty() {
            input.set_attr("value", self.entry.value.clone());
        }
        if let Some(placeholder) = &self.entry.placeholder {
            input.set_attr("placeholder", placeholder.clone());
        }
        if self.entry.disabled {
            input.set_attr("disabled", "");
        }
        if self.entry.focused {
            input.set_attr("autofocus", "");
        }
        input
    }

    fn view_elements(&self) -> Vec<Element> {
        let mut elements = Vec::new();
        if let Some(status) = &self.status {
            elements.push(Element::new("p").with_id("status").with_text(status.clone()));
        }
        if self.explanation_visible {
            elements.push(
                Element::new("p")
                    .with_id("explanation")
                    .with_text(self.explanation.clone()),
            );
        }
        if let Some(hint) = &self.hint {
            elements.push(Element::new("p").with_id("hint").with_text(hint.clone()));
        }
        elements.push(self.results.clone());
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_serialization() {
        let el = Element::new("li")
            .with_class("row")
            .with_child(Element::new("span").with_text("a & b"))
            .with_text("<tail>");
        assert_eq!(
            el.to_html(),
            r#"<li class="row"><span>a &amp; b</span>&lt;tail&gt;</li>"#
        );
        assert_eq!(el.text_content(), "a & b<tail>");
    }

    #[test]
    fn test_attr_escaping_and_boolean_attrs() {
        let el = Element::new("input")
            .with_attr("placeholder", "say \"hi\"")
            .with_attr("disabled", "");
        assert_eq!(
            el.to_html(),
            r#"<input placeholder="say &quot;hi&quot;" disabled>"#
        );
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = Element::new("p").with_id("a").with_class("x");
        el.set_attr("id", "b");
        assert_eq!(el.to_html(), r#"<p id="b" class="x"></p>"#);
        el.remove_attr("class");
        assert_eq!(el.attr("class"), None);
    }

    #[test]
    fn test_new_page_is_disabled_with_explanation() {
        let page = Page::new("explain");
        assert!(!page.is_entry_enabled());
        assert!(page.explanation_visible());
        assert_eq!(page.results_html(), r#"<div id="results"></div>"#);

        let html = page.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<input id="entry" type="text" autocomplete="off" disabled>"#));
        assert!(html.contains(r#"<p id="explanation">explain</p>"#));
        assert!(!html.contains(r#"id="status""#));
    }

    #[test]
    fn test_enable_entry_sets_placeholder_and_focus() {
        let mut page = Page::new("explain");
        page.enable_entry("teacher");
        assert!(page.is_entry_enabled());
        assert!(page.entry().focused);
        assert!(
            page.to_html()
                .contains(r#"placeholder="teacher" autofocus>"#)
        );
    }

    #[test]
    fn test_view_html_follows_visibility() {
        let mut page = Page::new("explain");
        page.hide_explanation();
        page.set_hint("Completions for “mi”");
        page.append_results(Element::new("ul"));
        assert_eq!(
            page.view_html(),
            "<p id=\"hint\">Completions for “mi”</p>\n<div id=\"results\"><ul></ul></div>"
        );

        page.clear_results();
        page.clear_hint();
        page.show_explanation();
        assert_eq!(
            page.view_html(),
            "<p id=\"explanation\">explain</p>\n<div id=\"results\"></div>"
        );
    }
}
