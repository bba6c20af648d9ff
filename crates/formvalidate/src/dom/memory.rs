//! In-memory reference implementation of [`Document`].
//!
//! Backs the test suite and the examples: a flat element arena with
//! parent/child links, attributes, classes, values, checked state, and a
//! recorded listener table. Selector support is the minimal subset the
//! engine needs (`#id`, `.class`, plain tag names).

use std::collections::{BTreeMap, BTreeSet};

use super::{ControlQuery, Document, ElementId, ElementSpec, EventType, Query};

const ROOT: ElementId = ElementId(0);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    value: String,
    checked: bool,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    detached: bool,
}

/// A recorded event registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerRecord {
    /// The element the registration targets.
    pub element: ElementId,
    /// The event classes registered.
    pub events: Vec<EventType>,
    /// The registration tag.
    pub namespace: String,
}

/// An arena-backed document for hosts without a real DOM.
///
/// Construction is test-friendly: [`MemoryDocument::append`] grows the tree
/// from [`ElementSpec`]s, and [`MemoryDocument::set_value`] /
/// [`MemoryDocument::set_checked`] simulate user input.
///
/// ```rust,ignore
/// let mut doc = MemoryDocument::new();
/// let form = doc.append(doc.root(), ElementSpec::new("form"));
/// let email = doc.append(form, ElementSpec::new("input").attr("name", "email"));
/// doc.set_value(email, "user@example.com");
/// ```
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    focused: Option<ElementId>,
    listeners: Vec<ListenerRecord>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates a document containing only a `body` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                tag: "body".to_string(),
                ..Node::default()
            }],
            focused: None,
            listeners: Vec::new(),
        }
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ROOT
    }

    /// Creates an element from `spec` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let id = self.create(&spec, Some(parent));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Simulates the user editing the control's value.
    pub fn set_value(&mut self, el: ElementId, value: impl Into<String>) {
        if let Some(node) = self.node_mut(el) {
            node.value = value.into();
        }
    }

    /// Simulates the user checking or unchecking the control.
    pub fn set_checked(&mut self, el: ElementId, checked: bool) {
        if let Some(node) = self.node_mut(el) {
            node.checked = checked;
        }
    }

    /// Whether the element still hangs off the document root.
    #[must_use]
    pub fn is_attached(&self, el: ElementId) -> bool {
        let mut current = el;
        loop {
            let Some(node) = self.node(current) else {
                return false;
            };
            if node.detached {
                return false;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current == ROOT,
            }
        }
    }

    /// Whether the element carries the class.
    #[must_use]
    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.node(el).is_some_and(|n| n.classes.contains(class))
    }

    /// The element's text content.
    #[must_use]
    pub fn text(&self, el: ElementId) -> String {
        self.node(el).map(|n| n.text.clone()).unwrap_or_default()
    }

    /// The currently focused element, if any.
    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Every live event registration.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerRecord] {
        &self.listeners
    }

    /// Count of live registrations tagged with `namespace`.
    #[must_use]
    pub fn listener_count(&self, namespace: &str) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.namespace == namespace)
            .count()
    }

    fn create(&mut self, spec: &ElementSpec, parent: Option<ElementId>) -> ElementId {
        let mut attrs = BTreeMap::new();
        for (name, value) in spec.attrs() {
            attrs.insert(name.clone(), value.clone());
        }
        // Radio and checkbox inputs default their value to "on", the way a
        // browser DOM does.
        let value = spec
            .initial_value()
            .map(str::to_string)
            .or_else(|| attrs.get("value").cloned())
            .unwrap_or_else(|| {
                let ty = attrs.get("type").map(String::as_str);
                if spec.tag() == "input" && matches!(ty, Some("radio" | "checkbox")) {
                    "on".to_string()
                } else {
                    String::new()
                }
            });
        let checked = spec.is_checked() || attrs.contains_key("checked");
        let node = Node {
            tag: spec.tag().to_string(),
            attrs,
            classes: spec.classes().iter().cloned().collect(),
            value,
            checked,
            text: spec.text_content().unwrap_or_default().to_string(),
            parent,
            children: Vec::new(),
            detached: false,
        };
        let id = ElementId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    fn node(&self, el: ElementId) -> Option<&Node> {
        self.nodes.get(el.0 as usize)
    }

    fn node_mut(&mut self, el: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(el.0 as usize)
    }

    fn matches_selector(&self, el: ElementId, selector: &str) -> bool {
        let Some(node) = self.node(el) else {
            return false;
        };
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            node.attrs.get("id").map(String::as_str) == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            node.classes.contains(class)
        } else {
            node.tag == selector
        }
    }

    fn matches_query(&self, el: ElementId, query: &Query<'_>) -> bool {
        let Some(node) = self.node(el) else {
            return false;
        };
        match query {
            Query::FormControls => match node.tag.as_str() {
                "textarea" | "select" => true,
                "input" => !matches!(
                    node.attrs.get("type").map(String::as_str),
                    Some("hidden" | "submit")
                ),
                _ => false,
            },
            Query::Selector(selector) => self.matches_selector(el, selector),
            Query::NamedInputs(name) => {
                node.tag == "input" && node.attrs.get("name").map(String::as_str) == Some(*name)
            }
            Query::WithClass(class) => node.classes.contains(*class),
        }
    }

    fn collect(&self, root: ElementId, query: &Query<'_>, out: &mut Vec<ElementId>) {
        let Some(node) = self.node(root) else {
            return;
        };
        for &child in &node.children {
            if self.node(child).is_none_or(|n| n.detached) {
                continue;
            }
            if self.matches_query(child, query) {
                out.push(child);
            }
            self.collect(child, query, out);
        }
    }
}

impl Document for MemoryDocument {
    fn find_elements(&self, root: ElementId, query: &Query<'_>) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect(root, query, &mut out);
        out
    }

    fn first_match(&self, selector: &str) -> Option<ElementId> {
        let query = Query::Selector(selector);
        let mut out = Vec::new();
        self.collect(ROOT, &query, &mut out);
        out.first().copied()
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.node(el).and_then(|n| n.parent)
    }

    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut current = self.parent(el);
        while let Some(candidate) = current {
            if self.matches_selector(candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.node(el).and_then(|n| n.attrs.get(name).cloned())
    }

    fn value(&self, el: ElementId) -> String {
        self.node(el).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn is_disabled(&self, el: ElementId) -> bool {
        self.node(el).is_some_and(|n| n.attrs.contains_key("disabled"))
    }

    fn is_checked(&self, el: ElementId) -> bool {
        self.node(el).is_some_and(|n| n.checked)
    }

    fn matches(&self, el: ElementId, query: ControlQuery) -> bool {
        let Some(node) = self.node(el) else {
            return false;
        };
        let input_type = node.attrs.get("type").map(String::as_str);
        match query {
            ControlQuery::Select => node.tag == "select",
            ControlQuery::Radio => node.tag == "input" && input_type == Some("radio"),
            ControlQuery::Checkbox => node.tag == "input" && input_type == Some("checkbox"),
            ControlQuery::Label => node.tag == "label",
        }
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.node_mut(el) {
            node.classes.remove(class);
        }
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        if let Some(node) = self.node_mut(el) {
            node.attrs.remove(name);
        }
    }

    fn insert_after(&mut self, el: ElementId, spec: &ElementSpec) -> ElementId {
        let parent = self.parent(el).unwrap_or(ROOT);
        let id = self.create(spec, Some(parent));
        if let Some(node) = self.node_mut(parent) {
            let at = node
                .children
                .iter()
                .position(|&c| c == el)
                .map_or(node.children.len(), |i| i + 1);
            node.children.insert(at, id);
        }
        id
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(node) = self.node_mut(el) {
            node.text = text.to_string();
        }
    }

    fn remove(&mut self, el: ElementId) {
        let parent = self.parent(el);
        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != el);
            }
        }
        if let Some(node) = self.node_mut(el) {
            node.detached = true;
        }
    }

    fn focus(&mut self, el: ElementId) {
        self.focused = Some(el);
    }

    fn on(&mut self, el: ElementId, events: &[EventType], namespace: &str) {
        self.listeners.push(ListenerRecord {
            element: el,
            events: events.to_vec(),
            namespace: namespace.to_string(),
        });
    }

    fn off(&mut self, namespace: &str) {
        self.listeners.retain(|l| l.namespace != namespace);
    }

    fn off_element(&mut self, el: ElementId, namespace: &str) {
        self.listeners
            .retain(|l| !(l.element == el && l.namespace == namespace));
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> ElementSpec {
        ElementSpec::new("input").attr("type", "text").attr("name", name)
    }

    #[test]
    fn test_append_and_document_order() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let a = doc.append(form, input("a"));
        let group = doc.append(form, ElementSpec::new("div"));
        let b = doc.append(group, input("b"));
        let c = doc.append(form, input("c"));

        let found = doc.find_elements(form, &Query::FormControls);
        assert_eq!(found, vec![a, b, c]);
    }

    #[test]
    fn test_form_controls_excludes_hidden_and_submit() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        doc.append(form, ElementSpec::new("input").attr("type", "hidden"));
        doc.append(form, ElementSpec::new("input").attr("type", "submit"));
        let area = doc.append(form, ElementSpec::new("textarea").attr("name", "bio"));

        assert_eq!(doc.find_elements(form, &Query::FormControls), vec![area]);
    }

    #[test]
    fn test_selector_subset() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let el = doc.append(form, input("pw").attr("id", "password").class("wide"));

        assert_eq!(doc.first_match("#password"), Some(el));
        assert_eq!(doc.first_match(".wide"), Some(el));
        assert_eq!(doc.first_match("input"), Some(el));
        assert_eq!(doc.first_match("#missing"), None);
    }

    #[test]
    fn test_closest_excludes_self() {
        let mut doc = MemoryDocument::new();
        let outer = doc.append(doc.root(), ElementSpec::new("div").class("form-group"));
        let el = doc.append(outer, input("x").class("form-group"));

        assert_eq!(doc.closest(el, ".form-group"), Some(outer));
    }

    #[test]
    fn test_insert_after_ordering() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let a = doc.append(form, input("a"));
        let b = doc.append(form, input("b"));
        let span = doc.insert_after(a, &ElementSpec::new("span").class("note"));

        assert_eq!(doc.parent(span), Some(form));
        let classed = doc.find_elements(form, &Query::WithClass("note"));
        assert_eq!(classed, vec![span]);
        // still between a and b in document order
        assert_eq!(doc.find_elements(form, &Query::FormControls), vec![a, b]);
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let wrap = doc.append(form, ElementSpec::new("div"));
        let inner = doc.append(wrap, input("x"));

        doc.remove(wrap);
        assert!(!doc.is_attached(wrap));
        assert!(!doc.is_attached(inner));
        assert!(doc.find_elements(form, &Query::FormControls).is_empty());
    }

    #[test]
    fn test_radio_value_defaults_to_on() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let bare = doc.append(
            form,
            ElementSpec::new("input").attr("type", "radio").attr("name", "color"),
        );
        let valued = doc.append(
            form,
            ElementSpec::new("input")
                .attr("type", "radio")
                .attr("name", "color")
                .attr("value", "red"),
        );

        assert_eq!(doc.value(bare), "on");
        assert_eq!(doc.value(valued), "red");
    }

    #[test]
    fn test_listener_bookkeeping() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(doc.root(), ElementSpec::new("form"));
        let el = doc.append(form, input("x"));

        doc.on(form, &[EventType::Submit], "ns");
        doc.on(el, &[EventType::KeyDown, EventType::Change], "ns");
        assert_eq!(doc.listener_count("ns"), 2);

        doc.off_element(el, "ns");
        assert_eq!(doc.listener_count("ns"), 1);

        doc.off("ns");
        assert_eq!(doc.listener_count("ns"), 0);
    }
}
