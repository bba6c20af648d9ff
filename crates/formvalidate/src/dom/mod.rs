//! The document capability boundary.
//!
//! The engine consumes a host document through the [`Document`] trait and
//! never holds element references directly: every element is addressed by an
//! opaque, copyable [`ElementId`] owned by the document. The trait is
//! object-safe so hosts can hand the engine a `&mut dyn Document`.
//!
//! Event flow is inverted compared to a browser: the engine *registers*
//! interest via [`Document::on`] (so a real adapter can attach native
//! listeners), and the host routes fired events back through
//! [`crate::FormValidate::dispatch`]. One-shot semantics live in the engine,
//! which detaches the registration after the first qualifying event.

pub mod memory;

// ============================================================================
// HANDLES
// ============================================================================

/// Opaque handle to an element owned by the host document.
///
/// Handles are non-owning: the document may outlive or drop the element, and
/// the engine never assumes a handle stays live across a rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// Element-selection criteria for [`Document::find_elements`].
///
/// Results are always in document order; iteration order of the engine's
/// field records derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Every candidate form control in the subtree: `input` (excluding
    /// `hidden` and `submit` types), `textarea`, and `select`.
    FormControls,
    /// Elements matching a selector (`#id`, `.class`, or a tag name).
    Selector(&'a str),
    /// `input` elements whose `name` attribute equals the given name.
    NamedInputs(&'a str),
    /// Elements carrying the given CSS class.
    WithClass(&'a str),
}

/// Structural tests for [`Document::matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlQuery {
    /// A `select` element.
    Select,
    /// An `input` with `type="radio"`.
    Radio,
    /// An `input` with `type="checkbox"`.
    Checkbox,
    /// A `label` element.
    Label,
}

// ============================================================================
// EVENTS
// ============================================================================

/// Event classes the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Form submission.
    Submit,
    /// Pointer activation.
    Click,
    /// Value change committed.
    Change,
    /// Key pressed while the control is focused.
    KeyDown,
}

/// A discrete event routed from the host into the engine.
///
/// Hosts are expected to neutralize native submission (the moral equivalent
/// of `preventDefault`) before dispatching a [`EventType::Submit`] event; the
/// returned outcome says whether native submission may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// The element the event fired on.
    pub target: ElementId,
    /// The event class.
    pub kind: EventType,
    /// Key code for [`EventType::KeyDown`] events.
    pub key: Option<u32>,
}

impl Event {
    /// A submit event on the given form element.
    #[must_use]
    pub fn submit(target: ElementId) -> Self {
        Self {
            target,
            kind: EventType::Submit,
            key: None,
        }
    }

    /// A pointer activation on the given element.
    #[must_use]
    pub fn click(target: ElementId) -> Self {
        Self {
            target,
            kind: EventType::Click,
            key: None,
        }
    }

    /// A committed value change on the given element.
    #[must_use]
    pub fn change(target: ElementId) -> Self {
        Self {
            target,
            kind: EventType::Change,
            key: None,
        }
    }

    /// A key press on the given element.
    #[must_use]
    pub fn key_down(target: ElementId, key: u32) -> Self {
        Self {
            target,
            kind: EventType::KeyDown,
            key: Some(key),
        }
    }
}

// ============================================================================
// ELEMENT CREATION
// ============================================================================

/// Description of an element the engine asks the document to create, used
/// for the inline error spans inserted next to failing fields.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    value: Option<String>,
    checked: bool,
    text: Option<String>,
}

impl ElementSpec {
    /// Starts a spec for an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute.
    #[must_use = "builder methods must be chained or built"]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Adds a CSS class.
    #[must_use = "builder methods must be chained or built"]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets the initial control value.
    #[must_use = "builder methods must be chained or built"]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Marks the control checked.
    #[must_use = "builder methods must be chained or built"]
    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Sets the text content.
    #[must_use = "builder methods must be chained or built"]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The declared attributes.
    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// The declared classes.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The initial value, if any.
    #[must_use]
    pub fn initial_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the control starts checked.
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// The text content, if any.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// The host-document capability the engine runs against.
///
/// Implementations must keep [`Document::find_elements`] results in document
/// order and must treat removed elements as absent from every query.
pub trait Document {
    // --- queries ---

    /// Elements matching `query` within the subtree rooted at `root`,
    /// in document order. `root` itself is never included.
    fn find_elements(&self, root: ElementId, query: &Query<'_>) -> Vec<ElementId>;

    /// The first element in the whole document matching a selector.
    fn first_match(&self, selector: &str) -> Option<ElementId>;

    /// The element's parent, if attached.
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// The nearest ancestor (excluding `el` itself) matching a selector.
    fn closest(&self, el: ElementId, selector: &str) -> Option<ElementId>;

    // --- per-element reads ---

    /// An attribute value, if present.
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    /// The control's current value.
    fn value(&self, el: ElementId) -> String;

    /// Whether the control is disabled.
    fn is_disabled(&self, el: ElementId) -> bool;

    /// Whether the control is checked (radio/checkbox).
    fn is_checked(&self, el: ElementId) -> bool;

    /// Structural test against a [`ControlQuery`].
    fn matches(&self, el: ElementId, query: ControlQuery) -> bool;

    // --- mutation ---

    /// Adds a CSS class.
    fn add_class(&mut self, el: ElementId, class: &str);

    /// Removes a CSS class.
    fn remove_class(&mut self, el: ElementId, class: &str);

    /// Sets an attribute.
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    /// Removes an attribute.
    fn remove_attribute(&mut self, el: ElementId, name: &str);

    /// Creates an element from `spec` and inserts it directly after `el`,
    /// returning the new handle.
    fn insert_after(&mut self, el: ElementId, spec: &ElementSpec) -> ElementId;

    /// Replaces the element's text content.
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Detaches the element (and its subtree) from the document.
    fn remove(&mut self, el: ElementId);

    /// Moves focus to the element.
    fn focus(&mut self, el: ElementId);

    // --- events ---

    /// Registers interest in `events` on `el`, tagged with `namespace`.
    fn on(&mut self, el: ElementId, events: &[EventType], namespace: &str);

    /// Drops every registration tagged with `namespace`.
    fn off(&mut self, namespace: &str);

    /// Drops registrations on `el` tagged with `namespace`.
    fn off_element(&mut self, el: ElementId, namespace: &str);
}
