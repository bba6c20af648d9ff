//! Error decoration and listener lifecycle.
//!
//! Failing fields get the error class (every member for radio groups), a
//! `data-valid="false"` marker, an optional ancestor class, the rendered
//! tooltip, and a one-shot clear-on-interaction listener. Passing fields are
//! stripped of all of it; the ancestor class goes only once no sibling
//! control in the same container is still flagged invalid.

use crate::dom::{ControlQuery, Document, ElementId, ElementSpec, EventType, Query};
use crate::field::FieldRecord;
use crate::settings::Settings;

/// Listener tag for everything this engine registers, so teardown can
/// detach wholesale.
pub(crate) const NAMESPACE: &str = "formvalidate";

/// Marker class on engine-injected error spans, distinguishing them from
/// host markup sharing the display class.
pub(crate) const MARKER_CLASS: &str = "js-field-validation-error";

/// Inserts the inline error span for a control and returns its handle.
///
/// Checkbox and radio controls wrapped in a `label` get the span after the
/// label, so the message does not land inside the clickable area.
pub(crate) fn insert_error_span(
    settings: &Settings,
    doc: &mut dyn Document,
    el: ElementId,
) -> ElementId {
    let spec = ElementSpec::new("span")
        .class(settings.validation_error_class.clone())
        .class(MARKER_CLASS);
    let discrete =
        doc.matches(el, ControlQuery::Checkbox) || doc.matches(el, ControlQuery::Radio);
    let anchor = if discrete {
        match doc.parent(el) {
            Some(parent) if doc.matches(parent, ControlQuery::Label) => parent,
            _ => el,
        }
    } else {
        el
    };
    doc.insert_after(anchor, &spec)
}

/// Writes a rendered message into the field's error span, re-creating the
/// span if an interaction listener removed it.
pub(crate) fn render_tooltip(
    settings: &Settings,
    doc: &mut dyn Document,
    record: &mut FieldRecord,
    message: &str,
) {
    if !settings.validation_errors || record.suppress_error_span {
        return;
    }
    let span = match record.error_span {
        Some(span) => span,
        None => {
            let span = insert_error_span(settings, doc, record.element);
            record.error_span = Some(span);
            span
        }
    };
    doc.set_text(span, message);
}

/// Decorates a failing field and arms its clear-on-interaction listener.
pub(crate) fn mark_field_invalid(
    settings: &Settings,
    doc: &mut dyn Document,
    record: &mut FieldRecord,
    form: ElementId,
) {
    arm_clear_listener(doc, record, form);

    if let Some(selector) = settings.parent_element.as_deref() {
        if let Some(ancestor) = doc.closest(record.element, selector) {
            doc.add_class(ancestor, &settings.error_class);
        }
    }

    for el in decoration_targets(doc, record, form) {
        doc.add_class(el, &settings.error_class);
        doc.set_attribute(el, "data-valid", "false");
    }
}

/// Strips decoration from a passing field. The ancestor class goes only
/// when no sibling control in the same container is still invalid.
pub(crate) fn mark_field_valid(
    settings: &Settings,
    doc: &mut dyn Document,
    record: &mut FieldRecord,
    form: ElementId,
) {
    for el in decoration_targets(doc, record, form) {
        doc.set_attribute(el, "data-valid", "true");
        doc.remove_class(el, &settings.error_class);
    }

    if settings.parent_element.is_some() && !container_still_invalid(doc, record.element) {
        clear_ancestor_class(settings, doc, record.element);
    }

    if let Some(span) = record.error_span.take() {
        doc.remove(span);
    }
}

/// The elements a field's decoration applies to: the control itself, or
/// every input sharing the group name for radio groups.
pub(crate) fn decoration_targets(
    doc: &dyn Document,
    record: &FieldRecord,
    form: ElementId,
) -> Vec<ElementId> {
    match record.group.as_deref() {
        Some(name) => doc.find_elements(form, &Query::NamedInputs(name)),
        None => vec![record.element],
    }
}

/// Whether any control in the field's immediate container is still flagged
/// invalid.
pub(crate) fn container_still_invalid(doc: &dyn Document, el: ElementId) -> bool {
    let Some(container) = doc.parent(el) else {
        return false;
    };
    doc.find_elements(container, &Query::FormControls)
        .iter()
        .any(|&sibling| doc.attribute(sibling, "data-valid").as_deref() == Some("false"))
}

/// Removes the propagated error class from the configured ancestor.
pub(crate) fn clear_ancestor_class(settings: &Settings, doc: &mut dyn Document, el: ElementId) {
    if let Some(selector) = settings.parent_element.as_deref() {
        if let Some(ancestor) = doc.closest(el, selector) {
            doc.remove_class(ancestor, &settings.error_class);
        }
    }
}

/// (Re-)registers the one-shot interaction listener for a field, detaching
/// any previous registration first so rebinds never stack.
fn arm_clear_listener(doc: &mut dyn Document, record: &mut FieldRecord, form: ElementId) {
    let events: &[EventType] = if record.kind.is_discrete() {
        &[EventType::Click, EventType::Change]
    } else {
        &[EventType::KeyDown, EventType::Change]
    };
    for el in decoration_targets(doc, record, form) {
        doc.off_element(el, NAMESPACE);
        doc.on(el, events, NAMESPACE);
    }
    record.armed = true;
}
