//! The bound-instance facade: lifecycle and event routing.

use indexmap::IndexMap;
use tracing::debug;

use crate::dom::{Document, ElementId, Event, EventType, Query};
use crate::engine::SubmitOutcome;
use crate::field::{self, FieldRecord, cleanse_name};
use crate::filters::FilterRegistry;
use crate::present;
use crate::settings::Settings;

const KEY_TAB: u32 = 9;
const KEY_SPACE: u32 = 32;

/// A validator bound to one form.
///
/// Owns the settings, the filter registry, and the field records; the host
/// keeps ownership of the document and passes it into every operation. The
/// host routes fired events through [`FormValidate::dispatch`]; submission
/// can also be driven directly with [`FormValidate::submit`].
#[derive(Debug)]
pub struct FormValidate {
    pub(crate) settings: Settings,
    pub(crate) registry: FilterRegistry,
    pub(crate) form: ElementId,
    pub(crate) scope: Option<ElementId>,
    pub(crate) fields: IndexMap<String, FieldRecord>,
    pub(crate) destroyed: bool,
}

impl FormValidate {
    /// Binds to the form under `root`, scans its fields, and registers the
    /// submit listener.
    ///
    /// When [`Settings::form`] is set, the form is resolved by selector
    /// under `root`; a root that matches nothing aborts silently with
    /// `None`. Native browser validation is neutralized by setting
    /// `novalidate` on the form.
    pub fn bind(doc: &mut dyn Document, root: ElementId, mut settings: Settings) -> Option<Self> {
        let form = match settings.form.as_deref() {
            Some(selector) if !selector.is_empty() => doc
                .find_elements(root, &Query::Selector(selector))
                .first()
                .copied()?,
            _ => root,
        };
        doc.set_attribute(form, "novalidate", "novalidate");

        let mut registry = FilterRegistry::new();
        registry.extend(std::mem::take(&mut settings.extend));

        let scope = match settings.filter.as_deref() {
            Some(selector) if !selector.is_empty() => doc
                .find_elements(form, &Query::Selector(selector))
                .first()
                .copied(),
            _ => Some(form),
        };

        let mut bound = Self {
            settings,
            registry,
            form,
            scope,
            fields: IndexMap::new(),
            destroyed: false,
        };
        bound.scan(doc);
        doc.on(form, &[EventType::Submit], present::NAMESPACE);
        debug!(%form, fields = bound.fields.len(), "bound form validator");
        Some(bound)
    }

    /// The record for a field, by (cleansed) name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.get(&cleanse_name(name))
    }

    /// The scanned field names, in document order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Routes a host event into the engine.
    ///
    /// Submit events on the bound form run a full submit attempt and return
    /// its outcome. Interaction events feed the one-shot error-clearing
    /// listeners; Tab and Space key presses are ignored and leave the
    /// listener armed.
    pub fn dispatch(&mut self, doc: &mut dyn Document, event: &Event) -> Option<SubmitOutcome> {
        if self.destroyed {
            return None;
        }
        if event.kind == EventType::Submit && event.target == self.form {
            return Some(self.submit(doc));
        }

        let index = self.field_index_for_target(doc, event.target)?;
        let Some((_, record)) = self.fields.get_index(index) else {
            return None;
        };
        if !record.armed {
            return None;
        }
        let qualifies = if record.kind.is_discrete() {
            matches!(event.kind, EventType::Click | EventType::Change)
        } else {
            match event.kind {
                EventType::Change => true,
                EventType::KeyDown => !matches!(event.key, Some(KEY_TAB) | Some(KEY_SPACE)),
                _ => false,
            }
        };
        if qualifies {
            self.clear_field_error(doc, index);
        }
        None
    }

    /// Excludes the named fields from validation.
    pub fn disable<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_disabled(names, true);
    }

    /// Re-includes the named fields in validation.
    pub fn enable<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_disabled(names, false);
    }

    /// Rebuilds the field records from the live document.
    ///
    /// Prior listeners are detached and prior decoration and error markup
    /// stripped first, so refreshing is idempotent and never stacks
    /// bindings.
    pub fn refresh(&mut self, doc: &mut dyn Document) {
        if self.destroyed {
            return;
        }
        self.teardown(doc);
        self.scan(doc);
        doc.on(self.form, &[EventType::Submit], present::NAMESPACE);
        debug!(form = %self.form, fields = self.fields.len(), "refreshed field records");
    }

    /// Detaches every listener, removes injected error markup, and strips
    /// decoration. The instance is inert afterwards.
    pub fn destroy(&mut self, doc: &mut dyn Document) {
        if self.destroyed {
            return;
        }
        self.teardown(doc);
        self.destroyed = true;
        debug!(form = %self.form, "destroyed form validator");
    }

    fn scan(&mut self, doc: &mut dyn Document) {
        self.fields = match self.scope {
            Some(scope) => field::build_fields(doc, scope, &self.settings, &self.registry),
            None => IndexMap::new(),
        };
    }

    /// Shared teardown for refresh and destroy: listeners off, spans out,
    /// classes and markers stripped.
    fn teardown(&mut self, doc: &mut dyn Document) {
        doc.off(present::NAMESPACE);
        let form = self.form;
        for record in self.fields.values_mut() {
            if let Some(span) = record.error_span.take() {
                doc.remove(span);
            }
            for el in present::decoration_targets(doc, record, form) {
                doc.remove_attribute(el, "data-valid");
                doc.remove_class(el, &self.settings.error_class);
            }
            record.armed = false;
        }
        // sweep stray injected spans and anything else carrying the error
        // class (propagated ancestors)
        for el in doc.find_elements(form, &Query::WithClass(present::MARKER_CLASS)) {
            doc.remove(el);
        }
        for el in doc.find_elements(form, &Query::WithClass(&self.settings.error_class)) {
            doc.remove_class(el, &self.settings.error_class);
        }
        self.fields.clear();
    }

    fn set_disabled<I, S>(&mut self, names: I, disabled: bool)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            if let Some(record) = self.fields.get_mut(&cleanse_name(name.as_ref())) {
                record.disabled = disabled;
            }
        }
    }

    /// The field a fired event belongs to: the control itself, or any group
    /// member (group members share a cleansed name).
    fn field_index_for_target(&self, doc: &dyn Document, target: ElementId) -> Option<usize> {
        if let Some(index) = self.fields.values().position(|r| r.element == target) {
            return Some(index);
        }
        let name = doc.attribute(target, "name")?;
        self.fields.get_index_of(&cleanse_name(&name))
    }

    /// Fires a one-shot clear: strips the field's error state, clears the
    /// ancestor class when no sibling is still invalid, drops the tooltip,
    /// and detaches the listener.
    fn clear_field_error(&mut self, doc: &mut dyn Document, index: usize) {
        let form = self.form;
        let Some((_, record)) = self.fields.get_index_mut(index) else {
            return;
        };

        let targets = present::decoration_targets(doc, record, form);
        for &el in &targets {
            doc.set_attribute(el, "data-valid", "true");
            doc.remove_class(el, &self.settings.error_class);
        }

        if !present::container_still_invalid(doc, record.element) {
            present::clear_ancestor_class(&self.settings, doc, record.element);
        }

        if self.settings.validation_errors && !record.suppress_error_span {
            if let Some(span) = record.error_span.take() {
                doc.remove(span);
            }
        }

        for &el in &targets {
            doc.off_element(el, present::NAMESPACE);
        }
        record.armed = false;
    }
}
