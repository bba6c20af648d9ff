//! The engine's per-field model.
//!
//! A scan walks the candidate controls of the bound form, infers each
//! field's type and constraints, parses its `data-filters` attribute, and
//! produces one [`FieldRecord`] per distinct cleansed name. Records keep
//! insertion order (= document order): validation iterates them exactly as
//! they were scanned.

use indexmap::IndexMap;
use tracing::debug;

use crate::dom::{ControlQuery, Document, ElementId, Query};
use crate::filters::FilterRegistry;
use crate::parse::{self, ParsedToken};
use crate::present;
use crate::settings::Settings;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// A parsed, per-field instantiation of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    /// The filter name to resolve.
    pub key: String,
    /// Argument passed to the matcher (a bound, a selector, a group name).
    pub args: Option<String>,
    /// Value substituted into the error template's `{0}` placeholder.
    pub replace: Option<String>,
    /// Resolve against the custom namespace instead of the built-ins.
    pub custom: bool,
    /// This descriptor enforces the field's type; a type-override token
    /// replaces it rather than stacking a second type constraint.
    pub type_filter: bool,
}

impl FilterDescriptor {
    /// A descriptor with only a filter name.
    #[must_use]
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            args: None,
            replace: None,
            custom: false,
            type_filter: false,
        }
    }

    /// A descriptor with a matcher argument.
    #[must_use]
    pub fn with_args(key: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            args: Some(args.into()),
            ..Self::bare(key)
        }
    }

    fn for_type(key: impl Into<String>) -> Self {
        Self {
            type_filter: true,
            ..Self::bare(key)
        }
    }
}

// ============================================================================
// FIELD RECORDS
// ============================================================================

/// The inferred kind of a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A plain text control (also the fallback when no type is declared).
    Text,
    /// A `select` element.
    Select,
    /// A checkbox input.
    Checkbox,
    /// A radio input; the record stands for the whole named group.
    Radio,
    /// Any other declared or overridden type (`email`, `tel`, `zip`, ...).
    Typed(String),
}

impl FieldType {
    /// Discrete controls take pointer interaction listeners; everything
    /// else listens for keystrokes.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Select | Self::Checkbox | Self::Radio)
    }
}

/// The engine's model of one logical form field.
#[derive(Debug, Clone)]
pub struct FieldRecord {
    /// Handle to the control (the last scanned input for radio groups).
    pub element: ElementId,
    /// The inferred control kind.
    pub kind: FieldType,
    /// The shared `name` for radio groups.
    pub group: Option<String>,
    /// Skipped by validation while set.
    pub disabled: bool,
    /// Ordered filter descriptors; auto-added constraints come first.
    pub filters: Vec<FilterDescriptor>,
    /// The inline error span, once inserted.
    pub error_span: Option<ElementId>,
    /// The field opted out of inline error spans.
    pub suppress_error_span: bool,
    /// A one-shot clear-on-interaction listener is armed.
    pub armed: bool,
}

/// Strips array-bracket syntax from a field name (`tags[]` → `tags`).
#[must_use]
pub fn cleanse_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

// ============================================================================
// SCAN
// ============================================================================

/// Builds the field-record map for every candidate control under `scope`.
pub(crate) fn build_fields(
    doc: &mut dyn Document,
    scope: ElementId,
    settings: &Settings,
    registry: &FilterRegistry,
) -> IndexMap<String, FieldRecord> {
    let mut fields = IndexMap::new();

    for el in doc.find_elements(scope, &Query::FormControls) {
        let Some(name) = doc.attribute(el, "name") else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let key = cleanse_name(&name);
        let mut record = scan_control(doc, el, &name, registry);

        if settings.validation_errors && !record.suppress_error_span {
            // a control replacing an earlier record with the same cleansed
            // name (a radio group member) adopts its span instead of
            // inserting a second one
            let existing = fields
                .get_mut(&key)
                .and_then(|prev: &mut FieldRecord| prev.error_span.take());
            record.error_span = match existing {
                Some(span) => Some(span),
                None => Some(present::insert_error_span(settings, doc, el)),
            };
        }

        debug!(field = %key, kind = ?record.kind, filters = record.filters.len(), "scanned field");
        // later controls with the same cleansed name replace the record but
        // keep its scan position, collapsing radio groups to one field
        fields.insert(key, record);
    }

    fields
}

fn scan_control(
    doc: &mut dyn Document,
    el: ElementId,
    name: &str,
    registry: &FilterRegistry,
) -> FieldRecord {
    let mut record = FieldRecord {
        element: el,
        kind: FieldType::Text,
        group: None,
        disabled: false,
        filters: Vec::new(),
        error_span: None,
        suppress_error_span: doc.attribute(el, "data-validate-noerror").is_some(),
        armed: false,
    };

    // type inference, in precedence order
    if doc.matches(el, ControlQuery::Select) {
        record.kind = FieldType::Select;
    } else if doc.matches(el, ControlQuery::Radio) {
        record.kind = FieldType::Radio;
        record.group = Some(name.to_string());
        record
            .filters
            .push(FilterDescriptor::with_args("radio", name));
    } else if let Some(declared) = doc
        .attribute(el, "data-validate-type")
        .or_else(|| doc.attribute(el, "type"))
    {
        record.kind = match declared.as_str() {
            "text" => FieldType::Text,
            "checkbox" => FieldType::Checkbox,
            _ => FieldType::Typed(declared.clone()),
        };
        if FilterRegistry::builtin(&declared).is_some() {
            record.filters.push(FilterDescriptor::for_type(declared));
        }
    }

    if doc.attribute(el, "required").is_some() {
        record.filters.push(FilterDescriptor::bare("required"));
    }
    for bound in ["max", "min"] {
        if let Some(raw) = doc.attribute(el, bound) {
            if raw.trim().parse::<f64>().is_ok() {
                let raw = raw.trim().to_string();
                record.filters.push(FilterDescriptor {
                    replace: Some(raw.clone()),
                    ..FilterDescriptor::with_args(bound, raw)
                });
            } else {
                debug!(field = %name, attr = bound, value = %raw, "skipping non-numeric bound");
            }
        }
    }

    if let Some(spec) = doc.attribute(el, "data-filters") {
        for token in spec.split(',') {
            match parse::parse_token(token, registry) {
                Ok(ParsedToken::Descriptor(descriptor)) => record.filters.push(descriptor),
                Ok(ParsedToken::TypeOverride(ty)) => {
                    record.filters.retain(|d| !d.type_filter);
                    record.kind = FieldType::Typed(ty.clone());
                    record.filters.push(FilterDescriptor::for_type(ty));
                }
                Err(reason) => debug!(token = %token.trim(), %reason, "dropping filter token"),
            }
        }
    }

    record
}

// ============================================================================
// TESTS
// ============================================================================
