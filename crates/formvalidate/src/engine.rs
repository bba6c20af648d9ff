//! The validation pass.
//!
//! Fields are evaluated in record order (= document order). Per field:
//! `required` is found by a descriptor scan and evaluated first and
//! independently; every other filter is skipped when the trimmed value is
//! empty (empty optional fields are vacuously valid); each failure
//! increments the aggregate count. The pass is a pure recomputation: the
//! same document state always yields the same report.

use tracing::debug;

use crate::dom::{Document, Query};
use crate::field::FilterDescriptor;
use crate::filters::MatchInput;
use crate::form::FormValidate;
use crate::present;

// ============================================================================
// REPORTS
// ============================================================================

/// One failing filter on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Violation {
    /// The cleansed field name.
    pub field: String,
    /// The filter that failed.
    pub filter: String,
    /// The rendered error message, `{0}` substituted.
    pub message: String,
}

/// The verdict of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationReport {
    /// No filter failed and the caller hook (if any) agreed.
    pub valid: bool,
    /// Total failing filters across all fields.
    pub error_count: usize,
    /// Every failure, in field order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// A report with no errors.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            valid: true,
            error_count: 0,
            violations: Vec::new(),
        }
    }
}

/// What a submit attempt decided.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// The validation report.
    pub report: ValidationReport,
    /// Whether the host may let native submission proceed.
    pub proceed: bool,
}

/// Renders an error template, substituting `{0}` with the descriptor's
/// replacement (or, failing that, its argument).
fn render_message(template: &str, descriptor: &FilterDescriptor) -> String {
    match descriptor
        .replace
        .as_deref()
        .or(descriptor.args.as_deref())
    {
        Some(substitution) => template.replace("{0}", substitution),
        None => template.to_string(),
    }
}

// ============================================================================
// VALIDATION PASS
// ============================================================================

impl FormValidate {
    /// Runs a full submit attempt: validates every field, fires the
    /// configured callbacks, focuses the first failing control, and reports
    /// whether native submission may proceed.
    ///
    /// The host is expected to have neutralized native submission before
    /// calling this; `proceed` asks it to re-trigger submission when
    /// `submit_on_success` is configured and the pass was clean.
    pub fn submit(&mut self, doc: &mut dyn Document) -> SubmitOutcome {
        if self.destroyed {
            return SubmitOutcome {
                report: ValidationReport::empty(),
                proceed: true,
            };
        }

        let mut report = self.validate_all(doc);
        if let Some(validate) = self.settings.validate.as_mut() {
            if !validate(report.error_count) {
                report.error_count += 1;
                report.valid = false;
            }
        }
        debug!(error_count = report.error_count, "submit validated");

        if report.valid {
            if let Some(hook) = self.settings.on_success.as_mut() {
                hook(&report);
            }
        } else {
            if let Some(hook) = self.settings.on_error.as_mut() {
                hook(&report);
            }
            let flagged =
                doc.find_elements(self.form, &Query::WithClass(&self.settings.error_class));
            if let Some(&first) = flagged.first() {
                doc.focus(first);
            }
        }

        let proceed = report.valid && self.settings.submit_on_success;
        SubmitOutcome { report, proceed }
    }

    /// Validates every enabled field and applies error decoration, without
    /// callbacks or focus handling.
    pub fn validate_all(&mut self, doc: &mut dyn Document) -> ValidationReport {
        let form = self.form;
        let mut violations = Vec::new();

        for i in 0..self.fields.len() {
            let Some((key, record)) = self.fields.get_index(i) else {
                continue;
            };
            let key = key.clone();
            let element = record.element;
            let descriptors = record.filters.clone();
            if record.disabled || doc.is_disabled(element) {
                continue;
            }

            let raw = doc.value(element);
            let value = raw.trim();
            let mut field_violations = Vec::new();

            // `required` first, found by scan rather than position
            if let Some(descriptor) = descriptors.iter().find(|d| d.key == "required") {
                if let Some(definition) = self.registry.lookup(&descriptor.key, descriptor.custom)
                {
                    let input = MatchInput {
                        value,
                        arg: descriptor.args.as_deref(),
                        doc: &*doc,
                        scope: form,
                    };
                    if !definition.matches(&input) {
                        field_violations.push(Violation {
                            field: key.clone(),
                            filter: descriptor.key.clone(),
                            message: render_message(definition.error_template(), descriptor),
                        });
                    }
                }
            }

            // remaining filters are vacuous on an empty value
            if !value.is_empty() {
                for descriptor in descriptors.iter().filter(|d| d.key != "required") {
                    let Some(definition) =
                        self.registry.lookup(&descriptor.key, descriptor.custom)
                    else {
                        continue;
                    };
                    let input = MatchInput {
                        value,
                        arg: descriptor.args.as_deref(),
                        doc: &*doc,
                        scope: form,
                    };
                    if !definition.matches(&input) {
                        field_violations.push(Violation {
                            field: key.clone(),
                            filter: descriptor.key.clone(),
                            message: render_message(definition.error_template(), descriptor),
                        });
                    }
                }
            }

            let Some((_, record)) = self.fields.get_index_mut(i) else {
                continue;
            };
            if field_violations.is_empty() {
                present::mark_field_valid(&self.settings, doc, record, form);
            } else {
                for violation in &field_violations {
                    present::render_tooltip(&self.settings, doc, record, &violation.message);
                }
                present::mark_field_invalid(&self.settings, doc, record, form);
            }
            violations.extend(field_violations);
        }

        let error_count = violations.len();
        ValidationReport {
            valid: error_count == 0,
            error_count,
            violations,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message_with_replace() {
        let mut descriptor = FilterDescriptor::with_args("max", "10");
        descriptor.replace = Some("10".to_string());
        assert_eq!(
            render_message("Must be less than or equal to {0}.", &descriptor),
            "Must be less than or equal to 10."
        );
    }

    #[test]
    fn test_render_message_falls_back_to_args() {
        let descriptor = FilterDescriptor::with_args("match", "#password");
        assert_eq!(
            render_message("This field must match <strong>{0}</strong>.", &descriptor),
            "This field must match <strong>#password</strong>."
        );
    }

    #[test]
    fn test_render_message_without_placeholder_or_values() {
        let descriptor = FilterDescriptor::bare("required");
        assert_eq!(
            render_message("This is a required field.", &descriptor),
            "This is a required field."
        );
    }
}
