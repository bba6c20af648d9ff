//! Per-instance configuration.
//!
//! Read once at bind time and immutable for the lifetime of the bound
//! instance. The plain-data portion deserializes from host configuration;
//! callbacks and custom filters are set through the builder.

use std::fmt;

use crate::engine::ValidationReport;
use crate::filters::FilterDefinition;

/// Callback invoked after a submit attempt with the final report.
pub type SubmitHook = Box<dyn FnMut(&ValidationReport)>;

/// Caller-supplied extra validation; receives the running error count and
/// forces one additional error by returning `false`.
pub type ValidateHook = Box<dyn FnMut(usize) -> bool>;

/// Configuration for one bound form instance.
///
/// ```rust,ignore
/// let settings = Settings::new()
///     .parent_element(".form-group")
///     .submit_on_success(true)
///     .on_error(|report| eprintln!("{} errors", report.error_count));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Ancestor selector that receives the error class alongside the field.
    pub parent_element: Option<String>,
    /// Render inline error messages (tooltips) next to failing fields.
    pub validation_errors: bool,
    /// Class added to failing controls (and propagated ancestors).
    pub error_class: String,
    /// Class on the injected inline error span.
    pub validation_error_class: String,
    /// Restrict scanning to the subtree matching this selector.
    pub filter: Option<String>,
    /// Resolve the form to bind via this selector instead of the given root.
    pub form: Option<String>,
    /// Let native submission proceed after a fully valid pass.
    pub submit_on_success: bool,

    /// Custom filters merged into the registry at bind time.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) extend: Vec<FilterDefinition>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) on_success: Option<SubmitHook>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) on_error: Option<SubmitHook>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) validate: Option<ValidateHook>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parent_element: None,
            validation_errors: true,
            error_class: "input-validation-error".to_string(),
            validation_error_class: "field-validation-error".to_string(),
            filter: None,
            form: None,
            submit_on_success: false,
            extend: Vec::new(),
            on_success: None,
            on_error: None,
            validate: None,
        }
    }
}

impl Settings {
    /// The default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ancestor selector for error-class propagation.
    #[must_use = "builder methods must be chained or built"]
    pub fn parent_element(mut self, selector: impl Into<String>) -> Self {
        self.parent_element = Some(selector.into());
        self
    }

    /// Toggles inline error messages.
    #[must_use = "builder methods must be chained or built"]
    pub fn validation_errors(mut self, enabled: bool) -> Self {
        self.validation_errors = enabled;
        self
    }

    /// Overrides the failing-control class.
    #[must_use = "builder methods must be chained or built"]
    pub fn error_class(mut self, class: impl Into<String>) -> Self {
        self.error_class = class.into();
        self
    }

    /// Overrides the inline error-span class.
    #[must_use = "builder methods must be chained or built"]
    pub fn validation_error_class(mut self, class: impl Into<String>) -> Self {
        self.validation_error_class = class.into();
        self
    }

    /// Restricts scanning to a subtree.
    #[must_use = "builder methods must be chained or built"]
    pub fn filter(mut self, selector: impl Into<String>) -> Self {
        self.filter = Some(selector.into());
        self
    }

    /// Resolves the form via a selector under the bound root.
    #[must_use = "builder methods must be chained or built"]
    pub fn form(mut self, selector: impl Into<String>) -> Self {
        self.form = Some(selector.into());
        self
    }

    /// Lets native submission proceed after a valid pass.
    #[must_use = "builder methods must be chained or built"]
    pub fn submit_on_success(mut self, enabled: bool) -> Self {
        self.submit_on_success = enabled;
        self
    }

    /// Adds a custom filter to merge into the registry at bind time.
    #[must_use = "builder methods must be chained or built"]
    pub fn extend_with(mut self, definition: FilterDefinition) -> Self {
        self.extend.push(definition);
        self
    }

    /// Called after a submit attempt with zero errors.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_success(mut self, hook: impl FnMut(&ValidationReport) + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Called after a submit attempt with at least one error.
    #[must_use = "builder methods must be chained or built"]
    pub fn on_error(mut self, hook: impl FnMut(&ValidationReport) + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Installs a caller validation hook.
    #[must_use = "builder methods must be chained or built"]
    pub fn validate(mut self, hook: impl FnMut(usize) -> bool + 'static) -> Self {
        self.validate = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("parent_element", &self.parent_element)
            .field("validation_errors", &self.validation_errors)
            .field("error_class", &self.error_class)
            .field("validation_error_class", &self.validation_error_class)
            .field("filter", &self.filter)
            .field("form", &self.form)
            .field("submit_on_success", &self.submit_on_success)
            .field("extend", &self.extend.len())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert!(settings.validation_errors);
        assert!(!settings.submit_on_success);
        assert_eq!(settings.error_class, "input-validation-error");
        assert_eq!(settings.validation_error_class, "field-validation-error");
        assert!(settings.parent_element.is_none());
        assert!(settings.form.is_none());
        assert!(settings.filter.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let settings = Settings::new()
            .parent_element(".form-group")
            .validation_errors(false)
            .error_class("bad")
            .submit_on_success(true)
            .validate(|count| count == 0);
        assert_eq!(settings.parent_element.as_deref(), Some(".form-group"));
        assert!(!settings.validation_errors);
        assert_eq!(settings.error_class, "bad");
        assert!(settings.submit_on_success);
        assert!(settings.validate.is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_deserialization() {
        let settings: Settings =
            serde_json::from_str(r#"{ "parent_element": ".row", "submit_on_success": true }"#)
                .expect("valid settings json");
        assert_eq!(settings.parent_element.as_deref(), Some(".row"));
        assert!(settings.submit_on_success);
        // untouched fields keep their defaults
        assert!(settings.validation_errors);
        assert_eq!(settings.error_class, "input-validation-error");
    }
}
