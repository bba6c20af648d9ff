//! Filter definitions and the per-instance registry.
//!
//! A filter is a named predicate plus an error template. Built-ins live in a
//! process-wide immutable table ([`builtin`]); custom filters live in a
//! per-registry namespace so concurrent form instances stay independent.
//! The two namespaces coexist: registering a custom filter under a built-in
//! name never shadows the built-in, because descriptors carry the namespace
//! they resolved against.

mod builtin;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::dom::{Document, ElementId};

// ============================================================================
// MATCHERS
// ============================================================================

/// Everything a matcher may inspect: the trimmed field value, the
/// descriptor's argument, and the host document (for cross-field filters
/// like `match` and `radio`).
pub struct MatchInput<'a> {
    /// The trimmed current value of the field under validation.
    pub value: &'a str,
    /// The descriptor argument (`min{5}` → `"5"`).
    pub arg: Option<&'a str>,
    /// Read access to the host document.
    pub doc: &'a dyn Document,
    /// The bound form element, scoping group queries.
    pub scope: ElementId,
}

impl fmt::Debug for MatchInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchInput")
            .field("value", &self.value)
            .field("arg", &self.arg)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// A predicate over a [`MatchInput`].
pub type MatcherFn = Arc<dyn Fn(&MatchInput<'_>) -> bool + Send + Sync>;

/// How a filter decides pass/fail.
#[derive(Clone)]
pub enum Matcher {
    /// A regex evaluated with search semantics against the value.
    Pattern(Regex),
    /// An arbitrary predicate; used by `min`, `max`, `match`, `radio`, and
    /// custom filters.
    Predicate(MatcherFn),
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Predicate(_) => f.write_str("Predicate"),
        }
    }
}

// ============================================================================
// DEFINITIONS
// ============================================================================

/// A named validation predicate plus its error template.
///
/// The template may contain a single `{0}` placeholder, substituted with the
/// descriptor's replacement value (or its argument, when no explicit
/// replacement was given) at render time.
#[derive(Debug, Clone)]
pub struct FilterDefinition {
    name: Cow<'static, str>,
    matcher: Matcher,
    error: Cow<'static, str>,
}

impl FilterDefinition {
    /// A filter backed by a regex, evaluated with search semantics.
    #[must_use]
    pub fn pattern(
        name: impl Into<Cow<'static, str>>,
        pattern: Regex,
        error: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Pattern(pattern),
            error: error.into(),
        }
    }

    /// A filter backed by an arbitrary predicate.
    #[must_use]
    pub fn predicate(
        name: impl Into<Cow<'static, str>>,
        matcher: impl Fn(&MatchInput<'_>) -> bool + Send + Sync + 'static,
        error: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Predicate(Arc::new(matcher)),
            error: error.into(),
        }
    }

    /// The filter's registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw error template, `{0}` placeholder included.
    #[must_use]
    pub fn error_template(&self) -> &str {
        &self.error
    }

    /// Evaluates the matcher.
    #[must_use]
    pub fn matches(&self, input: &MatchInput<'_>) -> bool {
        match &self.matcher {
            Matcher::Pattern(re) => re.is_match(input.value),
            Matcher::Predicate(f) => f(input),
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Which table a filter name resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// The fixed built-in table.
    Builtin,
    /// This registry's custom table.
    Custom,
}

/// Per-instance filter lookup: the shared built-in table plus this
/// instance's custom filters.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    custom: HashMap<String, FilterDefinition>,
}

impl FilterRegistry {
    /// A registry with the built-ins and no custom filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a built-in filter.
    #[must_use]
    pub fn builtin(name: &str) -> Option<&'static FilterDefinition> {
        builtin::get(name)
    }

    /// Adds (or replaces) a custom filter. Built-ins are unaffected: a
    /// custom filter sharing a built-in name is only reachable from
    /// descriptors flagged custom.
    pub fn register(&mut self, definition: FilterDefinition) {
        self.custom
            .insert(definition.name().to_string(), definition);
    }

    /// Merges a batch of custom filters.
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = FilterDefinition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    /// Resolves a filter in exactly one namespace.
    #[must_use]
    pub fn lookup(&self, name: &str, custom: bool) -> Option<&FilterDefinition> {
        if custom {
            self.custom.get(name)
        } else {
            builtin::get(name)
        }
    }

    /// The namespace a token name resolves against, built-ins first.
    #[must_use]
    pub fn namespace_of(&self, name: &str) -> Option<Namespace> {
        if builtin::get(name).is_some() {
            Some(Namespace::Builtin)
        } else if self.custom.contains_key(name) {
            Some(Namespace::Custom)
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryDocument;

    fn probe<'a>(doc: &'a MemoryDocument, value: &'a str, arg: Option<&'a str>) -> MatchInput<'a> {
        MatchInput {
            value,
            arg,
            doc,
            scope: doc.root(),
        }
    }

    #[test]
    fn test_builtin_namespace_wins() {
        let mut registry = FilterRegistry::new();
        registry.register(FilterDefinition::predicate(
            "email",
            |_| true,
            "custom email error",
        ));

        assert_eq!(registry.namespace_of("email"), Some(Namespace::Builtin));
        // both remain reachable through their own namespace
        assert_eq!(
            registry.lookup("email", false).map(FilterDefinition::name),
            Some("email")
        );
        assert_eq!(
            registry
                .lookup("email", true)
                .map(FilterDefinition::error_template),
            Some("custom email error")
        );
    }

    #[test]
    fn test_unknown_name_has_no_namespace() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.namespace_of("fooble"), None);
        assert!(registry.lookup("fooble", false).is_none());
        assert!(registry.lookup("fooble", true).is_none());
    }

    #[test]
    fn test_custom_filter_evaluates() {
        let mut registry = FilterRegistry::new();
        registry.register(FilterDefinition::predicate(
            "even_length",
            |input| input.value.len() % 2 == 0,
            "Length must be even.",
        ));
        let doc = MemoryDocument::new();

        let def = registry.lookup("even_length", true).expect("registered");
        assert!(def.matches(&probe(&doc, "abcd", None)));
        assert!(!def.matches(&probe(&doc, "abc", None)));
    }

    #[test]
    fn test_pattern_uses_search_semantics() {
        let doc = MemoryDocument::new();
        let def = FilterRegistry::builtin("email").expect("builtin");
        // unanchored: a match anywhere in the value passes
        assert!(def.matches(&probe(&doc, "user@example.com", None)));
        assert!(!def.matches(&probe(&doc, "no-at-sign", None)));
    }
}
