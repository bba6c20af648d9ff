//! The built-in filter table.
//!
//! Pattern filters use search semantics (a match anywhere passes), so the
//! anchored patterns below anchor themselves explicitly. `min`/`max` compare
//! numerically; an unparseable value or argument fails the filter rather
//! than passing it.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{FilterDefinition, MatchInput};
use crate::dom::Query;

static BUILTINS: LazyLock<HashMap<&'static str, FilterDefinition>> = LazyLock::new(|| {
    let pattern = |name: &'static str, re: &str, error: &'static str| {
        let compiled = Regex::new(re).expect("hardcoded filter pattern is valid");
        (name, FilterDefinition::pattern(name, compiled, error))
    };

    HashMap::from([
        pattern("required", r".+", "This is a required field."),
        pattern("number", r"^\d*[0-9]\d*$", "Only numbers allowed. No Spaces."),
        pattern("letters", r"^[A-Za-z]{1,}$", "Only letters allowed. No Spaces."),
        pattern(
            "email",
            r"[^@]+@[^@]",
            "Please enter a valid email (Ex. user@gmail.com).",
        ),
        pattern(
            "tel",
            r"^\(?(\d{3})\)?[- ]?(\d{3})[- ]?(\d{4})$",
            "Please enter a valid US phone number (Ex. 555-345-3445).",
        ),
        pattern(
            "zip",
            r"^\d{5}$|^\d{5}-\d{4}$",
            "Please enter a valid zip (Ex. 34567 or 34567-3454).",
        ),
        pattern(
            "url",
            r"(?i)^(?:(ftp|http|https)://)?(?:[\w\-]+\.)+[a-z]{2,6}([:/?#].*)?$",
            "Please enter a valid URL.",
        ),
        (
            "radio",
            FilterDefinition::predicate("radio", group_checked, "You must select an option."),
        ),
        (
            "min",
            FilterDefinition::predicate(
                "min",
                |input| compare(input, |value, bound| value >= bound),
                "Must be greater than or equal to {0}.",
            ),
        ),
        (
            "max",
            FilterDefinition::predicate(
                "max",
                |input| compare(input, |value, bound| value <= bound),
                "Must be less than or equal to {0}.",
            ),
        ),
        (
            "match",
            FilterDefinition::predicate(
                "match",
                matches_other_field,
                "This field must match <strong>{0}</strong>.",
            ),
        ),
    ])
});

pub(crate) fn get(name: &str) -> Option<&'static FilterDefinition> {
    BUILTINS.get(name)
}

/// Numeric comparison against the descriptor argument. Fails when either
/// side does not parse as a number.
fn compare(input: &MatchInput<'_>, cmp: fn(f64, f64) -> bool) -> bool {
    let value = input.value.parse::<f64>();
    let bound = input.arg.and_then(|arg| arg.trim().parse::<f64>().ok());
    match (value, bound) {
        (Ok(value), Some(bound)) => cmp(value, bound),
        _ => false,
    }
}

/// At least one input in the named group is checked.
fn group_checked(input: &MatchInput<'_>) -> bool {
    let Some(name) = input.arg else {
        return false;
    };
    input
        .doc
        .find_elements(input.scope, &Query::NamedInputs(name))
        .iter()
        .any(|&el| input.doc.is_checked(el))
}

/// The value equals the trimmed value of the element addressed by the
/// argument selector. A missing target fails.
fn matches_other_field(input: &MatchInput<'_>) -> bool {
    let Some(selector) = input.arg else {
        return false;
    };
    match input.doc.first_match(selector) {
        Some(target) => input.doc.value(target).trim() == input.value,
        None => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
