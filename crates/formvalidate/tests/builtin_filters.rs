//! Built-in filter behavior, driven end-to-end through scan + validation.

use rstest::rstest;

use formvalidate::prelude::*;

/// Binds a one-field form with the given `type` attribute and value, and
/// reports whether validation passes.
fn validates(input_type: &str, value: &str) -> bool {
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form"));
    let field = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", input_type)
            .attr("name", "field"),
    );
    doc.set_value(field, value);

    let mut validator = FormValidate::bind(&mut doc, form, Settings::new()).expect("bound");
    validator.validate_all(&mut doc).valid
}

#[rstest]
#[case::simple("user@gmail.com", true)]
#[case::short("a@b", true)]
#[case::missing_at("plainaddress", false)]
#[case::missing_local("@example.com", false)]
fn email_type_filter(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(validates("email", value), valid);
}

#[rstest]
#[case::parenthesized("(714)3455967", true)]
#[case::plain("7152349456", true)]
#[case::dashed("712-345-3456", true)]
#[case::spaced("712 345 3456", true)]
#[case::too_short("345-3456", false)]
#[case::letters("71a-345-3456", false)]
fn tel_type_filter(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(validates("tel", value), valid);
}

#[rstest]
#[case::five("34567", true)]
#[case::nine("34567-3454", true)]
#[case::four("3456", false)]
#[case::bad_extension("34567-34", false)]
fn zip_type_filter(#[case] value: &str, #[case] valid: bool) {
    // `zip` is not an HTML input type, so it arrives via the override token
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form"));
    let field = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("name", "field")
            .attr("data-filters", "zip"),
    );
    doc.set_value(field, value);

    let mut validator = FormValidate::bind(&mut doc, form, Settings::new()).expect("bound");
    assert_eq!(validator.validate_all(&mut doc).valid, valid);
}

#[rstest]
#[case::bare_host("example.com", true)]
#[case::http("http://example.com", true)]
#[case::https_path("https://example.com/a/b?q=1", true)]
#[case::ftp("ftp://files.example.org", true)]
#[case::spaces("not a url", false)]
#[case::scheme_only("http://", false)]
fn url_type_filter(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(validates("url", value), valid);
}

#[rstest]
#[case::zero("0", true)]
#[case::plain("42", true)]
#[case::leading_zeros("007", true)]
#[case::spaced("4 2", false)]
#[case::mixed("12a", false)]
#[case::negative("-3", false)]
fn number_type_filter(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(validates("number", value), valid);
}

#[rstest]
#[case::exact_bound("10", true)]
#[case::above("11", true)]
#[case::below("9", false)]
#[case::not_numeric("abc", false)]
fn min_bound_from_attribute(#[case] value: &str, #[case] valid: bool) {
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form"));
    let field = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("name", "qty")
            .attr("min", "10"),
    );
    doc.set_value(field, value);

    let mut validator = FormValidate::bind(&mut doc, form, Settings::new()).expect("bound");
    let report = validator.validate_all(&mut doc);
    assert_eq!(report.valid, valid);
    if !valid {
        assert_eq!(
            report.violations[0].message,
            "Must be greater than or equal to 10."
        );
    }
}

#[test]
fn values_are_trimmed_before_matching() {
    assert!(validates("email", "  user@gmail.com  "));
}

#[test]
fn required_applies_to_whitespace_only_values() {
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form"));
    let field = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("name", "field")
            .attr("required", "required"),
    );
    doc.set_value(field, "   ");

    let mut validator = FormValidate::bind(&mut doc, form, Settings::new()).expect("bound");
    let report = validator.validate_all(&mut doc);
    assert!(!report.valid);
    assert_eq!(report.violations[0].message, "This is a required field.");
}

#[test]
fn required_failure_does_not_suppress_other_filters() {
    // a required field whose value is empty fails only `required`; a
    // required field with a bad value fails the value filters too
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form"));
    let field = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "email")
            .attr("name", "email")
            .attr("required", "required"),
    );

    let mut validator = FormValidate::bind(&mut doc, form, Settings::new()).expect("bound");
    let report = validator.validate_all(&mut doc);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.violations[0].filter, "required");

    doc.set_value(field, "not-an-email");
    let report = validator.validate_all(&mut doc);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.violations[0].filter, "email");
}
