//! Drives a signup form through validation over the in-memory document.

use formvalidate::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Build a signup form the way a host page would lay it out.
    let mut doc = MemoryDocument::new();
    let form = doc.append(doc.root(), ElementSpec::new("form").attr("id", "signup"));
    let email = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "email")
            .attr("name", "email")
            .attr("required", "required"),
    );
    let password = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "password")
            .attr("name", "password")
            .attr("id", "password")
            .attr("required", "required"),
    );
    let confirm = doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "password")
            .attr("name", "confirm")
            .attr("data-filters", "match{#password|password}"),
    );
    doc.append(
        form,
        ElementSpec::new("input")
            .attr("type", "text")
            .attr("name", "age")
            .attr("min", "18"),
    );

    let settings = Settings::new()
        .on_success(|_| println!("✓ form accepted"))
        .on_error(|report| println!("✗ {} error(s)", report.error_count));
    let mut validator = FormValidate::bind(&mut doc, form, settings).expect("form exists");

    // First attempt: everything empty.
    println!("-- submitting an empty form");
    let outcome = validator.submit(&mut doc);
    for violation in &outcome.report.violations {
        println!("   {}: {}", violation.field, violation.message);
    }

    // Fill it in, with a typo in the confirmation.
    doc.set_value(email, "ada@example.com");
    doc.set_value(password, "hunter2!");
    doc.set_value(confirm, "hunter2");

    println!("-- submitting with a mismatched confirmation");
    let outcome = validator.submit(&mut doc);
    for violation in &outcome.report.violations {
        println!("   {}: {}", violation.field, violation.message);
    }

    // Fix the typo and submit again.
    doc.set_value(confirm, "hunter2!");
    println!("-- submitting the corrected form");
    let outcome = validator.submit(&mut doc);
    println!("   valid = {}", outcome.report.valid);

    validator.destroy(&mut doc);
}
