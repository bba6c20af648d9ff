//! # formvalidate
//!
//! A declarative form-validation engine that binds to a form inside an
//! abstract document, derives per-field rules from attributes and a
//! `data-filters` mini-language, and intercepts submission to evaluate those
//! rules, decorating failing fields inline.
//!
//! The engine never touches a concrete DOM: it talks to the host through the
//! [`dom::Document`] capability trait and refers to elements only by opaque
//! [`dom::ElementId`] handles. The crate ships
//! [`dom::memory::MemoryDocument`], an in-memory implementation used by the
//! tests and examples, so the whole engine runs without a browser.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use formvalidate::prelude::*;
//!
//! let mut doc = MemoryDocument::new();
//! let form = doc.append(doc.root(), ElementSpec::new("form"));
//! doc.append(
//!     form,
//!     ElementSpec::new("input")
//!         .attr("type", "email")
//!         .attr("name", "email")
//!         .attr("required", "required"),
//! );
//!
//! let mut validator = FormValidate::bind(&mut doc, form, Settings::new())
//!     .expect("form exists");
//! let outcome = validator.submit(&mut doc);
//! assert!(!outcome.report.valid); // empty required field
//! ```
//!
//! ## Rule sources
//!
//! Per field, rules come from three places, in order:
//!
//! - the control itself: `select`/radio inference, the declared `type`
//!   (auto-adding a type filter when it names a built-in), `required`,
//!   numeric `min`/`max`;
//! - the `data-filters` attribute: comma-separated tokens of the form
//!   `name`, `name{arg}`, or `name{arg|replace}`;
//! - the registry: built-ins (`required`, `number`, `letters`, `email`,
//!   `radio`, `tel`, `zip`, `url`, `min`, `max`, `match`) plus any custom
//!   filters supplied through [`Settings::extend_with`].
//!
//! Unknown tokens are dropped, never fatal. Empty optional fields are
//! vacuously valid for everything except `required`.

pub mod dom;
pub mod engine;
pub mod field;
pub mod filters;
mod parse;
mod present;
pub mod settings;

mod form;

pub use engine::{SubmitOutcome, ValidationReport, Violation};
pub use field::{FieldRecord, FieldType, FilterDescriptor, cleanse_name};
pub use filters::{FilterDefinition, FilterRegistry, MatchInput, Matcher, Namespace};
pub use form::FormValidate;
pub use settings::Settings;

/// Common imports for driving the validator.
///
/// ```rust,ignore
/// use formvalidate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dom::memory::MemoryDocument;
    pub use crate::dom::{Document, ElementId, ElementSpec, Event, EventType, Query};
    pub use crate::engine::{SubmitOutcome, ValidationReport, Violation};
    pub use crate::field::{FieldType, FilterDescriptor};
    pub use crate::filters::{FilterDefinition, FilterRegistry};
    pub use crate::form::FormValidate;
    pub use crate::settings::Settings;
}
