//! The `data-filters` token grammar.
//!
//! A token is `name`, `name{arg}`, or `name{arg|replace}`: braces delimit an
//! argument section, and a single pipe inside it separates the matcher
//! argument from the value substituted into the error template. Parsing is
//! lenient at the call site: the builder drops rejected tokens with a debug
//! log instead of failing the scan.

use crate::field::FilterDescriptor;
use crate::filters::{FilterRegistry, Namespace};

/// Bare tokens that override the field's inferred type instead of becoming
/// a regular filter entry.
pub(crate) const TYPE_OVERRIDES: &[&str] = &["zip", "letters", "number"];

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ParseError {
    /// The token was empty (stray comma or blank attribute).
    #[error("empty filter token")]
    Empty,

    /// The name matched neither a built-in nor a registered custom filter.
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),

    /// An opening brace without a closing one.
    #[error("unterminated argument block in `{0}`")]
    Unterminated(String),
}

/// A successfully parsed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedToken {
    /// An ordinary filter descriptor.
    Descriptor(FilterDescriptor),
    /// A type-override token; the builder swaps the field's type filter.
    TypeOverride(String),
}

/// Parses one comma-separated token against the registry.
pub(crate) fn parse_token(raw: &str, registry: &FilterRegistry) -> Result<ParsedToken, ParseError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ParseError::Empty);
    }
    if TYPE_OVERRIDES.contains(&token) {
        return Ok(ParsedToken::TypeOverride(token.to_string()));
    }

    let (name, args, replace) = match token.find('{') {
        None => (token, None, None),
        Some(open) => {
            let name = &token[..open];
            let Some(inner) = token[open + 1..].strip_suffix('}') else {
                return Err(ParseError::Unterminated(token.to_string()));
            };
            // only the first pipe splits; anything after a second is ignored
            let mut parts = inner.split('|');
            let args = parts.next().unwrap_or_default().to_string();
            let replace = parts.next().map(str::to_string);
            (name, Some(args), replace)
        }
    };

    if name.is_empty() {
        return Err(ParseError::Empty);
    }
    let custom = match registry.namespace_of(name) {
        Some(Namespace::Builtin) => false,
        Some(Namespace::Custom) => true,
        None => return Err(ParseError::UnknownFilter(name.to_string())),
    };

    let mut descriptor = FilterDescriptor::bare(name);
    descriptor.args = args;
    descriptor.replace = replace;
    descriptor.custom = custom;
    Ok(ParsedToken::Descriptor(descriptor))
}

// ============================================================================
// TESTS
// ============================================================================
