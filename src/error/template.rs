use thiserror::Error;

/// Signatures of every placeholder the template engine accepts, listed in
/// unknown-placeholder errors.
pub(crate) const AVAILABLE_PLACEHOLDERS: &str = "$uuid, $randomInt(min,max), $randomFloat, \
$timestamp, $timestampISO, $randomString(length), $randomEmail, $randomName, \
$sequence(start,pad), $cycle(start,count,pad), $randomBool, $randomIP, $randomUA";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unbalanced parentheses in placeholder '{placeholder}'")]
    UnbalancedParentheses { placeholder: String },
    #[error("unknown placeholder '{name}' (available: {})", AVAILABLE_PLACEHOLDERS)]
    UnknownPlaceholder { name: String },
    #[error("{name} does not accept parameters")]
    UnexpectedParameters { name: &'static str },
    #[error("{name}: expected at most {expected} parameters, got {got}")]
    TooManyParameters {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{name}: invalid integer parameter '{value}'")]
    InvalidParameter {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("{name}: min ({min}) must be <= max ({max})")]
    InvalidRange {
        name: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{name}: {field} must be > 0, got {value}")]
    NotPositive {
        name: &'static str,
        field: &'static str,
        value: i64,
    },
    #[error("{name}: pad width must be >= 0, got {value}")]
    NegativePad { name: &'static str, value: i64 },
}
