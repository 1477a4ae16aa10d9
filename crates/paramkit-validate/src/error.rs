//! Error taxonomy and the wire-level validation error format.
//!
//! Four distinct failure classes flow out of this crate:
//!
//! - [`SourceReadError`]: the raw input itself could not be parsed
//!   (malformed body, unreadable query string), before any field-level
//!   validation. Client-facing, 400-class.
//! - [`ValidationFailure`]: one or more declared fields failed their
//!   constraints. Client-facing, 400-class, always per-field.
//! - [`BindError`]: validation passed but typed assignment failed. Internal,
//!   500-class, signalling a rule/type mismatch bug rather than bad client
//!   input.
//! - `RuleParseError`: a rule string itself is malformed. Raised at startup,
//!   never per request.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A rule string could not be parsed. Raised when [`crate::RuleSet`]s are
/// built at startup; parsing is pure and never touches request data.
#[derive(Debug, Error)]
pub enum RuleParseError {
    /// The token is not a known constraint keyword.
    #[error("unknown validation rule `{0}`")]
    UnknownRule(String),
    /// The keyword requires a `:param` and none was given.
    #[error("validation rule `{rule}` expects a parameter")]
    MissingParam { rule: String },
    /// The parameter does not parse (e.g. `minLen:abc`).
    #[error("validation rule `{rule}` has a malformed parameter `{param}`")]
    BadParam { rule: String, param: String },
    /// The `regex:` pattern does not compile.
    #[error("invalid regex pattern `{pattern}`: {source}")]
    BadRegex {
        pattern: String,
        source: regex::Error,
    },
}

/// The raw request input could not be read at all, prior to field-level
/// validation.
#[derive(Debug, Error)]
pub enum SourceReadError {
    /// The request body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
    /// The request body parsed but is not a JSON object.
    #[error("request body must be a JSON object, got {found}")]
    BodyShape { found: &'static str },
    /// The query string is not valid urlencoded data.
    #[error("invalid query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),
}

/// One field's validation error, in the wire shape consumed by the transport
/// layer: `{"parameterName": ..., "errorMessage": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// The field that failed.
    pub parameter_name: String,
    /// Human-readable message from the message translator.
    pub error_message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(parameter_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            error_message: error_message.into(),
        }
    }
}

/// Aggregated validation failure across all input sources.
///
/// Validation fails as a unit: the list holds every per-field error, in
/// source order (path, then query, then body), and binding never runs when it
/// is non-empty. Serializes to the standard envelope:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "lastName is required to not be empty.",
///     "fields": [
///       {"parameterName": "lastName", "errorMessage": "lastName is required to not be empty."}
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Per-field errors, at most one per field, in evaluation order.
    pub fields: Vec<FieldError>,
}

impl ValidationFailure {
    /// Create an empty failure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field error.
    pub fn push(&mut self, error: FieldError) {
        self.fields.push(error);
    }

    /// Append pre-computed errors (e.g. path-parameter conversion failures
    /// resolved by the router).
    pub fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        self.fields.extend(errors);
    }

    /// Whether any field failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `Ok(())` when no field failed, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// All messages collapsed into one newline-separated string, for simple
    /// clients.
    pub fn collapsed(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.error_message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collapsed())
    }
}

impl std::error::Error for ValidationFailure {}

#[derive(Serialize, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
    fields: Vec<FieldError>,
}

#[derive(Serialize, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

impl Serialize for ValidationFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorWrapper {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: self.collapsed(),
                fields: self.fields.clone(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidationFailure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wrapper = ErrorWrapper::deserialize(deserializer)?;
        Ok(Self {
            fields: wrapper.error.fields,
        })
    }
}

/// A value passed validation but could not be coerced into its destination
/// type.
///
/// This is an internal condition: it means the rule spec and the destination
/// record disagree, not that the client sent bad input. The full diagnostic
/// context (field, source value, target type) is logged where the error is
/// produced; the `Display` form stays generic and never leaks the raw value.
#[derive(Debug, Error)]
#[error("could not bind data")]
pub struct BindError {
    /// The field that failed to bind.
    pub field: String,
    /// The destination type the value would not coerce into.
    pub target: String,
    /// The underlying conversion error.
    #[source]
    pub source: serde_json::Error,
}

/// Unified error for the validate-then-bind pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Input could not be read; nothing was validated.
    #[error("could not read request input: {0}")]
    SourceRead(#[from] SourceReadError),
    /// One or more fields failed validation; binding was skipped.
    #[error("{0}")]
    Validation(#[from] ValidationFailure),
    /// Validation passed but typed assignment failed.
    #[error(transparent)]
    Bind(#[from] BindError),
}
