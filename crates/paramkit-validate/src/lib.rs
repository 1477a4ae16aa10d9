//! # paramkit-validate
//!
//! Declarative validation and typed binding for heterogeneous request input.
//! Per-field rule strings are parsed once at startup; each request is then
//! validated across its URL path, query string, and JSON body, and only fully
//! valid input is bound into a typed record.
//!
//! ## Example
//!
//! ```rust,ignore
//! use paramkit_validate::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CreateUser {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! let rules = RequestRules::body_only(
//!     RuleSet::new()
//!         .rule("first_name", "string|minLen:2|required")?
//!         .rule("last_name", "string|minLen:2|required")?,
//! );
//!
//! let body = BodySource::from_slice(request_bytes)?;
//! Validator::new().validate(&rules, Vec::new(), &QuerySource::new(), &body)?;
//! let user: CreateUser = bind(&rules, &QuerySource::new(), &body)?;
//! ```
//!
//! ## Error Format
//!
//! A failed validation serializes every field error in request order:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "lastName is required to not be empty.",
//!     "fields": [
//!       {"parameterName": "lastName", "errorMessage": "lastName is required to not be empty."}
//!     ]
//!   }
//! }
//! ```
//!
//! Bind failures are a separate, internal class: validation passed but the
//! typed record disagreed with the rules. They are logged in full and
//! surfaced as a generic message.

mod bind;
mod error;
mod messages;
mod rules;
mod source;
mod validate;

pub use bind::bind;
pub use error::{BindError, Error, FieldError, RuleParseError, SourceReadError, ValidationFailure};
pub use messages::{DefaultMessages, Messages};
pub use rules::{Constraint, ConstraintKind, RuleSet, RuleSpec, ValueType};
pub use source::{BodySource, QuerySource, RawValue, Source};
pub use validate::{RequestRules, Validator};

/// Prelude module for validation.
pub mod prelude {
    pub use crate::bind::bind;
    pub use crate::error::{
        BindError, Error, FieldError, RuleParseError, SourceReadError, ValidationFailure,
    };
    pub use crate::messages::{DefaultMessages, Messages};
    pub use crate::rules::{ConstraintKind, RuleSet, RuleSpec, ValueType};
    pub use crate::source::{BodySource, QuerySource, RawValue, Source};
    pub use crate::validate::{RequestRules, Validator};
}
