//! Multi-source request validation.
//!
//! The validator walks every declared field of the query and body rule sets,
//! pulls the raw value from the matching source, and runs the field's
//! constraints in order. Within one field the first failing constraint wins;
//! across fields and sources every error is collected before anything is
//! returned. Path-parameter errors arrive pre-computed from the router, which
//! has already turned conversion failures (a non-numeric id in a numeric
//! segment) into [`FieldError`]s.

use crate::error::{FieldError, ValidationFailure};
use crate::messages::{DefaultMessages, Messages};
use crate::rules::RuleSet;
use crate::source::{BodySource, QuerySource, RawValue, Source};

/// The per-endpoint rule tables, one per source that carries client input.
///
/// Built once per destination record type at startup and shared read-only
/// across requests.
#[derive(Debug, Default)]
pub struct RequestRules {
    /// Rules for query-string parameters.
    pub query: RuleSet,
    /// Rules for JSON body fields.
    pub body: RuleSet,
}

impl RequestRules {
    /// Rules for both sources.
    pub fn new(query: RuleSet, body: RuleSet) -> Self {
        Self { query, body }
    }

    /// Rules for a body-only endpoint (create/update payloads).
    pub fn body_only(body: RuleSet) -> Self {
        Self {
            query: RuleSet::new(),
            body,
        }
    }

    /// Rules for a query-only endpoint (list filters).
    pub fn query_only(query: RuleSet) -> Self {
        Self {
            query,
            body: RuleSet::new(),
        }
    }
}

/// Orchestrates constraint evaluation across all input sources.
///
/// Stateless per call; the message translator is the only configuration.
#[derive(Debug, Clone, Default)]
pub struct Validator<M = DefaultMessages> {
    messages: M,
}

impl Validator<DefaultMessages> {
    /// A validator with the built-in English messages.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: Messages> Validator<M> {
    /// A validator with a custom message translator.
    pub fn with_messages(messages: M) -> Self {
        Self { messages }
    }

    /// Validate one request's input against its declared rules.
    ///
    /// `path_errors` holds errors the router already resolved for path
    /// parameters; they lead the aggregated list, followed by query errors,
    /// then body errors. A non-empty list fails the request as a unit and
    /// binding must be skipped entirely.
    pub fn validate(
        &self,
        rules: &RequestRules,
        path_errors: Vec<FieldError>,
        query: &QuerySource,
        body: &BodySource,
    ) -> Result<(), ValidationFailure> {
        let mut failure = ValidationFailure::new();
        failure.extend(path_errors);

        self.check_source(&rules.query, Source::Query, |field| query.raw(field), &mut failure);
        self.check_source(&rules.body, Source::Body, |field| body.raw(field), &mut failure);

        if !failure.is_empty() {
            tracing::debug!(errors = failure.len(), "request validation failed");
        }
        failure.into_result()
    }

    fn check_source<'a, F>(
        &self,
        rules: &RuleSet,
        source: Source,
        extract: F,
        failure: &mut ValidationFailure,
    ) where
        F: Fn(&str) -> RawValue<'a>,
    {
        for (field, spec) in rules.iter() {
            let raw = extract(field);
            // An unsupplied optional field is never an error.
            if raw.is_absent() && !spec.is_required() {
                continue;
            }
            for constraint in spec.checks() {
                if let Err(kind) = constraint.check(&raw) {
                    tracing::trace!(field, %source, ?kind, "constraint failed");
                    failure.push(FieldError::new(
                        field,
                        self.messages.message(kind, field, &constraint.param()),
                    ));
                    // At most one message per field: first failure wins.
                    break;
                }
            }
        }
    }
}
