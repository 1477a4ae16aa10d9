//! Binding validated input into typed request records.
//!
//! Only invoked after validation reports zero errors. Each declared field
//! present in its source is coerced to the type its rule spec declares and
//! assembled into a JSON object, which is then deserialized into the caller's
//! record via serde. Partial binding never happens: validation already failed
//! the request as a unit if anything was wrong.
//!
//! A conversion failure here should be unreachable when the rules encode the
//! right types; it is classified as an internal [`BindError`], logged with
//! full diagnostics, and surfaced as a generic message.

use crate::error::BindError;
use crate::rules::{RuleSpec, ValueType};
use crate::source::{BodySource, QuerySource, RawValue};
use crate::validate::RequestRules;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Bind the validated query and body values into a typed record.
///
/// Fields without a rule spec are pass-through and never bound. Absent keys
/// and JSON nulls are left out of the object, so the destination type models
/// them as `Option` (or defaults). An explicitly supplied empty value is
/// still a value: `{"description": ""}` binds to `Some("")`, which is how a
/// client clears a text field.
pub fn bind<T: DeserializeOwned>(
    rules: &RequestRules,
    query: &QuerySource,
    body: &BodySource,
) -> Result<T, BindError> {
    let mut object = Map::new();

    for (field, spec) in rules.body.iter() {
        let raw = body.raw(field);
        if !supplied(spec, &raw) {
            continue;
        }
        object.insert(field.to_string(), coerce(field, spec, &raw)?);
    }
    for (field, spec) in rules.query.iter() {
        let raw = query.raw(field);
        if !supplied(spec, &raw) {
            continue;
        }
        object.insert(field.to_string(), coerce(field, spec, &raw)?);
    }

    serde_json::from_value(Value::Object(object)).map_err(|source| {
        let error = BindError {
            field: "<record>".to_string(),
            target: std::any::type_name::<T>().to_string(),
            source,
        };
        tracing::error!(
            target_type = %error.target,
            error = %error.source,
            "bind failure after successful validation; rule spec and record disagree"
        );
        error
    })
}

/// Whether a field carries a value to bind. Absent keys and JSON nulls do
/// not. An empty string is a real value for string fields (a deliberate
/// clear) but carries no payload for int or bool fields, whose validation
/// also skipped it.
fn supplied(spec: &RuleSpec, raw: &RawValue<'_>) -> bool {
    match raw {
        RawValue::Absent => false,
        RawValue::Json(serde_json::Value::Null) => false,
        _ => match spec.value_type() {
            Some(ValueType::String) | None => true,
            Some(ValueType::Int) | Some(ValueType::Bool) => !raw.is_empty(),
            Some(ValueType::NumberSlice) => !matches!(raw, RawValue::Text("")),
        },
    }
}

/// Coerce one raw value to the JSON form of its declared type. Undeclared
/// types bind as strings when textual and verbatim otherwise.
fn coerce(field: &str, spec: &RuleSpec, raw: &RawValue<'_>) -> Result<Value, BindError> {
    let converted = match spec.value_type() {
        Some(ValueType::String) | None => raw
            .text_form()
            .map(|text| Value::String(text.into_owned())),
        Some(ValueType::Int) => raw.as_i64().map(Value::from),
        Some(ValueType::Bool) => raw.as_bool().map(Value::from),
        Some(ValueType::NumberSlice) => raw
            .as_int_list()
            .map(|list| Value::Array(list.into_iter().map(Value::from).collect())),
    };

    converted.ok_or_else(|| {
        let target = spec
            .value_type()
            .map(|t| t.keyword())
            .unwrap_or("string")
            .to_string();
        let error = BindError {
            field: field.to_string(),
            target: target.clone(),
            source: <serde_json::Error as serde::de::Error>::custom(
                "value does not match its declared type",
            ),
        };
        tracing::error!(
            field,
            target_type = %target,
            value = ?raw,
            "bind failure after successful validation; rule spec and record disagree"
        );
        error
    })
}
