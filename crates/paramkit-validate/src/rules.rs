//! Rule-string parsing and constraint evaluation.
//!
//! A rule string is a pipe-delimited list of tokens attached to one field,
//! e.g. `"string|minLen:2|required"`. Tokens are either bare keywords
//! (`required`, `string`, `int`, `bool`, `slice_of_numbers`) or
//! `keyword:param` pairs (`minLen:2`, `in:Public,Private`, `regex:^\d+$`).
//!
//! Rule strings are parsed once at startup into immutable [`RuleSpec`]s.
//! Token order is preserved for evaluation, except that the type token is
//! hoisted to the front: later constraints assume the value already has the
//! declared shape.

use crate::error::RuleParseError;
use crate::source::RawValue;
use regex::Regex;

/// Shape a raw value must have before the remaining constraints apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Any textual value.
    String,
    /// A 64-bit signed integer.
    Int,
    /// A boolean (`true`/`false`).
    Bool,
    /// A list of integers (JSON array of numbers, or `"1,2,3"` in a query).
    NumberSlice,
}

impl ValueType {
    /// The rule-string keyword for this type.
    pub fn keyword(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::NumberSlice => "slice_of_numbers",
        }
    }
}

/// Tag identifying which constraint failed. Used for message lookup so the
/// evaluator never formats messages itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Type,
    MinLen,
    MaxLen,
    Min,
    Max,
    Required,
    Regex,
    In,
}

/// One parsed constraint from a rule string.
#[derive(Debug)]
pub enum Constraint {
    Type(ValueType),
    MinLen(usize),
    MaxLen(usize),
    Min(i64),
    Max(i64),
    Required,
    Regex(Regex),
    In(Vec<String>),
}

impl Constraint {
    /// The kind tag for this constraint.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Type(_) => ConstraintKind::Type,
            Constraint::MinLen(_) => ConstraintKind::MinLen,
            Constraint::MaxLen(_) => ConstraintKind::MaxLen,
            Constraint::Min(_) => ConstraintKind::Min,
            Constraint::Max(_) => ConstraintKind::Max,
            Constraint::Required => ConstraintKind::Required,
            Constraint::Regex(_) => ConstraintKind::Regex,
            Constraint::In(_) => ConstraintKind::In,
        }
    }

    /// The parameter rendered for message interpolation (empty for bare
    /// keywords).
    pub fn param(&self) -> String {
        match self {
            Constraint::Type(t) => t.keyword().to_string(),
            Constraint::MinLen(n) | Constraint::MaxLen(n) => n.to_string(),
            Constraint::Min(n) | Constraint::Max(n) => n.to_string(),
            Constraint::Required => String::new(),
            Constraint::Regex(re) => re.as_str().to_string(),
            Constraint::In(set) => set.join(", "),
        }
    }

    /// Evaluate this constraint against one raw value.
    ///
    /// Emptiness is owned by `required`: for an absent or empty value every
    /// other constraint skips rather than fails, so an unsupplied optional
    /// field is never an error and an empty required field reports `required`
    /// instead of whatever length or pattern rule happens to come first.
    ///
    /// A numeric constraint on a value that does not parse as a number is a
    /// `type` violation, never a silent pass.
    pub fn check(&self, raw: &RawValue<'_>) -> Result<(), ConstraintKind> {
        if raw.is_empty() {
            return match self {
                Constraint::Required => Err(ConstraintKind::Required),
                _ => Ok(()),
            };
        }

        match self {
            Constraint::Required => Ok(()),
            Constraint::Type(ty) => {
                if raw.conforms(*ty) {
                    Ok(())
                } else {
                    Err(ConstraintKind::Type)
                }
            }
            Constraint::MinLen(min) => {
                let text = raw.text_form().ok_or(ConstraintKind::Type)?;
                if text.chars().count() >= *min {
                    Ok(())
                } else {
                    Err(ConstraintKind::MinLen)
                }
            }
            Constraint::MaxLen(max) => {
                let text = raw.text_form().ok_or(ConstraintKind::Type)?;
                if text.chars().count() <= *max {
                    Ok(())
                } else {
                    Err(ConstraintKind::MaxLen)
                }
            }
            Constraint::Min(min) => match raw.as_i64() {
                Some(v) if v >= *min => Ok(()),
                Some(_) => Err(ConstraintKind::Min),
                None => Err(ConstraintKind::Type),
            },
            Constraint::Max(max) => match raw.as_i64() {
                Some(v) if v <= *max => Ok(()),
                Some(_) => Err(ConstraintKind::Max),
                None => Err(ConstraintKind::Type),
            },
            Constraint::Regex(re) => {
                let text = raw.text_form().ok_or(ConstraintKind::Type)?;
                if re.is_match(&text) {
                    Ok(())
                } else {
                    Err(ConstraintKind::Regex)
                }
            }
            Constraint::In(allowed) => {
                let text = raw.text_form().ok_or(ConstraintKind::Type)?;
                // Exact, case-sensitive membership.
                if allowed.iter().any(|a| a == text.as_ref()) {
                    Ok(())
                } else {
                    Err(ConstraintKind::In)
                }
            }
        }
    }
}

/// Parsed, ordered list of constraints bound to one field.
#[derive(Debug)]
pub struct RuleSpec {
    checks: Vec<Constraint>,
}

impl RuleSpec {
    /// Parse one rule string into a spec.
    ///
    /// Parsing is pure: it never touches request data. The regex of a
    /// `regex:` token is compiled here, once, not per request.
    pub fn parse(rule: &str) -> Result<Self, RuleParseError> {
        let mut checks = Vec::new();
        for token in rule.split('|') {
            checks.push(parse_token(token.trim())?);
        }
        // Hoist the type check to the front; everything else keeps its
        // rule-string order (stable sort).
        checks.sort_by_key(|c| !matches!(c, Constraint::Type(_)));
        Ok(Self { checks })
    }

    /// The declared value type, if any.
    pub fn value_type(&self) -> Option<ValueType> {
        self.checks.iter().find_map(|c| match c {
            Constraint::Type(t) => Some(*t),
            _ => None,
        })
    }

    /// Whether the field carries a `required` constraint.
    pub fn is_required(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c, Constraint::Required))
    }

    /// The constraints in evaluation order.
    pub fn checks(&self) -> &[Constraint] {
        &self.checks
    }
}

fn parse_token(token: &str) -> Result<Constraint, RuleParseError> {
    match token.split_once(':') {
        None => match token {
            "required" => Ok(Constraint::Required),
            "string" => Ok(Constraint::Type(ValueType::String)),
            "int" => Ok(Constraint::Type(ValueType::Int)),
            "bool" => Ok(Constraint::Type(ValueType::Bool)),
            "slice_of_numbers" => Ok(Constraint::Type(ValueType::NumberSlice)),
            "minLen" | "maxLen" | "min" | "max" | "in" | "regex" => {
                Err(RuleParseError::MissingParam {
                    rule: token.to_string(),
                })
            }
            other => Err(RuleParseError::UnknownRule(other.to_string())),
        },
        Some((keyword, param)) => match keyword {
            "minLen" => Ok(Constraint::MinLen(parse_param(keyword, param)?)),
            "maxLen" => Ok(Constraint::MaxLen(parse_param(keyword, param)?)),
            "min" => Ok(Constraint::Min(parse_param(keyword, param)?)),
            "max" => Ok(Constraint::Max(parse_param(keyword, param)?)),
            "in" => Ok(Constraint::In(
                param.split(',').map(str::to_string).collect(),
            )),
            "regex" => {
                let re = Regex::new(param).map_err(|source| RuleParseError::BadRegex {
                    pattern: param.to_string(),
                    source,
                })?;
                Ok(Constraint::Regex(re))
            }
            other => Err(RuleParseError::UnknownRule(other.to_string())),
        },
    }
}

fn parse_param<T: std::str::FromStr>(keyword: &str, param: &str) -> Result<T, RuleParseError> {
    param.parse().map_err(|_| RuleParseError::BadParam {
        rule: keyword.to_string(),
        param: param.to_string(),
    })
}

/// Ordered field → [`RuleSpec`] table for one input source.
///
/// Built once per destination record type at startup and read-only after
/// that; iteration follows declaration order so aggregated errors and bound
/// fields stay deterministic.
#[derive(Debug, Default)]
pub struct RuleSet {
    fields: Vec<(String, RuleSpec)>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `(field, rule string)` table.
    pub fn parse(rules: &[(&str, &str)]) -> Result<Self, RuleParseError> {
        let mut set = Self::new();
        for (field, rule) in rules {
            set = set.rule(field, rule)?;
        }
        Ok(set)
    }

    /// Add one field's rule string (builder style).
    pub fn rule(mut self, field: &str, rule: &str) -> Result<Self, RuleParseError> {
        let spec = RuleSpec::parse(rule)?;
        self.fields.push((field.to_string(), spec));
        Ok(self)
    }

    /// Look up the spec for a field. Fields without a spec are pass-through:
    /// never validated, never bound.
    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, s)| s)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(f, s)| (f.as_str(), s))
    }

    /// Whether the set declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
