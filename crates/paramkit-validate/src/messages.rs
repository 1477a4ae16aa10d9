//! Constraint-failure message lookup.
//!
//! The evaluator only reports *which* constraint failed; turning that into a
//! human-readable string is this module's job, so messages can be swapped or
//! localized without touching constraint logic.

use crate::rules::ConstraintKind;

/// Maps a failed constraint to a message for the client.
///
/// `param` is the constraint's rendered parameter (`"2"` for `minLen:2`,
/// `"Public, Private"` for an `in` list, empty for bare keywords).
pub trait Messages: Send + Sync {
    /// Produce the message for one failed constraint on one field.
    fn message(&self, kind: ConstraintKind, field: &str, param: &str) -> String;
}

/// Built-in English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn message(&self, kind: ConstraintKind, field: &str, param: &str) -> String {
        match kind {
            ConstraintKind::Required => format!("{field} is required to not be empty."),
            ConstraintKind::Type => format!("{field} must be of type {param}."),
            ConstraintKind::MinLen => {
                format!("{field} must be at least {param} characters long.")
            }
            ConstraintKind::MaxLen => {
                format!("{field} must be at most {param} characters long.")
            }
            ConstraintKind::Min => format!("{field} must be at least {param}."),
            ConstraintKind::Max => format!("{field} must be at most {param}."),
            ConstraintKind::In => format!("{field} must be one of: {param}."),
            ConstraintKind::Regex => format!("{field} has an invalid format."),
        }
    }
}
