//! # paramkit
//!
//! The validation-and-binding core of a multi-resource CRUD service: a
//! declarative rule language for heterogeneous request input, a multi-source
//! validator with per-field errors, a typed binder, and a dynamic
//! partial-update SQL builder.
//!
//! An inbound request flows through three stages:
//!
//! 1. **Validate**: every declared field of the URL path, query string, and
//!    JSON body is checked against its rule string; all violations are
//!    aggregated before anything is returned.
//! 2. **Bind**: only on zero errors, the validated values are coerced into a
//!    typed request record.
//! 3. **Build**: for updates, the typed change set and the record id become
//!    a parameterized `UPDATE` touching only the supplied fields.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paramkit::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct UpdateTask {
//!     title: Option<String>,
//!     #[serde(rename = "assigneeIndividual")]
//!     assignee_individual: Option<i64>,
//! }
//!
//! let rules = RequestRules::body_only(
//!     RuleSet::new()
//!         .rule("title", "string|minLen:2|maxLen:120")?
//!         .rule("assigneeIndividual", "int|min:1")?,
//! );
//!
//! let body = BodySource::from_slice(request_bytes)?;
//! Validator::new().validate(&rules, Vec::new(), &QuerySource::new(), &body)?;
//! let changes: UpdateTask = bind(&rules, &QuerySource::new(), &body)?;
//!
//! let stmt = UpdateQuery::new("tasks", task_id)
//!     .exclusive(ASSIGNEES, AssigneeKind::Individual)
//!     .build(&changes)?;
//! ```
//!
//! Routing, authentication, and statement execution stay with the
//! surrounding HTTP and database layers; this crate is a synchronous,
//! allocation-light library they call into.

pub use paramkit_sql::{
    AssigneeKind, ChangeRecord, ExclusivePair, FieldDescriptor, SqlValue, UpdateError,
    UpdateQuery, UpdateStatement,
};
pub use paramkit_validate::{
    bind, BindError, BodySource, Constraint, ConstraintKind, DefaultMessages, Error, FieldError,
    Messages, QuerySource, RawValue, RequestRules, RuleParseError, RuleSet, RuleSpec, Source,
    SourceReadError, ValidationFailure, Validator, ValueType,
};

/// Prelude module bringing the whole pipeline into scope.
pub mod prelude {
    pub use paramkit_sql::{
        AssigneeKind, ChangeRecord, ExclusivePair, FieldDescriptor, SqlValue, UpdateError,
        UpdateQuery, UpdateStatement,
    };
    pub use paramkit_validate::prelude::*;

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::json;
}
