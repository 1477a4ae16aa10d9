//! # paramkit-sql
//!
//! Dynamic partial-update statement generation for CRUD services. A sparse
//! change set and a per-type descriptor table become a parameterized
//! `UPDATE ... SET ... WHERE id = $n` statement touching only the supplied
//! fields, with every value carried as a positional argument.
//!
//! ## Example
//!
//! ```rust,ignore
//! use paramkit_sql::{AssigneeKind, ExclusivePair, UpdateQuery};
//!
//! const ASSIGNEES: ExclusivePair = ExclusivePair::new("assignee_individual", "assignee_team");
//!
//! let stmt = UpdateQuery::new("tasks", 7)
//!     .exclusive(ASSIGNEES, AssigneeKind::Individual)
//!     .build(&changes)?;
//! // stmt.sql:  UPDATE tasks SET title = $1, assignee_individual = $2, assignee_team = $3 WHERE id = $4
//! // stmt.args: [Text("Task123"), Int(42), Null, Int(7)]
//! ```
//!
//! The crate only generates statements; executing them and handling database
//! errors belongs to the data-access layer.

mod update;
mod value;

pub use update::{
    AssigneeKind, ChangeRecord, ExclusivePair, FieldDescriptor, UpdateError, UpdateQuery,
    UpdateStatement,
};
pub use value::SqlValue;
