//! Dynamic partial-update statement generation.
//!
//! Given a sparse change set for a stored record, the builder synthesizes a
//! parameterized `UPDATE <table> SET col = $n[, ...] WHERE id = $k` statement
//! updating only the fields the client actually supplied. Column names come
//! from a compile-time-registered descriptor table per record type; values
//! travel exclusively as positional arguments.

use crate::value::SqlValue;
use thiserror::Error;

/// Static mapping of one logical field to its storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Logical field name, as used by [`ChangeRecord::get`].
    pub name: &'static str,
    /// Column name in the destination table.
    pub column: &'static str,
}

impl FieldDescriptor {
    /// Create a descriptor.
    pub const fn new(name: &'static str, column: &'static str) -> Self {
        Self { name, column }
    }
}

/// A record type whose changed fields can be turned into an UPDATE.
///
/// The descriptor table is established once per type and never mutated;
/// iteration order is declaration order, which fixes the SET clause order and
/// makes generated statements deterministic.
///
/// Presence is explicit: a field the client did not supply returns `None`
/// from [`ChangeRecord::get`], so clearing a text field to `""` or a counter
/// to `0` is representable (`Some` of the zero value) and distinct from "not
/// supplied".
pub trait ChangeRecord {
    /// Descriptors in declaration order. Must include the `id` field, which
    /// the builder skips unconditionally.
    fn descriptors() -> &'static [FieldDescriptor];

    /// The supplied value for `field`, or `None` when the client did not send
    /// it.
    fn get(&self, field: &str) -> Option<SqlValue>;
}

/// A pair of columns of which at most one may be non-null: a task is assigned
/// to an individual or to a team, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusivePair {
    /// Column holding the individual assignee.
    pub individual: &'static str,
    /// Column holding the team assignee.
    pub team: &'static str,
}

impl ExclusivePair {
    /// Create a pair.
    pub const fn new(individual: &'static str, team: &'static str) -> Self {
        Self { individual, team }
    }
}

/// Which side of an [`ExclusivePair`] an update is assigning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeKind {
    /// The individual column is being set; the team column is nulled.
    Individual,
    /// The team column is being set; the individual column is nulled.
    Team,
}

/// Statement generation failed before any SQL was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The change set supplied no fields; an UPDATE with an empty SET clause
    /// must never reach the data store.
    #[error("no fields to update")]
    EmptyChangeSet,
}

/// A generated statement and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    /// `UPDATE <table> SET c1 = $1[, ...] WHERE id = $k`.
    pub sql: String,
    /// Arguments in placeholder order; `args.len()` equals the highest
    /// placeholder index.
    pub args: Vec<SqlValue>,
}

/// Builder for one partial-update statement.
#[derive(Debug, Clone, Copy)]
pub struct UpdateQuery<'a> {
    table: &'a str,
    id: i64,
    exclusion: Option<(ExclusivePair, AssigneeKind)>,
}

impl<'a> UpdateQuery<'a> {
    /// Target a table row by id.
    pub fn new(table: &'a str, id: i64) -> Self {
        Self {
            table,
            id,
            exclusion: None,
        }
    }

    /// Declare which side of a mutually exclusive column pair this update
    /// assigns. When the targeted column is set, the opposite column is
    /// nulled in the same statement, regardless of whether the change set
    /// carried a value for it.
    pub fn exclusive(mut self, pair: ExclusivePair, setting: AssigneeKind) -> Self {
        self.exclusion = Some((pair, setting));
        self
    }

    /// Build the statement for one change set.
    ///
    /// Deterministic: the same change set, id, and exclusion directive yield
    /// byte-identical SQL and argument order.
    pub fn build<R: ChangeRecord>(&self, changes: &R) -> Result<UpdateStatement, UpdateError> {
        let mut set = Vec::new();
        let mut args = Vec::new();

        for descriptor in R::descriptors() {
            if descriptor.name == "id" {
                continue;
            }
            if let Some((pair, setting)) = self.exclusion {
                // The directive owns the opposite column; a stray value in
                // the change set must not override the null it will receive.
                if descriptor.column == opposite(pair, setting) {
                    continue;
                }
            }
            let Some(value) = changes.get(descriptor.name) else {
                continue;
            };
            args.push(value);
            set.push(format!("{} = ${}", descriptor.column, args.len()));

            if let Some((pair, setting)) = self.exclusion {
                if descriptor.column == targeted(pair, setting) {
                    args.push(SqlValue::Null);
                    set.push(format!("{} = ${}", opposite(pair, setting), args.len()));
                }
            }
        }

        if set.is_empty() {
            return Err(UpdateError::EmptyChangeSet);
        }

        args.push(SqlValue::Int(self.id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ${}",
            self.table,
            set.join(", "),
            args.len()
        );
        tracing::debug!(%sql, args = args.len(), "built update statement");
        Ok(UpdateStatement { sql, args })
    }
}

fn targeted(pair: ExclusivePair, setting: AssigneeKind) -> &'static str {
    match setting {
        AssigneeKind::Individual => pair.individual,
        AssigneeKind::Team => pair.team,
    }
}

fn opposite(pair: ExclusivePair, setting: AssigneeKind) -> &'static str {
    match setting {
        AssigneeKind::Individual => pair.team,
        AssigneeKind::Team => pair.individual,
    }
}
