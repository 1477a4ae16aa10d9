//! End-to-end pipeline tests: rule parsing, multi-source validation, typed
//! binding, and update statement generation working together.

use paramkit::prelude::*;
use serde::Deserialize;
use serde_json::json;

const ASSIGNEES: ExclusivePair = ExclusivePair::new("assignee_individual", "assignee_team");

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
struct TaskChanges {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "assigneeIndividual")]
    assignee_individual: Option<i64>,
    #[serde(rename = "assigneeTeam")]
    assignee_team: Option<i64>,
}

impl ChangeRecord for TaskChanges {
    fn descriptors() -> &'static [FieldDescriptor] {
        const DESCRIPTORS: &[FieldDescriptor] = &[
            FieldDescriptor::new("id", "id"),
            FieldDescriptor::new("title", "title"),
            FieldDescriptor::new("description", "description"),
            FieldDescriptor::new("assigneeIndividual", "assignee_individual"),
            FieldDescriptor::new("assigneeTeam", "assignee_team"),
        ];
        DESCRIPTORS
    }

    fn get(&self, field: &str) -> Option<SqlValue> {
        match field {
            "title" => self.title.clone().map(SqlValue::from),
            "description" => self.description.clone().map(SqlValue::from),
            "assigneeIndividual" => self.assignee_individual.map(SqlValue::from),
            "assigneeTeam" => self.assignee_team.map(SqlValue::from),
            _ => None,
        }
    }
}

fn task_rules() -> RequestRules {
    RequestRules::body_only(
        RuleSet::new()
            .rule("title", "string|minLen:2|maxLen:120")
            .unwrap()
            .rule("description", "string|maxLen:500")
            .unwrap()
            .rule("assigneeIndividual", "int|min:1")
            .unwrap()
            .rule("assigneeTeam", "int|min:1")
            .unwrap(),
    )
}

#[test]
fn empty_required_string_reports_the_required_message() {
    // rules {"lastName": "string|minLen:2|required"}, input {lastName: ""}
    let rules = RequestRules::body_only(
        RuleSet::new()
            .rule("lastName", "string|minLen:2|required")
            .unwrap(),
    );
    let body = BodySource::from_value(json!({"lastName": ""})).unwrap();

    let failure = Validator::new()
        .validate(&rules, Vec::new(), &QuerySource::new(), &body)
        .unwrap_err();

    assert_eq!(failure.len(), 1);
    assert_eq!(failure.fields[0].parameter_name, "lastName");
    assert_eq!(
        failure.fields[0].error_message,
        "lastName is required to not be empty."
    );
}

#[test]
fn enum_mismatch_fails_validation_and_skips_binding() {
    // rules {"profile": "string|in:Public,Private|required"}, input "public"
    let rules = RequestRules::body_only(
        RuleSet::new()
            .rule("profile", "string|in:Public,Private|required")
            .unwrap(),
    );
    let body = BodySource::from_value(json!({"profile": "public"})).unwrap();

    let failure = Validator::new()
        .validate(&rules, Vec::new(), &QuerySource::new(), &body)
        .unwrap_err();

    assert_eq!(failure.len(), 1);
    assert_eq!(
        failure.fields[0].error_message,
        "profile must be one of: Public, Private."
    );
    // Validation failed as a unit: the handler never reaches bind().
}

#[test]
fn assigning_an_individual_nulls_the_team_column() {
    let changes = TaskChanges {
        title: Some("Task123".to_string()),
        assignee_individual: Some(42),
        ..Default::default()
    };

    let stmt = UpdateQuery::new("tasks", 7)
        .exclusive(ASSIGNEES, AssigneeKind::Individual)
        .build(&changes)
        .unwrap();

    assert_eq!(
        stmt.sql,
        "UPDATE tasks SET title = $1, assignee_individual = $2, assignee_team = $3 WHERE id = $4"
    );
    assert_eq!(
        stmt.args,
        vec![
            SqlValue::Text("Task123".to_string()),
            SqlValue::Int(42),
            SqlValue::Null,
            SqlValue::Int(7),
        ]
    );
}

#[test]
fn empty_change_set_never_produces_sql() {
    let err = UpdateQuery::new("tasks", 7)
        .build(&TaskChanges::default())
        .unwrap_err();
    assert_eq!(err, UpdateError::EmptyChangeSet);
}

#[test]
fn full_pipeline_from_body_bytes_to_statement() {
    let raw = br#"{"title": "Ship release", "assigneeTeam": 3, "ignored": true}"#;
    let body = BodySource::from_slice(raw).unwrap();
    let rules = task_rules();

    Validator::new()
        .validate(&rules, Vec::new(), &QuerySource::new(), &body)
        .unwrap();
    let changes: TaskChanges = bind(&rules, &QuerySource::new(), &body).unwrap();
    assert_eq!(
        changes,
        TaskChanges {
            title: Some("Ship release".to_string()),
            assignee_team: Some(3),
            ..Default::default()
        }
    );

    let stmt = UpdateQuery::new("tasks", 11)
        .exclusive(ASSIGNEES, AssigneeKind::Team)
        .build(&changes)
        .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE tasks SET title = $1, assignee_team = $2, assignee_individual = $3 WHERE id = $4"
    );
    assert_eq!(
        stmt.args,
        vec![
            SqlValue::Text("Ship release".to_string()),
            SqlValue::Int(3),
            SqlValue::Null,
            SqlValue::Int(11),
        ]
    );
}

#[test]
fn valid_input_binds_exactly_the_supplied_values() {
    let body = BodySource::from_value(json!({
        "title": "Task123",
        "description": "Quarterly report",
    }))
    .unwrap();
    let rules = task_rules();

    Validator::new()
        .validate(&rules, Vec::new(), &QuerySource::new(), &body)
        .unwrap();
    let changes: TaskChanges = bind(&rules, &QuerySource::new(), &body).unwrap();

    assert_eq!(changes.title.as_deref(), Some("Task123"));
    assert_eq!(changes.description.as_deref(), Some("Quarterly report"));
    assert_eq!(changes.assignee_individual, None);
    assert_eq!(changes.assignee_team, None);
}

#[test]
fn clearing_a_text_field_survives_the_whole_pipeline() {
    // "" passes validation (emptiness belongs to `required`), binds to
    // Some(""), and produces a real SET clause.
    let body = BodySource::from_value(json!({"description": ""})).unwrap();
    let rules = task_rules();

    Validator::new()
        .validate(&rules, Vec::new(), &QuerySource::new(), &body)
        .unwrap();
    let changes: TaskChanges = bind(&rules, &QuerySource::new(), &body).unwrap();
    assert_eq!(changes.description, Some(String::new()));

    let stmt = UpdateQuery::new("tasks", 5).build(&changes).unwrap();
    assert_eq!(stmt.sql, "UPDATE tasks SET description = $1 WHERE id = $2");
    assert_eq!(
        stmt.args,
        vec![SqlValue::Text(String::new()), SqlValue::Int(5)]
    );
}

#[test]
fn query_input_is_percent_decoded_before_validation() {
    let rules = RequestRules::query_only(
        RuleSet::new()
            .rule("name", "string|minLen:2|required")
            .unwrap(),
    );
    let query = QuerySource::parse("name=A%20B").unwrap();

    Validator::new()
        .validate(&rules, Vec::new(), &query, &BodySource::empty())
        .unwrap();

    #[derive(Debug, Deserialize)]
    struct Filter {
        name: String,
    }
    let filter: Filter = bind(&rules, &query, &BodySource::empty()).unwrap();
    assert_eq!(filter.name, "A B");
}

#[test]
fn malformed_body_is_a_source_read_error() {
    let err = BodySource::from_slice(b"{\"title\": ").unwrap_err();
    assert!(matches!(err, SourceReadError::Body(_)));
}

#[test]
fn aggregated_errors_cross_all_sources_in_order() {
    let rules = RequestRules::new(
        RuleSet::new().rule("limit", "int|max:100").unwrap(),
        RuleSet::new()
            .rule("title", "string|minLen:2|required")
            .unwrap(),
    );
    let query = QuerySource::parse("limit=500").unwrap();
    let body = BodySource::from_value(json!({"title": "x"})).unwrap();

    let failure = Validator::new()
        .validate(
            &rules,
            vec![FieldError::new("id", "id must be of type int.")],
            &query,
            &body,
        )
        .unwrap_err();

    assert_eq!(
        failure.collapsed(),
        "id must be of type int.\nlimit must be at most 100.\ntitle must be at least 2 characters long."
    );

    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["error"]["type"], "validation_error");
    assert_eq!(json["error"]["fields"][1]["parameterName"], "limit");
}
