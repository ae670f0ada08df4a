//! Dashboard document validation: structure first, then layout rules.

use std::sync::LazyLock;

use dashboard_schema::{validate, Field, FieldError, Kind, Schema};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::id::guid_regex;
use super::model::DashboardDocument;
use crate::layout::{check_layout, LayoutError};
use crate::registry::ChartRegistry;

/// Input widget kinds a chart input option may declare.
pub const INPUT_TYPES: &[&str] = &[
    "number",
    "select",
    "radio",
    "checkbox",
    "text",
    "password",
    "color",
    "date",
    "datetime-local",
    "month",
    "week",
    "time",
    "email",
    "range",
    "search",
    "tel",
    "url",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The payload is not a dashboard-shaped JSON object at all.
    #[error("malformed dashboard document: {0}")]
    Malformed(String),

    #[error("invalid schema: {} field error(s)", .0.len())]
    Schema(Vec<FieldError>),

    #[error("invalid layout: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Layout(Vec<LayoutError>),
}

/// One `(field path, message)` pair for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    /// Every violation as a field path and a human-readable message.
    pub fn field_messages(&self) -> Vec<FieldMessage> {
        match self {
            ValidationError::Malformed(msg) => vec![FieldMessage {
                field: String::new(),
                message: msg.clone(),
            }],
            ValidationError::Schema(errors) => errors
                .iter()
                .map(|e| FieldMessage {
                    field: e.path.clone(),
                    message: e.message(),
                })
                .collect(),
            ValidationError::Layout(errors) => errors
                .iter()
                .map(|e| FieldMessage {
                    field: e.path(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

/// Either width form: a grid token or plain digits. Which one is legal
/// depends on the layout and is decided later.
static WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:col-[0-9]+|[0-9]+)$").expect("valid regex"));

pub type ValidationOutcome = Result<DashboardDocument, ValidationError>;

/// Validates submitted dashboards against a chart registry.
///
/// The schema, including the allowed family and chart-type sets, is built
/// once at construction.
#[derive(Debug, Clone)]
pub struct DashboardValidator {
    registry: ChartRegistry,
    chart_types: Vec<String>,
    schema: Schema,
}

impl DashboardValidator {
    pub fn new(registry: ChartRegistry) -> Self {
        let schema = dashboard_schema(&registry);
        let chart_types = registry.chart_types();
        Self {
            registry,
            chart_types,
            schema,
        }
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// Parse raw JSON text, then validate it.
    pub fn validate_json(&self, raw: &str) -> ValidationOutcome {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| ValidationError::Malformed(format!("invalid JSON: {e}")))?;
        self.validate_value(&value)
    }

    pub fn validate_value(&self, raw: &Value) -> ValidationOutcome {
        if !raw.is_object() {
            return Err(ValidationError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(raw)
            )));
        }

        let normalized = match validate(&self.schema, raw) {
            Ok(mut normalized) => {
                let mut errors = self.check_family_types(&normalized);
                errors.extend(fold_owner_alias(&mut normalized));
                if !errors.is_empty() {
                    return Err(ValidationError::Schema(errors));
                }
                normalized
            }
            Err(mut errors) => {
                errors.extend(self.check_family_types(raw));
                return Err(ValidationError::Schema(errors));
            }
        };

        check_layout(&normalized).map_err(ValidationError::Layout)?;

        serde_json::from_value(normalized).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Each module's type must belong to its family. Modules whose family or
    /// type is already outside the allowed sets are left to the schema errors.
    fn check_family_types(&self, document: &Value) -> Vec<FieldError> {
        let Some(modules) = document.get("modules").and_then(Value::as_array) else {
            return Vec::new();
        };
        modules
            .iter()
            .enumerate()
            .filter_map(|(i, module)| {
                let family = module.get("family")?.as_str()?;
                let chart_type = module.get("type")?.as_str()?;
                if self.registry.family(family).is_none()
                    || !self.chart_types.iter().any(|t| t == chart_type)
                    || self.registry.is_valid_combination(family, chart_type)
                {
                    return None;
                }
                Some(FieldError::constraint(
                    format!("modules.{i}.type"),
                    format!("chart type '{chart_type}' does not belong to family '{family}'"),
                ))
            })
            .collect()
    }
}

/// Move a snake_case `created_by` onto `createdBy`. Supplying both is an error.
fn fold_owner_alias(document: &mut Value) -> Option<FieldError> {
    let object = document.as_object_mut()?;
    if !object.contains_key("created_by") {
        return None;
    }
    if object.contains_key("createdBy") {
        return Some(FieldError::constraint(
            "created_by",
            "conflicts with createdBy, supply only one",
        ));
    }
    let owner = object.remove("created_by")?;
    object.insert("createdBy".into(), owner);
    None
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn input_schema() -> Schema {
    let option = Schema::new()
        .field("name", Field::string().required())
        .field("type", Field::string().allowed(INPUT_TYPES.iter().copied()).default_value("text"))
        .field("options", Field::list(Field::of(Kind::List).length(2, 2)))
        .field(
            "default",
            Field::any_of([Kind::String, Kind::Number, Kind::Boolean]).nullable(),
        )
        .field("validator_regex", Field::string().nullable())
        .field("placeholder", Field::any_of([Kind::String, Kind::Number]).nullable())
        .field("label", Field::string())
        .field("input_classes", Field::list(Field::string()));

    Schema::new()
        .field("btn_classes", Field::list(Field::string()))
        .field("submit_text", Field::string())
        .field("options", Field::list(Field::dict(option)))
}

fn module_schema(registry: &ChartRegistry) -> Schema {
    Schema::new()
        .field("name", Field::string().required().non_empty())
        .field("guid", Field::string().required().pattern(guid_regex().clone()))
        .field("family", Field::string().required().allowed(registry.family_names()))
        .field("type", Field::string().required().allowed(registry.chart_types()))
        .field(
            "width",
            Field::any_of([Kind::String, Kind::Number]).required().pattern(WIDTH_RE.clone()),
        )
        .field("height", Field::number().required().greater_than(0.0))
        .field("dataSource", Field::string().required().non_empty())
        .field("row", Field::number().nullable())
        .field("order", Field::number().nullable())
        .field("refresh", Field::boolean().nullable())
        .field("refreshInterval", Field::number().nullable())
        .field("inputs", Field::dict(input_schema()))
}

/// Top-level document schema.
pub fn dashboard_schema(registry: &ChartRegistry) -> Schema {
    Schema::new()
        .field("id", Field::string().pattern(guid_regex().clone()))
        .field("name", Field::string().required().non_empty())
        .field("date", Field::string())
        .field(
            "layout",
            Field::string().allowed(["freeform", "grid"]).default_value("freeform"),
        )
        .field("category", Field::string().nullable())
        .field("createdBy", Field::string().nullable())
        .field("created_by", Field::string().nullable())
        .field("modules", Field::list(Field::dict(module_schema(registry))).required())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_schema::FieldErrorKind;
    use serde_json::json;

    fn validator() -> DashboardValidator {
        DashboardValidator::new(ChartRegistry::builtin())
    }

    fn module() -> Value {
        json!({
            "name": "cpu",
            "guid": "a1-b2-c3-d4-e5",
            "family": "C3",
            "type": "line",
            "width": 300,
            "height": 200,
            "dataSource": "/api/cpu"
        })
    }

    #[test]
    fn empty_modules_are_valid() {
        let doc = validator()
            .validate_value(&json!({"name": "d", "layout": "grid", "modules": []}))
            .unwrap();
        assert!(doc.modules.is_empty());
    }

    #[test]
    fn layout_defaults_to_freeform() {
        let doc = validator()
            .validate_value(&json!({"name": "d", "modules": [module()]}))
            .unwrap();
        assert_eq!(doc.layout, crate::Layout::Freeform);
    }

    #[test]
    fn unknown_layout_is_rejected_on_write() {
        let err = validator()
            .validate_value(&json!({"name": "d", "layout": "masonry", "modules": []}))
            .unwrap_err();
        match err {
            ValidationError::Schema(errors) => {
                assert!(matches!(errors[0].kind, FieldErrorKind::NotAllowed { .. }));
                assert_eq!(errors[0].path, "layout");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_is_malformed() {
        let err = validator().validate_value(&json!("dashboard")).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
        let err = validator().validate_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn missing_top_level_fields() {
        for field in ["name", "modules"] {
            let mut doc = json!({"name": "d", "modules": [module()]});
            doc.as_object_mut().unwrap().remove(field);
            let err = validator().validate_value(&doc).unwrap_err();
            assert!(matches!(err, ValidationError::Schema(_)), "{field}");
        }
    }

    #[test]
    fn missing_module_fields_are_all_reported() {
        let mut m = module();
        m.as_object_mut().unwrap().remove("dataSource");
        m.as_object_mut().unwrap().remove("height");
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        let fields: Vec<String> = err.field_messages().into_iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["modules.0.dataSource", "modules.0.height"]);
    }

    #[test]
    fn bad_guid_is_rejected() {
        let mut m = module();
        m["guid"] = json!("not-a-guid");
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        assert_eq!(err.field_messages()[0].field, "modules.0.guid");
    }

    #[test]
    fn unknown_family_is_not_allowed() {
        let mut m = module();
        m["family"] = json!("Flash");
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        match err {
            ValidationError::Schema(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(matches!(errors[0].kind, FieldErrorKind::NotAllowed { .. }));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn type_must_match_family() {
        let mut m = module();
        m["family"] = json!("D3");
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        let messages = err.field_messages();
        assert_eq!(messages[0].field, "modules.0.type");
        assert!(messages[0].message.contains("does not belong to family 'D3'"));
    }

    #[test]
    fn pairing_errors_join_other_schema_errors() {
        let mut m = module();
        m["family"] = json!("D3");
        m.as_object_mut().unwrap().remove("height");
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        assert_eq!(err.field_messages().len(), 2);
    }

    #[test]
    fn inputs_are_validated_recursively() {
        let mut m = module();
        m["inputs"] = json!({
            "submit_text": "Go",
            "options": [
                {"name": "limit", "type": "select", "options": [[10, "Ten"], [20]]},
                {"type": "text"}
            ]
        });
        let err = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap_err();
        let mut fields: Vec<String> = err.field_messages().into_iter().map(|f| f.field).collect();
        fields.sort();
        assert_eq!(
            fields,
            vec!["modules.0.inputs.options.0.options.1", "modules.0.inputs.options.1.name"]
        );
    }

    #[test]
    fn input_type_defaults_to_text() {
        let mut m = module();
        m["inputs"] = json!({"options": [{"name": "q"}]});
        let doc = validator()
            .validate_value(&json!({"name": "d", "modules": [m]}))
            .unwrap();
        let inputs = doc.modules[0].inputs.as_ref().unwrap();
        assert_eq!(inputs.options[0].input_type, "text");
    }

    #[test]
    fn layout_errors_surface_after_schema_passes() {
        let mut m = module();
        m["row"] = json!(1);
        let err = validator()
            .validate_value(&json!({"name": "d", "layout": "freeform", "modules": [m]}))
            .unwrap_err();
        match &err {
            ValidationError::Layout(errors) => {
                assert!(matches!(errors[0], LayoutError::RowInFreeform { .. }));
            }
            other => panic!("expected layout error, got {other:?}"),
        }
        assert!(err.to_string().contains("cannot mix row with freeform layout"));
        assert_eq!(err.field_messages()[0].field, "modules.0.row");
    }

    #[test]
    fn unknown_keys_survive_validation() {
        let doc = validator()
            .validate_value(&json!({"name": "d", "modules": [], "theme": "dark"}))
            .unwrap();
        assert_eq!(doc.extra.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn snake_case_owner_is_type_checked() {
        let err = validator()
            .validate_value(&json!({"name": "d", "created_by": 5, "modules": [module()]}))
            .unwrap_err();
        match err {
            ValidationError::Schema(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "created_by");
                assert!(matches!(errors[0].kind, FieldErrorKind::WrongType { .. }));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn snake_case_owner_reads_as_created_by() {
        let doc = validator()
            .validate_value(&json!({"name": "d", "created_by": "ana", "modules": [module()]}))
            .unwrap();
        assert_eq!(doc.created_by.as_deref(), Some("ana"));

        let doc = validator()
            .validate_value(&json!({"name": "d", "created_by": null, "modules": []}))
            .unwrap();
        assert_eq!(doc.created_by, None);
    }

    #[test]
    fn both_owner_spellings_conflict() {
        let err = validator()
            .validate_value(&json!({
                "name": "d",
                "createdBy": "ana",
                "created_by": "bob",
                "modules": []
            }))
            .unwrap_err();
        match err {
            ValidationError::Schema(errors) => {
                assert_eq!(errors[0].path, "created_by");
                assert!(matches!(errors[0].kind, FieldErrorKind::Constraint { .. }));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
