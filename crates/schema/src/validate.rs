// Recursive validator over serde_json values.
// Pure logic: every violation is collected, nothing short-circuits across fields.

use serde_json::{Map, Value};

use crate::error::{FieldError, FieldErrorKind};
use crate::schema::{Field, Schema};

/// Validate `document` against `schema`.
///
/// On success returns a normalized copy of the document with defaults
/// filled in for absent optional fields. Unknown keys are carried through
/// untouched. On failure returns every violation found.
pub fn validate(schema: &Schema, document: &Value) -> Result<Value, Vec<FieldError>> {
    let mut errors = Vec::new();
    let normalized = match document {
        Value::Object(map) => Value::Object(validate_object(schema, map, "", &mut errors)),
        other => {
            errors.push(FieldError::new(
                "",
                FieldErrorKind::WrongType {
                    expected: "dict".into(),
                },
            ));
            other.clone()
        }
    };

    if errors.is_empty() {
        Ok(normalized)
    } else {
        tracing::debug!(errors = errors.len(), "document failed schema validation");
        Err(errors)
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn validate_object(
    schema: &Schema,
    map: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Map<String, Value> {
    let mut out = map.clone();

    for (name, field) in schema.iter() {
        let path = join(prefix, name);
        match map.get(name) {
            None => {
                if field.required {
                    errors.push(FieldError::new(path, FieldErrorKind::Required));
                } else if let Some(default) = &field.default {
                    out.insert(name.to_string(), default.clone());
                }
            }
            Some(value) => {
                let normalized = validate_field(field, value, &path, errors);
                out.insert(name.to_string(), normalized);
            }
        }
    }

    out
}

fn validate_field(field: &Field, value: &Value, path: &str, errors: &mut Vec<FieldError>) -> Value {
    if value.is_null() {
        if !field.nullable {
            errors.push(FieldError::constraint(path, "null value not allowed"));
        }
        return Value::Null;
    }

    if !field.kinds.is_empty() && !field.kinds.iter().any(|k| k.matches(value)) {
        errors.push(FieldError::new(
            path,
            FieldErrorKind::WrongType {
                expected: field.expected_kinds(),
            },
        ));
        return value.clone();
    }

    if field.non_empty && is_empty(value) {
        errors.push(FieldError::constraint(path, "empty values not allowed"));
    }

    if let Some(allowed) = &field.allowed {
        if !allowed.contains(value) {
            errors.push(FieldError::new(
                path,
                FieldErrorKind::NotAllowed {
                    value: value.clone(),
                },
            ));
        }
    }

    if let (Some(re), Value::String(s)) = (&field.pattern, value) {
        if !re.is_match(s) {
            errors.push(FieldError::constraint(
                path,
                format!("value does not match regex '{}'", re.as_str()),
            ));
        }
    }

    if let (Some(bound), Some(n)) = (field.greater_than, value.as_f64()) {
        if n <= bound {
            errors.push(FieldError::constraint(
                path,
                format!("must be greater than {bound}"),
            ));
        }
    }

    if let Value::Array(items) = value {
        if let Some(min) = field.min_len {
            if items.len() < min {
                errors.push(FieldError::constraint(path, format!("min length is {min}")));
            }
        }
        if let Some(max) = field.max_len {
            if items.len() > max {
                errors.push(FieldError::constraint(path, format!("max length is {max}")));
            }
        }
    }

    match value {
        Value::Object(map) => match &field.fields {
            Some(schema) => Value::Object(validate_object(schema, map, path, errors)),
            None => value.clone(),
        },
        Value::Array(items) => match &field.items {
            Some(item_field) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        validate_field(item_field, item, &join(path, &i.to_string()), errors)
                    })
                    .collect(),
            ),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}
