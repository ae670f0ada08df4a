use serde::Serialize;
use serde_json::Value;

/// A single field-level violation, keyed by its dotted path
/// (`modules.0.dataSource`).
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{path}: {kind}")]
pub struct FieldError {
    pub path: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldErrorKind {
    #[error("required field")]
    Required,

    #[error("must be of {expected} type")]
    WrongType { expected: String },

    #[error("unallowed value {value}")]
    NotAllowed { value: Value },

    #[error("{message}")]
    Constraint { message: String },
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn constraint(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            path,
            FieldErrorKind::Constraint {
                message: message.into(),
            },
        )
    }

    /// Last segment of the path, i.e. the field name itself.
    pub fn field(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
