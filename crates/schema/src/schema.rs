use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde_json::Value;

/// Primitive JSON kinds a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    /// Any JSON number, integral or not.
    Number,
    Integer,
    Boolean,
    Dict,
    List,
}

impl Kind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Integer => value.is_i64() || value.is_u64(),
            Kind::Boolean => value.is_boolean(),
            Kind::Dict => value.is_object(),
            Kind::List => value.is_array(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::Dict => "dict",
            Kind::List => "list",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of a single field.
///
/// Built with the chained constructors below, e.g.
/// `Field::string().required().allowed(["a", "b"])`.
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Accepted kinds. Empty accepts anything.
    pub kinds: Vec<Kind>,
    pub required: bool,
    pub nullable: bool,
    /// Rejects empty strings and empty lists.
    pub non_empty: bool,
    pub allowed: Option<Vec<Value>>,
    /// Applied to string values only. Callers anchor the expression.
    pub pattern: Option<Regex>,
    /// Inserted when an optional field is absent.
    pub default: Option<Value>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    /// Exclusive lower bound for numbers.
    pub greater_than: Option<f64>,
    /// Nested schema for dict values.
    pub fields: Option<Schema>,
    /// Schema every list item is validated against.
    pub items: Option<Box<Field>>,
}

impl Field {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(kind: Kind) -> Self {
        Self {
            kinds: vec![kind],
            ..Self::default()
        }
    }

    pub fn any_of(kinds: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(Kind::String)
    }

    pub fn number() -> Self {
        Self::of(Kind::Number)
    }

    pub fn integer() -> Self {
        Self::of(Kind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(Kind::Boolean)
    }

    pub fn dict(schema: Schema) -> Self {
        Self {
            kinds: vec![Kind::Dict],
            fields: Some(schema),
            ..Self::default()
        }
    }

    pub fn list(items: Field) -> Self {
        Self {
            kinds: vec![Kind::List],
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn allowed<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_len = Some(min);
        self.max_len = Some(max);
        self
    }

    pub fn greater_than(mut self, bound: f64) -> Self {
        self.greater_than = Some(bound);
        self
    }

    pub(crate) fn expected_kinds(&self) -> String {
        self.kinds
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// A named set of field descriptors for one object level.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_kind_rejects_fractions() {
        assert!(Kind::Integer.matches(&json!(3)));
        assert!(!Kind::Integer.matches(&json!(3.5)));
        assert!(Kind::Number.matches(&json!(3.5)));
    }

    #[test]
    fn booleans_are_not_numbers() {
        assert!(!Kind::Number.matches(&json!(true)));
        assert!(Kind::Boolean.matches(&json!(false)));
    }

    #[test]
    fn builder_chains() {
        let field = Field::string().required().allowed(["a", "b"]);
        assert!(field.required);
        assert_eq!(field.allowed, Some(vec![json!("a"), json!("b")]));
        assert_eq!(
            Field::any_of([Kind::String, Kind::Number]).expected_kinds(),
            "string or number"
        );
    }
}
