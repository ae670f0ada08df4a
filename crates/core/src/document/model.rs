use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// How modules are positioned on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Explicit pixel width/height, no rows.
    #[default]
    Freeform,
    /// Numbered rows with `col-1`..`col-12` widths.
    Grid,
}

impl Layout {
    /// Read-time conversion: anything other than `"grid"` is freeform.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "grid" => Layout::Grid,
            _ => Layout::Freeform,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Freeform => "freeform",
            Layout::Grid => "grid",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(raw.as_str().map(Layout::from_wire).unwrap_or_default())
    }
}

/// A dashboard: a named collection of chart modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "created_by", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
    /// Keys this version does not know about, kept for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DashboardDocument {
    /// Distinct chart families used by the modules, in first-use order.
    pub fn families(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for module in &self.modules {
            if !module.family.is_empty() && !out.contains(&module.family.as_str()) {
                out.push(&module.family);
            }
        }
        out
    }
}

/// One chart/widget entry of a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub name: String,
    pub guid: String,
    pub family: String,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub width: Width,
    pub height: f64,
    #[serde(rename = "dataSource")]
    pub data_source: String,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub row: Option<i64>,
    #[serde(deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<bool>,
    #[serde(rename = "refreshInterval", skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<ChartInputs>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Module width: pixels in freeform mode, a column fraction in grid mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Width {
    Pixels(u32),
    Columns(u8),
    /// Anything else found in a stored document.
    Other(String),
}

impl Width {
    pub const MAX_COLUMNS: u8 = 12;

    /// Parse the `col-N` grid token, N in 1..=12.
    pub fn parse_columns(s: &str) -> Option<u8> {
        let n: u8 = s.strip_prefix("col-")?.parse().ok()?;
        let canonical = format!("col-{n}");
        ((1..=Self::MAX_COLUMNS).contains(&n) && canonical == s).then_some(n)
    }

    /// Parse a plain positive integer written as digits. Values past `u64`
    /// saturate.
    pub fn parse_pixels(s: &str) -> Option<u64> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if s.bytes().all(|b| b == b'0') {
            return None;
        }
        Some(s.parse().unwrap_or(u64::MAX))
    }

    /// Read a JSON number as a positive pixel count. Integral floats such as
    /// `300.0` count.
    pub fn number_pixels(n: &Number) -> Option<u64> {
        if let Some(n) = n.as_u64() {
            return (n > 0).then_some(n);
        }
        let f = n.as_f64()?;
        (f.is_finite() && f.fract() == 0.0 && f >= 1.0)
            .then(|| if f >= u64::MAX as f64 { u64::MAX } else { f as u64 })
    }
}

impl Default for Width {
    fn default() -> Self {
        Width::Other(String::new())
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Pixels(n) => write!(f, "{n}"),
            Width::Columns(n) => write!(f, "col-{n}"),
            Width::Other(s) => f.write_str(s),
        }
    }
}

impl Serialize for Width {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Width::Pixels(n) => serializer.serialize_u32(*n),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for Width {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match &raw {
            Value::Number(n) => {
                match Width::number_pixels(n).and_then(|n| u32::try_from(n).ok()) {
                    Some(n) => Width::Pixels(n),
                    None => Width::Other(n.to_string()),
                }
            }
            Value::String(s) => Width::parse_columns(s)
                .map(Width::Columns)
                .or_else(|| {
                    Width::parse_pixels(s)
                        .and_then(|n| u32::try_from(n).ok())
                        .map(Width::Pixels)
                })
                .unwrap_or_else(|| Width::Other(s.clone())),
            other => Width::Other(other.to_string()),
        })
    }
}

/// User-editable parameter widgets rendered above a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartInputs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub btn_classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<InputOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputOption {
    pub name: String,
    #[serde(rename = "type", default = "InputOption::default_type")]
    pub input_type: String,
    /// `[value, label]` pairs for select/radio/checkbox inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_classes: Vec<String>,
}

impl InputOption {
    fn default_type() -> String {
        "text".to_string()
    }
}

/// Integer coercion for `row`/`order`: integral numbers pass, other
/// numbers truncate, digit strings parse, anything else reads as absent.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_int(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_layout_reads_as_freeform() {
        let doc: DashboardDocument =
            serde_json::from_value(json!({"name": "d", "layout": "masonry"})).unwrap();
        assert_eq!(doc.layout, Layout::Freeform);

        let doc: DashboardDocument = serde_json::from_value(json!({"name": "d"})).unwrap();
        assert_eq!(doc.layout, Layout::Freeform);
    }

    #[test]
    fn width_forms() {
        let w: Width = serde_json::from_value(json!(300)).unwrap();
        assert_eq!(w, Width::Pixels(300));
        let w: Width = serde_json::from_value(json!("col-6")).unwrap();
        assert_eq!(w, Width::Columns(6));
        let w: Width = serde_json::from_value(json!("col-13")).unwrap();
        assert_eq!(w, Width::Other("col-13".into()));
        assert_eq!(serde_json::to_value(Width::Columns(4)).unwrap(), json!("col-4"));
        assert_eq!(serde_json::to_value(Width::Pixels(4)).unwrap(), json!(4));
    }

    #[test]
    fn integral_float_widths_are_pixels() {
        let w: Width = serde_json::from_value(json!(300.0)).unwrap();
        assert_eq!(w, Width::Pixels(300));
        assert_eq!(serde_json::to_value(&w).unwrap(), json!(300));
        let w: Width = serde_json::from_value(json!(300.5)).unwrap();
        assert_eq!(w, Width::Other("300.5".into()));
        let w: Width = serde_json::from_value(json!(5_000_000_000u64)).unwrap();
        assert_eq!(w, Width::Other("5000000000".into()));
    }

    #[test]
    fn pixel_parsing() {
        assert_eq!(Width::parse_pixels("300"), Some(300));
        assert_eq!(Width::parse_pixels("000"), None);
        assert_eq!(Width::parse_pixels("3e2"), None);
        assert_eq!(Width::parse_pixels("99999999999999999999999"), Some(u64::MAX));
        assert_eq!(Width::number_pixels(&Number::from(0u64)), None);
        let big = Number::from_f64(1e10).unwrap();
        assert_eq!(Width::number_pixels(&big), Some(10_000_000_000));
        assert_eq!(Width::number_pixels(&Number::from_f64(-2.0).unwrap()), None);
    }

    #[test]
    fn column_tokens_are_exact() {
        assert_eq!(Width::parse_columns("col-12"), Some(12));
        assert_eq!(Width::parse_columns("col-0"), None);
        assert_eq!(Width::parse_columns("col-05"), None);
        assert_eq!(Width::parse_columns("col-"), None);
        assert_eq!(Width::parse_columns("5"), None);
    }

    #[test]
    fn order_coercion() {
        assert_eq!(coerce_int(&json!(3)), Some(3));
        assert_eq!(coerce_int(&json!(2.7)), Some(2));
        assert_eq!(coerce_int(&json!("4")), Some(4));
        assert_eq!(coerce_int(&json!("NaN")), None);
        assert_eq!(coerce_int(&json!(null)), None);
        assert_eq!(coerce_int(&json!([1])), None);
    }

    #[test]
    fn module_keeps_unknown_keys() {
        let module: ModuleConfig = serde_json::from_value(json!({
            "name": "cpu",
            "width": 200,
            "height": 100,
            "dataSource": "/api/cpu",
            "order": "NaN",
            "color": "red"
        }))
        .unwrap();
        assert_eq!(module.order, None);
        assert_eq!(module.extra.get("color"), Some(&json!("red")));
        let back = serde_json::to_value(&module).unwrap();
        assert_eq!(back["color"], json!("red"));
        assert_eq!(back["dataSource"], json!("/api/cpu"));
    }

    #[test]
    fn created_by_accepts_snake_case() {
        let doc: DashboardDocument =
            serde_json::from_value(json!({"name": "d", "created_by": "ana"})).unwrap();
        assert_eq!(doc.created_by.as_deref(), Some("ana"));
    }

    #[test]
    fn families_are_distinct_in_first_use_order() {
        let doc: DashboardDocument = serde_json::from_value(json!({
            "name": "d",
            "modules": [{"family": "C3"}, {"family": "D3"}, {"family": "C3"}]
        }))
        .unwrap();
        assert_eq!(doc.families(), vec!["C3", "D3"]);
    }
}
