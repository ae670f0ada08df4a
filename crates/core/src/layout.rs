//! Layout-mode rules layered on top of schema validation.
//!
//! Freeform modules carry pixel widths and no rows. Grid modules carry a row
//! and a `col-N` width, and the distinct row numbers must form an unbroken run.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::document::model::{coerce_int, Layout, Width};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum LayoutError {
    #[error("invalid row value {value} for module {module}")]
    InvalidRow {
        index: usize,
        module: String,
        value: String,
    },

    #[error("rows must be consecutive, found {rows:?}")]
    NonConsecutiveRows { rows: Vec<u32> },

    #[error("invalid grid width {width} for module {module}, expected col-1 through col-12")]
    GridWidth {
        index: usize,
        module: String,
        width: String,
    },

    #[error("invalid freeform width {width} for module {module}, expected a positive integer")]
    FreeformWidth {
        index: usize,
        module: String,
        width: String,
    },

    #[error("freeform width {width} for module {module} exceeds 4294967295 pixels")]
    FreeformWidthTooLarge {
        index: usize,
        module: String,
        width: String,
    },

    #[error("cannot mix row with freeform layout (module {module})")]
    RowInFreeform { index: usize, module: String },

    #[error("row is required for module {module} in grid layout")]
    MissingRow { index: usize, module: String },
}

impl LayoutError {
    /// Dotted path of the offending field.
    pub fn path(&self) -> String {
        match self {
            LayoutError::NonConsecutiveRows { .. } => "modules".to_string(),
            LayoutError::InvalidRow { index, .. }
            | LayoutError::RowInFreeform { index, .. }
            | LayoutError::MissingRow { index, .. } => format!("modules.{index}.row"),
            LayoutError::GridWidth { index, .. }
            | LayoutError::FreeformWidth { index, .. }
            | LayoutError::FreeformWidthTooLarge { index, .. } => format!("modules.{index}.width"),
        }
    }
}

/// Check the layout rules of a schema-valid document.
///
/// Every violation is reported. The consecutiveness check only runs once all
/// rows have coerced cleanly.
pub fn check_layout(document: &Value) -> Result<(), Vec<LayoutError>> {
    let layout = document
        .get("layout")
        .and_then(Value::as_str)
        .map(Layout::from_wire)
        .unwrap_or_default();
    let modules = document
        .get("modules")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let errors = match layout {
        Layout::Freeform => check_freeform(modules),
        Layout::Grid => check_grid(modules),
    };

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(%layout, errors = errors.len(), "document failed layout checks");
        Err(errors)
    }
}

fn check_freeform(modules: &[Value]) -> Vec<LayoutError> {
    let mut errors = Vec::new();
    for (index, module) in modules.iter().enumerate() {
        let width = module.get("width").unwrap_or(&Value::Null);
        match freeform_width(width) {
            None => errors.push(LayoutError::FreeformWidth {
                index,
                module: module_label(module),
                width: display_value(width),
            }),
            Some(px) if u32::try_from(px).is_err() => {
                errors.push(LayoutError::FreeformWidthTooLarge {
                    index,
                    module: module_label(module),
                    width: display_value(width),
                })
            }
            Some(_) => {}
        }
        if module.get("row").is_some_and(|r| !r.is_null()) {
            errors.push(LayoutError::RowInFreeform {
                index,
                module: module_label(module),
            });
        }
    }
    errors
}

fn check_grid(modules: &[Value]) -> Vec<LayoutError> {
    let mut errors = Vec::new();
    let mut rows = Vec::with_capacity(modules.len());
    let mut rows_ok = true;

    for (index, module) in modules.iter().enumerate() {
        match module.get("row").filter(|r| !r.is_null()) {
            None => {
                rows_ok = false;
                errors.push(LayoutError::MissingRow {
                    index,
                    module: module_label(module),
                });
            }
            Some(raw) => match coerce_row(raw) {
                Some(row) => rows.push(row),
                None => {
                    rows_ok = false;
                    errors.push(LayoutError::InvalidRow {
                        index,
                        module: module_label(module),
                        value: display_value(raw),
                    });
                }
            },
        }

        let width = module.get("width").unwrap_or(&Value::Null);
        if grid_width(width).is_none() {
            errors.push(LayoutError::GridWidth {
                index,
                module: module_label(module),
                width: display_value(width),
            });
        }
    }

    if rows_ok && !rows_are_consecutive(&rows) {
        let distinct: BTreeSet<u32> = rows.iter().copied().collect();
        errors.push(LayoutError::NonConsecutiveRows {
            rows: distinct.into_iter().collect(),
        });
    }

    errors
}

/// Coerce a raw row value to a 1-based row number.
pub fn coerce_row(value: &Value) -> Option<u32> {
    coerce_int(value)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

/// Whether the distinct row numbers form an unbroken run.
///
/// Duplicates and ordering are irrelevant; an empty set is consecutive.
/// Rows are 1-based, so a 0 here means a caller skipped [`coerce_row`].
pub fn rows_are_consecutive(rows: &[u32]) -> bool {
    assert!(
        !rows.contains(&0),
        "row 0 reached the consecutiveness check; rows are 1-based"
    );
    let distinct: BTreeSet<u32> = rows.iter().copied().collect();
    match (distinct.first(), distinct.last()) {
        (Some(min), Some(max)) => (max - min + 1) as usize == distinct.len(),
        _ => true,
    }
}

/// A positive integral pixel count, before any range check.
fn freeform_width(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => Width::number_pixels(n),
        Value::String(s) => Width::parse_pixels(s),
        _ => None,
    }
}

fn grid_width(value: &Value) -> Option<u8> {
    value.as_str().and_then(Width::parse_columns)
}

/// Name a module for error messages: its name when it has one, otherwise the
/// raw module object.
fn module_label(module: &Value) -> String {
    match module.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => module.to_string(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
