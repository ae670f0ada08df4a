//! Render ordering for a validated dashboard.

use serde::Serialize;

use crate::document::model::{DashboardDocument, Layout, ModuleConfig};

/// Sort key for a module: its integer `order`, or -1 when the module or its
/// order is missing or unusable. Keyless modules therefore render first.
pub fn order_sort(module: Option<&ModuleConfig>) -> i64 {
    module.and_then(|m| m.order).unwrap_or(-1)
}

/// Modules in render order. Stable: equal keys keep their input order.
pub fn sort_modules(modules: &[ModuleConfig]) -> Vec<&ModuleConfig> {
    let mut sorted: Vec<&ModuleConfig> = modules.iter().collect();
    sorted.sort_by_key(|m| order_sort(Some(m)));
    sorted
}

/// What the presentation layer walks to lay out a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderPlan<'a> {
    Flat(Vec<&'a ModuleConfig>),
    Rows(Vec<Vec<&'a ModuleConfig>>),
}

impl RenderPlan<'_> {
    pub fn module_count(&self) -> usize {
        match self {
            RenderPlan::Flat(modules) => modules.len(),
            RenderPlan::Rows(rows) => rows.iter().map(Vec::len).sum(),
        }
    }
}

/// Order a document's modules for rendering.
///
/// Freeform: one flat list sorted by [`order_sort`].
///
/// Grid: the same sort, then grouped into one bucket per row. Buckets appear
/// in the order their row is first met in the sorted list, which matches
/// numeric row order only when rows already increase with `order`.
pub fn resolve_render_order(document: &DashboardDocument) -> RenderPlan<'_> {
    let sorted = sort_modules(&document.modules);
    match document.layout {
        Layout::Freeform => RenderPlan::Flat(sorted),
        Layout::Grid => {
            let mut buckets: Vec<(i64, Vec<&ModuleConfig>)> = Vec::new();
            for module in sorted {
                let Some(row) = module.row else {
                    tracing::warn!(guid = %module.guid, "grid module without a row skipped");
                    continue;
                };
                match buckets.iter_mut().find(|(r, _)| *r == row) {
                    Some((_, bucket)) => bucket.push(module),
                    None => buckets.push((row, vec![module])),
                }
            }
            RenderPlan::Rows(buckets.into_iter().map(|(_, bucket)| bucket).collect())
        }
    }
}

/// Number of rows a grid dashboard spans, counted as the modules that declare
/// a row. `None` for freeform dashboards.
pub fn num_rows(document: &DashboardDocument) -> Option<usize> {
    match document.layout {
        Layout::Freeform => None,
        Layout::Grid => Some(document.modules.iter().filter(|m| m.row.is_some()).count()),
    }
}
