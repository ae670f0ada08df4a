//! Helpers for the dashboard index: ownership filters, global dashboards and
//! category buckets.

use std::collections::BTreeMap;

use crate::document::DashboardDocument;

/// Bucket for dashboards without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Dashboards owned by a shared pseudo-user and shown to everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDashboards {
    pub enabled: bool,
    pub user: String,
}

impl Default for GlobalDashboards {
    fn default() -> Self {
        Self {
            enabled: false,
            user: "global".to_string(),
        }
    }
}

impl GlobalDashboards {
    pub fn is_global(&self, document: &DashboardDocument) -> bool {
        self.enabled && document.created_by.as_deref() == Some(self.user.as_str())
    }

    /// Owner to record when a caller asks for a global dashboard. Requires the
    /// feature to be on and the caller to hold `edit_global`.
    pub fn owner_override(&self, requested: bool, permitted: bool) -> Option<&str> {
        (requested && self.enabled && permitted).then_some(self.user.as_str())
    }

    /// Owners whose dashboards a listing shows. `None` lists everything.
    pub fn visible_owners(&self, filter_users: bool, user: Option<&str>) -> Option<Vec<String>> {
        if !filter_users {
            return None;
        }
        let mut owners: Vec<String> = user.map(str::to_string).into_iter().collect();
        if self.enabled && !owners.contains(&self.user) {
            owners.push(self.user.clone());
        }
        Some(owners)
    }
}

pub fn category_of(document: &DashboardDocument) -> &str {
    match document.category.as_deref() {
        Some(c) if !c.is_empty() => c,
        _ => UNCATEGORIZED,
    }
}

/// Group dashboards by category, each bucket sorted by name ignoring case.
pub fn categorize(documents: Vec<DashboardDocument>) -> BTreeMap<String, Vec<DashboardDocument>> {
    let mut buckets: BTreeMap<String, Vec<DashboardDocument>> = BTreeMap::new();
    for document in documents {
        buckets
            .entry(category_of(&document).to_string())
            .or_default()
            .push(document);
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_cached_key(|d| d.name.to_lowercase());
    }
    buckets
}

pub fn total_modules(documents: &[DashboardDocument]) -> usize {
    documents.iter().map(|d| d.modules.len()).sum()
}
