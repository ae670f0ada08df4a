//! Authorization hook interface.
//!
//! Every dashboard operation asks an [`Authorizer`] before acting. The
//! deployment decides the policy; this crate only ships two simple ones.

use std::fmt;

use serde::Serialize;

use crate::document::DashboardDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
    Clone,
    /// Mark a dashboard as global.
    EditGlobal,
    /// Edit a dashboard someone else created.
    EditOthers,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Clone => "clone",
            Action::EditGlobal => "edit_global",
            Action::EditOthers => "edit_others",
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Action::View)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is being attempted, by whom, on which dashboard.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    pub action: Action,
    pub user: Option<&'a str>,
    pub dashboard_id: Option<&'a str>,
}

impl<'a> AuthRequest<'a> {
    pub fn new(action: Action, user: Option<&'a str>) -> Self {
        Self {
            action,
            user,
            dashboard_id: None,
        }
    }

    pub fn on(mut self, dashboard_id: &'a str) -> Self {
        self.dashboard_id = Some(dashboard_id);
        self
    }
}

pub trait Authorizer: Send + Sync {
    fn allows(&self, request: &AuthRequest<'_>) -> bool;
}

/// Permits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn allows(&self, _request: &AuthRequest<'_>) -> bool {
        true
    }
}

/// Permits viewing only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

impl Authorizer for ReadOnly {
    fn allows(&self, request: &AuthRequest<'_>) -> bool {
        !request.action.is_write()
    }
}

/// The creator may always edit; anyone else needs `edit_others`.
pub fn can_edit(
    authorizer: &dyn Authorizer,
    user: Option<&str>,
    document: &DashboardDocument,
) -> bool {
    if user.is_some() && user == document.created_by.as_deref() {
        return true;
    }
    authorizer.allows(&AuthRequest::new(Action::EditOthers, user).on(&document.id))
}
