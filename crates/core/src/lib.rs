//! Dashboard configuration engine.
//!
//! Validates submitted dashboard documents against a chart registry, checks
//! layout invariants, orders modules for rendering and computes listing pages.
//! Persistence lives in [`store`].

pub mod auth;
pub mod document;
pub mod layout;
pub mod listing;
pub mod pagination;
pub mod registry;
pub mod render;
pub mod store;

pub use document::{
    DashboardDocument, DashboardId, DashboardValidator, FieldMessage, Layout, ModuleConfig,
    ValidationError, ValidationOutcome, Width,
};
pub use layout::{check_layout, LayoutError};
pub use pagination::{paginate, PageWindow};
pub use registry::ChartRegistry;
pub use render::{resolve_render_order, sort_modules, RenderPlan};
