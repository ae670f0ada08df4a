pub mod id;
pub mod model;
pub mod validate;

pub use id::{is_guid, DashboardId};
pub use model::{ChartInputs, DashboardDocument, InputOption, Layout, ModuleConfig, Width};
pub use validate::{DashboardValidator, FieldMessage, ValidationError, ValidationOutcome};
