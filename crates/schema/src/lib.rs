//! Declarative field schemas and a generic recursive validator for JSON
//! documents.
//!
//! A [`Schema`] maps field names to [`Field`] descriptors (required flag,
//! accepted kinds, allowed values, regex, defaults, nested schemas).
//! [`validate`] interprets a schema against a `serde_json::Value` and returns
//! either the normalized document or the complete list of [`FieldError`]s.

pub mod error;
pub mod schema;
pub mod validate;

pub use error::{FieldError, FieldErrorKind};
pub use schema::{Field, Kind, Schema};
pub use validate::validate;
