//! Client configuration: schema, loading and validation.

pub mod loader;
pub mod schema;
pub mod validation;
