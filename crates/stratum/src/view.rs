//! Rendering of assigned variables.

mod json;
pub use json::{ClassNameExposure, Configuration, JsonView};
