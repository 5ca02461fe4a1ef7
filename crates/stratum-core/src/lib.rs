pub mod config;
pub use config::{ClassesConfiguration, Tca};

pub mod driver;
pub use driver::{Backend, ChangeSet};

mod error;
pub use error::Error;

pub mod mapping;
pub use mapping::{ColumnMap, DataMap, DataMapFactory};

pub mod schema;
pub use schema::{ClassSchema, Reflection};

pub mod stmt;

/// A Result type alias that uses Stratum's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
