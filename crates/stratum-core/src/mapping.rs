//! Mapping metadata between domain classes and database tables.

mod column_map;
pub use column_map::{ColumnMap, DateTimeStorageFormat, Relation};

mod data_map;
pub use data_map::DataMap;

mod factory;
pub use factory::DataMapFactory;
