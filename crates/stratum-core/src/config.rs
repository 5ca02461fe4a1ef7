//! Persistence configuration read from the surrounding application.
//!
//! Both documents are plain serde structures. [`ClassesConfiguration`]
//! describes how domain classes map onto tables, [`Tca`] describes the
//! tables and their columns.

mod classes;
pub use classes::{ClassConfig, ClassesConfiguration, PropertyConfig};

mod tca;
pub use tca::{ColumnConfig, Ctrl, EnableColumns, FieldConfig, TableConfig, Tca};
