//! Class schemas: the static description of domain classes that the data
//! map factory, the data mapper and the property converters work from.

mod class;
pub use class::{ClassKind, ClassSchema, Method, Parameter, Property};

mod name;
pub use name::{setter_name, short_class_name, snake_case, table_name_for_class, upper_camel_case};

mod reflection;
pub use reflection::Reflection;

mod ty;
pub use ty::Type;
