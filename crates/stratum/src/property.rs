//! Conversion of untyped input into typed values and domain objects.

mod configuration;
pub use configuration::PropertyMappingConfiguration;

pub mod converter;
pub use converter::TypeConverter;

mod mapper;
pub use mapper::PropertyMapper;
