use super::Error;

/// Error when the property mapping configuration forbids what the source
/// asks for: overriding the target type, creating or modifying objects, or
/// mapping a property that was not allowed.
#[derive(Debug)]
pub(super) struct InvalidPropertyMappingConfiguration {
    message: Box<str>,
    pub(super) code: u32,
}

impl std::error::Error for InvalidPropertyMappingConfiguration {}

impl core::fmt::Display for InvalidPropertyMappingConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid property mapping configuration: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid property mapping configuration error.
    pub fn invalid_property_mapping_configuration(message: impl Into<String>, code: u32) -> Error {
        Error::from(super::ErrorKind::InvalidPropertyMappingConfiguration(
            InvalidPropertyMappingConfiguration {
                message: message.into().into(),
                code,
            },
        ))
    }

    /// Returns `true` if this error is an invalid property mapping
    /// configuration error.
    pub fn is_invalid_property_mapping_configuration(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::InvalidPropertyMappingConfiguration(_)
        )
    }
}
