use super::Error;

/// Error when a conversion target cannot be built or populated.
///
/// This occurs when:
/// - The type of a child property cannot be derived from a setter or a
///   constructor parameter
/// - A required constructor argument is missing
/// - A converted property cannot be set on the built object
#[derive(Debug)]
pub(super) struct InvalidTarget {
    message: Box<str>,
    pub(super) code: u32,
}

impl std::error::Error for InvalidTarget {}

impl core::fmt::Display for InvalidTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid target: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid target error with the given code.
    pub fn invalid_target(message: impl Into<String>, code: u32) -> Error {
        Error::from(super::ErrorKind::InvalidTarget(InvalidTarget {
            message: message.into().into(),
            code,
        }))
    }

    /// Returns `true` if this error is an invalid target error.
    pub fn is_invalid_target(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidTarget(_))
    }
}
