use super::Error;

/// Error when a source payload overrides the target type with a type that
/// is not a subtype of the original target.
#[derive(Debug)]
pub(super) struct InvalidDataType {
    given: Box<str>,
    expected: Box<str>,
}

impl InvalidDataType {
    pub(super) fn code(&self) -> u32 {
        1317048056
    }
}

impl std::error::Error for InvalidDataType {}

impl core::fmt::Display for InvalidDataType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid data type: the given type `{}` is not a subtype of `{}`",
            self.given, self.expected
        )
    }
}

impl Error {
    /// Creates an invalid data type error.
    pub fn invalid_data_type(given: impl Into<String>, expected: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidDataType(InvalidDataType {
            given: given.into().into(),
            expected: expected.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid data type error.
    pub fn is_invalid_data_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidDataType(_))
    }
}
