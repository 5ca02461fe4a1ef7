use super::Error;

/// Error when a conversion source has a shape the converter cannot use.
#[derive(Debug)]
pub(super) struct InvalidSource {
    message: Box<str>,
}

impl InvalidSource {
    pub(super) fn code(&self) -> u32 {
        1297931020
    }
}

impl std::error::Error for InvalidSource {}

impl core::fmt::Display for InvalidSource {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid source: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSource(InvalidSource {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid source error.
    pub fn is_invalid_source(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSource(_))
    }
}
