use super::Error;

/// Error when an argument passed to the query API is out of range or of the
/// wrong kind.
#[derive(Debug)]
pub(super) struct InvalidArgument {
    message: Box<str>,
    pub(super) code: u32,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error with the given code.
    pub fn invalid_argument(message: impl Into<String>, code: u32) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
            code,
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
