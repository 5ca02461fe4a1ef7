use super::Error;

/// Error when an operand is not of the shape an operator needs, e.g. a
/// scalar passed to `in`.
#[derive(Debug)]
pub(super) struct UnexpectedType {
    message: Box<str>,
}

impl UnexpectedType {
    pub(super) fn code(&self) -> u32 {
        1264678095
    }
}

impl std::error::Error for UnexpectedType {}

impl core::fmt::Display for UnexpectedType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unexpected type: {}", self.message)
    }
}

impl Error {
    /// Creates an unexpected type error.
    pub fn unexpected_type(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnexpectedType(UnexpectedType {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unexpected type error.
    pub fn is_unexpected_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnexpectedType(_))
    }
}
