use super::Error;

/// Error when a repository receives an object that is not of its bound type.
///
/// The code tells the operation apart: `add`, `remove` and `update` each
/// use their own.
#[derive(Debug)]
pub(super) struct IllegalObjectType {
    given: Box<str>,
    expected: Box<str>,
    pub(super) code: u32,
}

impl std::error::Error for IllegalObjectType {}

impl core::fmt::Display for IllegalObjectType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "illegal object type: the object given was of type `{}`, expected `{}`",
            self.given, self.expected
        )
    }
}

impl Error {
    /// Creates an illegal object type error.
    pub fn illegal_object_type(
        given: impl Into<String>,
        expected: impl Into<String>,
        code: u32,
    ) -> Error {
        Error::from(super::ErrorKind::IllegalObjectType(IllegalObjectType {
            given: given.into().into(),
            expected: expected.into().into(),
            code,
        }))
    }

    /// Returns `true` if this error is an illegal object type error.
    pub fn is_illegal_object_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IllegalObjectType(_))
    }
}
