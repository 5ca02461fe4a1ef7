use super::Error;

/// Error when a class name is unknown to the classes configuration or the
/// reflection registry.
#[derive(Debug)]
pub(super) struct InvalidClass {
    class_name: Box<str>,
}

impl InvalidClass {
    pub(super) fn code(&self) -> u32 {
        1476045117
    }
}

impl std::error::Error for InvalidClass {}

impl core::fmt::Display for InvalidClass {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid class: could not find class definition for name `{}`",
            self.class_name
        )
    }
}

impl Error {
    /// Creates an invalid class error.
    pub fn invalid_class(class_name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidClass(InvalidClass {
            class_name: class_name.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid class error.
    pub fn is_invalid_class(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidClass(_))
    }
}
