use super::Error;

/// Error when an operation needs an already persisted object but was given
/// a new one.
#[derive(Debug)]
pub(super) struct UnknownObject {
    class_name: Box<str>,
}

impl UnknownObject {
    pub(super) fn code(&self) -> u32 {
        1249479819
    }
}

impl std::error::Error for UnknownObject {}

impl core::fmt::Display for UnknownObject {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown object: the object of type `{}` given to update must be persisted already, but is new",
            self.class_name
        )
    }
}

impl Error {
    /// Creates an unknown object error.
    pub fn unknown_object(class_name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownObject(UnknownObject {
            class_name: class_name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown object error.
    pub fn is_unknown_object(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownObject(_))
    }
}
