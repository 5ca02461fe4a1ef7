use super::Error;

/// Error when more than one persisted object matches a single identity.
#[derive(Debug)]
pub(super) struct DuplicateObject {
    class_name: Box<str>,
    identity: Box<str>,
}

impl DuplicateObject {
    pub(super) fn code(&self) -> u32 {
        1297931022
    }
}

impl std::error::Error for DuplicateObject {}

impl core::fmt::Display for DuplicateObject {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate object: more than one object of type `{}` matches identity `{}`",
            self.class_name, self.identity
        )
    }
}

impl Error {
    /// Creates a duplicate object error.
    pub fn duplicate_object(class_name: impl Into<String>, identity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateObject(DuplicateObject {
            class_name: class_name.into().into(),
            identity: identity.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate object error.
    pub fn is_duplicate_object(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateObject(_))
    }
}
