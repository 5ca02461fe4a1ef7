use super::Error;

/// Error when no persisted object matches an identity that must resolve.
#[derive(Debug)]
pub(super) struct TargetNotFound {
    class_name: Box<str>,
    identity: Box<str>,
}

impl TargetNotFound {
    pub(super) fn code(&self) -> u32 {
        1297933823
    }
}

impl std::error::Error for TargetNotFound {}

impl core::fmt::Display for TargetNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "target not found: object of type `{}` with identity `{}` not found",
            self.class_name, self.identity
        )
    }
}

impl Error {
    /// Creates a target not found error.
    pub fn target_not_found(class_name: impl Into<String>, identity: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TargetNotFound(TargetNotFound {
            class_name: class_name.into().into(),
            identity: identity.into().into(),
        }))
    }

    /// Returns `true` if this error is a target not found error.
    pub fn is_target_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TargetNotFound(_))
    }
}
