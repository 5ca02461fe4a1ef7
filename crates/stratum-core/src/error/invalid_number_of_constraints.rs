use super::Error;

/// Error when a logical conjunction or disjunction is built from no
/// constraints at all.
#[derive(Debug)]
pub(super) struct InvalidNumberOfConstraints {
    operation: &'static str,
}

impl InvalidNumberOfConstraints {
    pub(super) fn code(&self) -> u32 {
        1268056288
    }
}

impl std::error::Error for InvalidNumberOfConstraints {}

impl core::fmt::Display for InvalidNumberOfConstraints {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid number of constraints: `{}` needs at least one constraint",
            self.operation
        )
    }
}

impl Error {
    /// Creates an invalid number of constraints error.
    pub fn invalid_number_of_constraints(operation: &'static str) -> Error {
        Error::from(super::ErrorKind::InvalidNumberOfConstraints(
            InvalidNumberOfConstraints { operation },
        ))
    }

    /// Returns `true` if this error is an invalid number of constraints error.
    pub fn is_invalid_number_of_constraints(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidNumberOfConstraints(_))
    }
}
