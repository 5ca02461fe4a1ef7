use super::Error;

/// Error when no registered type converter accepts a source / target pair.
#[derive(Debug)]
pub(super) struct TypeConverterError {
    source_type: Box<str>,
    target_type: Box<str>,
}

impl TypeConverterError {
    pub(super) fn code(&self) -> u32 {
        1476044883
    }
}

impl std::error::Error for TypeConverterError {}

impl core::fmt::Display for TypeConverterError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no type converter found which can convert from `{}` to `{}`",
            self.source_type, self.target_type
        )
    }
}

impl Error {
    /// Creates an error signalling that no converter matched.
    pub fn no_type_converter(
        source_type: impl Into<String>,
        target_type: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::TypeConverter(TypeConverterError {
            source_type: source_type.into().into(),
            target_type: target_type.into().into(),
        }))
    }

    /// Returns `true` if no type converter matched.
    pub fn is_no_type_converter(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConverter(_))
    }
}
