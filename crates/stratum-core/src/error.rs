mod adhoc;
mod backend;
mod duplicate_object;
mod illegal_object_type;
mod invalid_argument;
mod invalid_class;
mod invalid_data_type;
mod invalid_number_of_constraints;
mod invalid_property_mapping_configuration;
mod invalid_source;
mod invalid_target;
mod property_not_accessible;
mod target_not_found;
mod type_converter;
mod unexpected_type;
mod unknown_object;

use adhoc::AdhocError;
use backend::BackendError;
use duplicate_object::DuplicateObject;
use illegal_object_type::IllegalObjectType;
use invalid_argument::InvalidArgument;
use invalid_class::InvalidClass;
use invalid_data_type::InvalidDataType;
use invalid_number_of_constraints::InvalidNumberOfConstraints;
use invalid_property_mapping_configuration::InvalidPropertyMappingConfiguration;
use invalid_source::InvalidSource;
use invalid_target::InvalidTarget;
use property_not_accessible::PropertyNotAccessible;
use std::sync::Arc;
use target_not_found::TargetNotFound;
use type_converter::TypeConverterError;
use unexpected_type::UnexpectedType;
use unknown_object::UnknownObject;

/// Returns early with an ad-hoc runtime error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc runtime error.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Stratum.
///
/// Most variants carry a fixed numeric code so callers can tell failures
/// apart without matching on messages. See [`Error::code`].
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns the numeric code of the first error in the context chain that
    /// carries one.
    pub fn code(&self) -> Option<u32> {
        self.chain().find_map(|err| err.kind().code())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Backend(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Backend(BackendError),
    DuplicateObject(DuplicateObject),
    IllegalObjectType(IllegalObjectType),
    InvalidArgument(InvalidArgument),
    InvalidClass(InvalidClass),
    InvalidDataType(InvalidDataType),
    InvalidNumberOfConstraints(InvalidNumberOfConstraints),
    InvalidPropertyMappingConfiguration(InvalidPropertyMappingConfiguration),
    InvalidSource(InvalidSource),
    InvalidTarget(InvalidTarget),
    PropertyNotAccessible(PropertyNotAccessible),
    TargetNotFound(TargetNotFound),
    TypeConverter(TypeConverterError),
    UnexpectedType(UnexpectedType),
    UnknownObject(UnknownObject),
    Unknown,
}

impl ErrorKind {
    fn code(&self) -> Option<u32> {
        use self::ErrorKind::*;

        match self {
            DuplicateObject(err) => Some(err.code()),
            IllegalObjectType(err) => Some(err.code),
            InvalidArgument(err) => Some(err.code),
            InvalidClass(err) => Some(err.code()),
            InvalidDataType(err) => Some(err.code()),
            InvalidNumberOfConstraints(err) => Some(err.code()),
            InvalidPropertyMappingConfiguration(err) => Some(err.code),
            InvalidSource(err) => Some(err.code()),
            InvalidTarget(err) => Some(err.code),
            PropertyNotAccessible(err) => Some(err.code()),
            TargetNotFound(err) => Some(err.code()),
            TypeConverter(err) => Some(err.code()),
            UnexpectedType(err) => Some(err.code()),
            UnknownObject(err) => Some(err.code()),
            Anyhow(_) | Adhoc(_) | Backend(_) | Unknown => None,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Backend(err) => core::fmt::Display::fmt(err, f),
            DuplicateObject(err) => core::fmt::Display::fmt(err, f),
            IllegalObjectType(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            InvalidClass(err) => core::fmt::Display::fmt(err, f),
            InvalidDataType(err) => core::fmt::Display::fmt(err, f),
            InvalidNumberOfConstraints(err) => core::fmt::Display::fmt(err, f),
            InvalidPropertyMappingConfiguration(err) => core::fmt::Display::fmt(err, f),
            InvalidSource(err) => core::fmt::Display::fmt(err, f),
            InvalidTarget(err) => core::fmt::Display::fmt(err, f),
            PropertyNotAccessible(err) => core::fmt::Display::fmt(err, f),
            TargetNotFound(err) => core::fmt::Display::fmt(err, f),
            TypeConverter(err) => core::fmt::Display::fmt(err, f),
            UnexpectedType(err) => core::fmt::Display::fmt(err, f),
            UnknownObject(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown stratum error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
