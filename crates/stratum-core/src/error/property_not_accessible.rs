use super::Error;

#[derive(Debug)]
pub(super) struct PropertyNotAccessible {
    class_name: Box<str>,
    property: Box<str>,
}

impl PropertyNotAccessible {
    pub(super) fn code(&self) -> u32 {
        1476109666
    }
}

impl std::error::Error for PropertyNotAccessible {}

impl core::fmt::Display for PropertyNotAccessible {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "property not accessible: `{}` of class `{}` is not gettable",
            self.property, self.class_name
        )
    }
}

impl Error {
    /// Creates a property not accessible error.
    pub fn property_not_accessible(
        class_name: impl Into<String>,
        property: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::PropertyNotAccessible(
            PropertyNotAccessible {
                class_name: class_name.into().into(),
                property: property.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a property not accessible error.
    pub fn is_property_not_accessible(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PropertyNotAccessible(_))
    }
}
