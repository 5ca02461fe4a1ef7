/// The property side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicOperand {
    PropertyValue(PropertyValue),

    /// Lower-cases the wrapped operand before comparing
    LowerCase(Box<DynamicOperand>),

    /// Upper-cases the wrapped operand before comparing
    UpperCase(Box<DynamicOperand>),
}

/// Reads a property of the objects selected by the named selector.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub property_name: String,

    /// Selector (table) the property belongs to; `None` means the query's
    /// primary selector.
    pub selector_name: Option<String>,
}

impl DynamicOperand {
    pub fn property(property_name: impl Into<String>, selector_name: Option<String>) -> Self {
        Self::PropertyValue(PropertyValue {
            property_name: property_name.into(),
            selector_name,
        })
    }

    pub fn lower_case(self) -> Self {
        Self::LowerCase(Box::new(self))
    }

    pub fn upper_case(self) -> Self {
        Self::UpperCase(Box::new(self))
    }

    /// The innermost property value.
    pub fn property_value(&self) -> &PropertyValue {
        match self {
            Self::PropertyValue(property) => property,
            Self::LowerCase(operand) | Self::UpperCase(operand) => operand.property_value(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_value().property_name
    }

    pub fn selector_name(&self) -> Option<&str> {
        self.property_value().selector_name.as_deref()
    }

    pub fn is_lower_case(&self) -> bool {
        matches!(self, Self::LowerCase(_))
    }
}

impl From<PropertyValue> for DynamicOperand {
    fn from(value: PropertyValue) -> Self {
        Self::PropertyValue(value)
    }
}
