use std::fmt;

/// Declared type of a property or method parameter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int,
    Float,
    String,

    /// Untyped array
    Array,

    DateTime,

    /// Instance of the named class
    Object(String),

    /// Collection of instances of the named class
    Collection(String),

    Mixed,
}

impl Type {
    /// Parses a type name as it appears in class declarations.
    ///
    /// Leading `?` (nullable) and `\` (global namespace) are ignored.
    /// `Foo[]` and `ObjectStorage<Foo>` both describe collections of `Foo`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim().trim_start_matches('?').trim_start_matches('\\');

        if let Some(element) = name.strip_suffix("[]") {
            return match Self::parse(element) {
                Self::Object(class) => Self::Collection(class),
                _ => Self::Array,
            };
        }

        if let Some((_, element)) = name.split_once('<') {
            if let Some(element) = element.strip_suffix('>') {
                return Self::Collection(element.trim().trim_start_matches('\\').to_string());
            }
        }

        match name {
            "bool" | "boolean" => Self::Bool,
            "int" | "integer" => Self::Int,
            "float" | "double" => Self::Float,
            "string" => Self::String,
            "array" | "iterable" => Self::Array,
            "DateTime" | "DateTimeImmutable" | "DateTimeInterface" => Self::DateTime,
            "mixed" | "" => Self::Mixed,
            class => Self::Object(class.to_string()),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float | Self::String)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_) | Self::Array)
    }

    /// Class name of an object type, or the element class of a collection.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Object(class) | Self::Collection(class) => Some(class),
            _ => None,
        }
    }

    pub fn element_type(&self) -> Option<Type> {
        match self {
            Self::Collection(class) => Some(Self::Object(class.clone())),
            Self::Array => Some(Self::Mixed),
            _ => None,
        }
    }
}

impl From<&str> for Type {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => "boolean".fmt(f),
            Self::Int => "integer".fmt(f),
            Self::Float => "float".fmt(f),
            Self::String => "string".fmt(f),
            Self::Array => "array".fmt(f),
            Self::DateTime => "DateTime".fmt(f),
            Self::Object(class) => class.fmt(f),
            Self::Collection(class) => write!(f, "ObjectStorage<{class}>"),
            Self::Mixed => "mixed".fmt(f),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_types() {
        assert_eq!(Type::parse("int"), Type::Int);
        assert_eq!(Type::parse("?integer"), Type::Int);
        assert_eq!(Type::parse("boolean"), Type::Bool);
        assert_eq!(Type::parse("double"), Type::Float);
        assert_eq!(Type::parse("\\DateTime"), Type::DateTime);
        assert_eq!(Type::parse("mixed"), Type::Mixed);
    }

    #[test]
    fn parse_collections() {
        assert_eq!(
            Type::parse("\\Vendor\\Ext\\ObjectStorage<\\Vendor\\Ext\\Tag>"),
            Type::Collection("Vendor\\Ext\\Tag".into())
        );
        assert_eq!(Type::parse("Tag[]"), Type::Collection("Tag".into()));
        assert_eq!(Type::parse("int[]"), Type::Array);
    }

    #[test]
    fn display_round_trips_class_types() {
        let ty = Type::Collection("Blog\\Post".into());
        assert_eq!(Type::parse(&ty.to_string()), ty);
    }
}
