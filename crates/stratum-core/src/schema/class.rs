use super::{name::accessor_name, setter_name, Type};
use crate::stmt::Value;
use indexmap::IndexMap;

/// Static description of a domain class.
#[derive(Debug, Clone)]
pub struct ClassSchema {
    /// Fully qualified class name
    pub name: String,

    /// Direct parent class, if any
    pub parent: Option<String>,

    pub kind: ClassKind,

    /// Declared properties, in declaration order
    pub properties: IndexMap<String, Property>,

    /// Declared methods, in declaration order
    pub methods: IndexMap<String, Method>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Persisted object with its own identity
    Entity,

    /// Persisted object identified by its values
    ValueObject,

    /// Not persisted
    Plain,
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,

    pub ty: Type,

    /// Relation is loaded on first access
    pub lazy: bool,

    /// Property is never persisted
    pub transient: bool,

    /// Property can be read and written without accessor methods
    pub public: bool,
}

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,

    /// Zero-based position in the method signature
    pub position: usize,

    /// `None` when the parameter is untyped
    pub ty: Option<Type>,

    pub optional: bool,

    /// Default used when an optional argument is omitted
    pub default: Value,
}

pub(crate) const CONSTRUCTOR: &str = "__construct";

impl ClassSchema {
    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Entity)
    }

    pub fn value_object(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::ValueObject)
    }

    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, ClassKind::Plain)
    }

    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into().trim_start_matches('\\').to_string(),
            parent: None,
            kind,
            properties: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into().trim_start_matches('\\').to_string());
        self
    }

    /// Adds a property together with its getter and setter.
    pub fn property(self, name: &str, ty: impl Into<Type>) -> Self {
        let ty = ty.into();
        self.private_property(name, ty.clone())
            .method(&accessor_name("get", name), [])
            .method(&setter_name(name), [Parameter::required(name, ty)])
    }

    /// Adds a property with accessors whose relation is loaded lazily.
    pub fn lazy_property(mut self, name: &str, ty: impl Into<Type>) -> Self {
        self = self.property(name, ty);
        if let Some(property) = self.properties.get_mut(name) {
            property.lazy = true;
        }
        self
    }

    /// Adds a property with accessors that is never persisted.
    pub fn transient_property(mut self, name: &str, ty: impl Into<Type>) -> Self {
        self = self.property(name, ty);
        if let Some(property) = self.properties.get_mut(name) {
            property.transient = true;
        }
        self
    }

    /// Adds a public property without accessor methods.
    pub fn public_property(mut self, name: &str, ty: impl Into<Type>) -> Self {
        self = self.private_property(name, ty);
        if let Some(property) = self.properties.get_mut(name) {
            property.public = true;
        }
        self
    }

    /// Adds a property that has no accessor methods.
    pub fn private_property(mut self, name: &str, ty: impl Into<Type>) -> Self {
        self.properties.insert(
            name.to_string(),
            Property {
                name: name.to_string(),
                ty: ty.into(),
                lazy: false,
                transient: false,
                public: false,
            },
        );
        self
    }

    pub fn constructor(self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.method(CONSTRUCTOR, parameters)
    }

    /// Adds a method. Parameter positions are assigned in order.
    pub fn method(mut self, name: &str, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        let parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(position, parameter)| Parameter {
                position,
                ..parameter
            })
            .collect();

        self.methods.insert(
            name.to_string(),
            Method {
                name: name.to_string(),
                parameters,
            },
        );
        self
    }

    pub fn is_persistable(&self) -> bool {
        matches!(self.kind, ClassKind::Entity | ClassKind::ValueObject)
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.kind, ClassKind::Entity)
    }

    pub fn property_schema(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn method_schema(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn constructor_schema(&self) -> Option<&Method> {
        self.methods.get(CONSTRUCTOR)
    }

    pub fn setter(&self, property: &str) -> Option<&Method> {
        self.methods.get(&setter_name(property))
    }

    /// Returns the getter for a property: `getFoo`, `isFoo` or `hasFoo`.
    pub fn getter(&self, property: &str) -> Option<&Method> {
        ["get", "is", "has"]
            .iter()
            .find_map(|prefix| self.methods.get(&accessor_name(prefix, property)))
    }

    /// Whether a property can be written, either directly or via a setter.
    pub fn is_settable(&self, property: &str) -> bool {
        self.setter(property).is_some()
            || self
                .properties
                .get(property)
                .map(|property| property.public)
                .unwrap_or(false)
    }

    /// Whether a property can be read, either directly or via a getter.
    pub fn is_gettable(&self, property: &str) -> bool {
        self.getter(property).is_some()
            || self
                .properties
                .get(property)
                .map(|property| property.public)
                .unwrap_or(false)
    }

    /// Properties that are stored in the database.
    pub fn persistable_properties(&self) -> impl Iterator<Item = &Property> + '_ {
        self.properties
            .values()
            .filter(|property| !property.transient && property.name != "uid" && property.name != "pid")
    }
}

impl Method {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn first_parameter(&self) -> Option<&Parameter> {
        self.parameters.first()
    }
}

impl Parameter {
    pub fn required(name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            ty: Some(ty.into()),
            optional: false,
            default: Value::Null,
        }
    }

    pub fn optional(name: impl Into<String>, ty: impl Into<Type>, default: impl Into<Value>) -> Self {
        Self {
            optional: true,
            default: default.into(),
            ..Self::required(name, ty)
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: 0,
            ty: None,
            optional: false,
            default: Value::Null,
        }
    }
}
