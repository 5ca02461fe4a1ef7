use indexmap::{IndexMap, IndexSet};
use stratum_core::schema::Type;

/// Wildcard key that configures every child property at once.
const ANY: &str = "*";

/// Controls which properties are mapped and how.
///
/// Configurations nest: each child property can have its own, and a child
/// without one inherits the permission flags of its parent.
#[derive(Debug, Clone, Default)]
pub struct PropertyMappingConfiguration {
    sub_configurations: IndexMap<String, PropertyMappingConfiguration>,

    /// Source property name -> target property name
    renames: IndexMap<String, String>,

    allowed: IndexSet<String>,

    skipped: IndexSet<String>,

    map_unknown_properties: bool,

    skip_unknown_properties: bool,

    /// Forces the target type of the property this configuration applies to
    target_type: Option<Type>,

    /// The source may name a subtype of the target under `__type`
    override_target_type_allowed: bool,

    /// Persistent objects may be created from sources without `__identity`
    creation_allowed: bool,

    /// Persistent objects loaded by `__identity` may be modified
    modification_allowed: bool,

    /// `chrono` format used to parse date strings
    date_format: Option<String>,
}

impl PropertyMappingConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows every property as well as creation and modification of
    /// persistent objects.
    pub fn permissive() -> Self {
        Self {
            map_unknown_properties: true,
            creation_allowed: true,
            modification_allowed: true,
            ..Self::default()
        }
    }

    pub fn allow_all_properties(&mut self) -> &mut Self {
        self.map_unknown_properties = true;
        self
    }

    pub fn allow_properties<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Maps every property except the given ones.
    pub fn allow_all_properties_except<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map_unknown_properties = true;
        self.skipped.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn skip_properties<I, S>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skipped.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Silently drops properties that are not allowed instead of failing.
    pub fn skip_unknown_properties(&mut self) -> &mut Self {
        self.skip_unknown_properties = true;
        self
    }

    pub fn should_map(&self, property: &str) -> bool {
        if self.skipped.contains(property) {
            return false;
        }

        self.allowed.contains(property)
            || self.sub_configurations.contains_key(property)
            || self.map_unknown_properties
    }

    pub fn should_skip(&self, property: &str) -> bool {
        self.skipped.contains(property)
    }

    pub fn should_skip_unknown_properties(&self) -> bool {
        self.skip_unknown_properties
    }

    /// Maps source property `source` onto target property `target`.
    pub fn set_mapping(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.renames.insert(source.into(), target.into());
        self
    }

    pub fn target_property_name<'a>(&'a self, source: &'a str) -> &'a str {
        self.renames.get(source).map(String::as_str).unwrap_or(source)
    }

    /// Returns the configuration of a child property, creating it if needed.
    /// `*` configures all children.
    pub fn for_property(&mut self, property: impl Into<String>) -> &mut Self {
        let inherited = self.inherited();
        self.sub_configurations
            .entry(property.into())
            .or_insert(inherited)
    }

    /// Configuration that applies to a child property.
    pub fn configuration_for(&self, property: &str) -> Self {
        self.sub_configurations
            .get(property)
            .or_else(|| self.sub_configurations.get(ANY))
            .cloned()
            .unwrap_or_else(|| self.inherited())
    }

    fn inherited(&self) -> Self {
        Self {
            map_unknown_properties: self.map_unknown_properties,
            skip_unknown_properties: self.skip_unknown_properties,
            override_target_type_allowed: self.override_target_type_allowed,
            creation_allowed: self.creation_allowed,
            modification_allowed: self.modification_allowed,
            date_format: self.date_format.clone(),
            ..Self::default()
        }
    }

    pub fn target_type(&self) -> Option<&Type> {
        self.target_type.as_ref()
    }

    pub fn set_target_type(&mut self, ty: impl Into<Type>) -> &mut Self {
        self.target_type = Some(ty.into());
        self
    }

    pub fn override_target_type_allowed(&self) -> bool {
        self.override_target_type_allowed
    }

    pub fn set_override_target_type_allowed(&mut self, allowed: bool) -> &mut Self {
        self.override_target_type_allowed = allowed;
        self
    }

    pub fn creation_allowed(&self) -> bool {
        self.creation_allowed
    }

    pub fn set_creation_allowed(&mut self, allowed: bool) -> &mut Self {
        self.creation_allowed = allowed;
        self
    }

    pub fn modification_allowed(&self) -> bool {
        self.modification_allowed
    }

    pub fn set_modification_allowed(&mut self, allowed: bool) -> &mut Self {
        self.modification_allowed = allowed;
        self
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    pub fn set_date_format(&mut self, format: impl Into<String>) -> &mut Self {
        self.date_format = Some(format.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_rules() {
        let mut config = PropertyMappingConfiguration::new();
        config.allow_properties(["title"]).skip_properties(["secret"]);
        config.for_property("author");

        assert!(config.should_map("title"));
        assert!(config.should_map("author"));
        assert!(!config.should_map("secret"));
        assert!(!config.should_map("other"));

        config.allow_all_properties();
        assert!(config.should_map("other"));
        assert!(!config.should_map("secret"));
    }

    #[test]
    fn children_inherit_permissions() {
        let mut config = PropertyMappingConfiguration::permissive();
        config.for_property("*").set_target_type("Blog\\Tag");

        let child = config.configuration_for("tags");
        assert_eq!(child.target_type(), Some(&Type::Object("Blog\\Tag".into())));
        assert!(child.creation_allowed());

        let mut config = PropertyMappingConfiguration::permissive();
        config.set_mapping("name", "title");
        assert_eq!(config.target_property_name("name"), "title");
        assert!(config.configuration_for("title").modification_allowed());
    }
}
