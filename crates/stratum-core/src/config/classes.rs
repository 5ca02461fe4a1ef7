use crate::Result;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

/// Per-class persistence overrides, keyed by class name.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct ClassesConfiguration {
    classes: IndexMap<String, ClassConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassConfig {
    pub table_name: Option<String>,

    /// Value of the record-type column that selects this class
    pub record_type: Option<String>,

    /// Direct subclasses, keyed by record type
    pub subclasses: IndexMap<String, String>,

    pub properties: IndexMap<String, PropertyConfig>,

    /// Column that holds the record type; overrides the table's
    pub record_type_column_name: Option<String>,

    pub language_id_column_name: Option<String>,

    pub translation_origin_column_name: Option<String>,

    pub translation_origin_diff_source_name: Option<String>,

    pub modification_date_column_name: Option<String>,

    pub creation_date_column_name: Option<String>,

    pub deleted_flag_column_name: Option<String>,

    pub disabled_flag_column_name: Option<String>,

    pub start_time_column_name: Option<String>,

    pub end_time_column_name: Option<String>,

    pub frontend_user_group_column_name: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyConfig {
    pub field_name: Option<String>,
}

impl ClassesConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, class_name: impl Into<String>, config: ClassConfig) -> &mut Self {
        self.classes
            .insert(class_name.into().trim_start_matches('\\').to_string(), config);
        self
    }

    pub fn with(mut self, class_name: impl Into<String>, config: ClassConfig) -> Self {
        self.insert(class_name, config);
        self
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name.trim_start_matches('\\'))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassConfig)> + '_ {
        self.classes
            .iter()
            .map(|(class_name, config)| (class_name.as_str(), config))
    }

    pub fn config_for(&self, class_name: &str) -> Option<&ClassConfig> {
        self.classes.get(class_name.trim_start_matches('\\'))
    }

    /// All transitive subclasses of a class, depth first in configuration
    /// order.
    ///
    /// The class itself is never part of the result, and every class
    /// appears at most once even when the subclass graph has cycles.
    pub fn get_sub_classes(&self, class_name: &str) -> Vec<String> {
        let mut visited = IndexSet::new();
        visited.insert(class_name.trim_start_matches('\\').to_string());
        self.collect_sub_classes(class_name, &mut visited);

        visited.into_iter().skip(1).collect()
    }

    fn collect_sub_classes(&self, class_name: &str, visited: &mut IndexSet<String>) {
        let Some(config) = self.config_for(class_name) else {
            return;
        };

        for subclass in config.subclasses.values() {
            let subclass = subclass.trim_start_matches('\\');
            if visited.insert(subclass.to_string()) {
                self.collect_sub_classes(subclass, visited);
            }
        }
    }
}

impl ClassConfig {
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn subclass(mut self, record_type: impl Into<String>, class_name: impl Into<String>) -> Self {
        self.subclasses.insert(record_type.into(), class_name.into());
        self
    }

    pub fn field_name(mut self, property: impl Into<String>, column: impl Into<String>) -> Self {
        self.properties.insert(
            property.into(),
            PropertyConfig {
                field_name: Some(column.into()),
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_from_json() {
        let config = ClassesConfiguration::from_json(
            r#"{
                "Blog\\Post": {
                    "tableName": "tx_blog_post",
                    "subclasses": { "news": "Blog\\News" },
                    "properties": { "title": { "fieldName": "headline" } },
                    "deletedFlagColumnName": "removed"
                }
            }"#,
        )
        .unwrap();

        let post = config.config_for("\\Blog\\Post").unwrap();
        assert_eq!(post.table_name.as_deref(), Some("tx_blog_post"));
        assert_eq!(post.subclasses["news"], "Blog\\News");
        assert_eq!(
            post.properties["title"].field_name.as_deref(),
            Some("headline")
        );
        assert_eq!(post.deleted_flag_column_name.as_deref(), Some("removed"));
    }

    #[test]
    fn sub_classes_are_transitive() {
        let config = ClassesConfiguration::new()
            .with("A", ClassConfig::default().subclass("b", "B"))
            .with("B", ClassConfig::default().subclass("c", "C").subclass("d", "D"));

        assert_eq!(config.get_sub_classes("A"), ["B", "C", "D"]);
        assert!(config.get_sub_classes("Unknown").is_empty());
    }
}
