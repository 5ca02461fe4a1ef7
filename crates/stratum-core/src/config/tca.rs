use crate::{stmt::Value, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Table column configuration, keyed by table name.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct Tca {
    tables: IndexMap<String, TableConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub ctrl: Ctrl,
    pub columns: IndexMap<String, ColumnConfig>,
}

/// Table-level control settings: which columns play a special role.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Ctrl {
    #[serde(rename = "type")]
    pub record_type: Option<String>,

    #[serde(rename = "languageField")]
    pub language_field: Option<String>,

    #[serde(rename = "transOrigPointerField")]
    pub trans_orig_pointer_field: Option<String>,

    #[serde(rename = "transOrigDiffSourceField")]
    pub trans_orig_diff_source_field: Option<String>,

    pub tstamp: Option<String>,

    pub crdate: Option<String>,

    pub delete: Option<String>,

    pub enablecolumns: EnableColumns,

    #[serde(rename = "rootLevel", deserialize_with = "loose_bool")]
    pub root_level: bool,

    #[serde(deserialize_with = "loose_bool")]
    pub is_static: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EnableColumns {
    pub disabled: Option<String>,
    pub starttime: Option<String>,
    pub endtime: Option<String>,
    pub fe_group: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub config: FieldConfig,
}

/// Configuration of a single column.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub ty: Option<String>,

    #[serde(rename = "renderType")]
    pub render_type: Option<String>,

    pub foreign_table: Option<String>,

    /// Allowed tables of a `group` column
    pub allowed: Option<String>,

    /// Junction table of a many-to-many relation
    #[serde(rename = "MM")]
    pub mm: Option<String>,

    #[serde(rename = "MM_opposite_field")]
    pub mm_opposite_field: Option<String>,

    #[serde(rename = "MM_match_fields")]
    pub mm_match_fields: IndexMap<String, serde_json::Value>,

    #[serde(rename = "MM_insert_fields")]
    pub mm_insert_fields: IndexMap<String, serde_json::Value>,

    pub maxitems: Option<u64>,

    pub foreign_field: Option<String>,

    pub foreign_table_field: Option<String>,

    pub foreign_sortby: Option<String>,

    pub foreign_default_sortby: Option<String>,

    pub foreign_match_fields: IndexMap<String, serde_json::Value>,

    #[serde(rename = "dbType")]
    pub db_type: Option<String>,
}

impl Tca {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, table_name: impl Into<String>, table: TableConfig) -> &mut Self {
        self.tables.insert(table_name.into(), table);
        self
    }

    pub fn with(mut self, table_name: impl Into<String>, table: TableConfig) -> Self {
        self.insert(table_name, table);
        self
    }

    pub fn table(&self, table_name: &str) -> Option<&TableConfig> {
        self.tables.get(table_name)
    }

    pub fn column(&self, table_name: &str, column_name: &str) -> Option<&FieldConfig> {
        self.tables
            .get(table_name)?
            .columns
            .get(column_name)
            .map(|column| &column.config)
    }
}

impl TableConfig {
    pub fn with_column(mut self, column_name: impl Into<String>, config: FieldConfig) -> Self {
        self.columns.insert(column_name.into(), ColumnConfig { config });
        self
    }
}

impl FieldConfig {
    pub fn of_type(ty: impl Into<String>) -> Self {
        Self {
            ty: Some(ty.into()),
            ..Self::default()
        }
    }

    pub fn is_type(&self, ty: &str) -> bool {
        self.ty.as_deref() == Some(ty)
    }

    /// `MM_match_fields` converted to statement values.
    pub fn mm_match_values(&self) -> IndexMap<String, Value> {
        to_values(&self.mm_match_fields)
    }

    pub fn mm_insert_values(&self) -> IndexMap<String, Value> {
        to_values(&self.mm_insert_fields)
    }

    pub fn foreign_match_values(&self) -> IndexMap<String, Value> {
        to_values(&self.foreign_match_fields)
    }
}

fn to_values(fields: &IndexMap<String, serde_json::Value>) -> IndexMap<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), Value::from_json(value)))
        .collect()
}

/// Accepts `true`/`false`, numbers and numeric strings.
fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Value::from_json(&value).to_bool())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_table() {
        let tca = Tca::from_json(
            r#"{
                "tx_blog_post": {
                    "ctrl": {
                        "type": "record_type",
                        "languageField": "sys_language_uid",
                        "delete": "deleted",
                        "enablecolumns": { "disabled": "hidden" },
                        "rootLevel": 1
                    },
                    "columns": {
                        "tags": {
                            "config": {
                                "type": "select",
                                "foreign_table": "tx_blog_tag",
                                "MM": "tx_blog_post_tag_mm",
                                "MM_match_fields": { "tablenames": "tx_blog_post" },
                                "maxitems": 9999
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let table = tca.table("tx_blog_post").unwrap();
        assert_eq!(table.ctrl.record_type.as_deref(), Some("record_type"));
        assert_eq!(table.ctrl.enablecolumns.disabled.as_deref(), Some("hidden"));
        assert!(table.ctrl.root_level);
        assert!(!table.ctrl.is_static);

        let tags = tca.column("tx_blog_post", "tags").unwrap();
        assert!(tags.is_type("select"));
        assert_eq!(tags.mm.as_deref(), Some("tx_blog_post_tag_mm"));
        assert_eq!(tags.maxitems, Some(9999));
        assert_eq!(
            tags.mm_match_values()["tablenames"],
            Value::from("tx_blog_post")
        );
    }
}
