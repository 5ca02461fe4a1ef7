use super::ColumnMap;
use indexmap::IndexMap;

/// Mapping of one domain class onto its table.
#[derive(Debug, Clone, PartialEq)]
pub struct DataMap {
    pub class_name: String,

    pub table_name: String,

    /// Value of the record-type column that selects this class
    pub record_type: Option<String>,

    /// Transitive subclasses, in discovery order
    pub subclasses: Vec<String>,

    /// Column maps keyed by property name
    pub column_maps: IndexMap<String, ColumnMap>,

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

    /// Records live on the root page only
    pub root_level: bool,

    /// Records are static data shared by all pages
    pub is_static: bool,
}

impl DataMap {
    pub fn new(class_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            table_name: table_name.into(),
            record_type: None,
            subclasses: vec![],
            column_maps: IndexMap::new(),
            record_type_column_name: None,
            language_id_column_name: None,
            translation_origin_column_name: None,
            translation_origin_diff_source_name: None,
            modification_date_column_name: None,
            creation_date_column_name: None,
            deleted_flag_column_name: None,
            disabled_flag_column_name: None,
            start_time_column_name: None,
            end_time_column_name: None,
            frontend_user_group_column_name: None,
            root_level: false,
            is_static: false,
        }
    }

    /// Column map of a property; `None` for unmapped properties.
    pub fn column_map(&self, property_name: &str) -> Option<&ColumnMap> {
        self.column_maps.get(property_name)
    }

    pub fn is_persistable_property(&self, property_name: &str) -> bool {
        self.column_maps.contains_key(property_name)
    }

    /// Column map of the property stored in `column_name`.
    pub fn column_map_by_column(&self, column_name: &str) -> Option<&ColumnMap> {
        self.column_maps
            .values()
            .find(|column_map| column_map.column_name == column_name)
    }

    /// Tables that should never be restricted to storage pages.
    pub fn ignores_storage_page(&self) -> bool {
        self.root_level || self.is_static
    }
}
