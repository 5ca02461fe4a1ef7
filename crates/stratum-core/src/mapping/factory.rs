use super::{ColumnMap, DataMap, DateTimeStorageFormat, Relation};
use crate::{
    config::{ClassConfig, FieldConfig},
    schema::{snake_case, table_name_for_class, Property, Type},
    ClassesConfiguration, Reflection, Result, Tca,
};
use indexmap::IndexMap;
use std::{cell::RefCell, sync::Arc};

/// Column types whose values point at rows of other tables.
const RELATIONAL_TYPES: &[&str] = &["select", "inline", "group", "category"];

/// Builds and caches [`DataMap`]s from class schemas and configuration.
#[derive(Debug)]
pub struct DataMapFactory {
    reflection: Arc<Reflection>,
    classes: Arc<ClassesConfiguration>,
    tca: Arc<Tca>,

    /// Data maps built so far, keyed by class name
    data_maps: RefCell<IndexMap<String, Arc<DataMap>>>,
}

impl DataMapFactory {
    pub fn new(
        reflection: impl Into<Arc<Reflection>>,
        classes: impl Into<Arc<ClassesConfiguration>>,
        tca: impl Into<Arc<Tca>>,
    ) -> Self {
        Self {
            reflection: reflection.into(),
            classes: classes.into(),
            tca: tca.into(),
            data_maps: RefCell::new(IndexMap::new()),
        }
    }

    pub fn reflection(&self) -> &Arc<Reflection> {
        &self.reflection
    }

    pub fn classes(&self) -> &Arc<ClassesConfiguration> {
        &self.classes
    }

    pub fn tca(&self) -> &Arc<Tca> {
        &self.tca
    }

    /// Returns the data map of a class, building it on first access.
    pub fn build_data_map(&self, class_name: &str) -> Result<Arc<DataMap>> {
        let class_name = class_name.trim_start_matches('\\');

        if let Some(data_map) = self.data_maps.borrow().get(class_name) {
            return Ok(data_map.clone());
        }

        let data_map = Arc::new(self.build(class_name)?);
        self.data_maps
            .borrow_mut()
            .insert(class_name.to_string(), data_map.clone());
        Ok(data_map)
    }

    fn build(&self, class_name: &str) -> Result<DataMap> {
        let schema = self.reflection.class_schema(class_name)?;
        let default_config = ClassConfig::default();
        let config = self
            .classes
            .config_for(class_name)
            .unwrap_or(&default_config);

        let table_name = config
            .table_name
            .clone()
            .unwrap_or_else(|| table_name_for_class(class_name));

        let mut data_map = DataMap::new(class_name, &table_name);
        data_map.record_type = config.record_type.clone();
        data_map.subclasses = self.classes.get_sub_classes(class_name);

        self.apply_ctrl(&mut data_map);
        apply_overrides(&mut data_map, config);

        for property in schema.persistable_properties() {
            let column_name = config
                .properties
                .get(&property.name)
                .and_then(|property| property.field_name.clone())
                .unwrap_or_else(|| snake_case(&property.name));

            let mut column_map = ColumnMap::new(column_name, &property.name);

            if let Some(field) = self.tca.column(&table_name, &column_map.column_name) {
                set_relation(&mut column_map, field);
                set_date_time_storage_format(&mut column_map, property, field);
            }

            data_map
                .column_maps
                .insert(property.name.clone(), column_map);
        }

        log::debug!(
            "built data map for `{class_name}`; table={table_name}; columns={}",
            data_map.column_maps.len()
        );

        Ok(data_map)
    }

    fn apply_ctrl(&self, data_map: &mut DataMap) {
        let Some(table) = self.tca.table(&data_map.table_name) else {
            return;
        };

        let ctrl = &table.ctrl;
        data_map.record_type_column_name = ctrl.record_type.clone();
        data_map.language_id_column_name = ctrl.language_field.clone();
        data_map.translation_origin_column_name = ctrl.trans_orig_pointer_field.clone();
        data_map.translation_origin_diff_source_name = ctrl.trans_orig_diff_source_field.clone();
        data_map.modification_date_column_name = ctrl.tstamp.clone();
        data_map.creation_date_column_name = ctrl.crdate.clone();
        data_map.deleted_flag_column_name = ctrl.delete.clone();
        data_map.disabled_flag_column_name = ctrl.enablecolumns.disabled.clone();
        data_map.start_time_column_name = ctrl.enablecolumns.starttime.clone();
        data_map.end_time_column_name = ctrl.enablecolumns.endtime.clone();
        data_map.frontend_user_group_column_name = ctrl.enablecolumns.fe_group.clone();
        data_map.root_level = ctrl.root_level;
        data_map.is_static = ctrl.is_static;
    }
}

fn apply_overrides(data_map: &mut DataMap, config: &ClassConfig) {
    fn set(target: &mut Option<String>, value: &Option<String>) {
        if value.is_some() {
            target.clone_from(value);
        }
    }

    set(&mut data_map.record_type_column_name, &config.record_type_column_name);
    set(&mut data_map.language_id_column_name, &config.language_id_column_name);
    set(
        &mut data_map.translation_origin_column_name,
        &config.translation_origin_column_name,
    );
    set(
        &mut data_map.translation_origin_diff_source_name,
        &config.translation_origin_diff_source_name,
    );
    set(
        &mut data_map.modification_date_column_name,
        &config.modification_date_column_name,
    );
    set(
        &mut data_map.creation_date_column_name,
        &config.creation_date_column_name,
    );
    set(&mut data_map.deleted_flag_column_name, &config.deleted_flag_column_name);
    set(
        &mut data_map.disabled_flag_column_name,
        &config.disabled_flag_column_name,
    );
    set(&mut data_map.start_time_column_name, &config.start_time_column_name);
    set(&mut data_map.end_time_column_name, &config.end_time_column_name);
    set(
        &mut data_map.frontend_user_group_column_name,
        &config.frontend_user_group_column_name,
    );
}

/// Classifies a column and fills in the key fields of its relation.
fn set_relation(column_map: &mut ColumnMap, field: &FieldConfig) {
    let Some(ty) = field.ty.as_deref() else {
        return;
    };

    if !RELATIONAL_TYPES.contains(&ty) {
        return;
    }

    let child_table = if ty == "group" {
        field.allowed.clone()
    } else {
        field.foreign_table.clone()
    };

    if field.mm.is_some() {
        set_many_to_many(column_map, field, child_table);
        return;
    }

    let Some(child_table) = child_table else {
        return;
    };

    // A `maxitems` of 0 counts as unset.
    let relation = match (ty, field.maxitems.filter(|&max| max > 0)) {
        ("group", Some(1)) => Relation::HasOne,
        ("group", _) => Relation::HasMany,
        (_, Some(max)) if max > 1 => Relation::HasMany,
        _ => Relation::HasOne,
    };

    column_map.relation = relation;
    column_map.child_table_name = Some(child_table);
    column_map.child_table_default_sortings = field.foreign_default_sortby.clone();
    column_map.child_sort_by_field_name = field.foreign_sortby.clone();
    column_map.parent_key_field_name = field.foreign_field.clone();
    column_map.parent_table_field_name = field.foreign_table_field.clone();
    column_map.relation_match_fields = field.foreign_match_values();
}

fn set_many_to_many(column_map: &mut ColumnMap, field: &FieldConfig, child_table: Option<String>) {
    column_map.relation = Relation::HasAndBelongsToMany;
    column_map.child_table_name = child_table;
    column_map.relation_table_name = field.mm.clone();
    column_map.relation_table_match_fields = field.mm_match_values();
    column_map.relation_table_insert_fields = field.mm_insert_values();
    column_map.child_table_default_sortings = field.foreign_default_sortby.clone();

    let (parent_key, child_key, sort_by) = if field.mm_opposite_field.is_some() {
        ("uid_foreign", "uid_local", "sorting_foreign")
    } else {
        ("uid_local", "uid_foreign", "sorting")
    };

    column_map.parent_key_field_name = Some(parent_key.to_string());
    column_map.child_key_field_name = Some(child_key.to_string());
    column_map.child_sort_by_field_name = Some(sort_by.to_string());
}

fn set_date_time_storage_format(column_map: &mut ColumnMap, property: &Property, field: &FieldConfig) {
    if property.ty != Type::DateTime {
        return;
    }

    column_map.date_time_storage_format = field
        .db_type
        .as_deref()
        .and_then(DateTimeStorageFormat::from_db_type);
}
