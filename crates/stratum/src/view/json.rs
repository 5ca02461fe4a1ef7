use crate::{object_access::ObjectAccess, persistence::PersistenceManager};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Number, Value as Json};
use stratum_core::{
    schema::short_class_name,
    stmt::{ObjectRef, Value},
    Reflection, Result,
};

use chrono::SecondsFormat;
use std::sync::Arc;

const DEFAULT_IDENTIFIER_KEY: &str = "__identity";
const CLASS_KEY: &str = "__class";

/// Renders assigned variables as JSON.
///
/// Only the variables named by
/// [`set_variables_to_render`](JsonView::set_variables_to_render) are
/// rendered. A single variable renders as its own value, several render as
/// an object keyed by variable name.
///
/// Objects render their gettable scalar properties. Properties holding
/// objects or collections are rendered only when the configuration descends
/// into them.
#[derive(Debug)]
pub struct JsonView {
    object_access: ObjectAccess,

    /// Resolves identifiers for `_exposeObjectIdentifier`
    pm: Option<PersistenceManager>,

    variables: IndexMap<String, Value>,

    variables_to_render: Vec<String>,

    /// Configuration per rendered variable
    configuration: IndexMap<String, Configuration>,
}

/// Rendering configuration of one level of the value tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Configuration {
    /// Only these keys are rendered
    #[serde(rename = "_only", default)]
    pub only: Option<Vec<String>>,

    /// These keys are never rendered
    #[serde(rename = "_exclude", default)]
    pub exclude: Option<Vec<String>>,

    /// Object properties to descend into
    #[serde(rename = "_descend", default)]
    pub descend: IndexMap<String, Configuration>,

    /// Applied to every element of a collection
    #[serde(rename = "_descendAll", default)]
    pub descend_all: Option<Box<Configuration>>,

    #[serde(rename = "_exposeObjectIdentifier", default)]
    pub expose_object_identifier: bool,

    #[serde(rename = "_exposedObjectIdentifierKey", default)]
    pub exposed_object_identifier_key: Option<String>,

    #[serde(rename = "_exposeClassName", default)]
    pub expose_class_name: Option<ClassNameExposure>,

    /// Configuration of collection elements, by key
    #[serde(flatten)]
    pub elements: IndexMap<String, Configuration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum ClassNameExposure {
    /// `Vendor\Package\Domain\Model\Post`
    FullyQualified,

    /// `Post`
    Unqualified,
}

impl TryFrom<u8> for ClassNameExposure {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::FullyQualified),
            2 => Ok(Self::Unqualified),
            other => Err(format!("invalid `_exposeClassName` value {other}; expected 1 or 2")),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &Json) -> Result<Self> {
        Ok(Self::deserialize(json)?)
    }

    pub fn only<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn descend(mut self, property: impl Into<String>, config: Configuration) -> Self {
        self.descend.insert(property.into(), config);
        self
    }

    pub fn descend_all(mut self, config: Configuration) -> Self {
        self.descend_all = Some(Box::new(config));
        self
    }

    pub fn expose_object_identifier(mut self, key: Option<&str>) -> Self {
        self.expose_object_identifier = true;
        self.exposed_object_identifier_key = key.map(str::to_string);
        self
    }

    pub fn expose_class_name(mut self, exposure: ClassNameExposure) -> Self {
        self.expose_class_name = Some(exposure);
        self
    }

    /// Whether `key` passes `_only` and `_exclude`. `_only` wins when both
    /// are set.
    fn renders(&self, key: &str) -> bool {
        if let Some(only) = &self.only {
            return only.iter().any(|allowed| allowed == key);
        }

        match &self.exclude {
            Some(exclude) => !exclude.iter().any(|excluded| excluded == key),
            None => true,
        }
    }
}

impl JsonView {
    pub fn new(reflection: impl Into<Arc<Reflection>>) -> Self {
        Self {
            object_access: ObjectAccess::new(reflection),
            pm: None,
            variables: IndexMap::new(),
            variables_to_render: vec!["value".to_string()],
            configuration: IndexMap::new(),
        }
    }

    /// A view that exposes identifiers known to `pm`.
    pub fn with_persistence_manager(pm: &PersistenceManager) -> Self {
        Self {
            pm: Some(pm.clone()),
            ..Self::new(pm.reflection().clone())
        }
    }

    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn assign_multiple<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in values {
            self.assign(key, value);
        }
        self
    }

    pub fn set_variables_to_render<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables_to_render = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the configuration, keyed by variable name.
    pub fn set_configuration(&mut self, configuration: IndexMap<String, Configuration>) -> &mut Self {
        self.configuration = configuration;
        self
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.render_value()?)?)
    }

    /// The rendered variables before serialization.
    pub fn render_value(&self) -> Result<Json> {
        let default = Configuration::default();

        if let [name] = self.variables_to_render.as_slice() {
            let value = self.variables.get(name).cloned().unwrap_or_default();
            return self.transform(&value, self.configuration.get(name).unwrap_or(&default));
        }

        let mut rendered = Map::new();
        for name in &self.variables_to_render {
            if let Some(value) = self.variables.get(name) {
                let config = self.configuration.get(name).unwrap_or(&default);
                rendered.insert(name.clone(), self.transform(value, config)?);
            }
        }

        Ok(Json::Object(rendered))
    }

    /// Transforms one value according to `config`.
    pub fn transform(&self, value: &Value, config: &Configuration) -> Result<Json> {
        if config.only.is_some() && config.exclude.is_some() && !value.is_scalar() {
            log::warn!("both `_only` and `_exclude` are configured; ignoring `_exclude`");
        }

        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(value) => Json::Bool(*value),
            Value::I64(value) => Json::from(*value),
            Value::F64(value) => Number::from_f64(*value).map(Json::Number).unwrap_or(Json::Null),
            Value::String(value) => Json::String(value.clone()),
            Value::DateTime(value) => Json::String(value.to_rfc3339_opts(SecondsFormat::Secs, false)),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| {
                        let key = index.to_string();
                        self.transform_element(&key, item, config).transpose()
                    })
                    .collect::<Result<_>>()?,
            ),
            Value::Map(entries) => {
                let mut rendered = Map::new();
                for (key, item) in entries {
                    if let Some(json) = self.transform_element(key, item, config)? {
                        rendered.insert(key.clone(), json);
                    }
                }
                Json::Object(rendered)
            }
            Value::Object(object) => self.transform_object(object, config)?,
            Value::Deferred(deferred) => self.transform(&deferred.resolve()?, config)?,
        })
    }

    fn transform_element(&self, key: &str, item: &Value, config: &Configuration) -> Result<Option<Json>> {
        if let Some(all) = &config.descend_all {
            return self.transform(item, all).map(Some);
        }

        if !config.renders(key) {
            return Ok(None);
        }

        let default = Configuration::default();
        self.transform(item, config.elements.get(key).unwrap_or(&default))
            .map(Some)
    }

    fn transform_object(&self, object: &ObjectRef, config: &Configuration) -> Result<Json> {
        let mut rendered = Map::new();

        for name in self.object_access.gettable_property_names(object) {
            if !config.renders(&name) {
                continue;
            }

            let value = self.object_access.get_property(object, &name)?;
            if value.is_scalar() || matches!(value, Value::DateTime(_)) {
                rendered.insert(name, self.transform(&value, &Configuration::default())?);
            } else if let Some(child) = config.descend.get(&name) {
                let json = self.transform(&value, child)?;
                rendered.insert(name, json);
            }
        }

        if config.expose_object_identifier {
            let identifier = match &self.pm {
                Some(pm) => pm.get_identifier_by_object(object),
                None => object.uid().map(|uid| uid.to_string()),
            };

            if let Some(identifier) = identifier {
                let key = config
                    .exposed_object_identifier_key
                    .as_deref()
                    .unwrap_or(DEFAULT_IDENTIFIER_KEY);
                rendered.insert(key.to_string(), Json::String(identifier));
            }
        }

        if let Some(exposure) = config.expose_class_name {
            let class_name = object.class_name();
            let rendered_name = match exposure {
                ClassNameExposure::FullyQualified => class_name.as_str(),
                ClassNameExposure::Unqualified => short_class_name(&class_name),
            };
            rendered.insert(CLASS_KEY.to_string(), Json::String(rendered_name.to_string()));
        }

        Ok(Json::Object(rendered))
    }
}
