use serde::{Deserialize, Deserializer};
use stratum_core::{stmt::Value, Result};

/// Framework persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pages records are read from and stored on
    #[serde(deserialize_with = "page_ids")]
    pub storage_pid: Vec<i64>,

    pub respect_storage_page: bool,

    /// Depth below the storage pages that is searched as well
    pub recursive: u32,

    pub features: Features,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    /// Emit cache tags for every created query
    pub cache_tags: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_pid: vec![],
            respect_storage_page: true,
            recursive: 0,
            features: Features::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn storage_pid(mut self, pids: impl IntoIterator<Item = i64>) -> Self {
        self.storage_pid = pids.into_iter().collect();
        self
    }

    pub fn cache_tags(mut self, enabled: bool) -> Self {
        self.features.cache_tags = enabled;
        self
    }
}

/// Accepts `"1,2"`, `[1, "2"]` and `1`.
fn page_ids<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> core::result::Result<Vec<i64>, D::Error> {
    let value = Value::from_json(&serde_json::Value::deserialize(deserializer)?);

    Ok(match value {
        Value::List(items) => items.iter().filter_map(Value::to_integer).collect(),
        Value::String(list) => list
            .split(',')
            .filter_map(|pid| pid.trim().parse().ok())
            .collect(),
        other => other.to_integer().into_iter().collect(),
    })
}
