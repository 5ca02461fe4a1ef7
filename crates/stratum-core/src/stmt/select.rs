use super::{Constraint, Orderings, QuerySettings, Source};

/// A fully described query, as handed to the storage backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Class of the objects the query returns
    pub class_name: String,

    pub source: Source,

    /// `None` selects everything the settings allow
    pub constraint: Option<Constraint>,

    pub orderings: Orderings,

    pub limit: Option<u64>,

    pub offset: Option<u64>,

    pub settings: QuerySettings,
}

impl Select {
    pub fn new(class_name: impl Into<String>, source: impl Into<Source>) -> Self {
        Self {
            class_name: class_name.into(),
            source: source.into(),
            constraint: None,
            orderings: Orderings::new(),
            limit: None,
            offset: None,
            settings: QuerySettings::default(),
        }
    }

    pub fn selector_name(&self) -> &str {
        self.source.selector_name()
    }
}
