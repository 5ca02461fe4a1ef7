use crate::{events::Event, PersistenceManager, Query};

use stratum_core::{
    stmt::{QomFactory, QuerySettings, Select},
    Result,
};

/// Creates queries preconfigured from the persistence settings.
#[derive(Debug)]
pub struct QueryFactory<'a> {
    pm: &'a PersistenceManager,
}

impl<'a> QueryFactory<'a> {
    pub fn new(pm: &'a PersistenceManager) -> Self {
        Self { pm }
    }

    /// Creates a query selecting objects of `class_name` from its table.
    ///
    /// Queries are restricted to the configured storage pages unless the
    /// table lives on the root level or holds static data. When the
    /// `cacheTags` feature is on, the cache tags the query depends on are
    /// dispatched.
    pub fn create(&self, class_name: &str) -> Result<Query> {
        self.create_with(class_name, |_| {})
    }

    /// Like [`create`](Self::create), with `configure` adjusting the query
    /// settings before the cache tags are derived from them.
    pub fn create_with(
        &self,
        class_name: &str,
        configure: impl FnOnce(&mut QuerySettings),
    ) -> Result<Query> {
        let data_map = self.pm.data_map(class_name)?;
        let settings = self.pm.settings();

        let source = QomFactory.selector(Some(data_map.class_name.as_str()), &data_map.table_name);
        let mut select = Select::new(&data_map.class_name, source);

        select
            .settings
            .set_storage_page_ids(settings.storage_pid.iter().copied())
            .set_respect_storage_page(
                settings.respect_storage_page && !data_map.ignores_storage_page(),
            )
            .set_recursive(settings.recursive);

        configure(&mut select.settings);

        if settings.features.cache_tags {
            let query_settings = &select.settings;
            let tags = if !query_settings.respect_storage_page()
                || query_settings.storage_page_ids().is_empty()
            {
                vec![data_map.table_name.clone()]
            } else {
                query_settings
                    .storage_page_ids()
                    .iter()
                    .map(|pid| format!("{}_pid_{pid}", data_map.table_name))
                    .collect()
            };

            self.pm.dispatch(Event::AddCacheTags { tags });
        }

        Ok(Query::new(self.pm.clone(), select))
    }
}
