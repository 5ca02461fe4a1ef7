/// How translated records are overlaid onto records of the default
/// language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LanguageOverlay {
    /// Only records of the requested language are returned
    Off,
    /// Default language records with translations overlaid, untranslated
    /// records kept
    #[default]
    Mixed,
    /// Default language records with translations overlaid, untranslated
    /// records dropped
    On,
    /// Like `On`, plus records that only exist in the requested language
    OnWithFloating,
}

/// Storage-level restrictions applied when a query is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    respect_storage_page: bool,
    storage_page_ids: Vec<i64>,
    recursive: u32,
    respect_sys_language: bool,
    language_uid: i64,
    language_overlay: LanguageOverlay,
    ignore_enable_fields: bool,
    enable_fields_to_be_ignored: Vec<String>,
    include_deleted: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            respect_storage_page: true,
            storage_page_ids: vec![],
            recursive: 0,
            respect_sys_language: true,
            language_uid: 0,
            language_overlay: LanguageOverlay::default(),
            ignore_enable_fields: false,
            enable_fields_to_be_ignored: vec![],
            include_deleted: false,
        }
    }
}

impl QuerySettings {
    pub fn respect_storage_page(&self) -> bool {
        self.respect_storage_page
    }

    pub fn set_respect_storage_page(&mut self, respect: bool) -> &mut Self {
        self.respect_storage_page = respect;
        self
    }

    pub fn storage_page_ids(&self) -> &[i64] {
        &self.storage_page_ids
    }

    pub fn set_storage_page_ids(&mut self, ids: impl IntoIterator<Item = i64>) -> &mut Self {
        self.storage_page_ids = ids.into_iter().collect();
        self
    }

    /// Depth below the storage pages that is searched as well.
    pub fn recursive(&self) -> u32 {
        self.recursive
    }

    pub fn set_recursive(&mut self, depth: u32) -> &mut Self {
        self.recursive = depth;
        self
    }

    pub fn respect_sys_language(&self) -> bool {
        self.respect_sys_language
    }

    pub fn set_respect_sys_language(&mut self, respect: bool) -> &mut Self {
        self.respect_sys_language = respect;
        self
    }

    pub fn language_uid(&self) -> i64 {
        self.language_uid
    }

    pub fn set_language_uid(&mut self, language_uid: i64) -> &mut Self {
        self.language_uid = language_uid;
        self
    }

    pub fn language_overlay(&self) -> LanguageOverlay {
        self.language_overlay
    }

    pub fn set_language_overlay(&mut self, overlay: LanguageOverlay) -> &mut Self {
        self.language_overlay = overlay;
        self
    }

    pub fn ignore_enable_fields(&self) -> bool {
        self.ignore_enable_fields
    }

    pub fn set_ignore_enable_fields(&mut self, ignore: bool) -> &mut Self {
        self.ignore_enable_fields = ignore;
        self
    }

    /// Enable fields ignored when `ignore_enable_fields` is set. Empty means
    /// all of them.
    pub fn enable_fields_to_be_ignored(&self) -> &[String] {
        &self.enable_fields_to_be_ignored
    }

    pub fn set_enable_fields_to_be_ignored<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enable_fields_to_be_ignored = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_deleted(&self) -> bool {
        self.include_deleted
    }

    pub fn set_include_deleted(&mut self, include: bool) -> &mut Self {
        self.include_deleted = include;
        self
    }
}
