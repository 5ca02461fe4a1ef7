use heck::{ToSnakeCase, ToUpperCamelCase};

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}

pub fn upper_camel_case(src: &str) -> String {
    src.to_upper_camel_case()
}

/// `title` -> `setTitle`
pub fn setter_name(property: &str) -> String {
    accessor_name("set", property)
}

pub(crate) fn accessor_name(prefix: &str, property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("{prefix}{}{}", first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Last segment of a namespaced class name.
pub fn short_class_name(class_name: &str) -> &str {
    class_name
        .rsplit_once('\\')
        .map(|(_, short)| short)
        .unwrap_or(class_name)
}

/// Derives the table name of a class that has no configured one.
///
/// Namespaced classes map to `tx_` followed by the lower-cased segments
/// after the vendor (`TYPO3\CMS\` counts as a two-segment vendor).
/// Everything else becomes the plural snake-case of the class name.
pub fn table_name_for_class(class_name: &str) -> String {
    let class_name = class_name.trim_start_matches('\\');
    let segments = class_name.split('\\').collect::<Vec<_>>();

    if segments.len() > 1 {
        let skip = if class_name.starts_with("TYPO3\\CMS\\") { 2 } else { 1 };
        let parts = segments[skip..]
            .iter()
            .map(|segment| segment.to_lowercase())
            .collect::<Vec<_>>();

        if !parts.is_empty() {
            return format!("tx_{}", parts.join("_"));
        }
    }

    pluralizer::pluralize(&snake_case(class_name), 2, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_table_names() {
        assert_eq!(
            table_name_for_class("Vendor\\BlogExample\\Domain\\Model\\Post"),
            "tx_blogexample_domain_model_post"
        );
        assert_eq!(
            table_name_for_class("TYPO3\\CMS\\Beuser\\Domain\\Model\\BackendUser"),
            "tx_beuser_domain_model_backenduser"
        );
    }

    #[test]
    fn plain_table_names_are_pluralized() {
        assert_eq!(table_name_for_class("BlogPost"), "blog_posts");
        assert_eq!(table_name_for_class("Category"), "categories");
    }

    #[test]
    fn accessor_names() {
        assert_eq!(setter_name("title"), "setTitle");
        assert_eq!(accessor_name("get", "firstName"), "getFirstName");
        assert_eq!(short_class_name("Vendor\\Ext\\Post"), "Post");
        assert_eq!(short_class_name("Post"), "Post");
    }
}
