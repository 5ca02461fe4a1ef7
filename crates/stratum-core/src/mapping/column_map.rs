use crate::stmt::{Orderings, Value};
use indexmap::IndexMap;
use std::fmt;

/// How a property relates to rows of another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relation {
    #[default]
    None,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

/// How a DateTime property is stored in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeStorageFormat {
    /// `Y-m-d`
    Date,
    /// `Y-m-d H:i:s`
    DateTime,
    /// `H:i:s`
    Time,
}

/// Maps one property of a class onto a column of its table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub column_name: String,

    pub property_name: String,

    pub relation: Relation,

    /// Table the related objects live in
    pub child_table_name: Option<String>,

    /// Orderings applied when the child table has no sort field
    pub child_table_default_sortings: Option<String>,

    /// Column that orders related rows
    pub child_sort_by_field_name: Option<String>,

    /// Junction table of a many-to-many relation
    pub relation_table_name: Option<String>,

    pub relation_table_match_fields: IndexMap<String, Value>,

    pub relation_table_insert_fields: IndexMap<String, Value>,

    /// Column of the child (or junction) table that points at the parent
    pub parent_key_field_name: Option<String>,

    /// Column of the child table that holds the parent's table name
    pub parent_table_field_name: Option<String>,

    /// Column of the junction table that points at the child
    pub child_key_field_name: Option<String>,

    /// Extra constraints on the child table, for to-one and to-many
    /// relations
    pub relation_match_fields: IndexMap<String, Value>,

    /// `None` when DateTime values are stored as timestamps
    pub date_time_storage_format: Option<DateTimeStorageFormat>,
}

impl ColumnMap {
    pub fn new(column_name: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            property_name: property_name.into(),
            relation: Relation::None,
            child_table_name: None,
            child_table_default_sortings: None,
            child_sort_by_field_name: None,
            relation_table_name: None,
            relation_table_match_fields: IndexMap::new(),
            relation_table_insert_fields: IndexMap::new(),
            parent_key_field_name: None,
            parent_table_field_name: None,
            child_key_field_name: None,
            relation_match_fields: IndexMap::new(),
            date_time_storage_format: None,
        }
    }

    pub fn is_relation(&self) -> bool {
        self.relation != Relation::None
    }

    /// Parses `foreign_default_sortby` (`title DESC, uid`) into orderings.
    pub fn default_orderings(&self) -> Orderings {
        use crate::stmt::Direction;

        let mut orderings = Orderings::new();
        let Some(sortings) = &self.child_table_default_sortings else {
            return orderings;
        };

        for part in sortings.split(',') {
            let mut words = part.split_whitespace();
            let Some(field) = words.next() else {
                continue;
            };

            let direction = match words.next() {
                Some(direction) if direction.eq_ignore_ascii_case("desc") => Direction::Descending,
                _ => Direction::Ascending,
            };

            let field = field.rsplit('.').next().unwrap_or(field);
            orderings.insert(field.to_string(), direction);
        }

        orderings
    }
}

impl DateTimeStorageFormat {
    pub fn from_db_type(db_type: &str) -> Option<Self> {
        match db_type {
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            "time" => Some(Self::Time),
            _ => None,
        }
    }

    /// The zero value stored for an empty date.
    pub fn empty_value(self) -> &'static str {
        match self {
            Self::Date => "0000-00-00",
            Self::DateTime => "0000-00-00 00:00:00",
            Self::Time => "00:00:00",
        }
    }

    /// `chrono` format string of the stored representation.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Date => "%Y-%m-%d",
            Self::DateTime => "%Y-%m-%d %H:%M:%S",
            Self::Time => "%H:%M:%S",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => "none".fmt(f),
            Self::HasOne => "one-to-one".fmt(f),
            Self::HasMany => "one-to-many".fmt(f),
            Self::HasAndBelongsToMany => "many-to-many".fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::Direction;

    #[test]
    fn default_orderings_parse_directions() {
        let mut column_map = ColumnMap::new("comments", "comments");
        column_map.child_table_default_sortings =
            Some("tx_blog_comment.date DESC, title".to_string());

        let orderings = column_map.default_orderings();
        assert_eq!(orderings.len(), 2);
        assert_eq!(orderings["date"], Direction::Descending);
        assert_eq!(orderings["title"], Direction::Ascending);
    }
}
