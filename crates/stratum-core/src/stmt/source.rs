/// Where a query reads its rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Selector(Selector),
    Join(Join),
}

/// Selects the objects of one class from one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Class of the selected objects; `None` for plain relation tables.
    pub node_type_name: Option<String>,

    /// Table name
    pub selector_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub left: Box<Source>,
    pub right: Box<Source>,
    pub join_type: JoinType,
    pub condition: EquiJoinCondition,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
}

/// `selector1.property1 = selector2.property2`
#[derive(Debug, Clone, PartialEq)]
pub struct EquiJoinCondition {
    pub selector1_name: String,
    pub property1_name: String,
    pub selector2_name: String,
    pub property2_name: String,
}

impl Source {
    /// Name of the selector constraints refer to by default. For joins this
    /// is the left-most selector.
    pub fn selector_name(&self) -> &str {
        match self {
            Self::Selector(selector) => &selector.selector_name,
            Self::Join(join) => join.left.selector_name(),
        }
    }

    /// Class of the objects the source produces. For joins this is the
    /// right-most typed selector.
    pub fn node_type_name(&self) -> Option<&str> {
        match self {
            Self::Selector(selector) => selector.node_type_name.as_deref(),
            Self::Join(join) => join
                .right
                .node_type_name()
                .or_else(|| join.left.node_type_name()),
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Self::Join(_))
    }

    #[track_caller]
    pub fn expect_join(&self) -> &Join {
        match self {
            Self::Join(join) => join,
            _ => panic!("expected join, but was {self:?}"),
        }
    }
}

impl From<Selector> for Source {
    fn from(value: Selector) -> Self {
        Self::Selector(value)
    }
}

impl From<Join> for Source {
    fn from(value: Join) -> Self {
        Self::Join(value)
    }
}
