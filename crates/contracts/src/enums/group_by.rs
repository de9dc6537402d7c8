use serde::{Deserialize, Serialize};

/// Dimension a breakdown endpoint stacks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Region,
    Salesman,
    SoldToGroup,
    SoldTo,
    ProductGroup,
    Pattern,
}

impl GroupBy {
    pub fn code(&self) -> &'static str {
        match self {
            GroupBy::Region => "region",
            GroupBy::Salesman => "salesman",
            GroupBy::SoldToGroup => "sold_to_group",
            GroupBy::SoldTo => "sold_to",
            GroupBy::ProductGroup => "product_group",
            GroupBy::Pattern => "pattern",
        }
    }

    /// Whether stacked breakdowns by this dimension go through top-N reduction.
    /// Only the customer dimension has a "top customers of record" reference.
    pub fn reduces_to_top(&self) -> bool {
        matches!(self, GroupBy::SoldTo)
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
