use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::enums::{GroupBy, Metric, PeriodScope};

/// Wildcard value of every text filter
pub const ALL: &str = "ALL";

fn all() -> String {
    ALL.to_string()
}

/// Accepts a string, a number or null for a group label.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Rows returned by the sales API
// ---------------------------------------------------------------------------

/// One aggregated row from a sales/target/breakdown endpoint.
///
/// `value` and the period fields are kept as raw JSON because the API sends
/// numbers and numeric strings interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    #[serde(default)]
    pub value: Value,
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
}

impl SalesRow {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            group_label: None,
            day: None,
            month: None,
            year: None,
        }
    }

    pub fn with_group(mut self, label: &str) -> Self {
        self.group_label = Some(label.to_string());
        self
    }

    pub fn with_day(mut self, day: i64) -> Self {
        self.day = Some(day.into());
        self
    }

    pub fn with_month(mut self, month: i64) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Group key, `None` when absent or empty
    pub fn group_key(&self) -> Option<&str> {
        self.group_label.as_deref().filter(|g| !g.is_empty())
    }

    /// Raw period field for the given scope
    pub fn period_value(&self, scope: PeriodScope) -> Option<&Value> {
        match scope {
            PeriodScope::Day => self.day.as_ref(),
            PeriodScope::Month => self.month.as_ref(),
            PeriodScope::Year => self.year.as_ref(),
        }
    }
}

/// One month of the profit endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRow {
    #[serde(default)]
    pub month: Value,
    #[serde(default)]
    pub gross: Value,
    /// Sales deduction
    #[serde(default)]
    pub sd: Value,
    #[serde(default)]
    pub cogs: Value,
    #[serde(default)]
    pub op_cost: Value,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Filter set driving one dashboard refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilters {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default = "all")]
    pub category: String,
    #[serde(default = "all")]
    pub region: String,
    #[serde(default = "all")]
    pub salesman: String,
    #[serde(default = "all")]
    pub sold_to_group: String,
    #[serde(default = "all")]
    pub sold_to: String,
    #[serde(default = "all")]
    pub ship_to: String,
    #[serde(default = "all")]
    pub product_group: String,
    #[serde(default = "all")]
    pub pattern: String,
    #[serde(default)]
    pub group_by: GroupBy,
    /// 0 = unbounded
    #[serde(default)]
    pub top_limit: u32,
}

impl Default for SalesFilters {
    fn default() -> Self {
        Self {
            metric: Metric::Qty,
            category: all(),
            region: all(),
            salesman: all(),
            sold_to_group: all(),
            sold_to: all(),
            ship_to: all(),
            product_group: all(),
            pattern: all(),
            group_by: GroupBy::Region,
            top_limit: 0,
        }
    }
}

impl SalesFilters {
    /// Query parameters for a totals/target endpoint
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("metric", self.metric.code().to_string()),
            ("category", self.category.clone()),
            ("region", self.region.clone()),
            ("salesman", self.salesman.clone()),
            ("sold_to_group", self.sold_to_group.clone()),
            ("sold_to", self.sold_to.clone()),
            ("ship_to", self.ship_to.clone()),
            ("product_group", self.product_group.clone()),
            ("pattern", self.pattern.clone()),
            ("top_limit", self.top_limit.to_string()),
        ]
    }

    /// Query parameters for a breakdown endpoint
    pub fn to_breakdown_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.to_query_pairs();
        pairs.push(("group_by", self.group_by.code().to_string()));
        pairs
    }

    /// Same filters narrowed to one region/salesman pair
    pub fn with_scope(&self, region: &str, salesman: &str) -> Self {
        Self {
            region: region.to_string(),
            salesman: salesman.to_string(),
            ..self.clone()
        }
    }

    /// Cache key of the "top customers" reference set
    pub fn top_set_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.category,
            self.metric.code(),
            self.group_by.code()
        )
    }
}

// ---------------------------------------------------------------------------
// KPI table
// ---------------------------------------------------------------------------

/// One line of the achievement-by-region table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    pub region: String,
    pub salesman: String,
    /// Cumulative achievement of the current month, in percent
    pub this_month: Option<f64>,
    /// Q1..Q4 achievement, in percent
    pub quarters: [Option<f64>; 4],
}

// ---------------------------------------------------------------------------
// API responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// Non-fatal notice surfaced to the user (e.g. a failed fetch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Response of POST /api/d410/filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub generation: u64,
    /// False when a newer refresh superseded this one
    pub applied: bool,
    pub chart_ids: Vec<String>,
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accepts_numeric_strings_and_nulls() {
        let json = r#"[
            {"value": "12.5", "group_label": "NSW", "month": "3"},
            {"value": 4, "group_label": null, "day": 7},
            {"value": null, "group_label": 1020, "year": 2024}
        ]"#;
        let rows: Vec<SalesRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].group_key(), Some("NSW"));
        assert_eq!(rows[0].period_value(PeriodScope::Month), Some(&Value::from("3")));
        assert_eq!(rows[1].group_key(), None);
        assert_eq!(rows[2].group_key(), Some("1020"));
        assert!(rows[2].value.is_null());
    }

    #[test]
    fn test_empty_label_is_no_group() {
        let row = SalesRow::new(100).with_group("").with_month(1);
        assert_eq!(row.group_key(), None);
    }

    #[test]
    fn test_filters_defaults_from_partial_json() {
        let f: SalesFilters =
            serde_json::from_str(r#"{"metric":"amount","group_by":"sold_to"}"#).unwrap();
        assert_eq!(f.metric, Metric::Amount);
        assert_eq!(f.region, ALL);
        assert_eq!(f.group_by, GroupBy::SoldTo);
        assert_eq!(f.top_limit, 0);
    }

    #[test]
    fn test_top_set_key_ignores_region() {
        let base = SalesFilters::default();
        let narrowed = base.with_scope("NSW", "Lee Don");
        assert_eq!(base.top_set_key(), narrowed.top_set_key());
        assert_eq!(base.top_set_key(), "ALL|qty|region");
    }

    #[test]
    fn test_breakdown_pairs_carry_group_by() {
        let f = SalesFilters {
            group_by: GroupBy::Pattern,
            ..Default::default()
        };
        let pairs = f.to_breakdown_pairs();
        assert!(pairs.contains(&("group_by", "pattern".to_string())));
        assert!(!f.to_query_pairs().iter().any(|(k, _)| *k == "group_by"));
    }
}
