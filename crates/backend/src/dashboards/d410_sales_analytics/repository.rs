use contracts::dashboards::d410_sales_analytics::{Notification, ProfitRow, SalesFilters, SalesRow};
use contracts::enums::PeriodScope;

use crate::shared::upstream::{endpoints, RowSource, UpstreamResult};

/// Result of one fetch. A failed fetch yields no rows and a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub rows: Vec<T>,
    pub notification: Option<Notification>,
}

impl<T> Fetched<T> {
    pub fn ok(rows: Vec<T>) -> Self {
        Self {
            rows,
            notification: None,
        }
    }
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self::ok(Vec::new())
    }
}

fn degrade<T>(what: &str, result: UpstreamResult<Vec<T>>) -> Fetched<T> {
    match result {
        Ok(rows) => Fetched::ok(rows),
        Err(e) => {
            tracing::warn!("{} fetch failed: {}", what, e);
            Fetched {
                rows: Vec::new(),
                notification: Some(Notification::error(format!("Failed to load {}: {}", what, e))),
            }
        }
    }
}

/// Ungrouped actual totals of a scope
pub async fn get_sales(source: &dyn RowSource, scope: PeriodScope, filters: &SalesFilters) -> Fetched<SalesRow> {
    let endpoint = endpoints::sales(scope);
    degrade(&endpoint, source.fetch_rows(&endpoint, &filters.to_query_pairs()).await)
}

/// Ungrouped targets of a scope; the yearly scope has none
pub async fn get_targets(source: &dyn RowSource, scope: PeriodScope, filters: &SalesFilters) -> Fetched<SalesRow> {
    let Some(endpoint) = endpoints::target(scope) else {
        return Fetched::default();
    };
    degrade(&endpoint, source.fetch_rows(&endpoint, &filters.to_query_pairs()).await)
}

/// Rows grouped by `filters.group_by`
pub async fn get_breakdown(source: &dyn RowSource, scope: PeriodScope, filters: &SalesFilters) -> Fetched<SalesRow> {
    let endpoint = endpoints::breakdown(scope);
    degrade(&endpoint, source.fetch_rows(&endpoint, &filters.to_breakdown_pairs()).await)
}

pub async fn get_profit(source: &dyn RowSource, filters: &SalesFilters) -> Fetched<ProfitRow> {
    degrade(endpoints::PROFIT_MONTHLY, source.fetch_profit(&filters.to_query_pairs()).await)
}

/// Reference "top customers" list: the `limit` largest sold-to names for the
/// category and metric, with every other filter left open
pub async fn get_top_names(source: &dyn RowSource, filters: &SalesFilters, limit: usize) -> Fetched<String> {
    let reference = SalesFilters {
        metric: filters.metric,
        category: filters.category.clone(),
        group_by: filters.group_by,
        top_limit: limit as u32,
        ..Default::default()
    };
    degrade(
        endpoints::SOLD_TO_NAMES,
        source.fetch_names(endpoints::SOLD_TO_NAMES, &reference.to_query_pairs()).await,
    )
}
