//! Источник строк для дашборда: HTTP API продаж и его абстракция.

pub mod http_client;

use async_trait::async_trait;
use contracts::dashboards::d410_sales_analytics::{ProfitRow, SalesRow};
use thiserror::Error;

pub use http_client::HttpRowSource;

/// Ошибки обращения к API продаж
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Request timed out: {url}")]
    Timeout { url: String },
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Query-параметры одного запроса
pub type QueryParams = Vec<(&'static str, String)>;

/// Поставщик строк для преобразований дашборда
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Строки продаж/планов/разбивок: `daily_sales`, `monthly_breakdown` и т.д.
    async fn fetch_rows(&self, endpoint: &str, params: &QueryParams) -> UpstreamResult<Vec<SalesRow>>;

    /// Список имён (например, `sold_to_names` для эталонного топа клиентов)
    async fn fetch_names(&self, endpoint: &str, params: &QueryParams) -> UpstreamResult<Vec<String>>;

    /// Помесячная прибыль
    async fn fetch_profit(&self, params: &QueryParams) -> UpstreamResult<Vec<ProfitRow>>;
}

/// Имена эндпоинтов API продаж
pub mod endpoints {
    use contracts::enums::PeriodScope;

    pub const SOLD_TO_NAMES: &str = "sold_to_names";
    pub const PROFIT_MONTHLY: &str = "profit_monthly";

    pub fn sales(scope: PeriodScope) -> String {
        format!("{}_sales", scope.endpoint_prefix())
    }

    /// Планы есть только у дневного и месячного разрезов
    pub fn target(scope: PeriodScope) -> Option<String> {
        match scope {
            PeriodScope::Year => None,
            _ => Some(format!("{}_target", scope.endpoint_prefix())),
        }
    }

    pub fn breakdown(scope: PeriodScope) -> String {
        format!("{}_breakdown", scope.endpoint_prefix())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_endpoint_names() {
            assert_eq!(sales(PeriodScope::Day), "daily_sales");
            assert_eq!(target(PeriodScope::Month).as_deref(), Some("monthly_target"));
            assert_eq!(target(PeriodScope::Year), None);
            assert_eq!(breakdown(PeriodScope::Year), "yearly_breakdown");
        }
    }
}
