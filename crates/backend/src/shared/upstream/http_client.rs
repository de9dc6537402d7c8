use async_trait::async_trait;
use contracts::dashboards::d410_sales_analytics::{ProfitRow, SalesRow};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::endpoints::PROFIT_MONTHLY;
use super::{QueryParams, RowSource, UpstreamError, UpstreamResult};
use crate::shared::config::UpstreamConfig;

/// HTTP-клиент API продаж
pub struct HttpRowSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRowSource {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Полный URL эндпоинта с query-строкой
    pub fn url_for(&self, endpoint: &str, params: &QueryParams) -> String {
        build_url(&self.base_url, endpoint, params)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &QueryParams) -> UpstreamResult<T> {
        let url = self.url_for(endpoint, params);
        tracing::debug!("Sales API: GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout { url: url.clone() }
                } else {
                    UpstreamError::Network {
                        url: url.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Sales API: {} for {}", status, url);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response.json::<T>().await.map_err(|e| UpstreamError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RowSource for HttpRowSource {
    async fn fetch_rows(&self, endpoint: &str, params: &QueryParams) -> UpstreamResult<Vec<SalesRow>> {
        let rows: Vec<SalesRow> = self.get_json(endpoint, params).await?;
        tracing::debug!("Sales API: {} -> {} rows", endpoint, rows.len());
        Ok(rows)
    }

    async fn fetch_names(&self, endpoint: &str, params: &QueryParams) -> UpstreamResult<Vec<String>> {
        self.get_json(endpoint, params).await
    }

    async fn fetch_profit(&self, params: &QueryParams) -> UpstreamResult<Vec<ProfitRow>> {
        self.get_json(PROFIT_MONTHLY, params).await
    }
}

fn build_url(base_url: &str, endpoint: &str, params: &QueryParams) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}/api/{}", base_url, endpoint)
    } else {
        format!("{}/api/{}?{}", base_url, endpoint, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_values() {
        let params = vec![("salesman", "Lee Don".to_string()), ("metric", "qty".to_string())];
        assert_eq!(
            build_url("http://host:5000", "daily_sales", &params),
            "http://host:5000/api/daily_sales?salesman=Lee%20Don&metric=qty"
        );
        assert_eq!(build_url("http://host", "sold_to_names", &vec![]), "http://host/api/sold_to_names");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = HttpRowSource::new(&UpstreamConfig {
            base_url: "http://host:5000/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(source.url_for("yearly_sales", &vec![]), "http://host:5000/api/yearly_sales");
    }
}
