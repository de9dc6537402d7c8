use axum::{routing::get, Router};

use crate::api::handlers::d410_sales_analytics;
use crate::state::AppState;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D410 SALES ANALYTICS
        // ========================================
        .route(
            "/api/d410/filters",
            get(d410_sales_analytics::get_filters).post(d410_sales_analytics::apply_filters),
        )
        .route("/api/d410/charts", get(d410_sales_analytics::list_charts))
        .route("/api/d410/charts/:id", get(d410_sales_analytics::get_chart))
        .route("/api/d410/kpi", get(d410_sales_analytics::get_kpi))
        .route(
            "/api/d410/kpi/display",
            get(d410_sales_analytics::get_kpi_display),
        )
        .with_state(state)
}
