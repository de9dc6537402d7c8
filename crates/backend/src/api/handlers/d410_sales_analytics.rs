use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::dashboards::d410_sales_analytics::{KpiRow, RefreshResponse, SalesFilters};
use contracts::shared::charts::ChartSpec;

use crate::shared::analytics::kpi::KpiDisplayRow;
use crate::state::AppState;

/// GET /api/d410/filters
pub async fn get_filters(State(state): State<AppState>) -> Json<SalesFilters> {
    Json(state.dashboard.current_filters().await)
}

/// POST /api/d410/filters
pub async fn apply_filters(
    State(state): State<AppState>,
    Json(filters): Json<SalesFilters>,
) -> Json<RefreshResponse> {
    tracing::info!(
        "D410 Dashboard: applying filters (category={}, region={}, group_by={})",
        filters.category,
        filters.region,
        filters.group_by
    );

    let outcome = state.dashboard.apply_filters(filters).await;
    if !outcome.notifications.is_empty() {
        tracing::warn!(
            "D410 Dashboard: refresh {} finished with {} notifications",
            outcome.generation,
            outcome.notifications.len()
        );
    }
    Json(outcome.to_response())
}

/// GET /api/d410/charts
pub async fn list_charts(State(state): State<AppState>) -> Json<Vec<ChartSpec>> {
    Json(state.dashboard.charts().await)
}

/// GET /api/d410/charts/:id
pub async fn get_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChartSpec>, StatusCode> {
    match state.dashboard.chart(&id).await {
        Some(chart) => Ok(Json(chart)),
        None => {
            tracing::warn!("D410 Dashboard: chart {} not found", id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// GET /api/d410/kpi
pub async fn get_kpi(State(state): State<AppState>) -> Json<Vec<KpiRow>> {
    Json(state.dashboard.kpi_table().await)
}

/// GET /api/d410/kpi/display
pub async fn get_kpi_display(State(state): State<AppState>) -> Json<Vec<KpiDisplayRow>> {
    let rows = state.dashboard.kpi_table().await;
    Json(rows.iter().map(KpiDisplayRow::from).collect())
}
