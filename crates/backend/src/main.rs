pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;

use std::sync::Arc;

use dashboards::d410_sales_analytics::DashboardService;
use shared::render::JsonRenderer;
use shared::upstream::HttpRowSource;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use contracts::dashboards::d410_sales_analytics::SalesFilters;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    tracing::info!(
        "Sales API: {} (timeout {}s), top_n={}, years={:?}",
        config.upstream.base_url,
        config.upstream.timeout_secs,
        config.dashboard.top_n,
        config.dashboard.years
    );

    let source = HttpRowSource::new(&config.upstream)?;
    let dashboard = DashboardService::new(Arc::new(source), Arc::new(JsonRenderer), &config);
    let state = AppState::new(dashboard);

    // Первичная загрузка графиков с фильтрами по умолчанию
    {
        let dashboard = state.dashboard.clone();
        tokio::spawn(async move {
            let outcome = dashboard.apply_filters(SalesFilters::default()).await;
            tracing::info!(
                "Initial refresh: {} charts, {} notifications",
                outcome.charts.len(),
                outcome.notifications.len()
            );
        });
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
