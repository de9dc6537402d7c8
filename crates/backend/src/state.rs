use std::sync::Arc;

use crate::dashboards::d410_sales_analytics::DashboardService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(dashboard: DashboardService) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}
