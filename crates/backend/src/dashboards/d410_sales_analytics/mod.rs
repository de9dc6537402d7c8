pub mod generation;
pub mod repository;
pub mod service;
pub mod top_set;

pub use service::{DashboardService, RefreshOutcome};
