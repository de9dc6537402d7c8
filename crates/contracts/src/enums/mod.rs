pub mod group_by;
pub mod metric;
pub mod period_scope;

pub use group_by::GroupBy;
pub use metric::Metric;
pub use period_scope::PeriodScope;
