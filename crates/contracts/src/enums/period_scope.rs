use serde::{Deserialize, Serialize};

/// Period granularity of a chart axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodScope {
    Day,
    Month,
    Year,
}

impl PeriodScope {
    pub fn code(&self) -> &'static str {
        match self {
            PeriodScope::Day => "day",
            PeriodScope::Month => "month",
            PeriodScope::Year => "year",
        }
    }

    /// Prefix of the sales API endpoints for this scope
    /// (`daily_sales`, `monthly_target`, `yearly_breakdown`, ...)
    pub fn endpoint_prefix(&self) -> &'static str {
        match self {
            PeriodScope::Day => "daily",
            PeriodScope::Month => "monthly",
            PeriodScope::Year => "yearly",
        }
    }
}

impl std::fmt::Display for PeriodScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
