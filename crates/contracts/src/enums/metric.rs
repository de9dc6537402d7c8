use serde::{Deserialize, Serialize};

/// Which measure the sales API aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Qty,
    Amount,
}

impl Metric {
    /// Query-string code expected by the sales API
    pub fn code(&self) -> &'static str {
        match self {
            Metric::Qty => "qty",
            Metric::Amount => "amount",
        }
    }

    /// Label of the actual-value bars on totals charts
    pub fn sales_label(&self) -> &'static str {
        match self {
            Metric::Qty => "SalesQty",
            Metric::Amount => "Sales Amount",
        }
    }

    /// Label of the cumulative actual-value bars
    pub fn cumulative_label(&self) -> &'static str {
        match self {
            Metric::Qty => "Cumulative Qty",
            Metric::Amount => "Cumulative Amount",
        }
    }

    /// Label of the yearly bars
    pub fn yearly_label(&self) -> &'static str {
        match self {
            Metric::Qty => "Yearly Qty",
            Metric::Amount => "Yearly Amount",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_codes() {
        assert_eq!(Metric::Amount.code(), "amount");
        assert_eq!(Metric::Qty.to_string(), "qty");
        assert_eq!(Metric::default(), Metric::Qty);
    }

    #[test]
    fn test_metric_serde() {
        let m: Metric = serde_json::from_str("\"amount\"").unwrap();
        assert_eq!(m, Metric::Amount);
        assert_eq!(serde_json::to_string(&Metric::Qty).unwrap(), "\"qty\"");
    }
}
