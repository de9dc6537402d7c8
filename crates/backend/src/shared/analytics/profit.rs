use contracts::dashboards::d410_sales_analytics::ProfitRow;

use super::numeric::to_number;
use super::periods::{parse_period, MONTHS_IN_AXIS};

/// Monthly profit components over a fixed 12-month axis
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitSeries {
    pub gross: Vec<f64>,
    /// Sales deduction
    pub sd: Vec<f64>,
    pub cogs: Vec<f64>,
    pub op_cost: Vec<f64>,
    pub profit_pct: Vec<f64>,
}

impl ProfitSeries {
    pub fn total_cost(&self, month_index: usize) -> f64 {
        self.sd[month_index] + self.cogs[month_index] + self.op_cost[month_index]
    }
}

/// Align profit rows to Jan..Dec. Missing months are zero, repeated months
/// accumulate, months outside 1..=12 are dropped.
pub fn profit_by_month(rows: &[ProfitRow]) -> ProfitSeries {
    let mut series = ProfitSeries {
        gross: vec![0.0; MONTHS_IN_AXIS],
        sd: vec![0.0; MONTHS_IN_AXIS],
        cogs: vec![0.0; MONTHS_IN_AXIS],
        op_cost: vec![0.0; MONTHS_IN_AXIS],
        profit_pct: vec![0.0; MONTHS_IN_AXIS],
    };

    for row in rows {
        let Some(month) = parse_period(&row.month) else {
            continue;
        };
        if !(1..=MONTHS_IN_AXIS as i64).contains(&month) {
            continue;
        }
        let i = (month - 1) as usize;
        series.gross[i] += to_number(&row.gross);
        series.sd[i] += to_number(&row.sd);
        series.cogs[i] += to_number(&row.cogs);
        series.op_cost[i] += to_number(&row.op_cost);
    }

    for i in 0..MONTHS_IN_AXIS {
        let gross = series.gross[i];
        series.profit_pct[i] = if gross > 0.0 {
            (gross - series.total_cost(i)) / gross * 100.0
        } else {
            0.0
        };
    }

    series
}
