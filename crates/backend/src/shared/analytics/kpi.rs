use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d410_sales_analytics::KpiRow;
use serde::Serialize;

use super::numeric::round_to;

/// Quarter (0..=3) of a zero-based month index
pub fn quarter_of(month_index: usize) -> usize {
    month_index / 3
}

/// Last month counted by the quarterly KPI: the month before `today`,
/// clamped to January
pub fn previous_month_index(today: NaiveDate) -> usize {
    today.month0().saturating_sub(1) as usize
}

/// Quarterly achievement over monthly series, counting only months
/// `0..=last_month_index`. A quarter without target has no value.
pub fn kpi_by_quarter(actual: &[f64], target: &[f64], last_month_index: usize) -> [Option<f64>; 4] {
    let mut a = [0.0; 4];
    let mut t = [0.0; 4];

    for m in 0..=last_month_index.min(11) {
        let q = quarter_of(m);
        a[q] += actual.get(m).copied().unwrap_or(0.0);
        t[q] += target.get(m).copied().unwrap_or(0.0);
    }

    let mut out = [None; 4];
    for q in 0..4 {
        if t[q] > 0.0 {
            out[q] = Some(round_to(a[q] / t[q] * 100.0, 1));
        }
    }
    out
}

/// Final cumulative achievement over a daily series, `None` when the
/// cumulative target never turns positive
pub fn daily_kpi_from_series(actual: &[f64], target: &[f64]) -> Option<f64> {
    let len = actual.len().max(target.len());
    let mut a_cum = 0.0;
    let mut t_cum = 0.0;
    let mut last = None;

    for i in 0..len {
        a_cum += actual.get(i).copied().unwrap_or(0.0);
        t_cum += target.get(i).copied().unwrap_or(0.0);
        if t_cum > 0.0 {
            last = Some(a_cum / t_cum * 100.0);
        }
    }

    last.map(|v| round_to(v, 1))
}

/// Series behind one KPI line
#[derive(Debug, Clone, Default)]
pub struct KpiInputs {
    pub monthly_actual: Vec<f64>,
    pub monthly_target: Vec<f64>,
    pub daily_actual: Vec<f64>,
    pub daily_target: Vec<f64>,
}

pub fn build_kpi_row(region: &str, salesman: &str, inputs: &KpiInputs, last_month_index: usize) -> KpiRow {
    KpiRow {
        region: region.to_string(),
        salesman: salesman.to_string(),
        this_month: daily_kpi_from_series(&inputs.daily_actual, &inputs.daily_target),
        quarters: kpi_by_quarter(&inputs.monthly_actual, &inputs.monthly_target, last_month_index),
    }
}

/// Colour band of an achievement value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpiBand {
    Good,
    Warning,
    Bad,
    Empty,
}

impl KpiBand {
    pub fn classify(value: Option<f64>) -> Self {
        match value {
            None => KpiBand::Empty,
            Some(v) if v >= 100.0 => KpiBand::Good,
            Some(v) if v >= 90.0 => KpiBand::Warning,
            Some(_) => KpiBand::Bad,
        }
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "-".to_string(),
    }
}

/// Formatted KPI value with its colour band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCell {
    pub text: String,
    pub band: KpiBand,
}

impl KpiCell {
    pub fn from_value(value: Option<f64>) -> Self {
        Self {
            text: format_percent(value),
            band: KpiBand::classify(value),
        }
    }
}

/// KPI row as shown in the achievement table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDisplayRow {
    pub region: String,
    pub salesman: String,
    pub this_month: KpiCell,
    pub quarters: Vec<KpiCell>,
}

impl From<&KpiRow> for KpiDisplayRow {
    fn from(row: &KpiRow) -> Self {
        Self {
            region: row.region.clone(),
            salesman: row.salesman.clone(),
            this_month: KpiCell::from_value(row.this_month),
            quarters: row.quarters.iter().map(|q| KpiCell::from_value(*q)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_month_index() {
        let d = |m| NaiveDate::from_ymd_opt(2025, m, 15).unwrap();
        assert_eq!(previous_month_index(d(1)), 0);
        assert_eq!(previous_month_index(d(2)), 0);
        assert_eq!(previous_month_index(d(11)), 9);
    }

    #[test]
    fn test_kpi_by_quarter_stops_at_last_month() {
        let actual = vec![10.0; 12];
        let mut target = vec![10.0; 12];
        target[3] = 20.0;
        // through May: Q1 complete, Q2 has Apr + May
        let q = kpi_by_quarter(&actual, &target, 4);
        assert_eq!(q[0], Some(100.0));
        assert_eq!(q[1], Some(66.7));
        assert_eq!(q[2], None);
        assert_eq!(q[3], None);
    }

    #[test]
    fn test_kpi_by_quarter_short_series() {
        let q = kpi_by_quarter(&[], &[], 11);
        assert_eq!(q, [None; 4]);
    }

    #[test]
    fn test_daily_kpi_from_series() {
        assert_eq!(daily_kpi_from_series(&[0.0, 5.0, 4.0], &[0.0, 6.0, 6.0]), Some(75.0));
        assert_eq!(daily_kpi_from_series(&[3.0, 3.0], &[0.0, 0.0]), None);
        assert_eq!(daily_kpi_from_series(&[1.0], &[3.0]), Some(33.3));
    }

    #[test]
    fn test_band_and_format() {
        assert_eq!(KpiBand::classify(Some(100.0)), KpiBand::Good);
        assert_eq!(KpiBand::classify(Some(95.5)), KpiBand::Warning);
        assert_eq!(KpiBand::classify(Some(12.0)), KpiBand::Bad);
        assert_eq!(KpiBand::classify(None), KpiBand::Empty);
        assert_eq!(format_percent(Some(101.26)), "101.3%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_build_kpi_row() {
        let inputs = KpiInputs {
            monthly_actual: vec![9.0, 9.0, 9.0],
            monthly_target: vec![10.0, 10.0, 10.0],
            daily_actual: vec![1.0, 1.0],
            daily_target: vec![1.0, 1.0],
        };
        let row = build_kpi_row("NSW", "Lee Don", &inputs, 2);
        assert_eq!(row.region, "NSW");
        assert_eq!(row.this_month, Some(100.0));
        assert_eq!(row.quarters[0], Some(90.0));
    }

    #[test]
    fn test_display_row() {
        let row = KpiRow {
            region: "QLD".to_string(),
            salesman: "Marsh Aaron".to_string(),
            this_month: Some(91.04),
            quarters: [Some(120.0), None, None, None],
        };
        let display = KpiDisplayRow::from(&row);
        assert_eq!(display.this_month.text, "91.0%");
        assert_eq!(display.this_month.band, KpiBand::Warning);
        assert_eq!(display.quarters[0].band, KpiBand::Good);
        assert_eq!(display.quarters[1].text, "-");
    }
}
