use contracts::dashboards::d410_sales_analytics::SalesRow;
use contracts::enums::PeriodScope;
use serde_json::Value;

use super::numeric::to_number;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const DAYS_IN_AXIS: usize = 31;
pub const MONTHS_IN_AXIS: usize = 12;

pub fn month_labels() -> Vec<String> {
    MONTH_LABELS.iter().map(|m| m.to_string()).collect()
}

pub fn day_labels() -> Vec<String> {
    (1..=DAYS_IN_AXIS).map(|d| d.to_string()).collect()
}

pub fn year_labels(years: &[i32]) -> Vec<String> {
    years.iter().map(|y| y.to_string()).collect()
}

/// Integer period from a raw JSON field, accepting `7`, `7.0` and `"7"`
pub fn parse_period(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Fixed, ordered axis of one scope. Its length never depends on data.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAxis {
    scope: PeriodScope,
    years: Vec<i32>,
}

impl PeriodAxis {
    pub fn new(scope: PeriodScope, years: &[i32]) -> Self {
        Self {
            scope,
            years: years.to_vec(),
        }
    }

    pub fn days() -> Self {
        Self::new(PeriodScope::Day, &[])
    }

    pub fn months() -> Self {
        Self::new(PeriodScope::Month, &[])
    }

    pub fn scope(&self) -> PeriodScope {
        self.scope
    }

    pub fn len(&self) -> usize {
        match self.scope {
            PeriodScope::Day => DAYS_IN_AXIS,
            PeriodScope::Month => MONTHS_IN_AXIS,
            PeriodScope::Year => self.years.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Vec<String> {
        match self.scope {
            PeriodScope::Day => day_labels(),
            PeriodScope::Month => month_labels(),
            PeriodScope::Year => year_labels(&self.years),
        }
    }

    /// Axis index of a period value, `None` when outside the axis
    pub fn slot_of(&self, period: i64) -> Option<usize> {
        match self.scope {
            PeriodScope::Day => in_range(period, DAYS_IN_AXIS),
            PeriodScope::Month => in_range(period, MONTHS_IN_AXIS),
            PeriodScope::Year => self.years.iter().position(|&y| i64::from(y) == period),
        }
    }

    /// Axis index a row contributes to
    pub fn slot(&self, row: &SalesRow) -> Option<usize> {
        row.period_value(self.scope)
            .and_then(parse_period)
            .and_then(|p| self.slot_of(p))
    }

    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.len()]
    }
}

fn in_range(period: i64, max: usize) -> Option<usize> {
    if period >= 1 && period <= max as i64 {
        Some((period - 1) as usize)
    } else {
        None
    }
}

/// Ungrouped totals aligned to the axis by each row's period field.
/// Rows without a usable period are dropped; repeated periods accumulate.
pub fn align_totals(rows: &[SalesRow], axis: &PeriodAxis) -> Vec<f64> {
    let mut out = axis.zeros();
    for row in rows {
        if let Some(i) = axis.slot(row) {
            out[i] += to_number(&row.value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const YEARS: [i32; 5] = [2021, 2022, 2023, 2024, 2025];

    #[test]
    fn test_axis_lengths_are_fixed() {
        assert_eq!(PeriodAxis::days().len(), 31);
        assert_eq!(PeriodAxis::months().len(), 12);
        assert_eq!(PeriodAxis::new(PeriodScope::Year, &YEARS).len(), 5);
        assert_eq!(month_labels()[11], "Dec");
        assert_eq!(day_labels()[0], "1");
        assert_eq!(year_labels(&YEARS)[4], "2025");
    }

    #[test]
    fn test_parse_period_variants() {
        assert_eq!(parse_period(&json!(7)), Some(7));
        assert_eq!(parse_period(&json!(7.9)), Some(7));
        assert_eq!(parse_period(&json!("12")), Some(12));
        assert_eq!(parse_period(&json!(" 3 ")), Some(3));
        assert_eq!(parse_period(&json!("x")), None);
        assert_eq!(parse_period(&Value::Null), None);
    }

    #[test]
    fn test_out_of_range_periods_have_no_slot() {
        let days = PeriodAxis::days();
        assert_eq!(days.slot_of(1), Some(0));
        assert_eq!(days.slot_of(31), Some(30));
        assert_eq!(days.slot_of(32), None);
        assert_eq!(days.slot_of(0), None);

        let years = PeriodAxis::new(PeriodScope::Year, &YEARS);
        assert_eq!(years.slot_of(2023), Some(2));
        assert_eq!(years.slot_of(2019), None);
    }

    #[test]
    fn test_align_totals_by_period() {
        let rows = vec![
            SalesRow::new(5).with_month(3),
            SalesRow::new("2.5").with_month(3),
            SalesRow::new(9).with_month(13),
            SalesRow::new(4),
            SalesRow::new(1).with_month(1),
        ];
        let totals = align_totals(&rows, &PeriodAxis::months());
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[0], 1.0);
        assert_eq!(totals[2], 7.5);
        assert_eq!(totals.iter().sum::<f64>(), 8.5);
    }
}
