use serde_json::Value;
use std::collections::HashMap;

use contracts::shared::charts::StackedSeries;

/// Coerce a JSON value into a finite number.
///
/// Numbers pass through, numeric strings are parsed, booleans count as 0/1.
/// Null, non-numeric text, NaN/infinite values and containers become 0.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Running total: slot `i` is the sum of input slots `0..=i`
pub fn cumulative_sum(series: &[f64]) -> Vec<f64> {
    series
        .iter()
        .scan(0.0, |run, v| {
            *run += v;
            Some(*run)
        })
        .collect()
}

/// Cumulative variant of every group of a stacked structure
pub fn cumulative_per_group(stacked: &StackedSeries) -> StackedSeries {
    StackedSeries {
        labels: stacked.labels.clone(),
        groups: stacked.groups.clone(),
        series_by_group: stacked
            .series_by_group
            .iter()
            .map(|(g, s)| (g.clone(), cumulative_sum(s)))
            .collect(),
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Each group's share of the cross-group total at every index, in percent
/// rounded to 2 decimals. Indices whose total is zero yield 0 for every group.
/// Slots missing from a short series count as 0.
pub fn percent_of_total_per_index(
    series_by_group: &HashMap<String, Vec<f64>>,
    axis_len: usize,
) -> HashMap<String, Vec<f64>> {
    let slot = |s: &[f64], i: usize| s.get(i).copied().unwrap_or(0.0);

    let totals: Vec<f64> = (0..axis_len)
        .map(|i| series_by_group.values().map(|s| slot(s, i)).sum())
        .collect();

    series_by_group
        .iter()
        .map(|(g, s)| {
            let pct = totals
                .iter()
                .enumerate()
                .map(|(i, &total)| {
                    if total == 0.0 {
                        0.0
                    } else {
                        round_to(slot(s, i) / total * 100.0, 2)
                    }
                })
                .collect();
            (g.clone(), pct)
        })
        .collect()
}

/// Percent-of-total variant of a stacked structure
pub fn percent_stacks(stacked: &StackedSeries) -> StackedSeries {
    StackedSeries {
        labels: stacked.labels.clone(),
        groups: stacked.groups.clone(),
        series_by_group: percent_of_total_per_index(&stacked.series_by_group, stacked.axis_len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use serde_json::json;

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(to_number(&json!(12.5)), 12.5);
        assert_eq!(to_number(&json!("7")), 7.0);
        assert_eq!(to_number(&json!(" 3.25 ")), 3.25);
        assert_eq!(to_number(&json!("abc")), 0.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&Value::Null), 0.0);
        assert_eq!(to_number(&json!("NaN")), 0.0);
        assert_eq!(to_number(&json!("inf")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_cumulative_sum() {
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn test_percent_sums_to_hundred_or_zero() {
        let by_group = hashmap! {
            "A".to_string() => vec![1.0, 0.0, 2.0],
            "B".to_string() => vec![2.0, 0.0, 0.0],
            "C".to_string() => vec![0.0, 0.0, 7.0],
        };
        let pct = percent_of_total_per_index(&by_group, 3);
        for i in 0..3 {
            let sum: f64 = pct.values().map(|s| s[i]).sum();
            if i == 1 {
                assert_eq!(sum, 0.0);
            } else {
                assert!((sum - 100.0).abs() <= 0.01, "index {i} sums to {sum}");
            }
        }
        assert_eq!(pct["A"][0], 33.33);
        assert_eq!(pct["B"][0], 66.67);
        assert_eq!(pct["C"][2], 77.78);
    }

    #[test]
    fn test_percent_short_series_padded() {
        let by_group = hashmap! {
            "A".to_string() => vec![5.0],
            "B".to_string() => vec![5.0, 4.0],
        };
        let pct = percent_of_total_per_index(&by_group, 2);
        assert_eq!(pct["A"], vec![50.0, 0.0]);
        assert_eq!(pct["B"], vec![50.0, 100.0]);
    }

    #[test]
    fn test_cumulative_per_group_keeps_order() {
        let stacked = StackedSeries {
            labels: vec!["1".into(), "2".into()],
            groups: vec!["B".into(), "A".into()],
            series_by_group: hashmap! {
                "A".to_string() => vec![1.0, 1.0],
                "B".to_string() => vec![2.0, 3.0],
            },
        };
        let cum = cumulative_per_group(&stacked);
        assert_eq!(cum.groups, vec!["B", "A"]);
        assert_eq!(cum.series("B"), Some(&[2.0, 5.0][..]));
    }
}
