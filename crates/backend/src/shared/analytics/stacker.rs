use contracts::dashboards::d410_sales_analytics::SalesRow;
use contracts::shared::charts::StackedSeries;
use std::collections::{HashMap, HashSet};

use super::numeric::to_number;
use super::periods::{align_totals, PeriodAxis};

/// Group key of the single-series fallback
pub const TOTAL_GROUP: &str = "Total";

/// Distinct non-empty group labels in first-seen order
pub fn discover_groups(rows: &[SalesRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(SalesRow::group_key)
        .filter(|g| seen.insert(*g))
        .map(str::to_string)
        .collect()
}

/// Priority keys first (in priority order, when present), then the rest in
/// discovery order
pub fn order_groups(discovered: Vec<String>, priority: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = priority
        .iter()
        .filter(|p| discovered.contains(p))
        .cloned()
        .collect();
    ordered.extend(discovered.into_iter().filter(|g| !priority.contains(g)));
    ordered
}

/// Stack rows by group label over a fixed axis.
///
/// Rows with an empty/absent label or a period outside the axis do not
/// contribute. Every group's series has exactly the axis length.
pub fn build_stacks(rows: &[SalesRow], axis: &PeriodAxis, priority: &[String]) -> StackedSeries {
    let groups = order_groups(discover_groups(rows), priority);

    let mut series_by_group: HashMap<String, Vec<f64>> =
        groups.iter().map(|g| (g.clone(), axis.zeros())).collect();

    for row in rows {
        let Some(group) = row.group_key() else {
            continue;
        };
        let Some(slot) = axis.slot(row) else {
            continue;
        };
        if let Some(series) = series_by_group.get_mut(group) {
            series[slot] += to_number(&row.value);
        }
    }

    StackedSeries {
        labels: axis.labels(),
        groups,
        series_by_group,
    }
}

/// Single `"Total"` group built from ungrouped totals, used when a breakdown
/// returns no rows at all
pub fn total_fallback(total_rows: &[SalesRow], axis: &PeriodAxis) -> StackedSeries {
    let mut series_by_group = HashMap::new();
    series_by_group.insert(TOTAL_GROUP.to_string(), align_totals(total_rows, axis));
    StackedSeries {
        labels: axis.labels(),
        groups: vec![TOTAL_GROUP.to_string()],
        series_by_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::PeriodScope;

    fn regions() -> Vec<String> {
        ["NSW", "QLD", "VIC", "SA", "WA", "COMMON"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_priority_order_beats_arrival_order() {
        let rows = vec![
            SalesRow::new(5).with_group("QLD").with_month(1),
            SalesRow::new(3).with_group("NSW").with_month(1),
        ];
        let stacked = build_stacks(&rows, &PeriodAxis::months(), &regions());
        assert_eq!(stacked.groups, vec!["NSW", "QLD"]);
        assert_eq!(stacked.series("NSW").unwrap()[0], 3.0);
        assert_eq!(stacked.series("QLD").unwrap()[0], 5.0);
        assert!(stacked.series("NSW").unwrap()[1..].iter().all(|v| *v == 0.0));
        assert_eq!(stacked.series("QLD").unwrap().len(), 12);
    }

    #[test]
    fn test_unknown_groups_follow_in_discovery_order() {
        let rows = vec![
            SalesRow::new(1).with_group("ZETA").with_day(2),
            SalesRow::new(1).with_group("COMMON").with_day(2),
            SalesRow::new(1).with_group("ALPHA").with_day(2),
            SalesRow::new(1).with_group("WA").with_day(2),
            SalesRow::new(1).with_group("ZETA").with_day(3),
        ];
        let stacked = build_stacks(&rows, &PeriodAxis::days(), &regions());
        assert_eq!(stacked.groups, vec!["WA", "COMMON", "ZETA", "ALPHA"]);
        assert_eq!(stacked.series("ZETA").unwrap()[1..3], [1.0, 1.0]);
    }

    #[test]
    fn test_empty_label_rows_are_excluded() {
        let rows = vec![SalesRow::new(100).with_group("").with_month(1)];
        let stacked = build_stacks(&rows, &PeriodAxis::months(), &regions());
        assert!(stacked.groups.is_empty());
        assert!(stacked.series_by_group.is_empty());
    }

    #[test]
    fn test_out_of_range_period_dropped_but_group_kept() {
        let axis = PeriodAxis::new(PeriodScope::Year, &[2021, 2022, 2023, 2024, 2025]);
        let rows = vec![
            SalesRow::new(10).with_group("NSW").with_year(2019),
            SalesRow::new("4").with_group("NSW").with_year(2024),
            SalesRow::new("junk").with_group("NSW").with_year(2024),
        ];
        let stacked = build_stacks(&rows, &axis, &regions());
        assert_eq!(stacked.groups, vec!["NSW"]);
        assert_eq!(stacked.series("NSW").unwrap(), &[0.0, 0.0, 0.0, 4.0, 0.0]);
    }

    #[test]
    fn test_empty_input() {
        let stacked = build_stacks(&[], &PeriodAxis::days(), &regions());
        assert!(stacked.is_empty());
        assert_eq!(stacked.labels.len(), 31);
    }

    #[test]
    fn test_total_fallback_single_group() {
        let totals = vec![SalesRow::new(2).with_day(1), SalesRow::new(3).with_day(31)];
        let stacked = total_fallback(&totals, &PeriodAxis::days());
        assert_eq!(stacked.groups, vec![TOTAL_GROUP]);
        let s = stacked.series(TOTAL_GROUP).unwrap();
        assert_eq!((s[0], s[30]), (2.0, 3.0));
    }
}
