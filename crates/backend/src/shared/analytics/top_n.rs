use contracts::shared::charts::StackedSeries;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Key of the aggregate of every group not kept
pub const OTHER_GROUP: &str = "Other";

/// Case-folded, whitespace-collapsed name used to match group keys against
/// the preferred set
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Build a preferred set from raw names
pub fn preferred_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| normalize_name(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTier {
    /// Kept groups are the intersection with the preferred set
    Preferred,
    /// Kept groups are the largest by series total
    Fallback,
}

/// Which groups survive a reduction, and which tier decided it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSelection {
    pub tier: SelectionTier,
    pub keep: Vec<String>,
}

fn series_total(series: Option<&Vec<f64>>) -> f64 {
    series.map(|s| s.iter().sum()).unwrap_or(0.0)
}

/// Two-tier keep policy.
///
/// 1. Groups whose normalized name is in `preferred`, in group order, with
///    no truncation.
/// 2. If that is empty: the `n` largest groups by series total, descending,
///    ties resolved by group order.
///
/// An existing `"Other"` group is never a keep candidate, so reducing an
/// already reduced structure is a no-op.
pub fn select_top(
    groups: &[String],
    series_by_group: &HashMap<String, Vec<f64>>,
    preferred: Option<&HashSet<String>>,
    n: usize,
) -> TopSelection {
    let candidates: Vec<&String> = groups.iter().filter(|g| *g != OTHER_GROUP).collect();

    if let Some(set) = preferred.filter(|s| !s.is_empty()) {
        let keep: Vec<String> = candidates
            .iter()
            .filter(|g| set.contains(&normalize_name(g)))
            .map(|g| (*g).clone())
            .collect();
        if !keep.is_empty() {
            return TopSelection {
                tier: SelectionTier::Preferred,
                keep,
            };
        }
    }

    let mut ranked: Vec<(&String, f64)> = candidates
        .into_iter()
        .map(|g| (g, series_total(series_by_group.get(g))))
        .collect();
    // stable: equal totals keep group order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    TopSelection {
        tier: SelectionTier::Fallback,
        keep: ranked.into_iter().take(n).map(|(g, _)| g.clone()).collect(),
    }
}

/// Result of collapsing a stacked structure to its kept groups
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub series: StackedSeries,
    pub selection: TopSelection,
}

/// Collapse to the selected groups plus an `"Other"` aggregate.
///
/// `"Other"` is the slot-wise sum of every group not kept and is appended
/// only when at least one of its slots is non-zero.
pub fn reduce_to_top(
    stacked: &StackedSeries,
    preferred: Option<&HashSet<String>>,
    n: usize,
) -> Reduction {
    let selection = select_top(&stacked.groups, &stacked.series_by_group, preferred, n);
    let len = stacked.axis_len();

    let mut series_by_group = HashMap::new();
    let mut other = vec![0.0; len];

    for group in &stacked.groups {
        let series = stacked.series_by_group.get(group);
        if selection.keep.contains(group) {
            series_by_group.insert(group.clone(), series.cloned().unwrap_or_else(|| vec![0.0; len]));
        } else if let Some(series) = series {
            for (slot, v) in other.iter_mut().zip(series) {
                *slot += v;
            }
        }
    }

    let mut groups = selection.keep.clone();
    if other.iter().any(|v| *v != 0.0) {
        series_by_group.insert(OTHER_GROUP.to_string(), other);
        groups.push(OTHER_GROUP.to_string());
    }

    Reduction {
        series: StackedSeries {
            labels: stacked.labels.clone(),
            groups,
            series_by_group,
        },
        selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::{hashmap, hashset};

    fn customers() -> StackedSeries {
        StackedSeries {
            labels: vec!["Jan".into()],
            groups: vec!["ACME".into(), "BETA".into(), "GAMMA".into()],
            series_by_group: hashmap! {
                "ACME".to_string() => vec![10.0],
                "BETA".to_string() => vec![50.0],
                "GAMMA".to_string() => vec![40.0],
            },
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  acme   pty\tltd "), "ACME PTY LTD");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_preferred_tier_overrides_magnitude() {
        let preferred = hashset! {"ACME".to_string()};
        let r = reduce_to_top(&customers(), Some(&preferred), 10);
        assert_eq!(r.selection.tier, SelectionTier::Preferred);
        assert_eq!(r.series.groups, vec!["ACME", OTHER_GROUP]);
        assert_eq!(r.series.series(OTHER_GROUP), Some(&[90.0][..]));
    }

    #[test]
    fn test_preferred_tier_not_truncated_to_n() {
        let stacked = StackedSeries {
            labels: vec!["Jan".into()],
            groups: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            series_by_group: hashmap! {
                "A".to_string() => vec![1.0],
                "B".to_string() => vec![2.0],
                "C".to_string() => vec![3.0],
                "D".to_string() => vec![4.0],
            },
        };
        let preferred = preferred_set(["a", "b", "c"]);
        let r = reduce_to_top(&stacked, Some(&preferred), 1);
        assert_eq!(r.selection.tier, SelectionTier::Preferred);
        assert_eq!(r.selection.keep, vec!["A", "B", "C"]);
        assert_eq!(r.series.groups, vec!["A", "B", "C", OTHER_GROUP]);
        assert_eq!(r.series.series(OTHER_GROUP), Some(&[4.0][..]));
    }

    #[test]
    fn test_preferred_match_is_normalized() {
        let preferred = preferred_set(["  gamma "]);
        let sel = select_top(&customers().groups, &customers().series_by_group, Some(&preferred), 1);
        assert_eq!(sel.tier, SelectionTier::Preferred);
        assert_eq!(sel.keep, vec!["GAMMA"]);
    }

    #[test]
    fn test_fallback_by_magnitude() {
        let r = reduce_to_top(&customers(), Some(&HashSet::new()), 2);
        assert_eq!(r.selection.tier, SelectionTier::Fallback);
        assert_eq!(r.series.groups, vec!["BETA", "GAMMA", OTHER_GROUP]);
        assert_eq!(r.series.series(OTHER_GROUP), Some(&[10.0][..]));
    }

    #[test]
    fn test_fallback_when_no_overlap() {
        let preferred = hashset! {"DELTA".to_string()};
        let r = reduce_to_top(&customers(), Some(&preferred), 1);
        assert_eq!(r.selection.tier, SelectionTier::Fallback);
        assert_eq!(r.series.groups, vec!["BETA", OTHER_GROUP]);
    }

    #[test]
    fn test_ties_keep_group_order() {
        let stacked = StackedSeries {
            labels: vec!["1".into()],
            groups: vec!["B".into(), "A".into(), "C".into()],
            series_by_group: hashmap! {
                "A".to_string() => vec![5.0],
                "B".to_string() => vec![5.0],
                "C".to_string() => vec![5.0],
            },
        };
        let sel = select_top(&stacked.groups, &stacked.series_by_group, None, 2);
        assert_eq!(sel.keep, vec!["B", "A"]);
    }

    #[test]
    fn test_other_omitted_when_all_zero() {
        let mut stacked = customers();
        stacked.series_by_group.insert("ACME".into(), vec![0.0]);
        let r = reduce_to_top(&stacked, None, 2);
        assert_eq!(r.series.groups, vec!["BETA", "GAMMA"]);
        assert!(r.series.series(OTHER_GROUP).is_none());
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let preferred = hashset! {"ACME".to_string()};
        let once = reduce_to_top(&customers(), Some(&preferred), 10);
        let twice = reduce_to_top(&once.series, Some(&preferred), 10);
        assert_eq!(once.series, twice.series);

        let once = reduce_to_top(&customers(), None, 2);
        let twice = reduce_to_top(&once.series, None, 2);
        assert_eq!(once.series, twice.series);
    }

    #[test]
    fn test_empty_structure() {
        let empty = StackedSeries::empty(vec!["Jan".into()]);
        let r = reduce_to_top(&empty, None, 10);
        assert!(r.series.groups.is_empty());
    }
}
