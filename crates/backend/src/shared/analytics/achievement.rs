use contracts::shared::charts::AchievementSeries;

use super::numeric::cumulative_sum;

/// Per-slot achievement in percent with carry-forward.
///
/// Rules, first match wins, `last` being the most recent computed ratio:
/// - target > 0 and actual > 0: `actual / target * 100`, becomes `last`
/// - target > 0, actual == 0 and `last` is set: repeat `last`
/// - otherwise: no value
///
/// A zero-actual slot under a live target is treated as "no new information"
/// rather than 0%. This is a business rule of the dashboard, not smoothing.
pub fn achievement_ratio(actual: &[f64], target: &[f64]) -> Vec<Option<f64>> {
    let len = actual.len().max(target.len());
    let mut last: Option<f64> = None;

    (0..len)
        .map(|i| {
            let a = actual.get(i).copied().unwrap_or(0.0);
            let t = target.get(i).copied().unwrap_or(0.0);
            if t > 0.0 && a > 0.0 {
                let ratio = a / t * 100.0;
                last = Some(ratio);
                Some(ratio)
            } else if t > 0.0 && a == 0.0 {
                last
            } else {
                None
            }
        })
        .collect()
}

/// Slot ratio and cumulative ratio, each with its own carry-forward tracker
pub fn compute_achievement(actual: &[f64], target: &[f64]) -> AchievementSeries {
    AchievementSeries {
        ratio: achievement_ratio(actual, target),
        cumulative_ratio: achievement_ratio(&cumulative_sum(actual), &cumulative_sum(target)),
    }
}
