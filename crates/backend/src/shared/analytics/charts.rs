//! Assembles transform output into renderer-ready `ChartSpec`s.

use contracts::enums::{Metric, PeriodScope};
use contracts::shared::charts::{ChartSpec, Dataset, StackedSeries};

use super::achievement::compute_achievement;
use super::numeric::{cumulative_per_group, cumulative_sum, percent_stacks};
use super::profit::ProfitSeries;
use super::stacker::TOTAL_GROUP;

/// Stacked dataset colours, cycled in group order
pub const COLORS: [&str; 12] = [
    "#374388ff", "#90359cff", "#3e9150ff", "#93b14dff", "#d6c635ff", "#95E4E5",
    "#275ccfff", "#175d96ff", "#366592ff", "#667c91ff", "#FF968A", "#FFAEA6",
];

const ACTUAL_COLOR: &str = "#ABDEE6";
const ACHIEVEMENT_COLOR: &str = "#ef4444";
const PROFIT_COLOR: &str = "#10b981";
const GROSS_COLOR: &str = "#93c5fd";
const COGS_COLOR: &str = "#f87171";
const OP_COST_COLOR: &str = "#fbbf24";
const SD_COLOR: &str = "#d55fc3ff";

/// Shared stack id of group-stacked datasets
pub const GROUP_STACK: &str = "S";
pub const ACHIEVEMENT_LABEL: &str = "Achievement(%)";

pub mod ids {
    pub const DAILY: &str = "daily";
    pub const DAILY_CUM: &str = "daily_cum";
    pub const MONTHLY: &str = "monthly";
    pub const MONTHLY_CUM: &str = "monthly_cum";
    pub const YEARLY: &str = "yearly";
    pub const STACKED_DAILY: &str = "stacked_daily";
    pub const STACKED_DAILY_CUM: &str = "stacked_daily_cum";
    pub const STACKED_DAILY_PCT: &str = "stacked_daily_pct";
    pub const STACKED_DAILY_CUM_PCT: &str = "stacked_daily_cum_pct";
    pub const STACKED_MONTHLY: &str = "stacked_monthly";
    pub const STACKED_MONTHLY_CUM: &str = "stacked_monthly_cum";
    pub const STACKED_MONTHLY_PCT: &str = "stacked_monthly_pct";
    pub const STACKED_MONTHLY_CUM_PCT: &str = "stacked_monthly_cum_pct";
    pub const STACKED_YEARLY: &str = "stacked_yearly";
    pub const STACKED_YEARLY_PCT: &str = "stacked_yearly_pct";
    pub const PROFIT_COMBO: &str = "profit_combo";
}

pub fn color_for(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// One bar dataset per group, in stacking order
pub fn stacked_datasets(stacked: &StackedSeries) -> Vec<Dataset> {
    stacked
        .ordered()
        .enumerate()
        .map(|(i, (group, series))| {
            Dataset::bar(group, series)
                .stacked(GROUP_STACK)
                .colored(color_for(i))
        })
        .collect()
}

fn stacked_chart(id: &str, title: &str, stacked: &StackedSeries) -> ChartSpec {
    ChartSpec::new(id, title, stacked.labels.clone())
        .stacked()
        .with_datasets(stacked_datasets(stacked))
}

fn percent_chart(id: &str, title: &str, stacked: &StackedSeries) -> ChartSpec {
    stacked_chart(id, title, stacked).with_y_max(100.0)
}

/// Value, cumulative and percent charts of one scope. The yearly family has
/// no cumulative variants.
pub fn stacked_family(scope: PeriodScope, stacked: &StackedSeries) -> Vec<ChartSpec> {
    match scope {
        PeriodScope::Day => cumulative_family(
            stacked,
            [
                (ids::STACKED_DAILY, "Daily"),
                (ids::STACKED_DAILY_CUM, "Cumulative by Day"),
                (ids::STACKED_DAILY_PCT, "Daily %"),
                (ids::STACKED_DAILY_CUM_PCT, "Cumulative %"),
            ],
        ),
        PeriodScope::Month => cumulative_family(
            stacked,
            [
                (ids::STACKED_MONTHLY, "Monthly"),
                (ids::STACKED_MONTHLY_CUM, "Cumulative by Month"),
                (ids::STACKED_MONTHLY_PCT, "Monthly %"),
                (ids::STACKED_MONTHLY_CUM_PCT, "Cumulative %"),
            ],
        ),
        PeriodScope::Year => vec![
            stacked_chart(ids::STACKED_YEARLY, "Yearly", stacked),
            percent_chart(ids::STACKED_YEARLY_PCT, "Yearly %", &percent_stacks(stacked)),
        ],
    }
}

fn cumulative_family(stacked: &StackedSeries, charts: [(&str, &str); 4]) -> Vec<ChartSpec> {
    let [value, cum, pct, cum_pct] = charts;
    let cumulative = cumulative_per_group(stacked);
    vec![
        stacked_chart(value.0, value.1, stacked),
        stacked_chart(cum.0, cum.1, &cumulative),
        percent_chart(pct.0, pct.1, &percent_stacks(stacked)),
        percent_chart(cum_pct.0, cum_pct.1, &percent_stacks(&cumulative)),
    ]
}

/// Stacked family built from a `"Total"` fallback series. The percent charts
/// carry a single `"Total %"` series at 100 on every slot.
pub fn total_fallback_family(scope: PeriodScope, fallback: &StackedSeries) -> Vec<ChartSpec> {
    let hundred = vec![100.0; fallback.axis_len()];
    let label = format!("{} %", TOTAL_GROUP);

    stacked_family(scope, fallback)
        .into_iter()
        .map(|mut chart| {
            if chart.y_max.is_some() {
                chart.datasets = vec![Dataset::bar(label.as_str(), &hundred)
                    .stacked(GROUP_STACK)
                    .colored(color_for(0))];
            }
            chart
        })
        .collect()
}

/// Value and cumulative totals charts of the daily or monthly scope: an
/// achievement line on the secondary axis over actual and target bars.
pub fn totals_charts(
    scope: PeriodScope,
    labels: Vec<String>,
    metric: Metric,
    actual: &[f64],
    target: &[f64],
) -> Vec<ChartSpec> {
    let (id, cum_id, title, cum_title) = match scope {
        PeriodScope::Day => (ids::DAILY, ids::DAILY_CUM, "Daily Sales", "Cumulative Daily Sales"),
        _ => (
            ids::MONTHLY,
            ids::MONTHLY_CUM,
            "Monthly Sales",
            "Cumulative Monthly Sales",
        ),
    };

    let achievement = compute_achievement(actual, target);
    let actual_cum = cumulative_sum(actual);
    let target_cum = cumulative_sum(target);

    vec![
        ChartSpec::new(id, title, labels.clone())
            .with_dataset(achievement_line(achievement.ratio))
            .with_dataset(Dataset::bar(metric.sales_label(), actual).colored(ACTUAL_COLOR))
            .with_dataset(Dataset::bar("Target", target)),
        ChartSpec::new(cum_id, cum_title, labels)
            .with_dataset(achievement_line(achievement.cumulative_ratio))
            .with_dataset(Dataset::bar(metric.cumulative_label(), &actual_cum).colored(ACTUAL_COLOR))
            .with_dataset(Dataset::bar("Cumulative Target", &target_cum)),
    ]
}

fn achievement_line(data: Vec<Option<f64>>) -> Dataset {
    Dataset::line(ACHIEVEMENT_LABEL, data)
        .colored(ACHIEVEMENT_COLOR)
        .on_secondary_axis()
}

pub fn yearly_chart(labels: Vec<String>, metric: Metric, totals: &[f64]) -> ChartSpec {
    ChartSpec::new(ids::YEARLY, "Yearly", labels)
        .with_dataset(Dataset::bar(metric.yearly_label(), totals).colored(ACTUAL_COLOR))
}

/// Profit-% line over gross bars and stacked cost bars
pub fn profit_chart(labels: Vec<String>, profit: &ProfitSeries) -> ChartSpec {
    let pct = profit.profit_pct.iter().copied().map(Some).collect();
    ChartSpec::new(ids::PROFIT_COMBO, "Profit", labels)
        .with_dataset(
            Dataset::line("Profit %", pct)
                .colored(PROFIT_COLOR)
                .on_secondary_axis(),
        )
        .with_dataset(Dataset::bar("Gross", &profit.gross).stacked("G").colored(GROSS_COLOR))
        .with_dataset(Dataset::bar("COGS", &profit.cogs).stacked("C").colored(COGS_COLOR))
        .with_dataset(Dataset::bar("Op Cost", &profit.op_cost).stacked("C").colored(OP_COST_COLOR))
        .with_dataset(Dataset::bar("Sales Deduction", &profit.sd).stacked("C").colored(SD_COLOR))
}
