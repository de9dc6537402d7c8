use chrono::{Local, NaiveDate};
use contracts::dashboards::d410_sales_analytics::{
    KpiRow, Notification, RefreshResponse, SalesFilters, SalesRow, ALL,
};
use contracts::enums::PeriodScope;
use contracts::shared::charts::ChartSpec;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::generation::{GenerationTicket, RefreshGeneration};
use super::repository::{self, Fetched};
use super::top_set::TopSetCache;
use crate::shared::analytics::charts as chart_builder;
use crate::shared::analytics::kpi::{build_kpi_row, previous_month_index, KpiInputs};
use crate::shared::analytics::periods::{align_totals, month_labels, PeriodAxis};
use crate::shared::analytics::profit::profit_by_month;
use crate::shared::analytics::stacker::{build_stacks, total_fallback};
use crate::shared::analytics::top_n::{preferred_set, reduce_to_top};
use crate::shared::config::{Config, DashboardConfig, KpiConfig};
use crate::shared::render::{ChartRegistry, ChartRenderer};
use crate::shared::upstream::RowSource;

/// Region/salesman label of the unfiltered KPI row
pub const ALL_ROW_LABEL: &str = "All";

/// Итог одного цикла обновления
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub generation: u64,
    /// False when a newer cycle began before this one finished
    pub applied: bool,
    pub charts: Vec<ChartSpec>,
    pub notifications: Vec<Notification>,
}

impl RefreshOutcome {
    pub fn to_response(&self) -> RefreshResponse {
        RefreshResponse {
            generation: self.generation,
            applied: self.applied,
            chart_ids: self.charts.iter().map(|c| c.id.clone()).collect(),
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DashboardState {
    filters: SalesFilters,
    /// Generation that last wrote `filters`
    filters_generation: u64,
    kpi_rows: Vec<KpiRow>,
    notifications: Vec<Notification>,
}

/// Дашборд D410: загрузка строк, преобразования и публикация графиков.
///
/// Все запросы одного цикла выполняются параллельно. Результаты цикла,
/// который успел устареть, отбрасываются целиком.
pub struct DashboardService {
    source: Arc<dyn RowSource>,
    dashboard: DashboardConfig,
    kpi: KpiConfig,
    generations: RefreshGeneration,
    top_sets: TopSetCache,
    registry: RwLock<ChartRegistry>,
    state: RwLock<DashboardState>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn RowSource>, renderer: Arc<dyn ChartRenderer>, config: &Config) -> Self {
        Self {
            source,
            dashboard: config.dashboard.clone(),
            kpi: config.kpi.clone(),
            generations: RefreshGeneration::new(),
            top_sets: TopSetCache::new(),
            registry: RwLock::new(ChartRegistry::new(renderer)),
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub async fn apply_filters(&self, filters: SalesFilters) -> RefreshOutcome {
        self.apply_filters_on(filters, Local::now().date_naive()).await
    }

    /// Refresh cycle with an explicit "today" for the quarterly KPI cut-off
    pub async fn apply_filters_on(&self, filters: SalesFilters, today: NaiveDate) -> RefreshOutcome {
        let ticket = self.generations.begin();
        let generation = ticket.value();
        tracing::info!(
            "d410 refresh {} started: metric={}, group_by={}",
            generation,
            filters.metric,
            filters.group_by
        );

        self.record_filters(&filters, ticket).await;

        let source = self.source.as_ref();
        let (
            daily_sales,
            daily_target,
            monthly_sales,
            monthly_target,
            yearly_sales,
            daily_breakdown,
            monthly_breakdown,
            yearly_breakdown,
            profit,
            (preferred, preferred_note),
            (kpi_rows, kpi_failures),
        ) = tokio::join!(
            repository::get_sales(source, PeriodScope::Day, &filters),
            repository::get_targets(source, PeriodScope::Day, &filters),
            repository::get_sales(source, PeriodScope::Month, &filters),
            repository::get_targets(source, PeriodScope::Month, &filters),
            repository::get_sales(source, PeriodScope::Year, &filters),
            repository::get_breakdown(source, PeriodScope::Day, &filters),
            repository::get_breakdown(source, PeriodScope::Month, &filters),
            repository::get_breakdown(source, PeriodScope::Year, &filters),
            repository::get_profit(source, &filters),
            self.preferred_for(&filters, ticket),
            self.kpi_rows(&filters, previous_month_index(today)),
        );

        let mut notifications = Vec::new();
        let daily_sales = take(daily_sales, &mut notifications);
        let daily_target = take(daily_target, &mut notifications);
        let monthly_sales = take(monthly_sales, &mut notifications);
        let monthly_target = take(monthly_target, &mut notifications);
        let yearly_sales = take(yearly_sales, &mut notifications);
        let daily_breakdown = take(daily_breakdown, &mut notifications);
        let monthly_breakdown = take(monthly_breakdown, &mut notifications);
        let yearly_breakdown = take(yearly_breakdown, &mut notifications);
        let profit = take(profit, &mut notifications);
        notifications.extend(preferred_note);
        if kpi_failures > 0 {
            notifications.push(Notification::warning(format!(
                "KPI table incomplete: {} request(s) failed",
                kpi_failures
            )));
        }

        let day = PeriodAxis::days();
        let month = PeriodAxis::months();
        let year = PeriodAxis::new(PeriodScope::Year, &self.dashboard.years);
        let preferred = preferred.as_deref();

        let mut charts = Vec::new();
        charts.extend(chart_builder::totals_charts(
            PeriodScope::Day,
            day.labels(),
            filters.metric,
            &align_totals(&daily_sales, &day),
            &align_totals(&daily_target, &day),
        ));
        charts.extend(chart_builder::totals_charts(
            PeriodScope::Month,
            month.labels(),
            filters.metric,
            &align_totals(&monthly_sales, &month),
            &align_totals(&monthly_target, &month),
        ));
        charts.push(chart_builder::yearly_chart(
            year.labels(),
            filters.metric,
            &align_totals(&yearly_sales, &year),
        ));
        charts.extend(self.stacked_charts(&day, &daily_breakdown, &daily_sales, preferred, &filters));
        charts.extend(self.stacked_charts(&month, &monthly_breakdown, &monthly_sales, preferred, &filters));
        charts.extend(self.stacked_charts(&year, &yearly_breakdown, &yearly_sales, preferred, &filters));
        charts.push(chart_builder::profit_chart(month_labels(), &profit_by_month(&profit)));

        // Registry lock is held across the check so an older cycle can never
        // install after a newer one.
        let mut registry = self.registry.write().await;
        if !self.generations.is_current(ticket) {
            tracing::info!(
                "d410 refresh {} superseded by {}, results discarded",
                generation,
                self.generations.current()
            );
            return RefreshOutcome {
                generation,
                applied: false,
                charts,
                notifications,
            };
        }

        for chart in &charts {
            registry.replace(&chart.id, chart.clone());
        }
        let mut state = self.state.write().await;
        state.kpi_rows = kpi_rows;
        state.notifications = notifications.clone();

        tracing::info!(
            "d410 refresh {} applied: {} charts, {} notifications",
            generation,
            charts.len(),
            notifications.len()
        );

        RefreshOutcome {
            generation,
            applied: true,
            charts,
            notifications,
        }
    }

    /// Publish the filters of a cycle unless a newer cycle already has
    async fn record_filters(&self, filters: &SalesFilters, ticket: GenerationTicket) -> bool {
        let mut state = self.state.write().await;
        if ticket.value() < state.filters_generation {
            return false;
        }
        state.filters = filters.clone();
        state.filters_generation = ticket.value();
        true
    }

    /// Stacked family of one scope. An empty breakdown falls back to a single
    /// "Total" series built from the ungrouped totals.
    fn stacked_charts(
        &self,
        axis: &PeriodAxis,
        breakdown: &[SalesRow],
        totals: &[SalesRow],
        preferred: Option<&HashSet<String>>,
        filters: &SalesFilters,
    ) -> Vec<ChartSpec> {
        let stacked = build_stacks(breakdown, axis, &self.dashboard.region_order);
        if stacked.is_empty() {
            return chart_builder::total_fallback_family(axis.scope(), &total_fallback(totals, axis));
        }

        if !filters.group_by.reduces_to_top() {
            return chart_builder::stacked_family(axis.scope(), &stacked);
        }

        let reduction = reduce_to_top(&stacked, preferred, self.dashboard.top_n);
        tracing::debug!(
            "{} breakdown reduced to {} groups ({:?} tier)",
            axis.scope(),
            reduction.selection.keep.len(),
            reduction.selection.tier
        );
        chart_builder::stacked_family(axis.scope(), &reduction.series)
    }

    /// Preferred "top customers" set for the current filters, from cache or
    /// freshly fetched
    async fn preferred_for(
        &self,
        filters: &SalesFilters,
        ticket: GenerationTicket,
    ) -> (Option<Arc<HashSet<String>>>, Option<Notification>) {
        if !filters.group_by.reduces_to_top() {
            return (None, None);
        }

        let key = filters.top_set_key();
        if let Some(set) = self
            .top_sets
            .get_or_invalidate(&key, ticket, &self.generations)
            .await {
            return (Some(set), None);
        }

        let fetched = repository::get_top_names(self.source.as_ref(), filters, self.dashboard.top_n).await;
        if fetched.notification.is_some() {
            return (None, fetched.notification);
        }

        let set = preferred_set(&fetched.rows);
        // a refused store still leaves the set usable by this cycle
        let stored = self
            .top_sets
            .store(&key, set.clone(), ticket, &self.generations)
            .await;
        (Some(stored.unwrap_or_else(|| Arc::new(set))), None)
    }

    /// KPI table: the unfiltered "All" row, then one row per rostered
    /// salesman. Rows are computed concurrently and joined in roster order.
    async fn kpi_rows(&self, filters: &SalesFilters, last_month_index: usize) -> (Vec<KpiRow>, usize) {
        let mut scopes = vec![(
            ALL_ROW_LABEL.to_string(),
            ALL_ROW_LABEL.to_string(),
            filters.with_scope(ALL, ALL),
        )];
        for roster in &self.kpi.regions {
            for salesman in &roster.salesmen {
                scopes.push((
                    roster.code.clone(),
                    salesman.clone(),
                    filters.with_scope(&roster.code, salesman),
                ));
            }
        }

        let handles: Vec<_> = scopes
            .into_iter()
            .map(|(region, salesman, scoped)| {
                let source = self.source.clone();
                tokio::spawn(async move {
                    kpi_row(source, region, salesman, scoped, last_month_index).await
                })
            })
            .collect();

        let mut rows = Vec::with_capacity(handles.len());
        let mut failures = 0;
        for handle in handles {
            match handle.await {
                Ok((row, failed)) => {
                    rows.push(row);
                    failures += failed;
                }
                Err(e) => {
                    tracing::error!("KPI row task failed: {}", e);
                    failures += 1;
                }
            }
        }
        (rows, failures)
    }

    pub async fn current_filters(&self) -> SalesFilters {
        self.state.read().await.filters.clone()
    }

    pub async fn kpi_table(&self) -> Vec<KpiRow> {
        self.state.read().await.kpi_rows.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn chart(&self, id: &str) -> Option<ChartSpec> {
        self.registry.read().await.get(id).cloned()
    }

    pub async fn charts(&self) -> Vec<ChartSpec> {
        self.registry.read().await.snapshot()
    }

    pub async fn chart_ids(&self) -> Vec<String> {
        self.registry.read().await.ids()
    }

    pub fn generation(&self) -> u64 {
        self.generations.current()
    }
}

fn take<T>(fetched: Fetched<T>, notifications: &mut Vec<Notification>) -> Vec<T> {
    notifications.extend(fetched.notification);
    fetched.rows
}

/// Одна строка KPI: четыре запроса (месяц/день × факт/план) параллельно.
/// Возвращает строку и число неудавшихся запросов.
async fn kpi_row(
    source: Arc<dyn RowSource>,
    region: String,
    salesman: String,
    filters: SalesFilters,
    last_month_index: usize,
) -> (KpiRow, usize) {
    let source = source.as_ref();
    let (monthly_actual, monthly_target, daily_actual, daily_target) = tokio::join!(
        repository::get_sales(source, PeriodScope::Month, &filters),
        repository::get_targets(source, PeriodScope::Month, &filters),
        repository::get_sales(source, PeriodScope::Day, &filters),
        repository::get_targets(source, PeriodScope::Day, &filters),
    );

    let failures = [&monthly_actual, &monthly_target, &daily_actual, &daily_target]
        .iter()
        .filter(|f| f.notification.is_some())
        .count();

    let month = PeriodAxis::months();
    let day = PeriodAxis::days();
    let inputs = KpiInputs {
        monthly_actual: align_totals(&monthly_actual.rows, &month),
        monthly_target: align_totals(&monthly_target.rows, &month),
        daily_actual: align_totals(&daily_actual.rows, &day),
        daily_target: align_totals(&daily_target.rows, &day),
    };

    (build_kpi_row(&region, &salesman, &inputs, last_month_index), failures)
}
