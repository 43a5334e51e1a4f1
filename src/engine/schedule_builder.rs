// ==========================================
// 月度均衡排产系统 - 全周期排产构建器
// ==========================================
// 职责: 按月份升序逐月排产,汇总事件与月报,统一排序编号
// 失败策略: 任一月份失败即整体中止,不返回部分结果
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::demand::DemandRow;
use crate::domain::schedule::{GlobalSchedule, MonthReport};
use crate::domain::types::YearMonth;
use crate::engine::aggregator::{AggregatedDemand, DemandAggregator};
use crate::engine::calendar::BusinessCalendar;
use crate::engine::error::{EngineResult, ScheduleError};
use crate::engine::ledger::DayCapacityBook;
use crate::engine::month_scheduler::MonthScheduler;
use serde::Serialize;
use tracing::{info, instrument};

// ==========================================
// ScheduleResult - 全周期排产结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResult {
    pub schedule: GlobalSchedule,
    pub reports: Vec<MonthReport>,
}

impl ScheduleResult {
    pub fn total_scheduled(&self) -> u64 {
        self.reports.iter().map(|r| r.scheduled_total).sum()
    }

    pub fn total_saturday_units(&self) -> u64 {
        self.reports.iter().map(|r| r.saturday_units).sum()
    }
}

// ==========================================
// ScheduleBuilder - 全周期排产构建器
// ==========================================
pub struct ScheduleBuilder<'a> {
    config: &'a SchedulerConfig,
    calendar: &'a BusinessCalendar,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(config: &'a SchedulerConfig, calendar: &'a BusinessCalendar) -> Self {
        Self { config, calendar }
    }

    /// 由原始需求行直接构建（先聚合再排产）
    pub fn build_from_rows(
        &self,
        rows: &[DemandRow],
        horizon: &[YearMonth],
    ) -> EngineResult<ScheduleResult> {
        let months = normalize_horizon(horizon);
        let demand = DemandAggregator::new().aggregate(rows, &months)?;
        self.build(&demand, &months)
    }

    /// 构建全周期排产
    ///
    /// # 参数
    /// - `demand`: 按月聚合的需求
    /// - `horizon`: 目标月份（会去重并升序处理）
    ///
    /// # 返回
    /// 全局排序编号后的排产表 + 每月报表
    #[instrument(skip(self, demand, horizon), fields(months = horizon.len()))]
    pub fn build(
        &self,
        demand: &AggregatedDemand,
        horizon: &[YearMonth],
    ) -> EngineResult<ScheduleResult> {
        self.config
            .validate()
            .map_err(|e| ScheduleError::InvalidParameter {
                name: "config".to_string(),
                message: e.to_string(),
            })?;

        let months = normalize_horizon(horizon);
        let scheduler = MonthScheduler::new(self.config, self.calendar);
        let mut book = DayCapacityBook::new();
        let mut events = Vec::new();
        let mut reports = Vec::with_capacity(months.len());

        // 必须按时间顺序: 后续月份的提前窗口可能落在前一月尾部
        for month in &months {
            let outcome = scheduler.schedule_month(*month, demand.lines(*month), &mut book)?;
            events.extend(outcome.events);
            reports.push(outcome.report);
        }

        let schedule = GlobalSchedule::from_events(events, &self.config.id_prefix);

        info!(
            months = months.len(),
            units = schedule.len(),
            "全周期排产完成"
        );

        Ok(ScheduleResult { schedule, reports })
    }
}

/// 月份去重并升序
fn normalize_horizon(horizon: &[YearMonth]) -> Vec<YearMonth> {
    let mut months = horizon.to_vec();
    months.sort();
    months.dedup();
    months
}
