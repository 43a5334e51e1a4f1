// ==========================================
// 月度均衡排产系统 - 单月排产编排
// ==========================================
// 状态流转:
//   AGGREGATED → CALENDAR_BOUND → WEEKDAYS_ALLOCATED
//     → OVERFLOW_PLANNED → SATURDAYS_ALLOCATED → DONE
//   任一阶段失败 → FAILED
// ==========================================
// 红线: 当月需求必须 100% 排完,否则整月失败
// ==========================================

use crate::config::{SchedulerConfig, MAX_DAILY_CAPACITY};
use crate::domain::demand::DemandLine;
use crate::domain::schedule::{AllocationEvent, MonthReport};
use crate::domain::types::{CalendarDay, DayKind, YearMonth};
use crate::engine::calendar::BusinessCalendar;
use crate::engine::day_allocator::DayAllocator;
use crate::engine::error::{EngineResult, ScheduleError};
use crate::engine::ledger::{DayCapacityBook, DemandLedger};
use std::fmt;
use tracing::{debug, info, instrument, warn};

// ==========================================
// MonthPhase - 单月排产阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthPhase {
    Aggregated,
    CalendarBound,
    WeekdaysAllocated,
    OverflowPlanned,
    SaturdaysAllocated,
    Done,
    Failed,
}

impl MonthPhase {
    /// 正常流转的下一阶段（终态返回 None）
    pub fn next(self) -> Option<MonthPhase> {
        match self {
            MonthPhase::Aggregated => Some(MonthPhase::CalendarBound),
            MonthPhase::CalendarBound => Some(MonthPhase::WeekdaysAllocated),
            MonthPhase::WeekdaysAllocated => Some(MonthPhase::OverflowPlanned),
            MonthPhase::OverflowPlanned => Some(MonthPhase::SaturdaysAllocated),
            MonthPhase::SaturdaysAllocated => Some(MonthPhase::Done),
            MonthPhase::Done | MonthPhase::Failed => None,
        }
    }
}

impl fmt::Display for MonthPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthPhase::Aggregated => write!(f, "AGGREGATED"),
            MonthPhase::CalendarBound => write!(f, "CALENDAR_BOUND"),
            MonthPhase::WeekdaysAllocated => write!(f, "WEEKDAYS_ALLOCATED"),
            MonthPhase::OverflowPlanned => write!(f, "OVERFLOW_PLANNED"),
            MonthPhase::SaturdaysAllocated => write!(f, "SATURDAYS_ALLOCATED"),
            MonthPhase::Done => write!(f, "DONE"),
            MonthPhase::Failed => write!(f, "FAILED"),
        }
    }
}

// ==========================================
// MonthOutcome - 单月排产结果
// ==========================================
#[derive(Debug, Clone)]
pub struct MonthOutcome {
    pub events: Vec<AllocationEvent>,
    pub report: MonthReport,
    pub planned_days: Vec<CalendarDay>, // 实际投入使用的日（含周六）
}

// ==========================================
// MonthScheduler - 单月排产编排器
// ==========================================
pub struct MonthScheduler<'a> {
    config: &'a SchedulerConfig,
    calendar: &'a BusinessCalendar,
    allocator: DayAllocator,
}

/// 单月运行上下文（台账仅在此作用域内存在）
struct MonthRun {
    month: YearMonth,
    phase: MonthPhase,
    ledger: DemandLedger,
    events: Vec<AllocationEvent>,
    planned_days: Vec<CalendarDay>,
}

impl MonthRun {
    fn new(month: YearMonth, ledger: DemandLedger) -> Self {
        Self {
            month,
            phase: MonthPhase::Aggregated,
            ledger,
            events: Vec::new(),
            planned_days: Vec::new(),
        }
    }

    /// 只允许流转到当前阶段的直接后继
    fn advance(&mut self, next: MonthPhase) -> EngineResult<()> {
        if self.phase.next() != Some(next) {
            let err = ScheduleError::InvalidPhaseTransition {
                month: self.month,
                from: self.phase,
                to: next,
            };
            return Err(self.fail(err));
        }
        debug!(month = %self.month, from = %self.phase, to = %next, "月度排产阶段流转");
        self.phase = next;
        Ok(())
    }

    fn fail(&mut self, err: ScheduleError) -> ScheduleError {
        warn!(month = %self.month, phase = %self.phase, error = %err, "月度排产失败");
        self.phase = MonthPhase::Failed;
        err
    }
}

impl<'a> MonthScheduler<'a> {
    pub fn new(config: &'a SchedulerConfig, calendar: &'a BusinessCalendar) -> Self {
        Self {
            config,
            calendar,
            allocator: DayAllocator::new(&config.domestic_market),
        }
    }

    /// 排产单月
    ///
    /// # 参数
    /// - `month`: 需求所属月份
    /// - `lines`: 当月聚合需求
    /// - `book`: 跨月每日已用产能（会被更新）
    ///
    /// # 返回
    /// 当月事件 + 报表; 需求无法消纳或未排完时返回错误
    #[instrument(skip(self, lines, book), fields(lines = lines.len()))]
    pub fn schedule_month(
        &self,
        month: YearMonth,
        lines: &[DemandLine],
        book: &mut DayCapacityBook,
    ) -> EngineResult<MonthOutcome> {
        let daily_cap = self.config.daily_capacity;
        if daily_cap == 0 || daily_cap > MAX_DAILY_CAPACITY {
            return Err(ScheduleError::InvalidParameter {
                name: "daily_capacity".to_string(),
                message: format!("日产能必须在 [1, {}] 之间", MAX_DAILY_CAPACITY),
            });
        }

        // 报表口径: 当月自身工作日（不含提前窗口）
        let month_business_days = self.calendar.business_days(month);
        let business_day_count = month_business_days.len() as u64;
        let report_capacity = business_day_count
            .checked_mul(daily_cap)
            .ok_or_else(|| capacity_overflow("daily_capacity"))?;

        // 1. AGGREGATED: 建立台账
        let ledger = DemandLedger::from_lines(month, lines);
        let total_demand = ledger.total_remaining();
        if total_demand == 0 {
            info!(month = %month, "当月无需求,跳过排产");
            return Ok(MonthOutcome {
                events: Vec::new(),
                report: MonthReport::without_demand(month, business_day_count, report_capacity),
                planned_days: Vec::new(),
            });
        }

        let mut run = MonthRun::new(month, ledger);

        // 2. CALENDAR_BOUND: 提前窗口 + 当月工作日
        let lookback = self
            .calendar
            .previous_business_days(month, self.config.lookback_business_days as usize);
        let weekdays: Vec<CalendarDay> = lookback
            .into_iter()
            .map(|date| (date, DayKind::LookbackWeekday))
            .chain(month_business_days.into_iter().map(|date| (date, DayKind::Weekday)))
            .map(|(date, kind)| CalendarDay {
                date,
                kind,
                capacity: book.available(date, daily_cap),
            })
            .filter(|day| day.capacity > 0)
            .collect();
        let weekday_capacity = weekdays
            .iter()
            .try_fold(0u64, |acc, d| acc.checked_add(d.capacity))
            .ok_or_else(|| capacity_overflow("weekday_capacity"))?;
        run.advance(MonthPhase::CalendarBound)?;

        info!(
            month = %month,
            total_demand,
            weekday_count = weekdays.len(),
            weekday_capacity,
            "当月日历绑定完成"
        );

        // 超额先行校验: 周六无法消纳时整月失败,不分配任何一天
        let planned_excess = total_demand.saturating_sub(weekday_capacity);
        let saturday_plan = match self.plan_saturdays(month, planned_excess) {
            Ok(plan) => plan,
            Err(err) => return Err(run.fail(err)),
        };

        // 3. WEEKDAYS_ALLOCATED
        // 需求 ≤ 工作日产能时只取最早的若干天; 否则全部工作日满负荷
        let used_weekdays = if planned_excess == 0 {
            let mut covered = 0u64;
            let mut used = Vec::new();
            for day in weekdays {
                if covered >= total_demand {
                    break;
                }
                covered = covered.saturating_add(day.capacity);
                used.push(day);
            }
            used
        } else {
            weekdays
        };

        for day in used_weekdays {
            let remaining = run.ledger.total_remaining();
            if remaining == 0 {
                break;
            }
            self.allocate_planned_day(&mut run, day, remaining, book);
        }
        run.advance(MonthPhase::WeekdaysAllocated)?;

        // 4. OVERFLOW_PLANNED: 超额按时间顺序摊到当月周六
        if planned_excess > 0 {
            info!(
                month = %month,
                planned_excess,
                saturdays = saturday_plan.len(),
                "周六加班计划完成"
            );
        }
        run.advance(MonthPhase::OverflowPlanned)?;

        // 5. SATURDAYS_ALLOCATED
        for day in saturday_plan {
            let remaining = run.ledger.total_remaining();
            if remaining == 0 {
                break;
            }
            self.allocate_planned_day(&mut run, day, day.capacity, book);
        }
        run.advance(MonthPhase::SaturdaysAllocated)?;

        // 6. 终态校验: 台账必须恰好清零
        let leftover = run.ledger.total_remaining();
        if leftover != 0 {
            return Err(run.fail(ScheduleError::IncompleteAllocation { month, leftover }));
        }
        run.advance(MonthPhase::Done)?;

        // 7. 报表
        let report = MonthReport::from_events(
            month,
            business_day_count,
            report_capacity,
            total_demand,
            &run.events,
        );

        info!(
            month = %month,
            scheduled = report.scheduled_total,
            saturday_units = report.saturday_units,
            days_used = run.planned_days.len(),
            "月度排产完成"
        );

        Ok(MonthOutcome {
            events: run.events,
            report,
            planned_days: run.planned_days,
        })
    }

    /// 将超额按时间顺序摊到当月非假日周六
    ///
    /// # 返回
    /// 周六计划（超额为 0 时为空）; 全部周六仍无法消纳时返回 OverflowCapacityExceeded
    fn plan_saturdays(&self, month: YearMonth, excess: u64) -> EngineResult<Vec<CalendarDay>> {
        let mut plan = Vec::new();
        let mut excess = excess;
        if excess == 0 {
            return Ok(plan);
        }

        for date in self.calendar.saturdays(month) {
            if excess == 0 {
                break;
            }
            let capacity = self.config.saturday_cap.min(excess);
            plan.push(CalendarDay {
                date,
                kind: DayKind::Saturday,
                capacity,
            });
            excess -= capacity;
        }

        if excess > 0 {
            return Err(ScheduleError::OverflowCapacityExceeded {
                month,
                unabsorbed: excess,
            });
        }
        Ok(plan)
    }

    /// 分配一个计划日,产能取 min(日可用产能, 上限)
    fn allocate_planned_day(
        &self,
        run: &mut MonthRun,
        day: CalendarDay,
        upper_bound: u64,
        book: &mut DayCapacityBook,
    ) {
        let capacity = day.capacity.min(upper_bound);
        let day_events = self.allocator.allocate_day(
            &mut run.ledger,
            day.date,
            capacity,
            self.config.effective_per_model_cap(),
        );

        debug!(
            date = %day.date,
            kind = %day.kind,
            capacity,
            produced = day_events.len(),
            "排产日分配完成"
        );

        book.record(day.date, day_events.len() as u64);
        run.planned_days.push(CalendarDay { capacity, ..day });
        run.events.extend(day_events);
    }
}

fn capacity_overflow(name: &str) -> ScheduleError {
    ScheduleError::InvalidParameter {
        name: name.to_string(),
        message: "产能合计超出可表示范围".to_string(),
    }
}
