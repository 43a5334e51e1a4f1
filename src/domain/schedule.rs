// ==========================================
// 月度均衡排产系统 - 排产结果领域模型
// ==========================================
// 职责: 单件分配事件 / 全局排产序列 / 月度报表
// 红线: 分配事件创建后不可变; 全局编号在整个周期内唯一
// ==========================================

use crate::domain::types::YearMonth;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AllocationEvent - 单件分配事件
// ==========================================
// 一个事件 = 一件实物的生产排程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEvent {
    pub date: NaiveDate,            // 生产日期
    pub product: String,            // 产品
    pub model: String,              // 车型
    pub market: String,             // 市场
    pub reference_month: YearMonth, // 需求所属月份（提前生产时与生产日期所在月不同）
}

impl AllocationEvent {
    pub fn is_saturday(&self) -> bool {
        self.date.weekday() == Weekday::Sat
    }
}

// ==========================================
// ScheduledUnit - 带全局编号的分配事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledUnit {
    pub id: String,   // "<前缀> <序号>"，如 "fila 1"
    pub seq: usize,   // 1..N
    #[serde(flatten)]
    pub event: AllocationEvent,
}

// ==========================================
// GlobalSchedule - 全局排产序列（只读）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSchedule {
    units: Vec<ScheduledUnit>,
}

impl GlobalSchedule {
    /// 对全部事件按 (日期, 车型, 产品) 稳定排序后分配 1..N 编号
    pub fn from_events(mut events: Vec<AllocationEvent>, id_prefix: &str) -> Self {
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.model.cmp(&b.model))
                .then_with(|| a.product.cmp(&b.product))
        });

        let units = events
            .into_iter()
            .enumerate()
            .map(|(idx, event)| ScheduledUnit {
                id: format!("{} {}", id_prefix, idx + 1),
                seq: idx + 1,
                event,
            })
            .collect();

        Self { units }
    }

    pub fn units(&self) -> &[ScheduledUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 按市场汇总件数（键升序）
    pub fn count_by_market(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for unit in &self.units {
            *counts.entry(unit.event.market.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// 按车型汇总件数（键升序）
    pub fn count_by_model(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for unit in &self.units {
            *counts.entry(unit.event.model.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// 按生产日期汇总件数
    pub fn count_by_date(&self) -> BTreeMap<NaiveDate, u64> {
        let mut counts = BTreeMap::new();
        for unit in &self.units {
            *counts.entry(unit.event.date).or_insert(0) += 1;
        }
        counts
    }
}

// ==========================================
// MonthReport - 月度报表
// ==========================================
// 口径: programado 按需求所属月份统计（含提前到上月生产的部分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub reference_month: YearMonth,
    pub business_day_count: u64, // 当月工作日数（不含提前窗口）
    pub weekday_capacity: u64,   // 当月工作日产能 = 工作日数 × 日产能
    pub demand_total: u64,       // 需求总量
    pub scheduled_total: u64,    // 已排产总量
    pub saturday_units: u64,     // 周六加班件数
    pub deviation: i64,          // 偏差 = 已排产 - 需求
    pub utilization: f64,        // 利用率 = 已排产 / 工作日产能
}

impl MonthReport {
    /// 零需求月份报表（不进入排产）
    pub fn without_demand(
        reference_month: YearMonth,
        business_day_count: u64,
        weekday_capacity: u64,
    ) -> Self {
        Self {
            reference_month,
            business_day_count,
            weekday_capacity,
            demand_total: 0,
            scheduled_total: 0,
            saturday_units: 0,
            deviation: 0,
            utilization: 0.0,
        }
    }

    /// 由当月事件构建报表
    pub fn from_events(
        reference_month: YearMonth,
        business_day_count: u64,
        weekday_capacity: u64,
        demand_total: u64,
        events: &[AllocationEvent],
    ) -> Self {
        let scheduled_total = events.len() as u64;
        let saturday_units = events.iter().filter(|e| e.is_saturday()).count() as u64;
        let utilization = if weekday_capacity > 0 {
            scheduled_total as f64 / weekday_capacity as f64
        } else {
            0.0
        };

        Self {
            reference_month,
            business_day_count,
            weekday_capacity,
            demand_total,
            scheduled_total,
            saturday_units,
            deviation: scheduled_total as i64 - demand_total as i64,
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(day: u32, model: &str, product: &str) -> AllocationEvent {
        AllocationEvent {
            date: NaiveDate::from_ymd_opt(2026, 7, day).unwrap(),
            product: product.to_string(),
            model: model.to_string(),
            market: "EXPORT".to_string(),
            reference_month: YearMonth::new(2026, 7).unwrap(),
        }
    }

    #[test]
    fn test_global_ids_follow_date_model_product_order() {
        let events = vec![
            event(2, "M2", "P1"),
            event(1, "M2", "P1"),
            event(1, "M1", "P2"),
            event(1, "M1", "P1"),
        ];
        let schedule = GlobalSchedule::from_events(events, "fila");

        let ids: Vec<&str> = schedule.units().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["fila 1", "fila 2", "fila 3", "fila 4"]);

        let order: Vec<(u32, &str, &str)> = schedule
            .units()
            .iter()
            .map(|u| (u.event.date.day(), u.event.model.as_str(), u.event.product.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(1, "M1", "P1"), (1, "M1", "P2"), (1, "M2", "P1"), (2, "M2", "P1")]
        );
    }

    #[test]
    fn test_report_counts_saturdays() {
        // 2026-07-04 为周六
        let events = vec![event(3, "M1", "P1"), event(4, "M1", "P1")];
        let month = YearMonth::new(2026, 7).unwrap();
        let report = MonthReport::from_events(month, 23, 1150, 2, &events);

        assert_eq!(report.scheduled_total, 2);
        assert_eq!(report.saturday_units, 1);
        assert_eq!(report.deviation, 0);
        assert!((report.utilization - 2.0 / 1150.0).abs() < 1e-12);
    }
}
