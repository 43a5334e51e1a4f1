// ==========================================
// 单月排产集成测试
// ==========================================
// 职责: 验证单月状态机在典型场景下的行为
// 场景:
// - 小需求只占用最早的若干工作日
// - 超额需求溢出到周六
// - 周六不足时整月失败（含超大需求）
// ==========================================


use production_leveling_aps::config::SchedulerConfig;
use production_leveling_aps::engine::{BusinessCalendar, DayCapacityBook, MonthScheduler, ScheduleError};
use production_leveling_aps::domain::DayKind;
use std::collections::{BTreeMap, BTreeSet};
use test_helpers::*;

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_single_model_small_demand_uses_three_days() {
    let config = SchedulerConfig::default();
    let calendar = BusinessCalendar::default();
    let month = ym(2026, 7);
    assert_eq!(calendar.business_days(month).len(), 23);

    let outcome = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", DOMESTIC, "M1", 120)], &mut DayCapacityBook::new())
        .unwrap();

    let mut per_day: BTreeMap<_, u64> = BTreeMap::new();
    for event in &outcome.events {
        *per_day.entry(event.date).or_insert(0) += 1;
    }
    assert_eq!(
        per_day.into_iter().collect::<Vec<_>>(),
        vec![
            (date(2026, 7, 1), 50),
            (date(2026, 7, 2), 50),
            (date(2026, 7, 3), 20),
        ]
    );

    let report = &outcome.report;
    assert_eq!(report.business_day_count, 23);
    assert_eq!(report.weekday_capacity, 1150);
    assert_eq!(report.demand_total, 120);
    assert_eq!(report.scheduled_total, 120);
    assert_eq!(report.saturday_units, 0);
    assert_eq!(report.deviation, 0);
}

#[test]
fn test_overflow_spreads_over_saturdays() {
    let config = SchedulerConfig::default();
    let calendar = BusinessCalendar::default();
    let month = ym(2026, 8);
    assert_eq!(calendar.business_days(month).len(), 21);

    let outcome = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", DOMESTIC, "M1", 1200)], &mut DayCapacityBook::new())
        .unwrap();

    assert_eq!(outcome.events.len(), 1200);
    assert_eq!(outcome.report.saturday_units, 150);
    assert_eq!(outcome.report.deviation, 0);

    let saturdays: Vec<_> = outcome
        .planned_days
        .iter()
        .filter(|d| d.kind == DayKind::Saturday)
        .map(|d| (d.date, d.capacity))
        .collect();
    assert_eq!(
        saturdays,
        vec![
            (date(2026, 8, 1), 50),
            (date(2026, 8, 8), 50),
            (date(2026, 8, 15), 50),
        ]
    );

    // 全部工作日满负荷
    let weekdays: Vec<u64> = outcome
        .planned_days
        .iter()
        .filter(|d| d.kind == DayKind::Weekday)
        .map(|d| d.capacity)
        .collect();
    assert_eq!(weekdays.len(), 21);
    assert!(weekdays.iter().all(|c| *c == 50));
}

#[test]
fn test_overflow_beyond_saturdays_fails_with_unabsorbed_quantity() {
    let config = SchedulerConfig {
        saturday_cap: 10,
        ..Default::default()
    };
    let calendar = BusinessCalendar::default();
    let month = ym(2026, 8);

    let err = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", DOMESTIC, "M1", 1200)], &mut DayCapacityBook::new())
        .unwrap_err();

    // 1200 - 21×50 = 150; 5 个周六 × 10 = 50; 剩余 100
    assert_eq!(
        err,
        ScheduleError::OverflowCapacityExceeded {
            month,
            unabsorbed: 100
        }
    );
    assert!(err.to_string().contains("100"));
}

#[test]
fn test_trillion_unit_demand_reports_unabsorbed_quantity() {
    let config = SchedulerConfig::default();
    let calendar = BusinessCalendar::default();
    let month = ym(2026, 7);
    let mut book = DayCapacityBook::new();

    let err = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", DOMESTIC, "M1", 1_000_000_000_000)], &mut book)
        .unwrap_err();

    // 7 月: 23 × 50 + 4 个周六 × 50 = 1350
    assert_eq!(
        err,
        ScheduleError::OverflowCapacityExceeded {
            month,
            unabsorbed: 999_999_998_650
        }
    );
    // 失败月份不占用任何日产能
    assert_eq!(book.used(date(2026, 7, 1)), 0);
    assert_eq!(book.used(date(2026, 7, 31)), 0);
}

#[test]
fn test_holiday_saturday_is_not_used() {
    let config = SchedulerConfig::default();
    let holidays: BTreeSet<_> = [date(2026, 8, 1)].into_iter().collect();
    let calendar = BusinessCalendar::new(holidays);
    let month = ym(2026, 8);

    let outcome = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", "CHILE", "M1", 1100)], &mut DayCapacityBook::new())
        .unwrap();

    assert!(outcome.events.iter().all(|e| e.date != date(2026, 8, 1)));
    assert_eq!(
        outcome.events.iter().filter(|e| e.date == date(2026, 8, 8)).count(),
        50
    );
}

#[test]
fn test_weekday_holiday_shifts_first_day() {
    let config = SchedulerConfig::default();
    let holidays: BTreeSet<_> = [date(2026, 7, 1)].into_iter().collect();
    let calendar = BusinessCalendar::new(holidays);
    let month = ym(2026, 7);

    let outcome = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &[line(month, "P1", DOMESTIC, "M1", 60)], &mut DayCapacityBook::new())
        .unwrap();

    assert_eq!(outcome.report.business_day_count, 22);
    assert_eq!(outcome.events[0].date, date(2026, 7, 2));
    assert_eq!(outcome.events.iter().filter(|e| e.date == date(2026, 7, 3)).count(), 10);
}

#[test]
fn test_priority_markets_before_domestic_within_each_day() {
    let config = SchedulerConfig::default();
    let calendar = BusinessCalendar::default();
    let month = ym(2026, 9);
    let lines = vec![
        line(month, "P1", DOMESTIC, "M1", 70),
        line(month, "P2", "ARGENTINA", "M1", 40),
        line(month, "P3", "CHILE", "M2", 30),
        line(month, "P4", DOMESTIC, "M2", 30),
    ];

    let outcome = MonthScheduler::new(&config, &calendar)
        .schedule_month(month, &lines, &mut DayCapacityBook::new())
        .unwrap();

    // 每个 (日期, 车型): 国内市场出现后不再出现非国内市场
    let mut domestic_seen: BTreeSet<(chrono::NaiveDate, String)> = BTreeSet::new();
    for event in &outcome.events {
        let key = (event.date, event.model.clone());
        if event.market == DOMESTIC {
            domestic_seen.insert(key);
        } else {
            assert!(!domestic_seen.contains(&key), "priority violated on {:?}", key);
        }
    }
    assert_eq!(outcome.events.len(), 170);
}
