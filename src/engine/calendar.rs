// ==========================================
// 月度均衡排产系统 - 工作日历服务
// ==========================================
// 职责: 工作日 / 周六 / 首个工作日 / 提前窗口工作日
// 红线: 纯函数,无副作用; 假日从所有类别中剔除
// ==========================================

use crate::domain::types::YearMonth;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

// ==========================================
// BusinessCalendar - 工作日历
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    pub fn new(holidays: BTreeSet<NaiveDate>) -> Self {
        Self { holidays }
    }

    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// 工作日: 周一至周五且非假日
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// 当月全部工作日（升序）
    pub fn business_days(&self, month: YearMonth) -> Vec<NaiveDate> {
        month
            .days()
            .into_iter()
            .filter(|d| self.is_business_day(*d))
            .collect()
    }

    /// 当月非假日周六（升序）
    pub fn saturdays(&self, month: YearMonth) -> Vec<NaiveDate> {
        month
            .days()
            .into_iter()
            .filter(|d| d.weekday() == Weekday::Sat && !self.is_holiday(*d))
            .collect()
    }

    /// 当月首个工作日（跳过周末与假日）
    pub fn first_business_day(&self, month: YearMonth) -> Option<NaiveDate> {
        month.days().into_iter().find(|d| self.is_business_day(*d))
    }

    /// 首个工作日之前的 n 个工作日（升序）
    ///
    /// 当月无工作日时以下月 1 日为锚点向前回溯
    pub fn previous_business_days(&self, month: YearMonth, n: usize) -> Vec<NaiveDate> {
        if n == 0 {
            return Vec::new();
        }

        let anchor = match self
            .first_business_day(month)
            .or_else(|| month.next().first_day())
        {
            Some(d) => d,
            None => return Vec::new(),
        };

        let mut previous = Vec::new();
        let mut cursor = anchor.pred_opt();
        while let Some(day) = cursor {
            if previous.len() >= n {
                break;
            }
            if self.is_business_day(day) {
                previous.push(day);
            }
            cursor = day.pred_opt();
        }

        previous.reverse();
        previous
    }
}
