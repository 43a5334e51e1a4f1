// ==========================================
// 月度均衡排产系统 - 领域类型定义
// ==========================================
// 职责: 年月键 / 日历日类型 / 日历日
// 红线: 核心只接受已解析的 (year, month) 整数对
// ==========================================

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 葡语月份缩写（需求表列名与输出月份标签使用）
pub const PT_BR_MONTH_ABBR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

// ==========================================
// 年月键 (YearMonth)
// ==========================================
// 排序: 先年后月 (字段顺序即比较顺序)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// 构造年月键，月份不在 1..=12 或年份超出日期范围时返回 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// 日期所在的年月
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 当月第一天
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// 当月全部自然日（升序）
    pub fn days(&self) -> Vec<NaiveDate> {
        let month = self.month;
        self.first_day()
            .map(|first| {
                first
                    .iter_days()
                    .take_while(|d| d.month() == month)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 下一个月
    pub fn next(&self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// 年份后两位（列名 "jul/26" 使用）
    pub fn short_year(&self) -> i32 {
        self.year.rem_euclid(100)
    }

    /// 葡语月份缩写（小写）
    pub fn pt_br_abbr(&self) -> &'static str {
        PT_BR_MONTH_ABBR[(self.month as usize).saturating_sub(1) % 12]
    }

    /// 输出用月份标签，如 "Jul/2026"
    pub fn label(&self) -> String {
        let abbr = self.pt_br_abbr();
        let mut chars = abbr.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{}/{}", capitalized, self.year)
    }

    /// 枚举 [start, end] 闭区间内的所有月份（按时间顺序）
    ///
    /// start > end 时返回空列表，由调用方决定是否报错
    pub fn enumerate(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut cur = start;
        while cur <= end {
            months.push(cur);
            cur = cur.next();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 解析 "YYYY-MM" / "YYYY/MM"
impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (y, m) = trimmed
            .split_once('-')
            .or_else(|| trimmed.split_once('/'))
            .ok_or_else(|| format!("年月格式错误: {}（期望 YYYY-MM）", trimmed))?;

        let year = y
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("年份无法解析: {}", y))?;
        let month = m
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("月份无法解析: {}", m))?;

        YearMonth::new(year, month).ok_or_else(|| format!("年月超出范围: {}", trimmed))
    }
}

// ==========================================
// 日历日类型 (Day Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayKind {
    LookbackWeekday, // 提前生产窗口内的工作日（上月末）
    Weekday,         // 当月工作日
    Saturday,        // 当月加班周六（超额消纳）
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKind::LookbackWeekday => write!(f, "LOOKBACK_WEEKDAY"),
            DayKind::Weekday => write!(f, "WEEKDAY"),
            DayKind::Saturday => write!(f, "SATURDAY"),
        }
    }
}

// ==========================================
// CalendarDay - 带产能的排产日
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,  // 日期
    pub kind: DayKind,    // 日类型
    pub capacity: u64,    // 当日计划产能（件）
}

impl CalendarDay {
    pub fn is_saturday(&self) -> bool {
        self.date.weekday() == Weekday::Sat
    }
}
