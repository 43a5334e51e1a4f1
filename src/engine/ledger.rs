// ==========================================
// 月度均衡排产系统 - 需求台账 / 日产能账本
// ==========================================
// 职责:
// - DemandLedger: 单月剩余需求台账,逐件扣减
// - ModelBalance: 按车型汇总的剩余量（每日重算,不持久化）
// - DayCapacityBook: 跨月累计的每日已用产能
// 红线: 台账余量不可为负; 月末必须清零
// ==========================================

use crate::domain::demand::{DemandKey, DemandLine};
use crate::domain::types::YearMonth;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// DemandLedger - 单月剩余需求台账
// ==========================================
// 生命周期: 由 MonthScheduler 每月新建,月度处理结束后丢弃
#[derive(Debug, Clone)]
pub struct DemandLedger {
    reference_month: YearMonth,
    entries: Vec<(DemandKey, u64)>, // 保持首次出现顺序
    index: HashMap<DemandKey, usize>,
}

impl DemandLedger {
    /// 由月度需求行构建台账（重复键合并）
    pub fn from_lines(reference_month: YearMonth, lines: &[DemandLine]) -> Self {
        let mut ledger = Self {
            reference_month,
            entries: Vec::with_capacity(lines.len()),
            index: HashMap::with_capacity(lines.len()),
        };

        for line in lines {
            match ledger.index.get(&line.key) {
                Some(&pos) => {
                    let qty = &mut ledger.entries[pos].1;
                    *qty = qty.saturating_add(line.monthly_qty);
                }
                None => {
                    ledger.index.insert(line.key.clone(), ledger.entries.len());
                    ledger.entries.push((line.key.clone(), line.monthly_qty));
                }
            }
        }

        ledger
    }

    pub fn reference_month(&self) -> YearMonth {
        self.reference_month
    }

    /// 剩余总量
    pub fn total_remaining(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, qty)| acc.saturating_add(*qty))
    }

    pub fn is_exhausted(&self) -> bool {
        self.entries.iter().all(|(_, qty)| *qty == 0)
    }

    /// 指定键剩余量
    pub fn remaining(&self, key: &DemandKey) -> u64 {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// 余量为正的条目（台账顺序）
    pub fn open_entries(&self) -> impl Iterator<Item = (&DemandKey, u64)> {
        self.entries
            .iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(key, qty)| (key, *qty))
    }

    /// 扣减一件
    ///
    /// # 返回
    /// - `true`: 扣减成功
    /// - `false`: 键不存在或余量已为 0（不做任何修改）
    pub fn consume_one(&mut self, key: &DemandKey) -> bool {
        match self.index.get(key) {
            Some(&pos) if self.entries[pos].1 > 0 => {
                self.entries[pos].1 -= 1;
                true
            }
            _ => false,
        }
    }

    /// 按车型汇总剩余量（车型按台账首次出现顺序）
    pub fn model_balance(&self) -> ModelBalance {
        let mut balance = ModelBalance::default();
        for (key, qty) in self.open_entries() {
            balance.add(&key.model, qty);
        }
        balance
    }
}

// ==========================================
// ModelBalance - 车型剩余量
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelBalance {
    entries: Vec<(String, u64)>,
}

impl ModelBalance {
    /// 按给定顺序构建（重复车型合并）
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut balance = Self::default();
        for (model, qty) in pairs {
            balance.add(&model.into(), qty);
        }
        balance
    }

    fn add(&mut self, model: &str, qty: u64) {
        match self.entries.iter_mut().find(|(m, _)| m == model) {
            Some((_, existing)) => *existing = existing.saturating_add(qty),
            None => self.entries.push((model.to_string(), qty)),
        }
    }

    pub fn get(&self, model: &str) -> u64 {
        self.entries
            .iter()
            .find(|(m, _)| m == model)
            .map(|(_, qty)| *qty)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, qty)| acc.saturating_add(*qty))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(m, qty)| (m.as_str(), *qty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// DayCapacityBook - 跨月每日已用产能
// ==========================================
// 用途: 提前窗口落在上月已排产的工作日时,扣除已用部分
#[derive(Debug, Clone, Default)]
pub struct DayCapacityBook {
    used: BTreeMap<NaiveDate, u64>,
}

impl DayCapacityBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used(&self, date: NaiveDate) -> u64 {
        self.used.get(&date).copied().unwrap_or(0)
    }

    /// 给定日产能下的剩余可用量
    pub fn available(&self, date: NaiveDate, daily_capacity: u64) -> u64 {
        daily_capacity.saturating_sub(self.used(date))
    }

    pub fn record(&mut self, date: NaiveDate, units: u64) {
        if units > 0 {
            let used = self.used.entry(date).or_insert(0);
            *used = used.saturating_add(units);
        }
    }
}
