// ==========================================
// 月度均衡排产系统 - 需求聚合器
// ==========================================
// 职责: 重复 (产品, 市场, 车型) 行合并为唯一键,按目标月份求和
// 输入: 字段映射后的需求行 + 目标月份列表
// 输出: 每月每键一条 DemandLine（键升序）
// ==========================================

use crate::domain::demand::{DemandKey, DemandLine, DemandRow};
use crate::domain::types::YearMonth;
use crate::engine::error::{EngineResult, ScheduleError};
use std::collections::BTreeMap;
use tracing::debug;

// ==========================================
// AggregatedDemand - 按月聚合的需求
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedDemand {
    by_month: BTreeMap<YearMonth, Vec<DemandLine>>,
}

impl AggregatedDemand {
    /// 指定月份的需求行（未聚合到的月份返回空切片）
    pub fn lines(&self, month: YearMonth) -> &[DemandLine] {
        self.by_month
            .get(&month)
            .map(|lines| lines.as_slice())
            .unwrap_or(&[])
    }

    /// 指定月份需求总量（聚合时已保证不溢出）
    pub fn total(&self, month: YearMonth) -> u64 {
        self.lines(month)
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.monthly_qty))
    }

    pub fn months(&self) -> impl Iterator<Item = &YearMonth> {
        self.by_month.keys()
    }
}

// ==========================================
// DemandAggregator - 需求聚合器
// ==========================================
pub struct DemandAggregator {
    // 无状态引擎
}

impl DemandAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合需求
    ///
    /// 规则:
    /// 1) 相同 (产品, 市场, 车型) 的数量求和
    /// 2) 行中缺失的月份按 0 计
    /// 3) 每个目标月份都输出全部键（含 0 数量）
    /// 4) 单键或单月合计超出 u64 时返回 DemandOverflow
    pub fn aggregate(
        &self,
        rows: &[DemandRow],
        months: &[YearMonth],
    ) -> EngineResult<AggregatedDemand> {
        let mut sums: BTreeMap<DemandKey, BTreeMap<YearMonth, u64>> = BTreeMap::new();
        for row in rows {
            let entry = sums.entry(row.key.clone()).or_default();
            for month in months {
                let sum = entry.entry(*month).or_insert(0);
                *sum = sum.checked_add(row.quantity(*month)).ok_or_else(|| {
                    ScheduleError::DemandOverflow {
                        month: *month,
                        key: row.key.to_string(),
                    }
                })?;
            }
        }

        let mut by_month: BTreeMap<YearMonth, Vec<DemandLine>> = BTreeMap::new();
        for month in months {
            let lines: Vec<DemandLine> = sums
                .iter()
                .map(|(key, per_month)| DemandLine {
                    key: key.clone(),
                    monthly_qty: per_month.get(month).copied().unwrap_or(0),
                    reference_month: *month,
                })
                .collect();

            let mut total = 0u64;
            for l in &lines {
                total = total.checked_add(l.monthly_qty).ok_or_else(|| {
                    ScheduleError::DemandOverflow {
                        month: *month,
                        key: l.key.to_string(),
                    }
                })?;
            }

            debug!(month = %month, keys = lines.len(), total, "月度需求聚合完成");
            by_month.insert(*month, lines);
        }

        Ok(AggregatedDemand { by_month })
    }
}

impl Default for DemandAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: usize, product: &str, market: &str, model: &str, qty: &[(YearMonth, u64)]) -> DemandRow {
        DemandRow {
            row_number: n,
            key: DemandKey::new(product, market, model),
            quantities: qty.iter().copied().collect(),
        }
    }

    #[test]
    fn test_duplicate_rows_are_summed() {
        let jul = YearMonth::new(2026, 7).unwrap();
        let aug = YearMonth::new(2026, 8).unwrap();
        let rows = vec![
            row(2, "P1", "EXPORT", "M1", &[(jul, 10), (aug, 5)]),
            row(3, "P1", "EXPORT", "M1", &[(jul, 7)]),
            row(4, "P2", "MERCADO INTERNO", "M1", &[(aug, 3)]),
        ];

        let demand = DemandAggregator::new().aggregate(&rows, &[jul, aug]).unwrap();

        let july = demand.lines(jul);
        assert_eq!(july.len(), 2);
        assert_eq!(july[0].key, DemandKey::new("P1", "EXPORT", "M1"));
        assert_eq!(july[0].monthly_qty, 17);
        assert_eq!(july[1].monthly_qty, 0);

        assert_eq!(demand.total(jul), 17);
        assert_eq!(demand.total(aug), 8);
    }

    #[test]
    fn test_unknown_month_is_empty() {
        let jul = YearMonth::new(2026, 7).unwrap();
        let demand = DemandAggregator::new().aggregate(&[], &[jul]).unwrap();
        assert!(demand.lines(jul).is_empty());
        assert!(demand.lines(jul.next()).is_empty());
        assert_eq!(demand.total(jul), 0);
    }

    #[test]
    fn test_duplicate_rows_overflowing_u64_are_rejected() {
        let jul = YearMonth::new(2026, 7).unwrap();
        let rows = vec![
            row(2, "P1", "EXPORT", "M1", &[(jul, u64::MAX)]),
            row(3, "P1", "EXPORT", "M1", &[(jul, 1)]),
        ];

        let err = DemandAggregator::new().aggregate(&rows, &[jul]).unwrap_err();
        assert!(matches!(err, ScheduleError::DemandOverflow { month, .. } if month == jul));
    }

    #[test]
    fn test_month_total_overflowing_u64_is_rejected() {
        let jul = YearMonth::new(2026, 7).unwrap();
        let rows = vec![
            row(2, "P1", "EXPORT", "M1", &[(jul, u64::MAX / 2 + 1)]),
            row(3, "P2", "EXPORT", "M1", &[(jul, u64::MAX / 2 + 1)]),
        ];

        let err = DemandAggregator::new().aggregate(&rows, &[jul]).unwrap_err();
        assert!(matches!(err, ScheduleError::DemandOverflow { .. }));
    }
}
