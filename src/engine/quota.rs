// ==========================================
// 月度均衡排产系统 - 车型日配额分摊
// ==========================================
// 算法: 比例份额取整 + 最大余数法 (Hamilton)
// 附加上限: 车型剩余量 / 单车型日上限（可选）
// ==========================================
// 输入: 车型剩余量 + 当日产能 + 单车型上限
// 输出: 各车型当日配额,合计 ≤ 当日产能
// ==========================================

use crate::engine::ledger::ModelBalance;

// ==========================================
// ModelQuotas - 车型当日配额
// ==========================================
// 顺序与输入 ModelBalance 一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelQuotas {
    entries: Vec<(String, u64)>,
}

impl ModelQuotas {
    pub fn get(&self, model: &str) -> u64 {
        self.entries
            .iter()
            .find(|(m, _)| m == model)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, q)| *q).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(m, q)| (m.as_str(), *q))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// QuotaApportioner - 配额分摊器
// ==========================================
pub struct QuotaApportioner {
    // 无状态引擎
}

impl QuotaApportioner {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算各车型当日配额
    ///
    /// 规则:
    /// 1) 总剩余量或当日产能为 0 → 全部为 0
    /// 2) 原始份额 = balance × capacity / total,取整后夹到 min(份额, 上限, balance)
    /// 3) 剩余名额逐个分给余数最大的车型（已达上限/剩余量者除外）;
    ///    余数相同按车型在输入中的顺序,靠前者优先
    /// 4) 无车型可再接收时提前结束（产能不满的一天）
    ///
    /// 余数以整数分子 balance × capacity − quota × total 精确比较,不使用浮点
    pub fn apportion(
        &self,
        balances: &ModelBalance,
        day_capacity: u64,
        per_model_cap: Option<u64>,
    ) -> ModelQuotas {
        let total = balances.total() as u128;
        if total == 0 || day_capacity == 0 {
            return ModelQuotas {
                entries: balances.iter().map(|(m, _)| (m.to_string(), 0)).collect(),
            };
        }

        let capacity = day_capacity as u128;

        // (车型, 原始份额分子, 配额, 配额天花板)
        let mut slots: Vec<(String, u128, u64, u64)> = balances
            .iter()
            .map(|(model, balance)| {
                let numerator = balance as u128 * capacity;
                let floor = (numerator / total) as u64;
                let ceiling = match per_model_cap {
                    Some(cap) => balance.min(cap),
                    None => balance,
                };
                (model.to_string(), numerator, floor.min(ceiling), ceiling)
            })
            .collect();

        let allocated: u64 = slots.iter().map(|(_, _, q, _)| *q).sum();
        let mut remainder = day_capacity.saturating_sub(allocated);

        while remainder > 0 {
            let mut best: Option<(usize, i128)> = None;
            for (idx, (_, numerator, quota, ceiling)) in slots.iter().enumerate() {
                if quota >= ceiling {
                    continue;
                }
                let fraction = *numerator as i128 - (*quota as u128 * total) as i128;
                // 严格大于: 余数相同保留靠前者
                if best.map_or(true, |(_, f)| fraction > f) {
                    best = Some((idx, fraction));
                }
            }

            match best {
                Some((idx, _)) => {
                    slots[idx].2 += 1;
                    remainder -= 1;
                }
                None => break,
            }
        }

        ModelQuotas {
            entries: slots
                .into_iter()
                .map(|(model, _, quota, _)| (model, quota))
                .collect(),
        }
    }
}

impl Default for QuotaApportioner {
    fn default() -> Self {
        Self::new()
    }
}
