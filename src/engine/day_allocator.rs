// ==========================================
// 月度均衡排产系统 - 单日分配引擎
// ==========================================
// 职责: 按车型配额轮转,逐件消耗台账
// 输入: 台账（会被修改）+ 日期 + 当日产能 + 单车型上限
// 输出: 当日 AllocationEvent 列表
// ==========================================
// 消耗顺序:
// 1) 车型间: 按配额为正的车型固定循环
// 2) 车型内: 先非国内市场队列,空后再国内市场队列
// 3) 队列内: 取队首,消耗一件后放回队尾
// ==========================================

use crate::domain::demand::DemandKey;
use crate::domain::schedule::AllocationEvent;
use crate::engine::ledger::DemandLedger;
use crate::engine::quota::QuotaApportioner;
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use tracing::{instrument, warn};

/// 轮转步数保护下限
const MIN_ROUND_ROBIN_GUARD: usize = 50_000;

/// 队列层级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueTier {
    Priority, // 非国内市场
    Fallback, // 国内市场
}

/// 车型内的两级 (产品, 市场) 队列
#[derive(Debug, Default)]
struct ModelQueues {
    priority: VecDeque<(String, String)>,
    fallback: VecDeque<(String, String)>,
}

impl ModelQueues {
    /// 先查优先队列,为空时才查国内市场队列
    fn pop_next(&mut self) -> Option<(QueueTier, String, String)> {
        if let Some((product, market)) = self.priority.pop_front() {
            return Some((QueueTier::Priority, product, market));
        }
        self.fallback
            .pop_front()
            .map(|(product, market)| (QueueTier::Fallback, product, market))
    }

    fn push_back(&mut self, tier: QueueTier, product: String, market: String) {
        match tier {
            QueueTier::Priority => self.priority.push_back((product, market)),
            QueueTier::Fallback => self.fallback.push_back((product, market)),
        }
    }
}

// ==========================================
// DayAllocator - 单日分配引擎
// ==========================================
pub struct DayAllocator {
    apportioner: QuotaApportioner,
    domestic_market: String, // 已 trim + 大写
}

impl DayAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `domestic_market`: 国内市场标识（比较时忽略首尾空白与大小写）
    pub fn new(domestic_market: &str) -> Self {
        Self {
            apportioner: QuotaApportioner::new(),
            domestic_market: domestic_market.trim().to_uppercase(),
        }
    }

    pub fn is_domestic(&self, market: &str) -> bool {
        market.trim().to_uppercase() == self.domestic_market
    }

    /// 分配一天
    ///
    /// 台账条目严格递减,不会为负; 相同台账状态下输出顺序完全确定
    #[instrument(skip(self, ledger), fields(month = %ledger.reference_month()))]
    pub fn allocate_day(
        &self,
        ledger: &mut DemandLedger,
        date: NaiveDate,
        day_capacity: u64,
        per_model_cap: Option<u64>,
    ) -> Vec<AllocationEvent> {
        let balance = ledger.model_balance();
        if balance.is_empty() || day_capacity == 0 {
            return Vec::new();
        }

        let quotas = self.apportioner.apportion(&balance, day_capacity, per_model_cap);

        // 车型索引与剩余配额（顺序同 ModelBalance）
        let mut remaining_quota: Vec<(String, u64)> =
            quotas.iter().map(|(m, q)| (m.to_string(), q)).collect();
        let model_index: HashMap<String, usize> = remaining_quota
            .iter()
            .enumerate()
            .map(|(idx, (m, _))| (m.clone(), idx))
            .collect();

        let mut queues: Vec<ModelQueues> = remaining_quota.iter().map(|_| ModelQueues::default()).collect();
        for (key, _) in ledger.open_entries() {
            if let Some(&idx) = model_index.get(&key.model) {
                let pair = (key.product.clone(), key.market.clone());
                if self.is_domestic(&key.market) {
                    queues[idx].fallback.push_back(pair);
                } else {
                    queues[idx].priority.push_back(pair);
                }
            }
        }

        // 固定循环顺序: 配额为正的车型
        let model_order: Vec<usize> = remaining_quota
            .iter()
            .enumerate()
            .filter(|(_, (_, q))| *q > 0)
            .map(|(idx, _)| idx)
            .collect();
        if model_order.is_empty() {
            return Vec::new();
        }

        let mut quota_left: u64 = remaining_quota.iter().map(|(_, q)| *q).sum();
        let guard_limit = MIN_ROUND_ROBIN_GUARD
            .max((day_capacity as usize).saturating_add(ledger.open_entries().count()).saturating_mul(4));

        let reference_month = ledger.reference_month();
        let mut events = Vec::with_capacity(day_capacity.min(quota_left) as usize);
        let mut produced: u64 = 0;
        let mut cursor: usize = 0;
        let mut steps: usize = 0;

        while produced < day_capacity && quota_left > 0 {
            steps += 1;
            if steps > guard_limit {
                warn!(
                    date = %date,
                    produced,
                    quota_left,
                    "轮转步数超过保护上限,提前结束当日分配"
                );
                break;
            }

            let model_idx = model_order[cursor % model_order.len()];
            if remaining_quota[model_idx].1 == 0 {
                cursor += 1;
                continue;
            }

            let Some((tier, product, market)) = queues[model_idx].pop_next() else {
                // 该车型已无需求,作废剩余配额
                quota_left -= remaining_quota[model_idx].1;
                remaining_quota[model_idx].1 = 0;
                cursor += 1;
                continue;
            };

            let model = remaining_quota[model_idx].0.clone();
            let key = DemandKey {
                product,
                market,
                model,
            };
            if !ledger.consume_one(&key) {
                // 条目已耗尽: 丢弃并在同一车型上重试
                continue;
            }

            remaining_quota[model_idx].1 -= 1;
            quota_left -= 1;
            produced += 1;

            let still_open = ledger.remaining(&key) > 0;
            let DemandKey {
                product,
                market,
                model,
            } = key;
            events.push(AllocationEvent {
                date,
                product: product.clone(),
                model,
                market: market.clone(),
                reference_month,
            });
            if still_open {
                queues[model_idx].push_back(tier, product, market);
            }
            cursor += 1;
        }

        events
    }
}
