// ==========================================
// 月度均衡排产系统 - 需求领域模型
// ==========================================
// 职责: 原始表格 / 需求行 / 聚合后的月度需求
// 红线: 需求数量一律为非负整数
// ==========================================

use crate::domain::types::YearMonth;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ==========================================
// DemandKey - (产品, 市场, 车型) 唯一键
// ==========================================
// 排序: 产品 → 市场 → 车型（聚合输出与台账初始顺序均按此排序）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DemandKey {
    pub product: String, // 产品 (PRODUTO)
    pub market: String,  // 市场 (MERCADO)
    pub model: String,   // 车型 (MODELO)
}

impl DemandKey {
    pub fn new(
        product: impl Into<String>,
        market: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            market: market.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.product, self.market, self.model)
    }
}

// ==========================================
// RawTable - 原始输入表（用于回显）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,      // 表头（保持源文件列顺序）
    pub records: Vec<RawRecord>,   // 数据行（已跳过全空行）
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub row_number: usize,               // 源文件行号（表头为第 1 行）
    pub values: HashMap<String, String>, // 列名 → 单元格文本（已 trim）
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(|v| v.as_str())
    }
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// 按表头顺序输出行（缺失单元格为空串）
    pub fn ordered_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                self.headers
                    .iter()
                    .map(|h| r.values.get(h).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

// ==========================================
// DemandRow - 字段映射后的需求行（未聚合）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRow {
    pub row_number: usize,
    pub key: DemandKey,
    pub quantities: BTreeMap<YearMonth, u64>, // 各目标月份需求（缺失月份视为 0）
}

impl DemandRow {
    pub fn quantity(&self, month: YearMonth) -> u64 {
        self.quantities.get(&month).copied().unwrap_or(0)
    }
}

// ==========================================
// DemandLine - 聚合后的月度需求
// ==========================================
// 生命周期: 仅在单月排产期间存在，月度台账由其派生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandLine {
    pub key: DemandKey,
    pub monthly_qty: u64,
    pub reference_month: YearMonth,
}
