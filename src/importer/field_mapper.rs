// ==========================================
// 月度均衡排产系统 - 字段映射器实现
// ==========================================
// 职责:
// - 必需标识列校验 (MODELO / PRODUTO / MERCADO)
// - 月份列解析: "<葡语缩写>/<yy>" 或 "<葡语缩写>/<yyyy>"，忽略大小写
// - 原始行 → DemandRow
// ==========================================

use crate::domain::demand::{DemandKey, DemandRow, RawRecord, RawTable};
use crate::domain::types::YearMonth;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// 必需标识列（精确匹配，表头已 trim）
pub const COL_MODEL: &str = "MODELO";
pub const COL_PRODUCT: &str = "PRODUTO";
pub const COL_MARKET: &str = "MERCADO";
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_MODEL, COL_PRODUCT, COL_MARKET];

// ==========================================
// MonthColumnMap - 目标月份 → 源列名
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthColumnMap {
    entries: Vec<(YearMonth, Option<String>)>, // 顺序同目标月份
}

impl MonthColumnMap {
    pub fn column(&self, month: YearMonth) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| *m == month)
            .and_then(|(_, col)| col.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, Option<&str>)> {
        self.entries.iter().map(|(m, col)| (*m, col.as_deref()))
    }

    /// 未找到列的月份（需求按 0 计）
    pub fn missing(&self) -> Vec<YearMonth> {
        self.entries
            .iter()
            .filter(|(_, col)| col.is_none())
            .map(|(m, _)| *m)
            .collect()
    }
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(cleaner: DataCleaner) -> Self {
        Self { cleaner }
    }

    /// 校验必需列，缺失时一次性列出全部缺失列名
    pub fn validate_schema(&self, table: &RawTable) -> ImportResult<()> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !table.has_column(col))
            .map(|col| col.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingRequiredField(missing))
        }
    }

    /// 月份列可接受的写法（小写）
    pub fn month_column_variants(month: YearMonth) -> [String; 2] {
        let abbr = month.pt_br_abbr();
        [
            format!("{}/{:02}", abbr, month.short_year()),
            format!("{}/{}", abbr, month.year),
        ]
    }

    /// 为每个目标月份寻找源列
    ///
    /// 匹配规则: 表头 trim + 小写后与任一写法完全相等;
    /// 多列命中时取表头顺序中的第一列
    pub fn resolve_month_columns(&self, headers: &[String], months: &[YearMonth]) -> MonthColumnMap {
        let entries = months
            .iter()
            .map(|month| {
                let variants = Self::month_column_variants(*month);
                let found = headers
                    .iter()
                    .find(|h| {
                        let normalized = h.trim().to_lowercase();
                        variants.iter().any(|v| *v == normalized)
                    })
                    .cloned();
                (*month, found)
            })
            .collect();

        MonthColumnMap { entries }
    }

    /// 原始行 → 需求行
    ///
    /// # 返回
    /// - Ok((DemandRow, 被归零的异常单元格数))
    /// - Err: 严格模式下数量格式错误
    pub fn map_to_demand_row(
        &self,
        record: &RawRecord,
        columns: &MonthColumnMap,
    ) -> ImportResult<(DemandRow, usize)> {
        let key = DemandKey::new(
            self.cleaner.clean_text(record.get(COL_PRODUCT).unwrap_or("")),
            self.cleaner.clean_text(record.get(COL_MARKET).unwrap_or("")),
            self.cleaner.clean_text(record.get(COL_MODEL).unwrap_or("")),
        );

        let mut quantities = BTreeMap::new();
        let mut coerced = 0usize;
        for (month, column) in columns.iter() {
            let qty = match column {
                Some(col) => {
                    let raw = record.get(col).unwrap_or("");
                    let parsed = self.cleaner.parse_quantity(raw, record.row_number, col)?;
                    if parsed.coerced {
                        coerced += 1;
                    }
                    parsed.value
                }
                None => 0,
            };
            quantities.insert(month, qty);
        }

        Ok((
            DemandRow {
                row_number: record.row_number,
                key,
                quantities,
            },
            coerced,
        ))
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(DataCleaner::default())
    }
}
