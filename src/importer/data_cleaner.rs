// ==========================================
// 月度均衡排产系统 - 数据清洗器实现
// ==========================================
// 职责: 文本 TRIM / 数量单元格解析
// 数量规则:
// - 空单元格 → 0
// - 非负整数文本（含 Excel 浮点写法 "12.0"）→ 整数
// - 其他（非数字 / 负数 / 小数）:
//     严格模式 → MalformedQuantity
//     宽松模式 → 0 并记录 warn
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use tracing::warn;

/// 数量解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedQuantity {
    pub value: u64,
    pub coerced: bool, // 宽松模式下由异常值归零
}

#[derive(Debug, Clone, Copy)]
pub struct DataCleaner {
    strict: bool,
}

impl DataCleaner {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 解析数量单元格
    ///
    /// # 参数
    /// - `value`: 单元格文本
    /// - `row`: 源文件行号（报错用）
    /// - `column`: 列名（报错用）
    pub fn parse_quantity(&self, value: &str, row: usize, column: &str) -> ImportResult<ParsedQuantity> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(ParsedQuantity {
                value: 0,
                coerced: false,
            });
        }

        if let Some(qty) = parse_whole_number(trimmed) {
            return Ok(ParsedQuantity {
                value: qty,
                coerced: false,
            });
        }

        if self.strict {
            return Err(ImportError::MalformedQuantity {
                row,
                column: column.to_string(),
                value: trimmed.to_string(),
            });
        }

        warn!(row, column, value = trimmed, "数量格式异常,按 0 处理");
        Ok(ParsedQuantity {
            value: 0,
            coerced: true,
        })
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 非负整数（允许 "12.0" 这类整值浮点写法）
fn parse_whole_number(text: &str) -> Option<u64> {
    if let Ok(qty) = text.parse::<u64>() {
        return Some(qty);
    }

    let float = text.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}
