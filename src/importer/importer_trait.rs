// ==========================================
// 月度均衡排产系统 - 导入 Trait
// ==========================================
// 职责: 定义需求导入接口（不包含实现）
// ==========================================

use crate::domain::demand::{DemandRow, RawTable};
use crate::domain::types::YearMonth;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::MonthColumnMap;
use serde::Serialize;
use std::path::Path;

// ==========================================
// ImportedDemand - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportedDemand {
    pub raw: RawTable,               // 原始输入（回显用）
    pub rows: Vec<DemandRow>,        // 字段映射后的需求行
    pub month_columns: MonthColumnMap, // 目标月份 → 源列名
    pub coerced_cells: usize,        // 宽松模式下被归零的异常单元格数
}

impl ImportedDemand {
    /// 指定月份全部行的需求合计（饱和求和,仅用于诊断展示）
    pub fn month_total(&self, month: YearMonth) -> u64 {
        self.rows
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity(month)))
    }
}

// ==========================================
// DemandImporter Trait
// ==========================================
// 用途: 需求导入主接口
// 实现者: DemandImporterImpl
pub trait DemandImporter: Send + Sync {
    /// 从文件导入需求
    ///
    /// # 参数
    /// - file_path: 需求文件（.xlsx/.xls/.csv）
    /// - months: 目标月份
    ///
    /// # 返回
    /// - Ok(ImportedDemand): 原始表 + 需求行 + 月份列映射
    /// - Err: 文件错误 / 缺少必需列 / 数量格式错误（严格模式）
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 必需列校验
    /// 3. 月份列解析
    /// 4. 数量清洗
    fn import_from_file(&self, file_path: &Path, months: &[YearMonth])
        -> ImportResult<ImportedDemand>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 trim,全空行跳过）
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}
