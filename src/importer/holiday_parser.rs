// ==========================================
// 月度均衡排产系统 - 假日解析器
// ==========================================
// 输入:
// - 自由文本: 每行一个日期，';' 亦可分隔
// - CSV 文件: 读取 "data" 列
// 容错: 无法解析的行/值跳过并记录 warn，不中止
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// 文本日期格式（按顺序尝试）
const TEXT_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// CSV 日期列名
pub const HOLIDAY_CSV_COLUMN: &str = "data";

pub struct HolidayParser {
    // 无状态引擎
}

impl HolidayParser {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析单个日期文本，全部格式失败时返回 None
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let trimmed = text.trim();
        TEXT_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    }

    /// 解析自由文本
    pub fn parse_text(&self, text: &str) -> BTreeSet<NaiveDate> {
        let mut dates = BTreeSet::new();
        for line in text.replace(';', "\n").lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_date(trimmed) {
                Some(date) => {
                    dates.insert(date);
                }
                None => warn!(value = trimmed, "无法解析的假日,已跳过"),
            }
        }
        dates
    }

    /// 读取文本文件（每行一个日期）
    pub fn parse_text_file(&self, path: &Path) -> ImportResult<BTreeSet<NaiveDate>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(self.parse_text(&content))
    }

    /// 读取 CSV 的 "data" 列
    ///
    /// 缺少该列时返回空集合并记录 warn
    pub fn parse_csv_file(&self, path: &Path) -> ImportResult<BTreeSet<NaiveDate>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let column = reader
            .headers()?
            .iter()
            .position(|h| h.trim().trim_start_matches('\u{feff}') == HOLIDAY_CSV_COLUMN);
        let Some(column) = column else {
            warn!(path = %path.display(), "假日 CSV 缺少 data 列,已忽略");
            return Ok(BTreeSet::new());
        };

        let mut dates = BTreeSet::new();
        for result in reader.records() {
            let record = result?;
            let Some(value) = record.get(column) else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_date(trimmed) {
                Some(date) => {
                    dates.insert(date);
                }
                None => warn!(value = trimmed, "无法解析的假日,已跳过"),
            }
        }

        debug!(path = %path.display(), count = dates.len(), "假日 CSV 读取完成");
        Ok(dates)
    }
}

impl Default for HolidayParser {
    fn default() -> Self {
        Self::new()
    }
}
