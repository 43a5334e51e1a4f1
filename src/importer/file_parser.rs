// ==========================================
// 月度均衡排产系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls，按工作表名读取) / CSV (.csv)
// 输出: RawTable（表头保持源顺序，单元格文本已 trim）
// ==========================================

use crate::domain::demand::{RawRecord, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 默认需求工作表名
pub const DEFAULT_SHEET_NAME: &str = "Planilha1";

/// 检查文件存在并返回小写扩展名
fn checked_extension(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase())
}

/// 按表头组装一行; 全空行返回 None
fn build_record(headers: &[String], cells: Vec<String>, row_number: usize) -> Option<RawRecord> {
    let mut values = HashMap::with_capacity(headers.len());
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            // 重复列名保留第一列
            values.entry(header.clone()).or_insert(value);
        }
    }

    if values.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRecord { row_number, values })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let ext = checked_extension(file_path)?;
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(|v| v.trim().to_string()).collect();
            // 表头为第 1 行
            if let Some(row) = build_record(&headers, cells, idx + 2) {
                records.push(row);
            }
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    sheet_name: String,
}

impl ExcelParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let ext = checked_extension(file_path)?;
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        if !workbook
            .sheet_names()
            .iter()
            .any(|name| name == &self.sheet_name)
        {
            return Err(ImportError::SheetNotFound(self.sheet_name.clone()));
        }

        let range = workbook.worksheet_range(&self.sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = match rows.next() {
            Some(row) => row,
            None => {
                return Ok(RawTable::default());
            }
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for (idx, data_row) in rows.enumerate() {
            let cells = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();
            if let Some(row) = build_record(&headers, cells, idx + 2) {
                records.push(row);
            }
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    sheet_name: String,
}

impl UniversalFileParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match checked_extension(file_path)?.as_str() {
            "csv" => CsvParser.parse_to_raw_table(file_path),
            "xlsx" | "xls" => ExcelParser::new(self.sheet_name.clone()).parse_to_raw_table(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
