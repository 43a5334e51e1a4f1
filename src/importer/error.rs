// ==========================================
// 月度均衡排产系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 非空但格式错误的数量不得静默归零（严格模式下）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("工作表不存在: {0}")]
    SheetNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表结构错误 =====
    #[error("缺少必需列: {}", .0.join(", "))]
    MissingRequiredField(Vec<String>),

    // ===== 数据质量错误 =====
    #[error("数量格式错误 (行 {row}, 列 {column}): {value:?}")]
    MalformedQuantity {
        row: usize,
        column: String,
        value: String,
    },

    // ===== 参数错误 =====
    #[error("月份区间无效: {start} 晚于 {end}")]
    InvalidMonthRange { start: String, end: String },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
