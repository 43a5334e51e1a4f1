// ==========================================
// 月度均衡排产系统 - API层错误类型
// ==========================================
// 职责: 汇总导入 / 引擎 / 配置 / 导出各层错误,向调用方给出明确原因
// ==========================================

use crate::config::ConfigError;
use crate::engine::ScheduleError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("需求导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("排产失败: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("结果导出失败: {0}")]
    Export(#[from] ExportError),
}

impl ApiError {
    /// 是否为表结构错误（缺少必需列）
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ApiError::Import(ImportError::MissingRequiredField(_)))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
