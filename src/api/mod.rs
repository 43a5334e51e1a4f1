// ==========================================
// 月度均衡排产系统 - API 层
// ==========================================
// 职责: 提供排产用例接口,供命令行调用
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use schedule_api::{
    GenerateRequest, GenerateResponse, MonthMapping, MonthMappingReport, PlanOutcome, ScheduleApi,
};
