// ==========================================
// 月度均衡排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 任一致命错误中止整个批次,不输出部分排产
// ==========================================

use crate::domain::types::YearMonth;
use crate::engine::month_scheduler::MonthPhase;
use thiserror::Error;

/// 排产引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// 当月需求超过 工作日产能 + 全部可用周六产能
    #[error(
        "{month} 月度超额 {unabsorbed} 件无法在非假日周六内消纳; \
         请提高 saturday_cap、daily_capacity、lookback_business_days 或调整需求"
    )]
    OverflowCapacityExceeded { month: YearMonth, unabsorbed: u64 },

    /// 后置条件违反: 全部计划日分配完毕后台账未清零
    #[error("{month} 分配未完成: 剩余 {leftover} 件未排产")]
    IncompleteAllocation { month: YearMonth, leftover: u64 },

    /// 同一月份需求合计超出可表示范围
    #[error("{month} 需求合计溢出 (键: {key})")]
    DemandOverflow { month: YearMonth, key: String },

    /// 单月状态机出现非法流转
    #[error("{month} 非法阶段流转: {from} → {to}")]
    InvalidPhaseTransition {
        month: YearMonth,
        from: MonthPhase,
        to: MonthPhase,
    },

    #[error("排产参数无效 ({name}): {message}")]
    InvalidParameter { name: String, message: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, ScheduleError>;
