// ==========================================
// 月度均衡排产系统 - 引擎层
// ==========================================
// 职责: 日历 / 聚合 / 配额 / 单日分配 / 单月编排 / 全周期构建
// 红线: 引擎不做任何 I/O; 需求必须按月 100% 排完
// ==========================================

pub mod aggregator;
pub mod calendar;
pub mod day_allocator;
pub mod error;
pub mod ledger;
pub mod month_scheduler;
pub mod quota;
pub mod schedule_builder;

// 重导出核心引擎
pub use aggregator::{AggregatedDemand, DemandAggregator};
pub use calendar::BusinessCalendar;
pub use day_allocator::DayAllocator;
pub use error::{EngineResult, ScheduleError};
pub use ledger::{DayCapacityBook, DemandLedger, ModelBalance};
pub use month_scheduler::{MonthOutcome, MonthPhase, MonthScheduler};
pub use quota::{ModelQuotas, QuotaApportioner};
pub use schedule_builder::{ScheduleBuilder, ScheduleResult};
