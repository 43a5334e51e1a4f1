// ==========================================
// 月度均衡排产系统 - 领域模型层
// ==========================================
// 职责: 定义需求、日历日、分配事件、报表等实体
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod demand;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use demand::{DemandKey, DemandLine, DemandRow, RawRecord, RawTable};
pub use schedule::{AllocationEvent, GlobalSchedule, MonthReport, ScheduledUnit};
pub use types::{CalendarDay, DayKind, YearMonth, PT_BR_MONTH_ABBR};
