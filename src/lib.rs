// ==========================================
// 月度均衡排产系统 - 核心库
// ==========================================
// 职责: 月度需求 → 每日均衡排产（按件、按车型比例、周六溢出）
// 系统定位: 批处理计算,任一月份失败即整体中止
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排产规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 结果表格
pub mod exporter;

// 配置层 - 排产参数
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 用例接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AllocationEvent, CalendarDay, DayKind, DemandKey, DemandLine, DemandRow, GlobalSchedule,
    MonthReport, ScheduledUnit, YearMonth,
};

// 引擎
pub use engine::{
    BusinessCalendar, DayAllocator, DemandAggregator, MonthScheduler, QuotaApportioner,
    ScheduleBuilder, ScheduleError, ScheduleResult,
};

// 配置
pub use config::{ConfigManager, SchedulerConfig};

// API
pub use api::{ApiError, GenerateRequest, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "月度均衡排产系统";
