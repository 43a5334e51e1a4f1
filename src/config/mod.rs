// ==========================================
// 月度均衡排产系统 - 配置层
// ==========================================
// 职责: 排产参数定义与加载,支持多级覆写
// 存储: JSON 键值文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod scheduler_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use scheduler_config::{
    SchedulerConfig, MAX_DAILY_CAPACITY, MAX_LOOKBACK_BUSINESS_DAYS, MAX_SATURDAY_CAP,
};
