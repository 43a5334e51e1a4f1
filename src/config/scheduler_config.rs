// ==========================================
// 月度均衡排产系统 - 排产参数
// ==========================================
// 职责: 排产核心所需的全部可调参数（类型化 + 校验）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::config_manager::config_keys;
use serde::{Deserialize, Serialize};

/// 周六上限的合法最大值（与原始录入界面一致）
pub const MAX_SATURDAY_CAP: u64 = 1000;

/// 工作日日产能的合法最大值
pub const MAX_DAILY_CAPACITY: u64 = 100_000;

/// 提前窗口工作日数的合法最大值（约一年）
pub const MAX_LOOKBACK_BUSINESS_DAYS: u64 = 260;

/// 排产参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 工作日日产能（全部车型合计）
    pub daily_capacity: u64,

    /// 单个周六的最大加班产能
    pub saturday_cap: u64,

    /// 允许提前到上月末生产的工作日数（0 = 不提前）
    pub lookback_business_days: u64,

    /// 单车型日上限（None 或 0 = 不限制）
    pub per_model_daily_cap: Option<u64>,

    /// 国内市场标识（当日消耗顺序中排在其他市场之后）
    pub domestic_market: String,

    /// 全局编号前缀
    pub id_prefix: String,

    /// 数量单元格非法（非空且非整数）时是否报错；false 时按 0 处理
    pub strict_quantities: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            daily_capacity: 50,
            saturday_cap: 50,
            lookback_business_days: 0,
            per_model_daily_cap: None,
            domestic_market: "MERCADO INTERNO".to_string(),
            id_prefix: "fila".to_string(),
            strict_quantities: true,
        }
    }
}

impl SchedulerConfig {
    /// 生效的单车型日上限（0 视为不限制）
    pub fn effective_per_model_cap(&self) -> Option<u64> {
        self.per_model_daily_cap.filter(|cap| *cap > 0)
    }

    /// 参数校验
    pub fn validate(&self) -> ConfigResult<()> {
        if self.daily_capacity == 0 || self.daily_capacity > MAX_DAILY_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: config_keys::DAILY_CAPACITY.to_string(),
                message: format!("日产能必须在 [1, {}] 之间", MAX_DAILY_CAPACITY),
            });
        }

        if self.saturday_cap == 0 || self.saturday_cap > MAX_SATURDAY_CAP {
            return Err(ConfigError::InvalidValue {
                key: config_keys::SATURDAY_CAP.to_string(),
                message: format!("周六上限必须在 [1, {}] 之间", MAX_SATURDAY_CAP),
            });
        }

        if self.lookback_business_days > MAX_LOOKBACK_BUSINESS_DAYS {
            return Err(ConfigError::InvalidValue {
                key: config_keys::LOOKBACK_BUSINESS_DAYS.to_string(),
                message: format!("提前工作日数不能超过 {}", MAX_LOOKBACK_BUSINESS_DAYS),
            });
        }

        if self.id_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: config_keys::ID_PREFIX.to_string(),
                message: "编号前缀不能为空".to_string(),
            });
        }

        if self.domestic_market.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: config_keys::DOMESTIC_MARKET.to_string(),
                message: "国内市场标识不能为空".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SchedulerConfig::default();
        assert_eq!(config.daily_capacity, 50);
        assert_eq!(config.saturday_cap, 50);
        assert_eq!(config.lookback_business_days, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_per_model_cap_means_unconstrained() {
        let config = SchedulerConfig {
            per_model_daily_cap: Some(0),
            ..Default::default()
        };
        assert_eq!(config.effective_per_model_cap(), None);

        let config = SchedulerConfig {
            per_model_daily_cap: Some(12),
            ..Default::default()
        };
        assert_eq!(config.effective_per_model_cap(), Some(12));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let zero_capacity = SchedulerConfig {
            daily_capacity: 0,
            ..Default::default()
        };
        assert!(zero_capacity.validate().is_err());

        let huge_capacity = SchedulerConfig {
            daily_capacity: u64::MAX,
            ..Default::default()
        };
        assert!(huge_capacity.validate().is_err());

        let max_capacity = SchedulerConfig {
            daily_capacity: MAX_DAILY_CAPACITY,
            ..Default::default()
        };
        assert!(max_capacity.validate().is_ok());

        let long_lookback = SchedulerConfig {
            lookback_business_days: MAX_LOOKBACK_BUSINESS_DAYS + 1,
            ..Default::default()
        };
        assert!(long_lookback.validate().is_err());

        let huge_saturday = SchedulerConfig {
            saturday_cap: MAX_SATURDAY_CAP + 1,
            ..Default::default()
        };
        assert!(huge_saturday.validate().is_err());

        let blank_prefix = SchedulerConfig {
            id_prefix: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank_prefix.validate().is_err());
    }
}
