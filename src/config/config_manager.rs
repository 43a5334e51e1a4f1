// ==========================================
// 月度均衡排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 键值文件 (key → value)
// 优先级: 命令行覆写 > 配置文件 > 默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::scheduler_config::SchedulerConfig;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
    source: Option<String>,
}

impl ConfigManager {
    /// 创建空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文件加载配置
    ///
    /// 文件内容为一个 JSON 对象，值可以是字符串、数字、布尔或 null
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut manager = Self::from_json_str(&raw)?;
        manager.source = Some(path.display().to_string());
        info!(path = %path.display(), keys = manager.values.len(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载配置
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let parsed: Value = serde_json::from_str(raw)?;
        let object = parsed
            .as_object()
            .ok_or_else(|| ConfigError::ParseError("配置文件顶层必须是 JSON 对象".to_string()))?;

        let mut values = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ConfigError::ConfigValueError {
                        key: key.clone(),
                        value: other.to_string(),
                        message: "仅支持标量值".to_string(),
                    })
                }
            };
            values.insert(canonical_key(key).to_string(), text);
        }

        Ok(Self {
            values,
            source: None,
        })
    }

    /// 覆写配置值（命令行参数等）
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let key = canonical_key(key);
        let value = value.into();
        debug!(key, value = %value, "配置覆写");
        self.values.insert(key.to_string(), value);
    }

    /// 读取配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(canonical_key(key)).map(|v| v.as_str())
    }

    /// 配置来源（文件路径）
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_global_config_value(key)
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    fn get_u64(&self, key: &str, default: u64) -> ConfigResult<u64> {
        let raw = self.get_config_or_default(key, &default.to_string());
        raw.parse::<u64>().map_err(|_| ConfigError::ConfigValueError {
            key: key.to_string(),
            value: raw.clone(),
            message: "期望非负整数".to_string(),
        })
    }

    fn get_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let raw = self.get_config_or_default(key, &default.to_string());
        match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Ok(true),
            "0" | "false" | "no" | "n" | "off" => Ok(false),
            _ => Err(ConfigError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: "期望布尔值".to_string(),
            }),
        }
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 构建排产参数（已校验）
    pub fn load_scheduler_config(&self) -> ConfigResult<SchedulerConfig> {
        let defaults = SchedulerConfig::default();

        let per_model_cap = self.get_u64(config_keys::PER_MODEL_DAILY_CAP, 0)?;

        let config = SchedulerConfig {
            daily_capacity: self.get_u64(config_keys::DAILY_CAPACITY, defaults.daily_capacity)?,
            saturday_cap: self.get_u64(config_keys::SATURDAY_CAP, defaults.saturday_cap)?,
            lookback_business_days: self.get_u64(
                config_keys::LOOKBACK_BUSINESS_DAYS,
                defaults.lookback_business_days,
            )?,
            per_model_daily_cap: (per_model_cap > 0).then_some(per_model_cap),
            domestic_market: self
                .get_config_or_default(config_keys::DOMESTIC_MARKET, &defaults.domestic_market),
            id_prefix: self.get_config_or_default(config_keys::ID_PREFIX, &defaults.id_prefix),
            strict_quantities: self
                .get_bool(config_keys::STRICT_QUANTITIES, defaults.strict_quantities)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// 获取生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 导出结果时记录本次运行所用参数
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.snapshot_value()?)?)
    }

    /// 配置快照（JSON 值，嵌入导出包）
    pub fn snapshot_value(&self) -> ConfigResult<serde_json::Value> {
        let config = self.load_scheduler_config()?;
        Ok(json!({
            "source": self.source,
            "effective": config,
        }))
    }
}

/// 将原始界面使用的葡语参数名映射为标准键
fn canonical_key(key: &str) -> &str {
    let trimmed = key.trim();
    config_keys::LEGACY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, canonical)| *canonical)
        .unwrap_or(trimmed)
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 产能
    pub const DAILY_CAPACITY: &str = "daily_capacity";
    pub const SATURDAY_CAP: &str = "saturday_cap";
    pub const PER_MODEL_DAILY_CAP: &str = "per_model_daily_cap";

    // 日历
    pub const LOOKBACK_BUSINESS_DAYS: &str = "lookback_business_days";

    // 消耗顺序
    pub const DOMESTIC_MARKET: &str = "domestic_market";

    // 输出
    pub const ID_PREFIX: &str = "id_prefix";

    // 导入
    pub const STRICT_QUANTITIES: &str = "strict_quantities";

    /// 别名 → 标准键
    pub const LEGACY_ALIASES: &[(&str, &str)] = &[
        ("capacidade_dia_util", DAILY_CAPACITY),
        ("teto_sabado", SATURDAY_CAP),
        ("limite_diario_por_modelo", PER_MODEL_DAILY_CAP),
        ("dias_uteis_anteriores", LOOKBACK_BUSINESS_DAYS),
        ("mercado_interno", DOMESTIC_MARKET),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manager_yields_defaults() {
        let manager = ConfigManager::new();
        let config = manager.load_scheduler_config().unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_json_values_and_aliases() {
        let manager = ConfigManager::from_json_str(
            r#"{"capacidade_dia_util": 40, "teto_sabado": "30", "dias_uteis_anteriores": 4,
                "per_model_daily_cap": 0, "strict_quantities": false, "id_prefix": null}"#,
        )
        .unwrap();
        let config = manager.load_scheduler_config().unwrap();

        assert_eq!(config.daily_capacity, 40);
        assert_eq!(config.saturday_cap, 30);
        assert_eq!(config.lookback_business_days, 4);
        assert_eq!(config.per_model_daily_cap, None);
        assert!(!config.strict_quantities);
        assert_eq!(config.id_prefix, "fila");
    }

    #[test]
    fn test_override_wins_over_file() {
        let mut manager = ConfigManager::from_json_str(r#"{"daily_capacity": 40}"#).unwrap();
        manager.set("daily_capacity", "60");
        assert_eq!(manager.load_scheduler_config().unwrap().daily_capacity, 60);
    }

    #[test]
    fn test_malformed_value_is_error() {
        let manager = ConfigManager::from_json_str(r#"{"daily_capacity": "abc"}"#).unwrap();
        assert!(matches!(
            manager.load_scheduler_config(),
            Err(ConfigError::ConfigValueError { .. })
        ));

        let manager = ConfigManager::from_json_str(r#"{"daily_capacity": -5}"#).unwrap();
        assert!(manager.load_scheduler_config().is_err());

        assert!(ConfigManager::from_json_str("[1, 2]").is_err());
        assert!(ConfigManager::from_json_str(r#"{"daily_capacity": [50]}"#).is_err());
    }

    #[test]
    fn test_out_of_range_capacity_is_rejected() {
        let mut manager = ConfigManager::new();
        manager.set(config_keys::DAILY_CAPACITY, u64::MAX.to_string());
        assert!(matches!(
            manager.load_scheduler_config(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == config_keys::DAILY_CAPACITY
        ));
    }

    #[test]
    fn test_snapshot_contains_effective_values() {
        let manager = ConfigManager::from_json_str(r#"{"saturday_cap": 25}"#).unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();
        let value: Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["effective"]["saturday_cap"], 25);
        assert_eq!(value["effective"]["daily_capacity"], 50);
    }
}
