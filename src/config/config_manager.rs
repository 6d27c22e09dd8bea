// ==========================================
// 晶圆厂产能分析引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、键值覆写、快照导出
// 覆写顺序: 默认值 < JSON 配置文件 < 键值覆写 < 环境变量 (FAB_CAPACITY_*)
// ==========================================

use crate::config::analysis_config::AnalysisConfig;
use crate::config::ConfigError;
use crate::logging::LOG_FORMAT_ENV;
use crate::domain::types::{OptimizerMode, RiskLevel};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "FAB_CAPACITY_";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: AnalysisConfig,
}

impl ConfigManager {
    /// 以默认配置创建
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有配置创建
    pub fn from_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 从 JSON 配置文件加载 (未出现的字段取默认值)
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(Self { config })
    }

    /// 应用键值覆写
    ///
    /// # 参数
    /// - overrides: config_keys 中定义的键 → 字符串值
    ///
    /// # 返回
    /// 应用的覆写项数量；未知键或非法值返回错误
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Result<usize, ConfigError> {
        let mut keys: Vec<&String> = overrides.keys().collect();
        keys.sort();

        for key in &keys {
            self.set_value(key, &overrides[*key])?;
        }

        Ok(keys.len())
    }

    /// 应用环境变量覆写 (FAB_CAPACITY_TARGET_OUTPUT=20000 → target_output)
    pub fn apply_env_overrides(&mut self) -> Result<usize, ConfigError> {
        let overrides = collect_env_overrides(std::env::vars());
        self.apply_overrides(&overrides)
    }

    /// 设置单个配置项
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let c = &mut self.config;
        match key {
            config_keys::TARGET_OUTPUT => c.target_output = parse(key, value)?,
            config_keys::WEEKS_PER_QUARTER => c.weeks_per_quarter = parse(key, value)?,

            config_keys::WARNING_THRESHOLD => c.bottleneck.thresholds.warning = parse(key, value)?,
            config_keys::CRITICAL_THRESHOLD => {
                c.bottleneck.thresholds.critical = parse(key, value)?
            }
            config_keys::HOURS_PER_PERIOD => c.bottleneck.hours_per_period = parse(key, value)?,
            config_keys::STEP_NORMALIZATION => {
                c.bottleneck.step_normalization = parse(key, value)?
            }
            config_keys::PROCESS_STEPS => {
                c.bottleneck.process_steps = serde_json::from_str(value).map_err(|e| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("工艺步数应为 JSON 对象: {}", e),
                    }
                })?
            }

            config_keys::MC_ITERATIONS => c.monte_carlo.iterations = parse(key, value)?,
            config_keys::MC_SEED => {
                c.monte_carlo.seed = match value.trim() {
                    "" | "none" | "NONE" => None,
                    v => Some(parse(key, v)?),
                }
            }
            config_keys::MC_DEMAND_LOW => c.monte_carlo.demand_multiplier_low = parse(key, value)?,
            config_keys::MC_DEMAND_HIGH => {
                c.monte_carlo.demand_multiplier_high = parse(key, value)?
            }
            config_keys::MC_KEEP_TRIALS => c.monte_carlo.keep_trials = parse_bool(key, value)?,

            config_keys::BUDGET_USD => c.portfolio.budget_usd = parse(key, value)?,
            config_keys::OPTIMIZER_MODE => {
                c.portfolio.mode =
                    OptimizerMode::parse(value).ok_or_else(|| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("仅支持 binary / continuous: {}", value),
                    })?
            }
            config_keys::HIGH_RISK_CAP => {
                let cap: f64 = parse(key, value)?;
                c.portfolio.risk_tier_caps.insert(RiskLevel::High, cap);
            }
            config_keys::RISK_ADJUSTED_FACTOR => {
                c.portfolio.risk_adjusted_budget_factor = match value.trim() {
                    "" | "none" | "NONE" => None,
                    v => Some(parse(key, v)?),
                }
            }
            config_keys::RISK_REFERENCE_BUDGET => {
                c.portfolio.risk_reference_budget_usd = match value.trim() {
                    "" | "none" | "NONE" => None,
                    v => Some(parse(key, v)?),
                }
            }

            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        tracing::debug!(config_key = key, value, "配置覆写");
        Ok(())
    }

    /// 获取配置 (已校验)
    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// 当前配置 (未校验)
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 获取配置快照 (JSON)
    ///
    /// # 用途
    /// - 随分析报告一并输出，保证结果可复现
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.config).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} ({})", e, value),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("无法解析为布尔值: {}", value),
        }),
    }
}

/// 从环境变量中挑出本引擎的覆写项 (日志格式开关除外)
fn collect_env_overrides<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(k, _)| k != LOG_FORMAT_ENV)
        .filter_map(|(k, v)| {
            k.strip_prefix(ENV_PREFIX)
                .map(|key| (key.to_lowercase(), v))
        })
        .collect()
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 目标与折算
    pub const TARGET_OUTPUT: &str = "target_output";
    pub const WEEKS_PER_QUARTER: &str = "weeks_per_quarter";

    // 瓶颈分析
    pub const WARNING_THRESHOLD: &str = "warning_threshold";
    pub const CRITICAL_THRESHOLD: &str = "critical_threshold";
    pub const HOURS_PER_PERIOD: &str = "hours_per_period";
    pub const STEP_NORMALIZATION: &str = "step_normalization";
    pub const PROCESS_STEPS: &str = "process_steps"; // 工艺步数 (JSON)

    // 蒙特卡洛
    pub const MC_ITERATIONS: &str = "mc_iterations";
    pub const MC_SEED: &str = "mc_seed";
    pub const MC_DEMAND_LOW: &str = "mc_demand_low";
    pub const MC_DEMAND_HIGH: &str = "mc_demand_high";
    pub const MC_KEEP_TRIALS: &str = "mc_keep_trials";

    // 投资组合
    pub const BUDGET_USD: &str = "budget_usd";
    pub const OPTIMIZER_MODE: &str = "optimizer_mode";
    pub const HIGH_RISK_CAP: &str = "high_risk_cap";
    pub const RISK_ADJUSTED_FACTOR: &str = "risk_adjusted_factor";
    pub const RISK_REFERENCE_BUDGET: &str = "risk_reference_budget_usd";
}
