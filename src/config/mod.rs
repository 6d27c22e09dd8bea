// ==========================================
// 晶圆厂产能分析引擎 - 配置层
// ==========================================
// 职责: 分析参数定义、默认值、多级覆写
// ==========================================

pub mod analysis_config;
pub mod config_manager;

use crate::engine::error::AnalysisError;
use thiserror::Error;

// 重导出核心配置
pub use analysis_config::{
    AnalysisConfig, BottleneckConfig, BottleneckThresholds, MonteCarloConfig, PortfolioConfig,
    MIN_ITERATIONS,
};
pub use config_manager::{config_keys, ConfigManager};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadFailed { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseFailed(String),

    #[error("未知配置键: {0}")]
    UnknownKey(String),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

/// 配置错误折算为 config 表的校验错误，列名取配置键
impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue { key, message } => {
                AnalysisError::validation("config", &key, None, message)
            }
            ConfigError::UnknownKey(key) => {
                AnalysisError::validation("config", &key, None, "未知配置键")
            }
            other => AnalysisError::validation("config", "*", None, other.to_string()),
        }
    }
}
