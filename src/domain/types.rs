// ==========================================
// 晶圆厂产能分析引擎 - 领域类型定义
// ==========================================
// 职责: 设备状态 / 项目风险等级 / NPI 阶段 / 瓶颈严重度等枚举
// 序列化格式: SCREAMING_SNAKE_CASE，兼容原始数据中的首字母大写写法
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 设备状态 (Tool Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    #[serde(alias = "Active")]
    Active, // 生产中
    #[serde(alias = "Maintenance")]
    Maintenance, // 保养中
    #[serde(alias = "Upgrade")]
    Upgrade, // 升级改造
    #[serde(alias = "Down")]
    Down, // 停机 (不计入产能)
}

impl ToolStatus {
    /// 是否计入产能
    ///
    /// 保养与升级属于计划内短停，仍计入设备台数；停机设备不计入
    pub fn counts_toward_capacity(&self) -> bool {
        !matches!(self, ToolStatus::Down)
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolStatus::Active => write!(f, "ACTIVE"),
            ToolStatus::Maintenance => write!(f, "MAINTENANCE"),
            ToolStatus::Upgrade => write!(f, "UPGRADE"),
            ToolStatus::Down => write!(f, "DOWN"),
        }
    }
}

// ==========================================
// 项目风险等级 (Project Risk Level)
// ==========================================
// 顺序: Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[serde(alias = "Low")]
    Low, // 低风险
    #[serde(alias = "Medium")]
    Medium, // 中风险
    #[serde(alias = "High")]
    High, // 高风险
}

impl RiskLevel {
    /// 风险调整投资权重 (Low 1.0 / Medium 1.3 / High 1.6)
    pub fn risk_weight(&self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 1.3,
            RiskLevel::High => 1.6,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 战略优先级 (Strategic Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategicPriority {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Critical")]
    Critical,
}

impl fmt::Display for StrategicPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategicPriority::Low => write!(f, "LOW"),
            StrategicPriority::Medium => write!(f, "MEDIUM"),
            StrategicPriority::High => write!(f, "HIGH"),
            StrategicPriority::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// NPI 阶段 (NPI Phase)
// ==========================================
// 顺序: EVT < DVT < PVT < MP
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NpiPhase {
    Evt, // 工程验证
    Dvt, // 设计验证
    Pvt, // 生产验证
    Mp,  // 量产
}

impl fmt::Display for NpiPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NpiPhase::Evt => write!(f, "EVT"),
            NpiPhase::Dvt => write!(f, "DVT"),
            NpiPhase::Pvt => write!(f, "PVT"),
            NpiPhase::Mp => write!(f, "MP"),
        }
    }
}

// ==========================================
// 瓶颈严重度 (Bottleneck Severity)
// ==========================================
// 顺序: Ok < Warning < Critical
// 三档互斥且完备: 任一利用率只落入其中一档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Ok,       // 正常
    Warning,  // 预警
    Critical, // 严重
}

impl Severity {
    /// 是否需要计算产能缺口
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Severity::Ok)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

// ==========================================
// 优化模式 (Optimizer Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizerMode {
    Binary,     // 0/1 选择，不允许部分投资
    Continuous, // 允许按比例投资
}

impl OptimizerMode {
    /// 从配置字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BINARY" => Some(OptimizerMode::Binary),
            "CONTINUOUS" => Some(OptimizerMode::Continuous),
            _ => None,
        }
    }
}

impl fmt::Display for OptimizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerMode::Binary => write!(f, "BINARY"),
            OptimizerMode::Continuous => write!(f, "CONTINUOUS"),
        }
    }
}
