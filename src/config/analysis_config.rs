// ==========================================
// 晶圆厂产能分析引擎 - 分析配置
// ==========================================
// 职责: 单次分析运行的全部可调参数及默认值
// 说明: 所有字段带 serde 默认值，JSON 配置文件只需写需要覆写的项
// ==========================================

use crate::config::ConfigError;
use crate::domain::scenario::Scenario;
use crate::domain::types::{OptimizerMode, RiskLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 默认值常量
// ==========================================
pub const DEFAULT_TARGET_OUTPUT: f64 = 18_000.0;
pub const DEFAULT_HOURS_PER_PERIOD: f64 = 168.0;
pub const DEFAULT_STEP_NORMALIZATION: f64 = 10.0;
pub const DEFAULT_PROCESS_STEPS: u32 = 50;
pub const DEFAULT_WEEKS_PER_QUARTER: f64 = 13.0;
pub const DEFAULT_ITERATIONS: usize = 10_000;
pub const MIN_ITERATIONS: usize = 100;
pub const DEFAULT_BUDGET_USD: f64 = 1_500_000_000.0;

/// 默认工艺路线: 设备类型 → 单片经过的工艺步数
pub fn default_process_steps() -> BTreeMap<String, u32> {
    [
        ("Lithography_EUV", 25),
        ("Lithography_DUV", 40),
        ("Etch_Plasma", 65),
        ("Deposition_CVD", 45),
        ("Deposition_PVD", 20),
        ("CMP", 25),
        ("Metrology_SEM", 80),
        ("Metrology_Optical", 40),
        ("Ion_Implant", 15),
        ("Wet_Process", 35),
    ]
    .into_iter()
    .map(|(tool_type, steps)| (tool_type.to_string(), steps))
    .collect()
}

// ==========================================
// BottleneckThresholds - 瓶颈分级阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleneckThresholds {
    pub warning: f64,  // >= warning → WARNING
    pub critical: f64, // >= critical → CRITICAL
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self {
            warning: 0.80,
            critical: 0.90,
        }
    }
}

// ==========================================
// BottleneckConfig - 瓶颈分析参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleneckConfig {
    pub thresholds: BottleneckThresholds,
    /// 统计周期小时数 (默认一周 168h)
    pub hours_per_period: f64,
    /// 工艺步数权重
    pub process_steps: BTreeMap<String, u32>,
    /// 工艺路线未列出的设备类型使用的步数
    pub default_process_steps: u32,
    /// 步数归一化常数: 目标负荷 = 目标产出 × 步数 / 归一化常数
    pub step_normalization: f64,
}

impl Default for BottleneckConfig {
    fn default() -> Self {
        Self {
            thresholds: BottleneckThresholds::default(),
            hours_per_period: DEFAULT_HOURS_PER_PERIOD,
            process_steps: default_process_steps(),
            default_process_steps: DEFAULT_PROCESS_STEPS,
            step_normalization: DEFAULT_STEP_NORMALIZATION,
        }
    }
}

impl BottleneckConfig {
    /// 查询设备类型的工艺步数
    pub fn steps_for(&self, tool_type: &str) -> u32 {
        self.process_steps
            .get(tool_type)
            .copied()
            .unwrap_or(self.default_process_steps)
    }
}

// ==========================================
// MonteCarloConfig - 蒙特卡洛参数
// ==========================================
// 需求乘数: 均匀分布 U[low, high]
// 良率: 正态分布截断到 [min, max]
// 可用率: Beta(alpha, beta)，alpha > beta 时右偏向高值
// 周期时间乘数: 对数正态 LogNormal(0, sigma)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    pub seed: Option<u64>,
    pub demand_multiplier_low: f64,
    pub demand_multiplier_high: f64,
    pub yield_mean: f64,
    pub yield_std: f64,
    pub yield_min: f64,
    pub yield_max: f64,
    pub availability_alpha: f64,
    pub availability_beta: f64,
    pub cycle_time_sigma: f64,
    /// 是否在结果中保留试验明细
    pub keep_trials: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            demand_multiplier_low: 0.85,
            demand_multiplier_high: 1.15,
            yield_mean: 0.92,
            yield_std: 0.05,
            yield_min: 0.75,
            yield_max: 0.98,
            availability_alpha: 9.0,
            availability_beta: 1.0,
            cycle_time_sigma: 0.15,
            keep_trials: true,
        }
    }
}

// ==========================================
// PortfolioConfig - 投资组合优化参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub budget_usd: f64,
    pub mode: OptimizerMode,
    /// 风险等级敞口上限 (占风险基准预算比例)
    pub risk_tier_caps: BTreeMap<RiskLevel, f64>,
    /// 风险调整预算系数 (Σ 投资 × 风险权重 ≤ 系数 × 风险基准预算)，None 表示不启用
    pub risk_adjusted_budget_factor: Option<f64>,
    /// 风险约束的基准预算 (USD)，None 时随 budget_usd 浮动
    pub risk_reference_budget_usd: Option<f64>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        let mut risk_tier_caps = BTreeMap::new();
        risk_tier_caps.insert(RiskLevel::High, 0.5);
        Self {
            budget_usd: DEFAULT_BUDGET_USD,
            mode: OptimizerMode::Binary,
            risk_tier_caps,
            risk_adjusted_budget_factor: Some(1.2),
            risk_reference_budget_usd: Some(DEFAULT_BUDGET_USD),
        }
    }
}

impl PortfolioConfig {
    /// 风险敞口上限与风险调整预算的计算基准
    pub fn risk_basis(&self) -> f64 {
        self.risk_reference_budget_usd.unwrap_or(self.budget_usd)
    }
}

// ==========================================
// AnalysisConfig - 分析运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 目标产出 (片/周期)
    pub target_output: f64,
    /// 季度需求折算周数
    pub weeks_per_quarter: f64,
    pub bottleneck: BottleneckConfig,
    pub monte_carlo: MonteCarloConfig,
    pub portfolio: PortfolioConfig,
    pub scenarios: Vec<Scenario>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_output: DEFAULT_TARGET_OUTPUT,
            weeks_per_quarter: DEFAULT_WEEKS_PER_QUARTER,
            bottleneck: BottleneckConfig::default(),
            monte_carlo: MonteCarloConfig::default(),
            portfolio: PortfolioConfig::default(),
            scenarios: Scenario::default_set(),
        }
    }
}

impl AnalysisConfig {
    /// 校验配置自洽性
    ///
    /// 试验次数下限不在此校验，由仿真器返回 InsufficientSample
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(key: &str, message: String) -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        }

        if !(self.target_output.is_finite() && self.target_output > 0.0) {
            return invalid("target_output", format!("必须为正数: {}", self.target_output));
        }
        if self.weeks_per_quarter <= 0.0 {
            return invalid(
                "weeks_per_quarter",
                format!("必须为正数: {}", self.weeks_per_quarter),
            );
        }

        let t = &self.bottleneck.thresholds;
        if !(0.0 < t.warning && t.warning < t.critical) {
            return invalid(
                "bottleneck.thresholds",
                format!("要求 0 < warning < critical: {} / {}", t.warning, t.critical),
            );
        }
        if self.bottleneck.hours_per_period <= 0.0 || self.bottleneck.step_normalization <= 0.0 {
            return invalid(
                "bottleneck.hours_per_period",
                "周期小时数与归一化常数必须为正数".to_string(),
            );
        }

        if self.bottleneck.default_process_steps == 0
            || self.bottleneck.process_steps.values().any(|&steps| steps == 0)
        {
            return invalid(
                "bottleneck.process_steps",
                "工艺步数必须为正整数".to_string(),
            );
        }

        let mc = &self.monte_carlo;
        if !(0.0 <= mc.demand_multiplier_low && mc.demand_multiplier_low <= mc.demand_multiplier_high)
        {
            return invalid(
                "monte_carlo.demand_multiplier",
                format!(
                    "要求 0 <= low <= high: {} / {}",
                    mc.demand_multiplier_low, mc.demand_multiplier_high
                ),
            );
        }
        if !(0.0 <= mc.yield_min && mc.yield_min <= mc.yield_max && mc.yield_max <= 1.0) {
            return invalid(
                "monte_carlo.yield",
                format!("要求 0 <= min <= max <= 1: {} / {}", mc.yield_min, mc.yield_max),
            );
        }
        if mc.yield_std <= 0.0 || mc.cycle_time_sigma <= 0.0 {
            return invalid(
                "monte_carlo.sigma",
                "良率标准差与周期时间 sigma 必须为正数".to_string(),
            );
        }
        if mc.availability_alpha <= 0.0 || mc.availability_beta <= 0.0 {
            return invalid(
                "monte_carlo.availability",
                "Beta 分布参数必须为正数".to_string(),
            );
        }

        let p = &self.portfolio;
        if !(p.budget_usd.is_finite() && p.budget_usd > 0.0) {
            return invalid("portfolio.budget_usd", format!("必须为正数: {}", p.budget_usd));
        }
        if let Some(reference) = p.risk_reference_budget_usd {
            if !(reference.is_finite() && reference > 0.0) {
                return invalid(
                    "portfolio.risk_reference_budget_usd",
                    format!("必须为正数: {}", reference),
                );
            }
        }
        for (tier, cap) in &p.risk_tier_caps {
            if !(0.0..=1.0).contains(cap) {
                return invalid(
                    "portfolio.risk_tier_caps",
                    format!("{} 上限比例超出 [0,1]: {}", tier, cap),
                );
            }
        }
        if let Some(factor) = p.risk_adjusted_budget_factor {
            if factor <= 0.0 {
                return invalid(
                    "portfolio.risk_adjusted_budget_factor",
                    format!("必须为正数: {}", factor),
                );
            }
        }

        for scenario in &self.scenarios {
            if !(0.0 < scenario.assumed_yield && scenario.assumed_yield <= 1.0) {
                return invalid(
                    "scenarios",
                    format!("{} 良率超出 (0,1]: {}", scenario.name, scenario.assumed_yield),
                );
            }
            if scenario.demand_growth <= -1.0 {
                return invalid(
                    "scenarios",
                    format!("{} 增长率必须 > -100%: {}", scenario.name, scenario.demand_growth),
                );
            }
        }

        Ok(())
    }
}
