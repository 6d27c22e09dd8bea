// ==========================================
// 晶圆厂产能分析引擎 - 蒙特卡洛仿真结果
// ==========================================
// 红线: 汇总统计量与分布来自同一批试验 (同一种子 + 同一试验次数)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// TrialSample - 单次试验
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSample {
    pub demand_multiplier: f64,
    pub yield_rate: f64,
    pub availability: f64,
    pub cycle_time_multiplier: f64,
    pub required_output: f64,
    pub effective_capacity: f64,
    pub shortfall: f64,
}

impl TrialSample {
    /// 利用率 = min(需求 / 有效产能, 1.0)
    pub fn utilization(&self) -> f64 {
        if self.effective_capacity <= 0.0 {
            return 1.0;
        }
        (self.required_output / self.effective_capacity).min(1.0)
    }
}

// ==========================================
// SimulationResult - 仿真汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    // ===== 运行参数 =====
    pub iterations: usize,
    pub seed: u64, // 实际使用的种子 (未指定时为随机生成)

    // ===== 基线 =====
    pub baseline_capacity: f64,
    pub baseline_demand: f64,

    // ===== 缺口统计 =====
    pub mean_shortfall: f64,
    pub median_shortfall: f64,
    pub p95_shortfall: f64,
    pub p99_shortfall: f64,

    // ===== 服务水平 =====
    pub service_level_probability: f64, // 零缺口试验占比
    pub probability_of_shortfall: f64,  // 1 - 服务水平

    // ===== 产能 / 需求风险 =====
    /// 95% 置信下可兑现的产能 (有效产能分布的第 5 百分位)
    pub capacity_at_risk_p95: f64,
    /// 需求分布的第 95 百分位
    pub demand_at_risk_p95: f64,

    // ===== 辅助统计 =====
    pub mean_required_output: f64,
    pub mean_effective_capacity: f64,
    pub mean_utilization: f64,
    pub p95_utilization: f64,
    pub mean_yield: f64,
    pub mean_availability: f64,

    /// 试验明细 (与上述统计量同源)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trials: Vec<TrialSample>,
}
