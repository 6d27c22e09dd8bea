// ==========================================
// 晶圆厂产能分析引擎 - 设备可靠性汇总
// ==========================================
// 注意: 零故障设备的 MTBF 取观测期总运行时长，是上限而非真实可靠性估计，
//       由 mtbf_censored 标记，下游不得当作无穷大处理
// ==========================================

use serde::{Deserialize, Serialize};

/// 单台设备可靠性汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilitySummary {
    pub tool_id: String,
    pub tool_type: String,
    pub observed_days: usize,
    pub uptime_hours: f64,
    pub downtime_hours: f64,
    pub failure_count: usize,
    pub mtbf_hours: f64,
    /// 零故障: MTBF 为观测期上限
    pub mtbf_censored: bool,
    pub availability: f64,
    pub mean_oee: f64,
}

impl ReliabilitySummary {
    /// MTBF (天)
    pub fn mtbf_days(&self) -> f64 {
        self.mtbf_hours / 24.0
    }
}

/// 设备类型级可靠性汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolTypeReliability {
    pub tool_type: String,
    pub tool_count: usize,
    pub total_failures: usize,
    pub total_downtime_hours: f64,
    /// 单次故障平均停机 (无故障时为 0)
    pub mean_downtime_hours: f64,
    pub mtbf_actual_hours: f64,
    pub mtbf_theoretical_hours: f64,
    /// 实际 / 理论 × 100
    pub mtbf_performance_pct: f64,
    /// 停机 / 运行时长 × 100
    pub availability_impact_pct: f64,
}
