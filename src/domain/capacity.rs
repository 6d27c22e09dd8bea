// ==========================================
// 晶圆厂产能分析引擎 - 瓶颈结果与产能基线
// ==========================================
// 职责: 瓶颈分析输出 (BottleneckResult) 与下游共享的产能基线
// 红线: 每次分析重新计算，不持久化
// JSON: 利用率 +∞ 哨兵写为 null，读回时 null 还原为 +∞
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

// ==========================================
// BottleneckResult - 单个设备类型的瓶颈结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckResult {
    pub tool_type: String,

    // ===== 设备与工艺 =====
    pub tool_count: usize,     // 计入产能的设备台数
    pub process_steps: u32,    // 工艺步数权重
    pub capacity_per_tool: f64, // 单台周期有效产能

    // ===== 负荷 =====
    pub total_capacity: f64,       // 类型总产能 = 单台产能 × 台数
    pub target_output_share: f64,  // 分摊到该类型的目标负荷
    #[serde(with = "infinite_as_null")]
    pub required_utilization: f64, // 达成目标所需利用率 (无设备时为 +∞)

    // ===== 结论 =====
    pub severity: Severity,
    pub capacity_gap: f64,           // 产能缺口 (>=0)
    pub max_supportable_output: f64, // 该类型可支撑的最大产出
}

impl BottleneckResult {
    /// 是否为无设备类型 (利用率哨兵值)
    pub fn has_no_tools(&self) -> bool {
        self.tool_count == 0
    }

    /// 剩余产能 (相对于总产能)
    pub fn headroom(&self) -> f64 {
        (self.total_capacity - self.target_output_share).max(0.0)
    }
}

impl std::fmt::Display for BottleneckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_no_tools() {
            write!(f, "{} (无可用设备, level: {})", self.tool_type, self.severity)
        } else {
            write!(
                f,
                "{} (utilization: {:.1}%, level: {}, gap: {:.0})",
                self.tool_type,
                self.required_utilization * 100.0,
                self.severity,
                self.capacity_gap
            )
        }
    }
}

// ==========================================
// infinite_as_null - +∞ 哨兵的 JSON 编解码
// ==========================================
pub mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

// ==========================================
// CapacityBaseline - 产能基线
// ==========================================
// 用途: 情景分析与蒙特卡洛仿真共享的只读输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBaseline {
    /// 当前瓶颈设备类型
    pub constraint_tool_type: String,
    /// 瓶颈约束下的全厂产能 (片/周期)
    pub capacity: f64,
    /// 基线需求 (片/周期)
    pub demand: f64,
}

impl CapacityBaseline {
    /// 基线利用率 (需求 / 产能)，产能为 0 时为 +∞
    pub fn utilization(&self) -> f64 {
        if self.capacity <= 0.0 {
            return f64::INFINITY;
        }
        self.demand / self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_utilization() {
        let baseline = CapacityBaseline {
            constraint_tool_type: "Etch_Plasma".to_string(),
            capacity: 20_000.0,
            demand: 15_000.0,
        };
        assert!((baseline.utilization() - 0.75).abs() < 1e-12);

        let empty = CapacityBaseline {
            capacity: 0.0,
            ..baseline
        };
        assert!(empty.utilization().is_infinite());
    }

    #[test]
    fn test_infinite_utilization_survives_json() {
        let result = BottleneckResult {
            tool_type: "Lithography_EUV".to_string(),
            tool_count: 0,
            process_steps: 25,
            capacity_per_tool: 0.0,
            total_capacity: 0.0,
            target_output_share: 45_000.0,
            required_utilization: f64::INFINITY,
            severity: Severity::Critical,
            capacity_gap: 45_000.0,
            max_supportable_output: 0.0,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"required_utilization\":null"));

        let parsed: BottleneckResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);

        let finite = BottleneckResult {
            required_utilization: 0.942,
            tool_count: 6,
            ..result
        };
        let parsed: BottleneckResult =
            serde_json::from_str(&serde_json::to_string(&finite).unwrap()).unwrap();
        assert_eq!(parsed.required_utilization, 0.942);
    }
}
