// ==========================================
// 晶圆厂产能分析引擎 - 情景定义与情景结果
// ==========================================

use crate::domain::capacity::infinite_as_null;
use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

/// 命名情景 (需求增长率 + 良率假设)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub demand_growth: f64,  // 需求增长率 (0.12 = 12%)
    pub assumed_yield: f64,  // 良率假设 (0.0-1.0)
}

impl Scenario {
    pub fn new(name: &str, demand_growth: f64, assumed_yield: f64) -> Self {
        Self {
            name: name.to_string(),
            demand_growth,
            assumed_yield,
        }
    }

    /// 默认四情景: Conservative / Base Case / Aggressive / Stretch
    pub fn default_set() -> Vec<Scenario> {
        vec![
            Scenario::new("Conservative", 0.05, 0.88),
            Scenario::new("Base Case", 0.12, 0.91),
            Scenario::new("Aggressive", 0.22, 0.93),
            Scenario::new("Stretch", 0.35, 0.95),
        ]
    }
}

/// 单情景结果 (各情景相互独立)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub demand_growth: f64,
    pub assumed_yield: f64,
    pub projected_demand: f64,
    pub effective_capacity: f64,
    #[serde(with = "infinite_as_null")]
    pub required_utilization: f64,
    pub severity: Severity,
    pub capacity_gap: f64,
    pub capacity_sufficient: bool,
    #[serde(with = "infinite_as_null")]
    pub additional_capacity_needed_pct: f64,
}
