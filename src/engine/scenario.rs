// ==========================================
// 晶圆厂产能分析引擎 - 情景分析器
// ==========================================
// 职责: 在命名情景 (需求增长 + 良率假设) 下评估产能缺口
// 输入: 产能基线 + 情景列表
// 输出: Vec<ScenarioResult>，与情景列表顺序一致
// ==========================================
// 预测需求 = 基线需求 × (1 + 增长率)
// 有效产能 = 基线产能 × 良率
// 利用率 = 预测需求 / 有效产能，分级沿用瓶颈分析阈值
// 各情景相互独立，纯函数，无随机抽样
// ==========================================

use crate::config::analysis_config::BottleneckThresholds;
use crate::domain::capacity::CapacityBaseline;
use crate::domain::scenario::{Scenario, ScenarioResult};
use crate::engine::bottleneck::classify_utilization;

// ==========================================
// ScenarioAnalyzer - 情景分析器
// ==========================================
pub struct ScenarioAnalyzer {
    thresholds: BottleneckThresholds,
}

impl ScenarioAnalyzer {
    pub fn new(thresholds: BottleneckThresholds) -> Self {
        Self { thresholds }
    }

    /// 批量评估情景
    pub fn analyze(&self, baseline: &CapacityBaseline, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        let results: Vec<ScenarioResult> = scenarios
            .iter()
            .map(|scenario| self.evaluate(baseline, scenario))
            .collect();

        tracing::info!(
            scenarios = results.len(),
            insufficient = results.iter().filter(|r| !r.capacity_sufficient).count(),
            "情景分析完成"
        );

        results
    }

    /// 评估单个情景
    pub fn evaluate(&self, baseline: &CapacityBaseline, scenario: &Scenario) -> ScenarioResult {
        let projected_demand = baseline.demand * (1.0 + scenario.demand_growth);
        let effective_capacity = baseline.capacity * scenario.assumed_yield;

        let (required_utilization, capacity_gap, additional_capacity_needed_pct) =
            if effective_capacity > 0.0 {
                let u = projected_demand / effective_capacity;
                let gap = ((u - 1.0) * effective_capacity).max(0.0);
                (u, gap, gap / effective_capacity * 100.0)
            } else {
                (f64::INFINITY, projected_demand, f64::INFINITY)
            };

        let severity = classify_utilization(required_utilization, &self.thresholds);

        ScenarioResult {
            scenario: scenario.name.clone(),
            demand_growth: scenario.demand_growth,
            assumed_yield: scenario.assumed_yield,
            projected_demand,
            effective_capacity,
            required_utilization,
            severity,
            // OK 档位的利用率低于 1，缺口天然为 0
            capacity_gap: if severity.is_flagged() { capacity_gap } else { 0.0 },
            capacity_sufficient: effective_capacity >= projected_demand,
            additional_capacity_needed_pct,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ScenarioAnalyzer {
    fn default() -> Self {
        Self::new(BottleneckThresholds::default())
    }
}
