// ==========================================
// 晶圆厂产能分析引擎 - 投资组合优化结果
// ==========================================

use crate::domain::types::{OptimizerMode, RiskLevel};
use serde::{Deserialize, Serialize};

/// 单个项目的资金分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAllocation {
    pub project_id: String,
    pub project_name: String,
    pub risk_level: RiskLevel,
    /// 投资权重 (连续模式 0.0-1.0，二元模式 0/1)
    pub weight: f64,
    pub allocated_investment: f64,
    pub allocated_npv: f64,
    pub selected: bool,
}

/// 约束在最优解处的状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintUsage {
    pub name: String,
    pub used: f64,
    pub limit: f64,
    pub binding: bool,
}

impl ConstraintUsage {
    /// 松弛量
    pub fn slack(&self) -> f64 {
        self.limit - self.used
    }
}

/// 优化结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub mode: OptimizerMode,
    pub budget: f64,
    pub allocations: Vec<ProjectAllocation>,
    pub selected_projects: Vec<String>,
    pub total_npv: f64,
    pub total_spend: f64,
    pub budget_utilized_pct: f64,
    /// 入选项目平均 IRR (无入选项目时为 None)
    pub avg_irr_percent: Option<f64>,
    pub constraints: Vec<ConstraintUsage>,
    pub binding_constraints: Vec<String>,
}
