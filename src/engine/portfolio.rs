// ==========================================
// 晶圆厂产能分析引擎 - 投资组合优化器
// ==========================================
// 职责: 在预算与风险约束下选择 / 加权 CapEx 项目，最大化总 NPV
// 输入: CapEx 项目列表 + 组合参数
// 输出: OptimizationResult
// ==========================================
// max Σ npv_i x_i
// s.t. Σ cost_i x_i ≤ budget
//      Σ_{i∈tier} cost_i x_i ≤ cap(tier) × basis       (风险敞口上限)
//      Σ cost_i w(risk_i) x_i ≤ factor × basis         (风险调整预算，可选)
//      x_i ∈ [0,1] (连续) 或 {0,1} (二元)；强制项目 x_i = 1
// basis = 风险基准预算 (默认固定 $1.5B；未配置时等于 budget)
// 基准固定时，以已选投资额回灌为预算可复现同一选择
// ==========================================
// 红线: 约束不可行必须返回 Infeasible 并指明约束，不得返回零解
// ==========================================

use crate::config::analysis_config::PortfolioConfig;
use crate::domain::planning::CapExProject;
use crate::domain::portfolio::{ConstraintUsage, OptimizationResult, ProjectAllocation};
use crate::domain::types::OptimizerMode;
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::solver::{GoodLpSolver, LinearConstraint, LpProblem, LpSolver};

/// 约束绑定判定的相对容差
const BINDING_TOLERANCE: f64 = 1e-6;

/// 约束名
pub const BUDGET_CONSTRAINT: &str = "budget";
pub const RISK_ADJUSTED_CONSTRAINT: &str = "risk_adjusted_budget";

// ==========================================
// PortfolioOptimizer - 投资组合优化器
// ==========================================
pub struct PortfolioOptimizer {
    config: PortfolioConfig,
    solver: Box<dyn LpSolver>,
}

impl PortfolioOptimizer {
    /// 使用默认求解器 (good_lp/microlp)
    pub fn new(config: PortfolioConfig) -> Self {
        Self::with_solver(config, Box::new(GoodLpSolver::new()))
    }

    /// 注入求解器
    pub fn with_solver(config: PortfolioConfig, solver: Box<dyn LpSolver>) -> Self {
        Self { config, solver }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 组合优化
    ///
    /// # 返回
    /// - Ok(OptimizationResult)
    /// - Err(Infeasible): 强制项目无法同时满足某条约束
    /// - Err(Validation): 求解器拒绝问题定义
    pub fn optimize(&self, projects: &[CapExProject]) -> AnalysisResult<OptimizationResult> {
        let mode = self.config.mode;
        let budget = self.config.budget_usd;

        // 1. 构造问题
        let problem = self.build_problem(projects);

        // 2. 下界点可行性检查 (系数均非负，下界点可行 ⇔ 问题可行)
        self.check_lower_bound_feasibility(projects, &problem)?;

        // 3. 求解
        let values = if projects.is_empty() {
            Vec::new()
        } else {
            let solution = self.solver.solve(&problem).map_err(|e| {
                AnalysisError::validation("capex", "*", None, format!("求解失败: {}", e))
            })?;
            if !solution.feasible {
                return Err(AnalysisError::Infeasible {
                    constraint: "unknown".to_string(),
                    message: format!("求解器 {} 判定无可行解", self.solver.name()),
                });
            }
            solution.values
        };

        // 4. 取整 / 截断
        let weights: Vec<f64> = values
            .iter()
            .map(|&v| match mode {
                OptimizerMode::Binary => {
                    if v > 0.5 {
                        1.0
                    } else {
                        0.0
                    }
                }
                OptimizerMode::Continuous => v.clamp(0.0, 1.0),
            })
            .collect();

        // 5. 汇总
        let result = self.assemble(projects, &problem, &weights, budget);

        tracing::info!(
            solver = self.solver.name(),
            mode = %mode,
            selected = result.selected_projects.len(),
            total_npv = result.total_npv,
            total_spend = result.total_spend,
            binding = ?result.binding_constraints,
            "投资组合优化完成"
        );

        Ok(result)
    }

    // ==========================================
    // 问题构造
    // ==========================================

    fn build_problem(&self, projects: &[CapExProject]) -> LpProblem {
        let budget = self.config.budget_usd;
        let basis = self.config.risk_basis();
        let costs: Vec<f64> = projects.iter().map(|p| p.investment_usd).collect();

        let mut constraints = vec![LinearConstraint {
            name: BUDGET_CONSTRAINT.to_string(),
            coefficients: costs,
            upper_bound: budget,
        }];

        for (tier, cap) in &self.config.risk_tier_caps {
            constraints.push(LinearConstraint {
                name: format!("risk_cap_{}", tier),
                coefficients: projects
                    .iter()
                    .map(|p| if p.risk_level == *tier { p.investment_usd } else { 0.0 })
                    .collect(),
                upper_bound: cap * basis,
            });
        }

        if let Some(factor) = self.config.risk_adjusted_budget_factor {
            constraints.push(LinearConstraint {
                name: RISK_ADJUSTED_CONSTRAINT.to_string(),
                coefficients: projects
                    .iter()
                    .map(|p| p.investment_usd * p.risk_level.risk_weight())
                    .collect(),
                upper_bound: factor * basis,
            });
        }

        LpProblem {
            objective: projects.iter().map(|p| p.npv_usd).collect(),
            constraints,
            lower_bounds: projects
                .iter()
                .map(|p| if p.mandatory { 1.0 } else { 0.0 })
                .collect(),
            upper_bounds: vec![1.0; projects.len()],
            integer: self.config.mode == OptimizerMode::Binary,
        }
    }

    fn check_lower_bound_feasibility(
        &self,
        projects: &[CapExProject],
        problem: &LpProblem,
    ) -> AnalysisResult<()> {
        for constraint in &problem.constraints {
            let used = constraint.evaluate(&problem.lower_bounds);
            if used > constraint.upper_bound * (1.0 + BINDING_TOLERANCE) {
                let mandatory: Vec<&str> = projects
                    .iter()
                    .zip(&constraint.coefficients)
                    .filter(|(p, a)| p.mandatory && **a > 0.0)
                    .map(|(p, _)| p.project_id.as_str())
                    .collect();

                tracing::warn!(constraint = %constraint.name, used, limit = constraint.upper_bound, "强制项目超出约束");

                return Err(AnalysisError::Infeasible {
                    constraint: constraint.name.clone(),
                    message: format!(
                        "强制项目 {:?} 合计 {:.0} 超过上限 {:.0}",
                        mandatory, used, constraint.upper_bound
                    ),
                });
            }
        }
        Ok(())
    }

    // ==========================================
    // 结果汇总
    // ==========================================

    fn assemble(
        &self,
        projects: &[CapExProject],
        problem: &LpProblem,
        weights: &[f64],
        budget: f64,
    ) -> OptimizationResult {
        let allocations: Vec<ProjectAllocation> = projects
            .iter()
            .zip(weights)
            .map(|(p, &w)| ProjectAllocation {
                project_id: p.project_id.clone(),
                project_name: p.project_name.clone(),
                risk_level: p.risk_level,
                weight: w,
                allocated_investment: p.investment_usd * w,
                allocated_npv: p.npv_usd * w,
                selected: w > BINDING_TOLERANCE,
            })
            .collect();

        let selected: Vec<(&CapExProject, &ProjectAllocation)> = projects
            .iter()
            .zip(&allocations)
            .filter(|(_, a)| a.selected)
            .collect();

        let total_npv: f64 = allocations.iter().map(|a| a.allocated_npv).sum();
        let total_spend: f64 = allocations.iter().map(|a| a.allocated_investment).sum();
        let avg_irr_percent = if selected.is_empty() {
            None
        } else {
            Some(selected.iter().map(|(p, _)| p.irr_percent).sum::<f64>() / selected.len() as f64)
        };

        let constraints: Vec<ConstraintUsage> = problem
            .constraints
            .iter()
            .map(|c| {
                let used = c.evaluate(weights);
                let slack = c.upper_bound - used;
                ConstraintUsage {
                    name: c.name.clone(),
                    used,
                    limit: c.upper_bound,
                    binding: slack <= BINDING_TOLERANCE * c.upper_bound.abs().max(1.0),
                }
            })
            .collect();

        let binding_constraints = constraints
            .iter()
            .filter(|c| c.binding)
            .map(|c| c.name.clone())
            .collect();

        OptimizationResult {
            mode: self.config.mode,
            budget,
            selected_projects: selected.iter().map(|(p, _)| p.project_id.clone()).collect(),
            allocations,
            total_npv,
            total_spend,
            budget_utilized_pct: total_spend / budget * 100.0,
            avg_irr_percent,
            constraints,
            binding_constraints,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PortfolioOptimizer {
    fn default() -> Self {
        Self::new(PortfolioConfig::default())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{RiskLevel, StrategicPriority};
    use crate::engine::solver::{LpSolution, SolverError};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn create_project(id: &str, investment: f64, npv: f64, risk: RiskLevel) -> CapExProject {
        CapExProject {
            project_id: id.to_string(),
            project_name: format!("Project {}", id),
            investment_usd: investment,
            npv_usd: npv,
            irr_percent: 20.0,
            payback_years: 3.0,
            risk_level: risk,
            strategic_priority: StrategicPriority::High,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            mandatory: false,
        }
    }

    fn plain_config(budget: f64, mode: OptimizerMode) -> PortfolioConfig {
        PortfolioConfig {
            budget_usd: budget,
            mode,
            risk_tier_caps: BTreeMap::new(),
            risk_adjusted_budget_factor: None,
            risk_reference_budget_usd: None,
        }
    }

    #[test]
    fn test_binary_selection_respects_budget() {
        let optimizer = PortfolioOptimizer::new(plain_config(800.0, OptimizerMode::Binary));
        let projects = vec![
            create_project("CPX001", 500.0, 1000.0, RiskLevel::Low),
            create_project("CPX002", 400.0, 600.0, RiskLevel::Low),
            create_project("CPX003", 300.0, 400.0, RiskLevel::Medium),
        ];

        let result = optimizer.optimize(&projects).unwrap();

        assert_eq!(result.selected_projects, vec!["CPX001", "CPX003"]);
        assert!((result.total_npv - 1400.0).abs() < 1e-6);
        assert!(result.total_spend <= 800.0);
        assert!(result.binding_constraints.contains(&BUDGET_CONSTRAINT.to_string()));
        assert_eq!(result.avg_irr_percent, Some(20.0));
    }

    #[test]
    fn test_continuous_mode_allows_fractions() {
        let optimizer = PortfolioOptimizer::new(plain_config(800.0, OptimizerMode::Continuous));
        let projects = vec![
            create_project("CPX001", 500.0, 1000.0, RiskLevel::Low),
            create_project("CPX002", 400.0, 600.0, RiskLevel::Low),
        ];

        let result = optimizer.optimize(&projects).unwrap();

        assert!((result.allocations[0].weight - 1.0).abs() < 1e-6);
        assert!((result.allocations[1].weight - 0.75).abs() < 1e-6);
        assert!((result.total_npv - 1450.0).abs() < 1e-6);
    }

    #[test]
    fn test_mandatory_project_over_budget_is_infeasible() {
        let optimizer = PortfolioOptimizer::new(plain_config(100.0, OptimizerMode::Binary));
        let mut project = create_project("CPX009", 250.0, 900.0, RiskLevel::Low);
        project.mandatory = true;

        let result = optimizer.optimize(&[project]);

        match result {
            Err(AnalysisError::Infeasible { constraint, message }) => {
                assert_eq!(constraint, BUDGET_CONSTRAINT);
                assert!(message.contains("CPX009"));
            }
            other => panic!("Expected Infeasible, got {:?}", other),
        }
    }

    #[test]
    fn test_high_risk_cap_limits_exposure() {
        let mut config = plain_config(1000.0, OptimizerMode::Binary);
        config.risk_tier_caps.insert(RiskLevel::High, 0.5);
        let optimizer = PortfolioOptimizer::new(config);
        let projects = vec![
            create_project("CPX001", 400.0, 900.0, RiskLevel::High),
            create_project("CPX002", 400.0, 800.0, RiskLevel::High),
            create_project("CPX003", 300.0, 200.0, RiskLevel::Low),
        ];

        let result = optimizer.optimize(&projects).unwrap();

        let high_spend: f64 = result
            .allocations
            .iter()
            .filter(|a| a.risk_level == RiskLevel::High)
            .map(|a| a.allocated_investment)
            .sum();
        assert!(high_spend <= 500.0);
        assert_eq!(result.selected_projects, vec!["CPX001", "CPX003"]);
    }

    #[test]
    fn test_empty_project_list() {
        let result = PortfolioOptimizer::default().optimize(&[]).unwrap();
        assert!(result.allocations.is_empty());
        assert_eq!(result.total_npv, 0.0);
        assert_eq!(result.avg_irr_percent, None);
    }

    struct InfeasibleSolver;

    impl LpSolver for InfeasibleSolver {
        fn solve(&self, _problem: &LpProblem) -> Result<LpSolution, SolverError> {
            Ok(LpSolution::infeasible())
        }

        fn name(&self) -> &'static str {
            "always-infeasible"
        }
    }

    #[test]
    fn test_solver_reported_infeasibility_is_surfaced() {
        let optimizer = PortfolioOptimizer::with_solver(
            plain_config(1000.0, OptimizerMode::Binary),
            Box::new(InfeasibleSolver),
        );
        let projects = vec![create_project("CPX001", 400.0, 900.0, RiskLevel::Low)];

        assert!(matches!(
            optimizer.optimize(&projects),
            Err(AnalysisError::Infeasible { .. })
        ));
    }
}
