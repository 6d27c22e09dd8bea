// ==========================================
// 晶圆厂产能分析引擎 - 线性规划求解抽象
// ==========================================
// 职责: 定义与具体求解器无关的 LP / MILP 问题与解
// 问题形式: max c·x  s.t.  A x ≤ b,  lo ≤ x ≤ hi,  x 可选整数
// 默认后端: good_lp + microlp (纯 Rust)
// ==========================================

use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// 问题定义
// ==========================================

/// 线性约束 Σ coefficients[i] × x[i] ≤ upper_bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub upper_bound: f64,
}

impl LinearConstraint {
    /// 在给定点处的左端值
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        self.coefficients.iter().zip(point).map(|(a, x)| a * x).sum()
    }
}

/// 最大化问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpProblem {
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    /// 全部变量取整数 (MILP)
    pub integer: bool,
}

impl LpProblem {
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// 检查维度一致性
    pub fn check_dimensions(&self) -> Result<(), SolverError> {
        let n = self.num_variables();
        if self.lower_bounds.len() != n || self.upper_bounds.len() != n {
            return Err(SolverError::Malformed(format!(
                "变量界维度不一致: n={}, lower={}, upper={}",
                n,
                self.lower_bounds.len(),
                self.upper_bounds.len()
            )));
        }
        if let Some(c) = self.constraints.iter().find(|c| c.coefficients.len() != n) {
            return Err(SolverError::Malformed(format!(
                "约束 {} 系数维度 {} != {}",
                c.name,
                c.coefficients.len(),
                n
            )));
        }
        Ok(())
    }
}

/// 求解结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective_value: f64,
    /// false 表示问题无可行解 (此时 values 为空)
    pub feasible: bool,
}

impl LpSolution {
    pub fn infeasible() -> Self {
        Self {
            values: Vec::new(),
            objective_value: 0.0,
            feasible: false,
        }
    }
}

/// 求解器错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("问题定义非法: {0}")]
    Malformed(String),

    #[error("目标函数无界")]
    Unbounded,

    #[error("求解器内部错误: {0}")]
    Backend(String),
}

// ==========================================
// LpSolver - 求解器抽象
// ==========================================
pub trait LpSolver: Send + Sync {
    /// 求解最大化问题；无可行解时返回 feasible = false
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError>;

    /// 求解器名称 (写入日志)
    fn name(&self) -> &'static str;
}

// ==========================================
// GoodLpSolver - good_lp + microlp 后端
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl LpSolver for GoodLpSolver {
    fn solve(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        problem.check_dimensions()?;

        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = problem
            .lower_bounds
            .iter()
            .zip(&problem.upper_bounds)
            .map(|(&lo, &hi)| {
                let def = variable().min(lo).max(hi);
                if problem.integer {
                    vars.add(def.integer())
                } else {
                    vars.add(def)
                }
            })
            .collect();

        let linear = |coefficients: &[f64]| -> Expression {
            coefficients
                .iter()
                .zip(&xs)
                .map(|(&a, &x)| a * x)
                .sum()
        };

        let mut model = vars
            .maximise(linear(&problem.objective))
            .using(good_lp::solvers::microlp::microlp);
        for c in &problem.constraints {
            model = model.with(constraint::leq(linear(&c.coefficients), c.upper_bound));
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
                let objective_value = problem
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(c, x)| c * x)
                    .sum();
                Ok(LpSolution {
                    values,
                    objective_value,
                    feasible: true,
                })
            }
            Err(ResolutionError::Infeasible) => Ok(LpSolution::infeasible()),
            Err(ResolutionError::Unbounded) => Err(SolverError::Unbounded),
            Err(e) => Err(SolverError::Backend(e.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "good_lp/microlp"
    }
}
