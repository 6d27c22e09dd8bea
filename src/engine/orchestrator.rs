// ==========================================
// 晶圆厂产能分析引擎 - 分析门面
// ==========================================
// 用途: 单一入口，校验输入并编排各分析组件，组装分析报告
// ==========================================
// 执行顺序:
//   0. 配置校验 + 输入校验 (失败则整体拒绝，不运行任何模型)
//   1. 瓶颈分析 → 产能基线
//   2. 并行: 可靠性 / 情景分析 / 蒙特卡洛 / 投资组合优化
//   3. 机队概况 + NPI 就绪度
// 红线: 单个组件失败不影响其他组件，失败写入对应结果槽
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::capacity::{BottleneckResult, CapacityBaseline};
use crate::domain::equipment::{OperationRecord, Tool};
use crate::domain::planning::{CapExProject, DemandRecord, NpiMilestone};
use crate::domain::portfolio::OptimizationResult;
use crate::domain::reliability::{ReliabilitySummary, ToolTypeReliability};
use crate::domain::risk::SimulationResult;
use crate::domain::scenario::ScenarioResult;
use crate::domain::summary::{FleetSummary, NpiProgramSummary};
use crate::engine::bottleneck::baseline_demand;
use crate::engine::error::{AnalysisError, AnalysisResult, ErrorKind};
use crate::engine::solver::LpSolver;
use crate::engine::{
    BottleneckAnalyzer, FleetSummarizer, MonteCarloSimulator, NpiTracker, PortfolioOptimizer,
    ReliabilityModel, ScenarioAnalyzer,
};
use crate::importer::InputValidator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ComponentOutcome - 组件结果槽
// ==========================================

/// 组件失败信息 (可序列化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AnalysisError> for ComponentFailure {
    fn from(e: &AnalysisError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// 组件成功值或失败信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentOutcome<T> {
    Success { value: T },
    Failed { error: ComponentFailure },
}

impl<T> ComponentOutcome<T> {
    pub fn from_result(component: &str, result: AnalysisResult<T>) -> Self {
        match result {
            Ok(value) => ComponentOutcome::Success { value },
            Err(e) => {
                warn!(component, error = %e, "分析组件失败");
                ComponentOutcome::Failed {
                    error: ComponentFailure::from(&e),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ComponentOutcome::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ComponentOutcome::Success { value } => Some(value),
            ComponentOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ComponentFailure> {
        match self {
            ComponentOutcome::Success { .. } => None,
            ComponentOutcome::Failed { error } => Some(error),
        }
    }
}

// ==========================================
// AnalysisReport - 分析报告
// ==========================================

/// 可靠性组件输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    pub tools: Vec<ReliabilitySummary>,
    pub by_tool_type: Vec<ToolTypeReliability>,
    /// 因历史数据不足被跳过的设备
    pub skipped: Vec<ComponentFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    // ===== 运行信息 =====
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub config: AnalysisConfig,

    // ===== 摘要 =====
    pub fleet: FleetSummary,
    pub npi: Vec<NpiProgramSummary>,

    // ===== 分析组件 =====
    pub bottlenecks: ComponentOutcome<Vec<BottleneckResult>>,
    pub baseline: ComponentOutcome<CapacityBaseline>,
    pub reliability: ComponentOutcome<ReliabilityReport>,
    pub scenarios: ComponentOutcome<Vec<ScenarioResult>>,
    pub risk: ComponentOutcome<SimulationResult>,
    pub portfolio: ComponentOutcome<OptimizationResult>,
}

impl AnalysisReport {
    /// 失败组件名列表
    pub fn failed_components(&self) -> Vec<&'static str> {
        let slots = [
            ("bottlenecks", self.bottlenecks.is_success()),
            ("baseline", self.baseline.is_success()),
            ("reliability", self.reliability.is_success()),
            ("scenarios", self.scenarios.is_success()),
            ("risk", self.risk.is_success()),
            ("portfolio", self.portfolio.is_success()),
        ];
        slots
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }
}

// ==========================================
// AnalyticsFacade - 分析门面
// ==========================================

pub struct AnalyticsFacade {
    config: AnalysisConfig,
    validator: InputValidator,
    reliability: ReliabilityModel,
    bottleneck: BottleneckAnalyzer,
    scenario: ScenarioAnalyzer,
    simulator: MonteCarloSimulator,
    optimizer: PortfolioOptimizer,
    fleet: FleetSummarizer,
    npi: NpiTracker,
}

impl AnalyticsFacade {
    /// 创建门面 (默认求解器)
    pub fn new(config: AnalysisConfig) -> Self {
        let optimizer = PortfolioOptimizer::new(config.portfolio.clone());
        Self::assemble(config, optimizer)
    }

    /// 创建门面并注入 LP 求解器
    pub fn with_solver(config: AnalysisConfig, solver: Box<dyn LpSolver>) -> Self {
        let optimizer = PortfolioOptimizer::with_solver(config.portfolio.clone(), solver);
        Self::assemble(config, optimizer)
    }

    fn assemble(config: AnalysisConfig, optimizer: PortfolioOptimizer) -> Self {
        Self {
            validator: InputValidator::new(),
            reliability: ReliabilityModel::new(),
            bottleneck: BottleneckAnalyzer::new(config.bottleneck.clone()),
            scenario: ScenarioAnalyzer::new(config.bottleneck.thresholds),
            simulator: MonteCarloSimulator::new(config.monte_carlo.clone()),
            optimizer,
            fleet: FleetSummarizer::new(),
            npi: NpiTracker::new(),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 执行完整分析
    ///
    /// # 返回
    /// - Ok(AnalysisReport): 各组件独立成功或失败
    /// - Err(Validation): 配置或输入表非法，未运行任何模型 (配置错误的 table 为 "config")
    #[instrument(skip_all, fields(tools = equipment.len(), projects = projects.len()))]
    pub fn run_analysis(
        &self,
        equipment: &[Tool],
        operations: &[OperationRecord],
        demand: &[DemandRecord],
        projects: &[CapExProject],
        milestones: &[NpiMilestone],
    ) -> AnalysisResult<AnalysisReport> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, "开始执行产能分析");

        // ==========================================
        // 步骤0: 配置校验 + 输入校验
        // ==========================================
        self.config.validate()?;
        self.validator
            .validate_all(equipment, operations, demand, projects, milestones)?;

        // ==========================================
        // 步骤1: 瓶颈分析 → 产能基线
        // ==========================================
        debug!("步骤1: 瓶颈分析");
        let bottlenecks = self.bottleneck.analyze(equipment, self.config.target_output);
        let demand_per_period = baseline_demand(
            demand,
            self.config.weeks_per_quarter,
            self.config.target_output,
        );
        let baseline = match &bottlenecks {
            Ok(results) => self.bottleneck.baseline(results, demand_per_period),
            Err(e) => Err(AnalysisError::insufficient_data(
                "baseline",
                format!("瓶颈分析失败，无法确定产能基线: {}", e),
            )),
        };

        // ==========================================
        // 步骤2: 独立组件并行执行
        // ==========================================
        debug!("步骤2: 并行执行可靠性 / 情景 / 蒙特卡洛 / 组合优化");
        let ((reliability, scenarios), (risk, portfolio)) = rayon::join(
            || {
                rayon::join(
                    || self.run_reliability(equipment, operations),
                    || {
                        baseline
                            .as_ref()
                            .map(|b| self.scenario.analyze(b, &self.config.scenarios))
                            .map_err(Clone::clone)
                    },
                )
            },
            || {
                rayon::join(
                    || {
                        baseline
                            .as_ref()
                            .map_err(Clone::clone)
                            .and_then(|b| self.simulator.simulate(b))
                    },
                    || self.optimizer.optimize(projects),
                )
            },
        );

        // ==========================================
        // 步骤3: 摘要
        // ==========================================
        let fleet = self.fleet.summarize(equipment, operations, projects, milestones);
        let npi = self.npi.summarize(milestones);

        let report = AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            engine_version: crate::VERSION.to_string(),
            config: self.config.clone(),
            fleet,
            npi,
            bottlenecks: ComponentOutcome::from_result("bottlenecks", bottlenecks),
            baseline: ComponentOutcome::from_result("baseline", baseline),
            reliability: ComponentOutcome::from_result("reliability", reliability),
            scenarios: ComponentOutcome::from_result("scenarios", scenarios),
            risk: ComponentOutcome::from_result("risk", risk),
            portfolio: ComponentOutcome::from_result("portfolio", portfolio),
        };

        info!(
            run_id = %report.run_id,
            failed = ?report.failed_components(),
            "产能分析完成"
        );

        Ok(report)
    }

    fn run_reliability(
        &self,
        equipment: &[Tool],
        operations: &[OperationRecord],
    ) -> AnalysisResult<ReliabilityReport> {
        let (tools, errors) = self.reliability.summarize_fleet(equipment, operations);
        if tools.is_empty() {
            return Err(AnalysisError::insufficient_data(
                "operations",
                "没有任何设备具备运行记录",
            ));
        }

        let by_tool_type = self.reliability.aggregate_by_tool_type(equipment, &tools);
        Ok(ReliabilityReport {
            tools,
            by_tool_type,
            skipped: errors.iter().map(ComponentFailure::from).collect(),
        })
    }
}

impl Default for AnalyticsFacade {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
