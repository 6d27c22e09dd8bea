// ==========================================
// 晶圆厂产能分析引擎 - 引擎层
// ==========================================
// 职责: 可靠性 / 瓶颈 / 情景 / 蒙特卡洛 / 组合优化等分析模型
// 红线: 引擎为无副作用的纯计算，不做 IO，输入只读
// ==========================================

pub mod bottleneck;
pub mod error;
pub mod fleet;
pub mod monte_carlo;
pub mod npi;
pub mod orchestrator;
pub mod portfolio;
pub mod reliability;
pub mod scenario;
pub mod solver;
pub mod stats;

// 重导出核心引擎
pub use bottleneck::BottleneckAnalyzer;
pub use error::{AnalysisError, AnalysisResult, ErrorKind};
pub use fleet::FleetSummarizer;
pub use monte_carlo::MonteCarloSimulator;
pub use npi::NpiTracker;
pub use orchestrator::{AnalysisReport, AnalyticsFacade, ComponentFailure, ComponentOutcome, ReliabilityReport};
pub use portfolio::PortfolioOptimizer;
pub use reliability::ReliabilityModel;
pub use scenario::ScenarioAnalyzer;
pub use solver::{GoodLpSolver, LinearConstraint, LpProblem, LpSolution, LpSolver, SolverError};
