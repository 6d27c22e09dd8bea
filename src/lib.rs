// ==========================================
// 晶圆厂产能分析引擎 - 核心库
// ==========================================
// 职责: 瓶颈识别 / 风险仿真 / 投资组合优化 / 情景对比 / 设备可靠性
// 系统定位: 决策支持 (单次分析基于静态输入表，不做持久化)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分析模型
pub mod engine;

// 导入层 - 输入表加载与校验
pub mod importer;

// 配置层 - 分析参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{NpiPhase, OptimizerMode, RiskLevel, Severity, StrategicPriority, ToolStatus};

// 领域实体
pub use domain::{
    BottleneckResult, CapExProject, CapacityBaseline, DemandRecord, NpiMilestone,
    OperationRecord, OptimizationResult, ReliabilitySummary, ScenarioResult, SimulationResult,
    Tool,
};

// 引擎
pub use engine::{
    AnalysisError, AnalysisReport, AnalysisResult, AnalyticsFacade, BottleneckAnalyzer,
    ComponentOutcome, MonteCarloSimulator, PortfolioOptimizer, ReliabilityModel,
    ScenarioAnalyzer,
};

// 配置
pub use config::{AnalysisConfig, ConfigManager};

// 导入
pub use importer::{FabDataset, InputValidator, TableLoader};

// ==========================================
// 常量定义
// ==========================================

// 引擎版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "晶圆厂产能分析引擎";
