// ==========================================
// 晶圆厂产能分析引擎 - 领域模型层
// ==========================================
// 职责: 定义输入表实体、派生结果实体、类型枚举
// 红线: 不含 IO 逻辑，不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod equipment;
pub mod planning;
pub mod portfolio;
pub mod reliability;
pub mod risk;
pub mod scenario;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use capacity::{BottleneckResult, CapacityBaseline};
pub use equipment::{OperationRecord, Tool, HOURS_PER_RECORD};
pub use planning::{CapExProject, DemandRecord, NpiMilestone};
pub use portfolio::{ConstraintUsage, OptimizationResult, ProjectAllocation};
pub use reliability::{ReliabilitySummary, ToolTypeReliability};
pub use risk::{SimulationResult, TrialSample};
pub use scenario::{Scenario, ScenarioResult};
pub use summary::{FleetSummary, NpiProgramSummary};
pub use types::{NpiPhase, OptimizerMode, RiskLevel, Severity, StrategicPriority, ToolStatus};
