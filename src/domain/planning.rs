// ==========================================
// 晶圆厂产能分析引擎 - 需求 / 投资项目 / NPI 领域模型
// ==========================================
// 职责: 需求预测 (DemandRecord)、资本投资项目 (CapExProject)、
//       新产品导入里程碑 (NpiMilestone)
// 红线: 项目是否入选是决策变量，不是项目属性
// ==========================================

use crate::domain::types::{NpiPhase, RiskLevel, StrategicPriority};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DemandRecord - 季度需求预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub product: String,
    pub quarter: NaiveDate, // 季度起始日
    pub demand_units: f64,  // 预测需求量 (片/季度)
    pub unit_revenue_usd: f64,
}

// ==========================================
// CapExProject - 资本投资项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapExProject {
    pub project_id: String,
    pub project_name: String,

    // ===== 财务指标 =====
    pub investment_usd: f64, // 投资额
    pub npv_usd: f64,        // 净现值
    pub irr_percent: f64,    // 内部收益率 (%)
    pub payback_years: f64,  // 回收期 (年)

    // ===== 定性属性 =====
    pub risk_level: RiskLevel,
    pub strategic_priority: StrategicPriority,

    // ===== 时间线 =====
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// 强制项目 (必须全额投资)
    #[serde(default)]
    pub mandatory: bool,
}

// ==========================================
// NpiMilestone - NPI 阶段里程碑
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpiMilestone {
    pub program: String,
    pub phase: NpiPhase,
    pub yield_at_phase: f64, // 阶段良率 (0.0-1.0)
    pub gate_complete: bool, // 是否已过阶段门
    pub target_date: NaiveDate,
}
