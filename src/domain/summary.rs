// ==========================================
// 晶圆厂产能分析引擎 - 机队概况与 NPI 就绪度
// ==========================================

use crate::domain::types::NpiPhase;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 机队与投资组合概况 (管理层摘要口径)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    // ===== 机队 =====
    pub total_tools: usize,
    pub active_tools: usize,
    pub asset_value_usd: f64,

    // ===== 最新一日运行 =====
    pub latest_date: Option<NaiveDate>,
    pub fleet_oee: f64,
    pub daily_output: f64,
    pub mean_cycle_time_hours: f64,

    // ===== 投资组合 =====
    pub capex_total_investment_usd: f64,
    pub capex_total_npv_usd: f64,
    pub capex_mean_irr_percent: Option<f64>,

    // ===== NPI =====
    pub npi_programs: usize,
}

/// 单个 NPI 项目的就绪度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpiProgramSummary {
    pub program: String,
    /// 已通过阶段门的最高阶段
    pub current_phase: Option<NpiPhase>,
    pub completed_gates: usize,
    pub total_gates: usize,
    /// 最高已完成阶段的良率
    pub latest_yield: Option<f64>,
    /// 下一个未完成阶段
    pub next_phase: Option<NpiPhase>,
    pub next_target_date: Option<NaiveDate>,
    pub mass_production_ready: bool,
}
