// ==========================================
// 晶圆厂产能分析引擎 - 机队概况
// ==========================================
// 职责: 管理层摘要口径的机队 / 运行 / 投资组合指标
// 运行指标取最新一日的全部记录
// ==========================================

use crate::domain::equipment::{OperationRecord, Tool};
use crate::domain::planning::{CapExProject, NpiMilestone};
use crate::domain::summary::FleetSummary;
use crate::domain::types::ToolStatus;
use crate::engine::stats;
use std::collections::BTreeSet;

pub struct FleetSummarizer {
    // 无状态引擎
}

impl FleetSummarizer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn summarize(
        &self,
        tools: &[Tool],
        operations: &[OperationRecord],
        projects: &[CapExProject],
        milestones: &[NpiMilestone],
    ) -> FleetSummary {
        let latest_date = operations.iter().map(|r| r.date).max();
        let latest: Vec<&OperationRecord> = operations
            .iter()
            .filter(|r| Some(r.date) == latest_date)
            .collect();

        let oee: Vec<f64> = latest.iter().map(|r| r.oee()).collect();
        let cycle_times: Vec<f64> = latest.iter().map(|r| r.cycle_time_hours).collect();

        let capex_mean_irr_percent = if projects.is_empty() {
            None
        } else {
            Some(projects.iter().map(|p| p.irr_percent).sum::<f64>() / projects.len() as f64)
        };

        let programs: BTreeSet<&str> = milestones.iter().map(|m| m.program.as_str()).collect();

        FleetSummary {
            total_tools: tools.len(),
            active_tools: tools.iter().filter(|t| t.status == ToolStatus::Active).count(),
            asset_value_usd: tools.iter().map(|t| t.cost_usd).sum(),
            latest_date,
            fleet_oee: stats::mean(&oee),
            daily_output: latest.iter().map(|r| r.output_units).sum(),
            mean_cycle_time_hours: stats::mean(&cycle_times),
            capex_total_investment_usd: projects.iter().map(|p| p.investment_usd).sum(),
            capex_total_npv_usd: projects.iter().map(|p| p.npv_usd).sum(),
            capex_mean_irr_percent,
            npi_programs: programs.len(),
        }
    }
}

impl Default for FleetSummarizer {
    fn default() -> Self {
        Self::new()
    }
}
