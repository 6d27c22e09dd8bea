// ==========================================
// 晶圆厂产能分析引擎 - 输入校验器
// ==========================================
// 职责: 模型运行前的行级取值校验
// 规则:
//   - 设备: 编号非空且唯一、产出 > 0、目标利用率 ∈ [0,1]、原值 >= 0、MTBF > 0
//   - 运行记录: 设备编号存在、OEE 三要素 ∈ [0,1]、周期时间 > 0、停机 ∈ [0,24]
//   - 需求: 需求量 / 单价 >= 0
//   - 投资项目: 投资额 >= 0、NPV 有限、结束日期 >= 开始日期、编号唯一
//   - NPI: 阶段良率 ∈ [0,1]
// 输出: 违规列表；validate_all 以第一条违规拒绝整批输入
// ==========================================

use crate::domain::equipment::{OperationRecord, Tool, HOURS_PER_RECORD};
use crate::domain::planning::{CapExProject, DemandRecord, NpiMilestone};
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::importer::table_loader::tables;
use std::collections::HashSet;

pub struct InputValidator {
    // 无状态校验器
}

impl InputValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验全部输入表，返回第一条违规
    pub fn validate_all(
        &self,
        equipment: &[Tool],
        operations: &[OperationRecord],
        demand: &[DemandRecord],
        projects: &[CapExProject],
        milestones: &[NpiMilestone],
    ) -> AnalysisResult<()> {
        let mut violations = self.check_equipment(equipment);
        violations.extend(self.check_operations(operations, equipment));
        violations.extend(self.check_demand(demand));
        violations.extend(self.check_projects(projects));
        violations.extend(self.check_milestones(milestones));

        match violations.into_iter().next() {
            None => Ok(()),
            Some(first) => {
                tracing::warn!(error = %first, "输入校验失败");
                Err(first)
            }
        }
    }

    // ==========================================
    // 设备主数据
    // ==========================================
    pub fn check_equipment(&self, equipment: &[Tool]) -> Vec<AnalysisError> {
        let table = tables::EQUIPMENT.name;
        let mut violations = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, tool) in equipment.iter().enumerate() {
            let row = Some(idx + 1);

            if tool.tool_id.trim().is_empty() {
                violations.push(AnalysisError::validation(table, "tool_id", row, "设备编号为空"));
            } else if !seen_ids.insert(tool.tool_id.as_str()) {
                violations.push(AnalysisError::validation(
                    table,
                    "tool_id",
                    row,
                    format!("设备编号重复: {}", tool.tool_id),
                ));
            }
            if tool.tool_type.trim().is_empty() {
                violations.push(AnalysisError::validation(table, "tool_type", row, "设备类型为空"));
            }
            if !(tool.throughput_wph > 0.0 && tool.throughput_wph.is_finite()) {
                violations.push(AnalysisError::validation(
                    table,
                    "throughput_wph",
                    row,
                    format!("产出必须为正数: {}", tool.throughput_wph),
                ));
            }
            check_fraction(&mut violations, table, "utilization_target", row, tool.utilization_target);
            check_non_negative(&mut violations, table, "cost_usd", row, tool.cost_usd);
            if !(tool.mtbf_hours > 0.0) {
                violations.push(AnalysisError::validation(
                    table,
                    "mtbf_hours",
                    row,
                    format!("MTBF 必须为正数: {}", tool.mtbf_hours),
                ));
            }
        }

        violations
    }

    // ==========================================
    // 日运行记录
    // ==========================================
    pub fn check_operations(&self, operations: &[OperationRecord], equipment: &[Tool]) -> Vec<AnalysisError> {
        let table = tables::OPERATIONS.name;
        let known: HashSet<&str> = equipment.iter().map(|t| t.tool_id.as_str()).collect();
        let mut violations = Vec::new();

        for (idx, record) in operations.iter().enumerate() {
            let row = Some(idx + 1);

            if !known.contains(record.tool_id.as_str()) {
                violations.push(AnalysisError::validation(
                    table,
                    "tool_id",
                    row,
                    format!("未知设备编号: {}", record.tool_id),
                ));
            }
            check_fraction(&mut violations, table, "availability", row, record.availability);
            check_fraction(&mut violations, table, "performance", row, record.performance);
            check_fraction(&mut violations, table, "quality", row, record.quality);
            check_non_negative(&mut violations, table, "output_units", row, record.output_units);
            check_non_negative(&mut violations, table, "wip_units", row, record.wip_units);
            if !(record.cycle_time_hours > 0.0) {
                violations.push(AnalysisError::validation(
                    table,
                    "cycle_time_hours",
                    row,
                    format!("周期时间必须为正数: {}", record.cycle_time_hours),
                ));
            }
            if !(0.0..=HOURS_PER_RECORD).contains(&record.downtime_hours) {
                violations.push(AnalysisError::validation(
                    table,
                    "downtime_hours",
                    row,
                    format!("停机时长超出 [0, {}]: {}", HOURS_PER_RECORD, record.downtime_hours),
                ));
            }
        }

        violations
    }

    // ==========================================
    // 需求预测
    // ==========================================
    pub fn check_demand(&self, demand: &[DemandRecord]) -> Vec<AnalysisError> {
        let table = tables::DEMAND.name;
        let mut violations = Vec::new();

        for (idx, record) in demand.iter().enumerate() {
            let row = Some(idx + 1);
            check_non_negative(&mut violations, table, "demand_units", row, record.demand_units);
            check_non_negative(&mut violations, table, "unit_revenue_usd", row, record.unit_revenue_usd);
        }

        violations
    }

    // ==========================================
    // 资本投资项目
    // ==========================================
    pub fn check_projects(&self, projects: &[CapExProject]) -> Vec<AnalysisError> {
        let table = tables::CAPEX.name;
        let mut violations = Vec::new();
        let mut seen_ids = HashSet::new();

        for (idx, project) in projects.iter().enumerate() {
            let row = Some(idx + 1);

            if !seen_ids.insert(project.project_id.as_str()) {
                violations.push(AnalysisError::validation(
                    table,
                    "project_id",
                    row,
                    format!("项目编号重复: {}", project.project_id),
                ));
            }
            check_non_negative(&mut violations, table, "investment_usd", row, project.investment_usd);
            if !project.npv_usd.is_finite() {
                violations.push(AnalysisError::validation(table, "npv_usd", row, "NPV 非有限数"));
            }
            if project.end_date < project.start_date {
                violations.push(AnalysisError::validation(
                    table,
                    "end_date",
                    row,
                    format!("结束日期 {} 早于开始日期 {}", project.end_date, project.start_date),
                ));
            }
        }

        violations
    }

    // ==========================================
    // NPI 里程碑
    // ==========================================
    pub fn check_milestones(&self, milestones: &[NpiMilestone]) -> Vec<AnalysisError> {
        let table = tables::NPI.name;
        let mut violations = Vec::new();

        for (idx, milestone) in milestones.iter().enumerate() {
            check_fraction(
                &mut violations,
                table,
                "yield_at_phase",
                Some(idx + 1),
                milestone.yield_at_phase,
            );
        }

        violations
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_fraction(violations: &mut Vec<AnalysisError>, table: &str, column: &str, row: Option<usize>, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        violations.push(AnalysisError::validation(
            table,
            column,
            row,
            format!("比例超出 [0,1]: {}", value),
        ));
    }
}

fn check_non_negative(violations: &mut Vec<AnalysisError>, table: &str, column: &str, row: Option<usize>, value: f64) {
    if !(value >= 0.0 && value.is_finite()) {
        violations.push(AnalysisError::validation(
            table,
            column,
            row,
            format!("不得为负数: {}", value),
        ));
    }
}
