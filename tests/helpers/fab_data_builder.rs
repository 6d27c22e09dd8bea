// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use csv::Writer;
use fab_capacity_analytics::domain::{
    CapExProject, DemandRecord, NpiMilestone, NpiPhase, OperationRecord, RiskLevel,
    StrategicPriority, Tool, ToolStatus,
};
use fab_capacity_analytics::importer::tables;
use fab_capacity_analytics::FabDataset;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// Tool 构建器
// ==========================================

pub struct ToolBuilder {
    tool: Tool,
}

impl ToolBuilder {
    pub fn new(tool_id: &str, tool_type: &str) -> Self {
        Self {
            tool: Tool {
                tool_id: tool_id.to_string(),
                tool_type: tool_type.to_string(),
                throughput_wph: 100.0,
                utilization_target: 0.85,
                cost_usd: 5_000_000.0,
                install_date: day(2022, 1, 1),
                status: ToolStatus::Active,
                cleanroom_bay: "Bay_1".to_string(),
                mtbf_hours: 500.0,
            },
        }
    }

    pub fn throughput(mut self, wph: f64) -> Self {
        self.tool.throughput_wph = wph;
        self
    }

    pub fn utilization_target(mut self, target: f64) -> Self {
        self.tool.utilization_target = target;
        self
    }

    pub fn status(mut self, status: ToolStatus) -> Self {
        self.tool.status = status;
        self
    }

    pub fn mtbf(mut self, hours: f64) -> Self {
        self.tool.mtbf_hours = hours;
        self
    }

    pub fn build(self) -> Tool {
        self.tool
    }
}

/// 同类型设备组 (编号: 前缀 + 序号)
pub fn tool_group(tool_type: &str, count: usize, wph: f64, utilization_target: f64) -> Vec<Tool> {
    (0..count)
        .map(|i| {
            ToolBuilder::new(&format!("{}-{:03}", tool_type, i), tool_type)
                .throughput(wph)
                .utilization_target(utilization_target)
                .build()
        })
        .collect()
}

/// 使指定类型达到给定利用率所需的单台产出
pub fn wph_for_utilization(
    target_output: f64,
    process_steps: u32,
    count: usize,
    utilization_target: f64,
    utilization: f64,
) -> f64 {
    let share = target_output * process_steps as f64 / 10.0;
    share / (utilization * 168.0 * utilization_target * count as f64)
}

// ==========================================
// OperationRecord 构建器
// ==========================================

pub struct OperationBuilder {
    record: OperationRecord,
}

impl OperationBuilder {
    pub fn new(tool_id: &str, date: NaiveDate) -> Self {
        Self {
            record: OperationRecord {
                tool_id: tool_id.to_string(),
                date,
                availability: 0.95,
                performance: 0.95,
                quality: 0.97,
                output_units: 2_000.0,
                wip_units: 150.0,
                cycle_time_hours: 6.0,
                downtime_hours: 0.0,
                failure: false,
            },
        }
    }

    pub fn failure(mut self, downtime_hours: f64) -> Self {
        self.record.failure = true;
        self.record.downtime_hours = downtime_hours;
        self
    }

    pub fn availability(mut self, availability: f64) -> Self {
        self.record.availability = availability;
        self
    }

    pub fn build(self) -> OperationRecord {
        self.record
    }
}

/// 连续 days 天的运行记录；failure_every > 0 时每隔该天数发生一次 4 小时故障
pub fn daily_history(tool_id: &str, start: NaiveDate, days: i64, failure_every: i64) -> Vec<OperationRecord> {
    (0..days)
        .map(|d| {
            let builder = OperationBuilder::new(tool_id, start + Duration::days(d));
            if failure_every > 0 && (d + 1) % failure_every == 0 {
                builder.failure(4.0).build()
            } else {
                builder.build()
            }
        })
        .collect()
}

// ==========================================
// CapExProject 构建器
// ==========================================

pub struct ProjectBuilder {
    project: CapExProject,
}

impl ProjectBuilder {
    pub fn new(project_id: &str, investment_usd: f64, npv_usd: f64) -> Self {
        Self {
            project: CapExProject {
                project_id: project_id.to_string(),
                project_name: format!("Project {}", project_id),
                investment_usd,
                npv_usd,
                irr_percent: 18.0,
                payback_years: 4.0,
                risk_level: RiskLevel::Low,
                strategic_priority: StrategicPriority::Medium,
                start_date: day(2025, 1, 1),
                end_date: day(2026, 6, 30),
                mandatory: false,
            },
        }
    }

    pub fn risk(mut self, risk_level: RiskLevel) -> Self {
        self.project.risk_level = risk_level;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.project.mandatory = true;
        self
    }

    pub fn irr(mut self, irr_percent: f64) -> Self {
        self.project.irr_percent = irr_percent;
        self
    }

    pub fn build(self) -> CapExProject {
        self.project
    }
}

// ==========================================
// 需求 / NPI
// ==========================================

pub fn demand_record(product: &str, quarter: NaiveDate, demand_units: f64) -> DemandRecord {
    DemandRecord {
        product: product.to_string(),
        quarter,
        demand_units,
        unit_revenue_usd: 9_000.0,
    }
}

pub fn milestone(program: &str, phase: NpiPhase, yield_at_phase: f64, gate_complete: bool) -> NpiMilestone {
    NpiMilestone {
        program: program.to_string(),
        phase,
        yield_at_phase,
        gate_complete,
        target_date: day(2025, 6, 30),
    }
}

// ==========================================
// 完整样例数据集
// ==========================================

/// 三类设备的小型晶圆厂:
/// sample_fab 的工艺路线 (只含样例中出现的三类设备)
pub fn sample_routing() -> BTreeMap<String, u32> {
    [("Metrology_SEM", 80), ("Etch_Plasma", 65), ("CMP", 25)]
        .into_iter()
        .map(|(tool_type, steps)| (tool_type.to_string(), steps))
        .collect()
}

/// - Metrology_SEM 在目标 18,000 下利用率 94.2% (CRITICAL)
/// - Etch_Plasma 约 85% (WARNING)
/// - CMP 约 50% (OK)
pub fn sample_fab() -> FabDataset {
    let mut equipment = Vec::new();
    equipment.extend(tool_group(
        "Metrology_SEM",
        6,
        wph_for_utilization(18_000.0, 80, 6, 0.75, 0.942),
        0.75,
    ));
    equipment.extend(tool_group(
        "Etch_Plasma",
        5,
        wph_for_utilization(18_000.0, 65, 5, 0.82, 0.85),
        0.82,
    ));
    equipment.extend(tool_group(
        "CMP",
        4,
        wph_for_utilization(18_000.0, 25, 4, 0.88, 0.50),
        0.88,
    ));

    let operations = equipment
        .iter()
        .enumerate()
        .flat_map(|(i, t)| daily_history(&t.tool_id, day(2025, 1, 1), 30, 7 + i as i64))
        .collect();

    let demand = vec![
        demand_record("Mobile_SoC_3nm", day(2025, 1, 1), 120_000.0),
        demand_record("HPC_CPU_5nm", day(2025, 1, 1), 60_000.0),
        demand_record("Mobile_SoC_3nm", day(2025, 4, 1), 130_000.0),
        demand_record("HPC_CPU_5nm", day(2025, 4, 1), 65_000.0),
    ];

    let projects = vec![
        ProjectBuilder::new("CPX1000", 650e6, 56e6).risk(RiskLevel::Medium).build(),
        ProjectBuilder::new("CPX1001", 380e6, 33e6).risk(RiskLevel::Medium).build(),
        ProjectBuilder::new("CPX1002", 220e6, 19e6).build(),
        ProjectBuilder::new("CPX1003", 850e6, 99e6).risk(RiskLevel::High).build(),
        ProjectBuilder::new("CPX1004", 125e6, 46e6).build(),
    ];

    let milestones = vec![
        milestone("A18_Mobile_SoC", NpiPhase::Evt, 0.70, true),
        milestone("A18_Mobile_SoC", NpiPhase::Dvt, 0.83, true),
        milestone("A18_Mobile_SoC", NpiPhase::Pvt, 0.86, false),
        milestone("HPC_AI_Accelerator_Gen1", NpiPhase::Evt, 0.66, true),
    ];

    FabDataset {
        equipment,
        operations,
        demand,
        projects,
        milestones,
    }
}

// ==========================================
// CSV 落盘
// ==========================================

fn write_table<T: Serialize>(dir: &Path, file_name: &str, rows: &[T]) {
    let mut writer = Writer::from_path(dir.join(file_name)).unwrap();
    for row in rows {
        writer.serialize(row).unwrap();
    }
    writer.flush().unwrap();
}

/// 将数据集写为五张 CSV 输入表
pub fn write_dataset(dir: &Path, dataset: &FabDataset) {
    write_table(dir, tables::EQUIPMENT.file_name, &dataset.equipment);
    write_table(dir, tables::OPERATIONS.file_name, &dataset.operations);
    write_table(dir, tables::DEMAND.file_name, &dataset.demand);
    write_table(dir, tables::CAPEX.file_name, &dataset.projects);
    write_table(dir, tables::NPI.file_name, &dataset.milestones);
}
