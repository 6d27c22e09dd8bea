// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成合成晶圆厂五张输入表 (可复现)
// 用法: generate_test_data [输出目录] [种子] [运行天数]
// 默认: data/raw 42 180
// ==========================================

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use csv::Writer;
use fab_capacity_analytics::domain::{
    CapExProject, DemandRecord, NpiMilestone, NpiPhase, OperationRecord, RiskLevel,
    StrategicPriority, Tool, ToolStatus,
};
use fab_capacity_analytics::importer::tables;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use statrs::distribution::Exp;
use std::path::{Path, PathBuf};

// (设备类型, 原值, 产出 wph, 目标利用率, 台数范围, MTBF)
const TOOL_SPECS: &[(&str, f64, f64, f64, (u32, u32), f64)] = &[
    ("Lithography_EUV", 180_000_000.0, 120.0, 0.80, (8, 15), 500.0),
    ("Lithography_DUV", 45_000_000.0, 180.0, 0.85, (15, 25), 600.0),
    ("Etch_Plasma", 8_000_000.0, 60.0, 0.82, (20, 30), 450.0),
    ("Deposition_CVD", 6_000_000.0, 90.0, 0.85, (18, 28), 500.0),
    ("Deposition_PVD", 5_500_000.0, 100.0, 0.85, (12, 20), 550.0),
    ("CMP", 3_500_000.0, 120.0, 0.88, (15, 22), 600.0),
    ("Metrology_SEM", 2_500_000.0, 40.0, 0.75, (25, 35), 700.0),
    ("Metrology_Optical", 1_200_000.0, 80.0, 0.80, (20, 30), 650.0),
    ("Ion_Implant", 7_000_000.0, 50.0, 0.80, (10, 18), 520.0),
    ("Wet_Process", 1_800_000.0, 150.0, 0.90, (15, 25), 800.0),
];

// (产品, 季度基线需求, 年增长率, 波动, 单片收入)
const PRODUCTS: &[(&str, f64, f64, f64, f64)] = &[
    ("Mobile_SoC_3nm", 18_000.0, 0.18, 0.12, 12_500.0),
    ("Mobile_SoC_5nm", 28_000.0, 0.06, 0.08, 8_500.0),
    ("HPC_CPU_5nm", 9_500.0, 0.28, 0.15, 15_000.0),
    ("HPC_GPU_5nm", 7_200.0, 0.35, 0.18, 18_000.0),
    ("Automotive_5nm", 3_500.0, 0.48, 0.20, 6_500.0),
    ("IoT_7nm", 15_000.0, 0.12, 0.10, 4_200.0),
];

// (项目, 投资额, 年收益, 开始日期, 工期月数, 优先级, 风险)
const PROJECTS: &[(&str, f64, f64, (i32, u32, u32), i64, StrategicPriority, RiskLevel)] = &[
    ("EUV_Litho_Expansion_Phase1", 650e6, 145e6, (2023, 3, 1), 18, StrategicPriority::Critical, RiskLevel::Medium),
    ("Advanced_Packaging_Line", 380e6, 72e6, (2023, 6, 1), 24, StrategicPriority::High, RiskLevel::Medium),
    ("Cleanroom_Bay_Expansion", 220e6, 38e6, (2023, 9, 1), 20, StrategicPriority::High, RiskLevel::Low),
    ("EUV_Litho_Expansion_Phase2", 850e6, 195e6, (2024, 1, 1), 18, StrategicPriority::Critical, RiskLevel::High),
    ("AI_Accelerator_Dedicated_Line", 520e6, 118e6, (2024, 6, 1), 22, StrategicPriority::High, RiskLevel::Medium),
    ("Automotive_Qualification_Facility", 340e6, 88e6, (2024, 9, 1), 16, StrategicPriority::Medium, RiskLevel::Low),
    ("Next_Gen_Metrology_Suite", 125e6, 35e6, (2025, 1, 1), 12, StrategicPriority::Medium, RiskLevel::Low),
    ("High_NA_EUV_Tools", 450e6, 98e6, (2025, 6, 1), 15, StrategicPriority::Critical, RiskLevel::High),
];

const NPI_PROGRAMS: &[(&str, (i32, u32, u32))] = &[
    ("A17_Pro_Mobile_SoC", (2023, 1, 15)),
    ("M3_Ultra_HPC_Chip", (2023, 3, 1)),
    ("A18_Mobile_SoC", (2024, 1, 10)),
    ("HPC_AI_Accelerator_Gen1", (2023, 6, 1)),
    ("Automotive_Sensor_Fusion", (2023, 9, 1)),
    ("Next_Gen_GPU_Architecture", (2024, 3, 1)),
];

const DISCOUNT_RATE: f64 = 0.10;
const BENEFIT_YEARS: i32 = 7;

fn date(ymd: (i32, u32, u32)) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).with_context(|| format!("非法日期: {:?}", ymd))
}

fn write_table<T: Serialize>(dir: &Path, file_name: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(file_name);
    let mut writer = Writer::from_path(&path).with_context(|| format!("无法创建 {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("   ✅ {} ({} 行)", path.display(), rows.len());
    Ok(())
}

fn generate_equipment(rng: &mut StdRng, as_of: NaiveDate) -> Vec<Tool> {
    let mut tools = Vec::new();
    let mut counter = 1000;

    for &(tool_type, cost_usd, throughput_wph, utilization_target, (lo, hi), mtbf_hours) in TOOL_SPECS {
        let count = rng.gen_range(lo..=hi);
        for _ in 0..count {
            let status = match rng.gen_range(0..100) {
                0..=89 => ToolStatus::Active,
                90..=95 => ToolStatus::Maintenance,
                96..=98 => ToolStatus::Upgrade,
                _ => ToolStatus::Down,
            };
            tools.push(Tool {
                tool_id: format!("{}{}", tool_type[..3].to_uppercase(), counter),
                tool_type: tool_type.to_string(),
                throughput_wph,
                utilization_target,
                cost_usd,
                install_date: as_of - Duration::days(rng.gen_range(30..730)),
                status,
                cleanroom_bay: format!("Bay_{}", rng.gen_range(1..9)),
                mtbf_hours,
            });
            counter += 1;
        }
    }

    tools
}

fn generate_operations(rng: &mut StdRng, tools: &[Tool], start: NaiveDate, days: i64) -> Result<Vec<OperationRecord>> {
    let repair = Exp::new(1.0 / 3.0).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut records = Vec::with_capacity(tools.len() * days as usize);

    for day in 0..days {
        let date = start + Duration::days(day);
        for tool in tools {
            let availability: f64 = if tool.status == ToolStatus::Active {
                rng.gen_range(0.88..0.99)
            } else {
                rng.gen_range(0.50..0.75)
            };
            let performance: f64 = rng.gen_range(0.92..0.98);
            let quality: f64 = rng.gen_range(0.93..0.995);

            let failure = rng.gen_bool((24.0 / tool.mtbf_hours).min(1.0));
            let downtime_hours = if failure {
                rng.sample::<f64, _>(&repair).clamp(0.5, 24.0)
            } else {
                0.0
            };

            let (wip_units, cycle_time_hours) = if tool.tool_type.starts_with("Lithography") {
                (rng.gen_range(100..600) as f64, rng.gen_range(4.0f64..48.0))
            } else if tool.tool_type.starts_with("Metrology") {
                (rng.gen_range(200..800) as f64, rng.gen_range(1.0f64..8.0))
            } else {
                (rng.gen_range(50..300) as f64, rng.gen_range(2.0f64..16.0))
            };

            let operating_hours = 24.0 - downtime_hours;
            let output_units = (tool.throughput_wph * operating_hours * tool.utilization_target * performance * quality).round();

            records.push(OperationRecord {
                tool_id: tool.tool_id.clone(),
                date,
                availability,
                performance,
                quality,
                output_units,
                wip_units,
                cycle_time_hours: (cycle_time_hours * 100.0_f64).round() / 100.0,
                downtime_hours,
                failure,
            });
        }
    }

    Ok(records)
}

fn generate_demand(rng: &mut StdRng) -> Result<Vec<DemandRecord>> {
    let mut records = Vec::new();
    for year in 2023..=2027 {
        for (q, month) in [1u32, 4, 7, 10].into_iter().enumerate() {
            let quarter = date((year, month, 1))?;
            let q_idx = ((year - 2023) * 4) as f64 + q as f64 + 1.0;
            for &(product, base, growth, volatility, unit_revenue_usd) in PRODUCTS {
                let trend = base * (1.0 + growth).powf(q_idx / 4.0);
                let seasonal = 1.0 + 0.12 * (2.0 * std::f64::consts::PI * month as f64 / 12.0).sin();
                let noise: f64 = rng.gen_range(-volatility..volatility);
                records.push(DemandRecord {
                    product: product.to_string(),
                    quarter,
                    demand_units: (trend * seasonal * (1.0 + noise)).max(0.0).round(),
                    unit_revenue_usd,
                });
            }
        }
    }
    Ok(records)
}

fn generate_projects() -> Result<Vec<CapExProject>> {
    PROJECTS
        .iter()
        .enumerate()
        .map(|(i, &(name, investment, benefit, start, months, priority, risk))| {
            let start_date = date(start)?;
            let npv = -investment
                + (1..=BENEFIT_YEARS)
                    .map(|y| benefit / (1.0 + DISCOUNT_RATE).powi(y))
                    .sum::<f64>();
            Ok(CapExProject {
                project_id: format!("CPX{}", 1000 + i),
                project_name: name.to_string(),
                investment_usd: investment,
                npv_usd: npv.round(),
                irr_percent: (benefit / investment * 10_000.0).round() / 100.0,
                payback_years: (investment / benefit * 100.0).round() / 100.0,
                risk_level: risk,
                strategic_priority: priority,
                start_date,
                end_date: start_date + Duration::days(30 * months),
                mandatory: false,
            })
        })
        .collect()
}

fn generate_milestones(rng: &mut StdRng, as_of: NaiveDate) -> Result<Vec<NpiMilestone>> {
    let phases: [(NpiPhase, i64, f64); 4] = [
        (NpiPhase::Evt, 3, 0.68),
        (NpiPhase::Dvt, 4, 0.82),
        (NpiPhase::Pvt, 3, 0.90),
        (NpiPhase::Mp, 2, 0.94),
    ];

    let mut records = Vec::new();
    for &(program, start) in NPI_PROGRAMS {
        let mut phase_start = date(start)?;
        for &(phase, months, target_yield) in &phases {
            let phase_end = phase_start + Duration::days(30 * months);
            let gate_complete = phase_end < as_of;
            let yield_at_phase = if gate_complete {
                (target_yield * rng.gen_range(0.98f64..1.06)).min(1.0)
            } else if phase_start < as_of {
                target_yield * rng.gen_range(0.88f64..1.0)
            } else {
                0.0
            };
            records.push(NpiMilestone {
                program: program.to_string(),
                phase,
                yield_at_phase,
                gate_complete,
                target_date: phase_end,
            });
            phase_start = phase_end;
        }
    }
    Ok(records)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out_dir = PathBuf::from(args.first().map(String::as_str).unwrap_or("data/raw"));
    let seed: u64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(42);
    let days: i64 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(180);

    std::fs::create_dir_all(&out_dir).with_context(|| format!("无法创建目录 {}", out_dir.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let start = date((2024, 1, 1))?;
    let as_of = start + Duration::days(days);

    println!("生成合成晶圆厂数据 (seed={}, days={})", seed, days);

    let equipment = generate_equipment(&mut rng, start);
    let operations = generate_operations(&mut rng, &equipment, start, days)?;
    let demand = generate_demand(&mut rng)?;
    let projects = generate_projects()?;
    let milestones = generate_milestones(&mut rng, as_of)?;

    write_table(&out_dir, tables::EQUIPMENT.file_name, &equipment)?;
    write_table(&out_dir, tables::OPERATIONS.file_name, &operations)?;
    write_table(&out_dir, tables::DEMAND.file_name, &demand)?;
    write_table(&out_dir, tables::CAPEX.file_name, &projects)?;
    write_table(&out_dir, tables::NPI.file_name, &milestones)?;

    Ok(())
}
