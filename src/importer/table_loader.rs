// ==========================================
// 晶圆厂产能分析引擎 - 输入表加载器
// ==========================================
// 职责: 读取五张 CSV 输入表并反序列化为领域实体
// 流程: 文件存在检查 → 表头必需列检查 → 逐行反序列化
// 说明: 缺列在读取任何数据行前拒绝；行号从 1 开始，不含表头
// ==========================================

use crate::domain::equipment::{OperationRecord, Tool};
use crate::domain::planning::{CapExProject, DemandRecord, NpiMilestone};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

// ==========================================
// 表定义
// ==========================================
pub mod tables {
    /// (表名, 文件名, 必需列)
    pub struct TableSpec {
        pub name: &'static str,
        pub file_name: &'static str,
        pub required_columns: &'static [&'static str],
    }

    pub const EQUIPMENT: TableSpec = TableSpec {
        name: "equipment_master",
        file_name: "equipment_master.csv",
        required_columns: &[
            "tool_id",
            "tool_type",
            "throughput_wph",
            "utilization_target",
            "cost_usd",
            "install_date",
            "status",
            "cleanroom_bay",
            "mtbf_hours",
        ],
    };

    pub const OPERATIONS: TableSpec = TableSpec {
        name: "fab_operations",
        file_name: "fab_operations.csv",
        required_columns: &[
            "tool_id",
            "date",
            "availability",
            "performance",
            "quality",
            "output_units",
            "wip_units",
            "cycle_time_hours",
            "downtime_hours",
            "failure",
        ],
    };

    pub const DEMAND: TableSpec = TableSpec {
        name: "demand_forecast",
        file_name: "demand_forecast.csv",
        required_columns: &["product", "quarter", "demand_units", "unit_revenue_usd"],
    };

    // mandatory 为可选列
    pub const CAPEX: TableSpec = TableSpec {
        name: "capex_projects",
        file_name: "capex_projects.csv",
        required_columns: &[
            "project_id",
            "project_name",
            "investment_usd",
            "npv_usd",
            "irr_percent",
            "payback_years",
            "risk_level",
            "strategic_priority",
            "start_date",
            "end_date",
        ],
    };

    pub const NPI: TableSpec = TableSpec {
        name: "npi_milestones",
        file_name: "npi_milestones.csv",
        required_columns: &["program", "phase", "yield_at_phase", "gate_complete", "target_date"],
    };
}

use tables::TableSpec;

// ==========================================
// FabDataset - 单次分析的全部输入表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FabDataset {
    pub equipment: Vec<Tool>,
    pub operations: Vec<OperationRecord>,
    pub demand: Vec<DemandRecord>,
    pub projects: Vec<CapExProject>,
    pub milestones: Vec<NpiMilestone>,
}

// ==========================================
// TableLoader - CSV 表加载器
// ==========================================
pub struct TableLoader;

impl TableLoader {
    pub fn new() -> Self {
        Self
    }

    /// 从目录加载全部五张表
    pub fn load_all(&self, dir: &Path) -> ImportResult<FabDataset> {
        let dataset = FabDataset {
            equipment: self.load(&dir.join(tables::EQUIPMENT.file_name), &tables::EQUIPMENT)?,
            operations: self.load(&dir.join(tables::OPERATIONS.file_name), &tables::OPERATIONS)?,
            demand: self.load(&dir.join(tables::DEMAND.file_name), &tables::DEMAND)?,
            projects: self.load(&dir.join(tables::CAPEX.file_name), &tables::CAPEX)?,
            milestones: self.load(&dir.join(tables::NPI.file_name), &tables::NPI)?,
        };

        tracing::info!(
            dir = %dir.display(),
            equipment = dataset.equipment.len(),
            operations = dataset.operations.len(),
            demand = dataset.demand.len(),
            projects = dataset.projects.len(),
            milestones = dataset.milestones.len(),
            "输入表加载完成"
        );

        Ok(dataset)
    }

    /// 加载单张表
    pub fn load<T: DeserializeOwned>(&self, path: &Path, spec: &TableSpec) -> ImportResult<Vec<T>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path).map_err(|e| ImportError::read_failed(path, e))?;
        self.load_from_reader(file, spec)
    }

    /// 从任意 reader 加载 (表头必须位于首行)
    pub fn load_from_reader<R: std::io::Read, T: DeserializeOwned>(
        &self,
        reader: R,
        spec: &TableSpec,
    ) -> ImportResult<Vec<T>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ImportError::CsvParseError {
                table: spec.name.to_string(),
                row: 0,
                column: "*".to_string(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if let Some(missing) = spec
            .required_columns
            .iter()
            .find(|c| !headers.iter().any(|h| h == *c))
        {
            return Err(ImportError::MissingColumn {
                table: spec.name.to_string(),
                column: missing.to_string(),
            });
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<T>().enumerate() {
            let row = result.map_err(|e| {
                let column = column_of(&e, &headers).unwrap_or_else(|| "*".to_string());
                ImportError::CsvParseError {
                    table: spec.name.to_string(),
                    row: idx + 1,
                    column,
                    message: e.to_string(),
                }
            })?;
            rows.push(row);
        }

        tracing::debug!(table = spec.name, rows = rows.len(), "表加载完成");
        Ok(rows)
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// 反序列化错误对应的列名
fn column_of(error: &csv::Error, headers: &[String]) -> Option<String> {
    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err
            .field()
            .and_then(|i| headers.get(i as usize))
            .cloned(),
        _ => None,
    }
}
