// ==========================================
// 晶圆厂产能分析引擎 - 设备与运行记录领域模型
// ==========================================
// 职责: 设备主数据 (Tool) + 日运行记录 (OperationRecord)
// 红线: 单次分析内只读，不可修改
// ==========================================

use crate::domain::types::ToolStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 每个运行记录覆盖的小时数（日记录）
pub const HOURS_PER_RECORD: f64 = 24.0;

// ==========================================
// Tool - 设备主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    // ===== 标识 =====
    pub tool_id: String,   // 设备编号
    pub tool_type: String, // 设备类型 (如 Lithography_EUV)

    // ===== 产能参数 =====
    pub throughput_wph: f64,     // 单台理论产出 (片/小时)
    pub utilization_target: f64, // 目标利用率 (0.0-1.0)

    // ===== 资产信息 =====
    pub cost_usd: f64,           // 设备原值
    pub install_date: NaiveDate, // 安装日期
    pub status: ToolStatus,      // 运行状态
    pub cleanroom_bay: String,   // 洁净室区域

    // ===== 可靠性种子参数 =====
    pub mtbf_hours: f64, // 理论 MTBF (小时)
}

impl Tool {
    /// 单台设备在一个统计周期内的有效产能
    ///
    /// 有效产能 = 理论产出 × 周期小时数 × 目标利用率
    pub fn effective_capacity(&self, hours_per_period: f64) -> f64 {
        self.throughput_wph * hours_per_period * self.utilization_target
    }
}

// ==========================================
// OperationRecord - 日运行记录
// ==========================================
// 同一设备多条记录，按日期有序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub tool_id: String,
    pub date: NaiveDate,

    // ===== OEE 三要素 (0.0-1.0) =====
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,

    // ===== 产出 =====
    pub output_units: f64,     // 当日产出
    pub wip_units: f64,        // 在制品数量
    pub cycle_time_hours: f64, // 周期时间 (>0)

    // ===== 停机 =====
    pub downtime_hours: f64, // 非计划停机时长
    pub failure: bool,       // 当日是否发生故障
}

impl OperationRecord {
    /// OEE = 可用率 × 性能率 × 良率
    pub fn oee(&self) -> f64 {
        self.availability * self.performance * self.quality
    }

    /// 当日运行时长 (小时)
    pub fn uptime_hours(&self) -> f64 {
        (HOURS_PER_RECORD - self.downtime_hours).max(0.0)
    }
}
