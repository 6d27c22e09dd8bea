// ==========================================
// 晶圆厂产能分析引擎 - 可靠性模型
// ==========================================
// 职责: 由设备运行历史计算 MTBF / 可用率 / 故障次数
// 输入: 单台设备按日期排序的运行记录
// 输出: ReliabilitySummary (无副作用)
// ==========================================
// MTBF = 总运行时长 / max(故障次数, 1)
// 可用率 = 运行时长 / (运行时长 + 停机时长)
// 零故障设备的 MTBF 即整个观测期运行时长 (保守上限，标记 mtbf_censored)
// ==========================================

use crate::domain::equipment::{OperationRecord, Tool};
use crate::domain::reliability::{ReliabilitySummary, ToolTypeReliability};
use crate::engine::error::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

// ==========================================
// ReliabilityModel - 可靠性模型
// ==========================================
pub struct ReliabilityModel {
    // 无状态引擎
}

impl ReliabilityModel {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单台设备的可靠性汇总
    ///
    /// # 参数
    /// - `tool`: 设备主数据
    /// - `history`: 该设备的运行记录 (按日期排序)
    ///
    /// # 返回
    /// - Ok(ReliabilitySummary)
    /// - Err(InsufficientData): 历史为空
    pub fn summarize_tool(
        &self,
        tool: &Tool,
        history: &[&OperationRecord],
    ) -> AnalysisResult<ReliabilitySummary> {
        if history.is_empty() {
            return Err(AnalysisError::insufficient_data(
                &tool.tool_id,
                "设备无运行记录，无法计算 MTBF",
            ));
        }

        let uptime_hours: f64 = history.iter().map(|r| r.uptime_hours()).sum();
        let downtime_hours: f64 = history.iter().map(|r| r.downtime_hours).sum();
        let failure_count = history.iter().filter(|r| r.failure).count();

        let mtbf_hours = uptime_hours / failure_count.max(1) as f64;

        let observed_hours = uptime_hours + downtime_hours;
        let availability = if observed_hours > 0.0 {
            uptime_hours / observed_hours
        } else {
            0.0
        };

        let mean_oee = history.iter().map(|r| r.oee()).sum::<f64>() / history.len() as f64;

        Ok(ReliabilitySummary {
            tool_id: tool.tool_id.clone(),
            tool_type: tool.tool_type.clone(),
            observed_days: history.len(),
            uptime_hours,
            downtime_hours,
            failure_count,
            mtbf_hours,
            mtbf_censored: failure_count == 0,
            availability,
            mean_oee,
        })
    }

    /// 计算全部设备的可靠性汇总
    ///
    /// # 返回
    /// (成功汇总列表, 数据不足的设备错误列表)；单台失败不影响其他设备
    pub fn summarize_fleet(
        &self,
        tools: &[Tool],
        operations: &[OperationRecord],
    ) -> (Vec<ReliabilitySummary>, Vec<AnalysisError>) {
        let histories = group_by_tool(operations);

        let mut summaries = Vec::with_capacity(tools.len());
        let mut errors = Vec::new();

        for tool in tools {
            let history = histories
                .get(tool.tool_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            match self.summarize_tool(tool, history) {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    tracing::warn!(tool_id = %tool.tool_id, error = %e, "可靠性汇总跳过");
                    errors.push(e);
                }
            }
        }

        (summaries, errors)
    }

    /// 按设备类型聚合可靠性 (按可用率影响降序)
    ///
    /// # 参数
    /// - `tools`: 设备主数据 (提供理论 MTBF)
    /// - `summaries`: 单台设备汇总
    pub fn aggregate_by_tool_type(
        &self,
        tools: &[Tool],
        summaries: &[ReliabilitySummary],
    ) -> Vec<ToolTypeReliability> {
        let mut theoretical: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for tool in tools {
            let entry = theoretical.entry(tool.tool_type.as_str()).or_insert((0.0, 0));
            entry.0 += tool.mtbf_hours;
            entry.1 += 1;
        }

        let mut grouped: BTreeMap<&str, Vec<&ReliabilitySummary>> = BTreeMap::new();
        for summary in summaries {
            grouped.entry(summary.tool_type.as_str()).or_default().push(summary);
        }

        let mut results: Vec<ToolTypeReliability> = grouped
            .into_iter()
            .map(|(tool_type, members)| {
                let total_failures: usize = members.iter().map(|s| s.failure_count).sum();
                let total_downtime_hours: f64 = members.iter().map(|s| s.downtime_hours).sum();
                let total_uptime_hours: f64 = members.iter().map(|s| s.uptime_hours).sum();
                let operating_hours = total_uptime_hours + total_downtime_hours;

                let mean_downtime_hours = if total_failures > 0 {
                    total_downtime_hours / total_failures as f64
                } else {
                    0.0
                };
                let mtbf_actual_hours = total_uptime_hours / total_failures.max(1) as f64;

                let mtbf_theoretical_hours = theoretical
                    .get(tool_type)
                    .map(|(sum, n)| sum / *n as f64)
                    .unwrap_or(0.0);
                let mtbf_performance_pct = if mtbf_theoretical_hours > 0.0 {
                    mtbf_actual_hours / mtbf_theoretical_hours * 100.0
                } else {
                    0.0
                };
                let availability_impact_pct = if operating_hours > 0.0 {
                    total_downtime_hours / operating_hours * 100.0
                } else {
                    0.0
                };

                ToolTypeReliability {
                    tool_type: tool_type.to_string(),
                    tool_count: members.len(),
                    total_failures,
                    total_downtime_hours,
                    mean_downtime_hours,
                    mtbf_actual_hours,
                    mtbf_theoretical_hours,
                    mtbf_performance_pct,
                    availability_impact_pct,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.availability_impact_pct
                .partial_cmp(&a.availability_impact_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.tool_type.cmp(&b.tool_type))
        });

        results
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ReliabilityModel {
    fn default() -> Self {
        Self::new()
    }
}

/// 按设备分组运行记录，组内按日期排序
pub fn group_by_tool(operations: &[OperationRecord]) -> BTreeMap<&str, Vec<&OperationRecord>> {
    let mut grouped: BTreeMap<&str, Vec<&OperationRecord>> = BTreeMap::new();
    for record in operations {
        grouped.entry(record.tool_id.as_str()).or_default().push(record);
    }
    for history in grouped.values_mut() {
        history.sort_by_key(|r| r.date);
    }
    grouped
}
