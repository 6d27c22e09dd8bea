// ==========================================
// 晶圆厂产能分析引擎 - 瓶颈分析器
// ==========================================
// 职责: 按设备类型计算达成目标产出所需利用率，并分级排序
// 输入: 设备主数据 + 目标产出 (片/周期)
// 输出: Vec<BottleneckResult>，按利用率降序 (首元素即当前瓶颈)
// ==========================================
// 目标负荷 = 目标产出 × 工艺步数 / 归一化常数
// 所需利用率 = 目标负荷 / (单台产能 × 台数)
// 分级: >= critical → CRITICAL, >= warning → WARNING, 其余 OK
// 缺口 (仅 WARNING/CRITICAL) = max(0, (利用率 - 1) × 总产能)
// 无可用设备: 利用率 = +∞，CRITICAL，缺口 = 全部目标负荷
// ==========================================

use crate::config::analysis_config::{BottleneckConfig, BottleneckThresholds};
use crate::domain::capacity::{BottleneckResult, CapacityBaseline};
use crate::domain::equipment::Tool;
use crate::domain::planning::DemandRecord;
use crate::domain::types::Severity;
use crate::engine::error::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

// ==========================================
// BottleneckAnalyzer - 瓶颈分析器
// ==========================================
pub struct BottleneckAnalyzer {
    config: BottleneckConfig,
}

impl BottleneckAnalyzer {
    pub fn new(config: BottleneckConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 瓶颈分析
    ///
    /// # 参数
    /// - `tools`: 设备主数据 (DOWN 状态设备不计入产能，但其类型仍参与分析；
    ///   工艺路线中出现但设备表中没有的类型按无可用设备处理)
    /// - `target_output`: 目标产出 (片/周期)
    ///
    /// # 返回
    /// - Ok(Vec<BottleneckResult>): 按所需利用率降序，同值按类型名升序
    /// - Err(InsufficientData): 设备表为空
    pub fn analyze(&self, tools: &[Tool], target_output: f64) -> AnalysisResult<Vec<BottleneckResult>> {
        if tools.is_empty() {
            return Err(AnalysisError::insufficient_data(
                "equipment",
                "设备表为空，无法进行瓶颈分析",
            ));
        }

        // 1. 按类型汇总计入产能的设备 (工艺路线中的类型即使无设备也参与分析)
        let mut by_type: BTreeMap<&str, Vec<&Tool>> = self
            .config
            .process_steps
            .keys()
            .map(|tool_type| (tool_type.as_str(), Vec::new()))
            .collect();
        for tool in tools {
            let members = by_type.entry(tool.tool_type.as_str()).or_default();
            if tool.status.counts_toward_capacity() {
                members.push(tool);
            }
        }

        // 2. 逐类型计算
        let mut results: Vec<BottleneckResult> = by_type
            .into_iter()
            .map(|(tool_type, members)| self.evaluate_type(tool_type, &members, target_output))
            .collect();

        // 3. 排序 (首元素为瓶颈)
        results.sort_by(|a, b| {
            b.required_utilization
                .partial_cmp(&a.required_utilization)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.tool_type.cmp(&b.tool_type))
        });

        let flagged = results.iter().filter(|r| r.severity.is_flagged()).count();
        tracing::info!(
            tool_types = results.len(),
            flagged,
            bottleneck = %results[0],
            "瓶颈分析完成"
        );

        Ok(results)
    }

    /// 利用率分级
    pub fn classify(&self, utilization: f64) -> Severity {
        classify_utilization(utilization, &self.config.thresholds)
    }

    /// 由瓶颈结果构造产能基线
    ///
    /// 基线产能 = 首元素 (瓶颈类型) 可支撑的最大产出
    pub fn baseline(
        &self,
        results: &[BottleneckResult],
        baseline_demand: f64,
    ) -> AnalysisResult<CapacityBaseline> {
        let bottleneck = results.first().ok_or_else(|| {
            AnalysisError::insufficient_data("bottleneck", "瓶颈结果为空，无法确定产能基线")
        })?;

        Ok(CapacityBaseline {
            constraint_tool_type: bottleneck.tool_type.clone(),
            capacity: bottleneck.max_supportable_output,
            demand: baseline_demand,
        })
    }

    // ==========================================
    // 内部计算
    // ==========================================

    fn evaluate_type(&self, tool_type: &str, members: &[&Tool], target_output: f64) -> BottleneckResult {
        let process_steps = self.config.steps_for(tool_type);
        let target_output_share =
            target_output * process_steps as f64 / self.config.step_normalization;

        let tool_count = members.len();
        let total_capacity: f64 = members
            .iter()
            .map(|t| t.effective_capacity(self.config.hours_per_period))
            .sum();
        let capacity_per_tool = if tool_count > 0 {
            total_capacity / tool_count as f64
        } else {
            0.0
        };

        let max_supportable_output =
            total_capacity * self.config.step_normalization / process_steps as f64;

        if total_capacity <= 0.0 {
            tracing::warn!(tool_type, "设备类型无可用产能");
            return BottleneckResult {
                tool_type: tool_type.to_string(),
                tool_count,
                process_steps,
                capacity_per_tool,
                total_capacity: 0.0,
                target_output_share,
                required_utilization: f64::INFINITY,
                severity: Severity::Critical,
                capacity_gap: target_output_share,
                max_supportable_output: 0.0,
            };
        }

        let required_utilization = target_output_share / total_capacity;
        let severity = self.classify(required_utilization);
        let capacity_gap = if severity.is_flagged() {
            ((required_utilization - 1.0) * total_capacity).max(0.0)
        } else {
            0.0
        };

        tracing::debug!(
            tool_type,
            tool_count,
            required_utilization,
            severity = %severity,
            "设备类型负荷"
        );

        BottleneckResult {
            tool_type: tool_type.to_string(),
            tool_count,
            process_steps,
            capacity_per_tool,
            total_capacity,
            target_output_share,
            required_utilization,
            severity,
            capacity_gap,
            max_supportable_output,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for BottleneckAnalyzer {
    fn default() -> Self {
        Self::new(BottleneckConfig::default())
    }
}

/// 利用率分级 (情景分析复用同一分级带)
pub fn classify_utilization(utilization: f64, thresholds: &BottleneckThresholds) -> Severity {
    if utilization >= thresholds.critical {
        Severity::Critical
    } else if utilization >= thresholds.warning {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// 基线需求 (片/周期)
///
/// 取最新季度全部产品需求之和 / 每季度周数；需求表为空时退回目标产出
pub fn baseline_demand(demand: &[DemandRecord], weeks_per_quarter: f64, fallback: f64) -> f64 {
    let Some(latest) = demand.iter().map(|d| d.quarter).max() else {
        tracing::warn!(fallback, "需求表为空，基线需求取目标产出");
        return fallback;
    };

    let quarter_total: f64 = demand
        .iter()
        .filter(|d| d.quarter == latest)
        .map(|d| d.demand_units)
        .sum();

    quarter_total / weeks_per_quarter
}
