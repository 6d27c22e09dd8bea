// ==========================================
// 晶圆厂产能分析引擎 - NPI 就绪度
// ==========================================
// 职责: 按项目汇总新产品导入阶段门进度
// 阶段顺序: EVT < DVT < PVT < MP
// 当前阶段 = 已过阶段门的最高阶段；下一阶段 = 最早的未完成阶段
// ==========================================

use crate::domain::planning::NpiMilestone;
use crate::domain::summary::NpiProgramSummary;
use crate::domain::types::NpiPhase;
use std::collections::BTreeMap;

pub struct NpiTracker {
    // 无状态引擎
}

impl NpiTracker {
    pub fn new() -> Self {
        Self {}
    }

    /// 汇总全部 NPI 项目 (按项目名排序)
    pub fn summarize(&self, milestones: &[NpiMilestone]) -> Vec<NpiProgramSummary> {
        let mut by_program: BTreeMap<&str, Vec<&NpiMilestone>> = BTreeMap::new();
        for m in milestones {
            by_program.entry(m.program.as_str()).or_default().push(m);
        }

        by_program
            .into_iter()
            .map(|(program, mut phases)| {
                phases.sort_by_key(|m| (m.phase, m.target_date));

                let current = phases.iter().filter(|m| m.gate_complete).max_by_key(|m| m.phase);
                let next = phases.iter().find(|m| !m.gate_complete);

                NpiProgramSummary {
                    program: program.to_string(),
                    current_phase: current.map(|m| m.phase),
                    completed_gates: phases.iter().filter(|m| m.gate_complete).count(),
                    total_gates: phases.len(),
                    latest_yield: current.map(|m| m.yield_at_phase),
                    next_phase: next.map(|m| m.phase),
                    next_target_date: next.map(|m| m.target_date),
                    mass_production_ready: current.map(|m| m.phase) == Some(NpiPhase::Mp),
                }
            })
            .collect()
    }
}

impl Default for NpiTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn milestone(program: &str, phase: NpiPhase, yield_at_phase: f64, gate_complete: bool, month: u32) -> NpiMilestone {
        NpiMilestone {
            program: program.to_string(),
            phase,
            yield_at_phase,
            gate_complete,
            target_date: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
        }
    }

    #[test]
    fn test_summarize_programs() {
        let milestones = vec![
            milestone("Logic_3nm", NpiPhase::Dvt, 0.72, true, 4),
            milestone("Logic_3nm", NpiPhase::Evt, 0.55, true, 1),
            milestone("Logic_3nm", NpiPhase::Pvt, 0.85, false, 8),
            milestone("Logic_3nm", NpiPhase::Mp, 0.92, false, 12),
            milestone("HBM4", NpiPhase::Evt, 0.60, true, 2),
            milestone("HBM4", NpiPhase::Dvt, 0.78, true, 5),
            milestone("HBM4", NpiPhase::Pvt, 0.88, true, 7),
            milestone("HBM4", NpiPhase::Mp, 0.94, true, 10),
        ];

        let summaries = NpiTracker::new().summarize(&milestones);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].program, "HBM4");
        assert!(summaries[0].mass_production_ready);
        assert_eq!(summaries[0].next_phase, None);

        let logic = &summaries[1];
        assert_eq!(logic.current_phase, Some(NpiPhase::Dvt));
        assert_eq!(logic.latest_yield, Some(0.72));
        assert_eq!(logic.completed_gates, 2);
        assert_eq!(logic.next_phase, Some(NpiPhase::Pvt));
        assert!(!logic.mass_production_ready);
    }

    #[test]
    fn test_program_without_completed_gates() {
        let milestones = vec![milestone("MRAM", NpiPhase::Evt, 0.40, false, 3)];

        let summaries = NpiTracker::new().summarize(&milestones);

        assert_eq!(summaries[0].current_phase, None);
        assert_eq!(summaries[0].latest_yield, None);
        assert_eq!(summaries[0].next_phase, Some(NpiPhase::Evt));
    }
}
