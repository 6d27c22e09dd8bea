// ==========================================
// 晶圆厂产能分析引擎 - 蒙特卡洛风险仿真
// ==========================================
// 职责: 在需求 / 良率 / 可用率 / 周期时间不确定性下估计产能缺口分布
// 输入: 产能基线 (瓶颈产能 + 基线需求) + 仿真参数
// 输出: SimulationResult (统计量与试验明细同源)
// ==========================================
// 单次试验按固定顺序抽样:
//   1. 需求乘数 ~ U[low, high]
//   2. 良率 ~ Normal(mean, std)，截断到 [min, max]
//   3. 可用率 ~ Beta(alpha, beta)
//   4. 周期时间乘数 ~ LogNormal(0, sigma)
// 有效产能 = 基线产能 × 良率 × 可用率 / 周期时间乘数
// 缺口 = max(0, 基线需求 × 需求乘数 - 有效产能)
// ==========================================
// 可复现性: 第 i 次试验使用 StdRng::seed_from_u64(seed + i)，
// 并行执行后按试验序号收集，统计量顺序计算
// ==========================================

use crate::config::analysis_config::{MonteCarloConfig, MIN_ITERATIONS};
use crate::domain::capacity::CapacityBaseline;
use crate::domain::risk::{SimulationResult, TrialSample};
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::stats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use statrs::distribution::{Beta, LogNormal, Normal};
use tracing::instrument;

// ==========================================
// TrialDistributions - 单次试验的抽样分布
// ==========================================
struct TrialDistributions {
    demand_low: f64,
    demand_high: f64,
    yield_dist: Normal,
    yield_min: f64,
    yield_max: f64,
    availability_dist: Beta,
    cycle_time_dist: LogNormal,
}

impl TrialDistributions {
    fn from_config(config: &MonteCarloConfig) -> AnalysisResult<Self> {
        let invalid = |column: &str, message: String| {
            AnalysisError::validation("config", column, None, format!("分布参数非法: {}", message))
        };

        Ok(Self {
            demand_low: config.demand_multiplier_low,
            demand_high: config.demand_multiplier_high,
            yield_dist: Normal::new(config.yield_mean, config.yield_std)
                .map_err(|e| invalid("monte_carlo.yield", e.to_string()))?,
            yield_min: config.yield_min,
            yield_max: config.yield_max,
            availability_dist: Beta::new(config.availability_alpha, config.availability_beta)
                .map_err(|e| invalid("monte_carlo.availability", e.to_string()))?,
            cycle_time_dist: LogNormal::new(0.0, config.cycle_time_sigma)
                .map_err(|e| invalid("monte_carlo.cycle_time_sigma", e.to_string()))?,
        })
    }

    fn sample(&self, rng: &mut StdRng, baseline: &CapacityBaseline) -> TrialSample {
        let u: f64 = rng.gen();
        let demand_multiplier = self.demand_low + (self.demand_high - self.demand_low) * u;
        let yield_rate = rng.sample::<f64, _>(&self.yield_dist).clamp(self.yield_min, self.yield_max);
        let availability = rng.sample::<f64, _>(&self.availability_dist);
        let cycle_time_multiplier = rng.sample::<f64, _>(&self.cycle_time_dist);

        let required_output = baseline.demand * demand_multiplier;
        let effective_capacity = baseline.capacity * yield_rate * availability / cycle_time_multiplier;
        let shortfall = (required_output - effective_capacity).max(0.0);

        TrialSample {
            demand_multiplier,
            yield_rate,
            availability,
            cycle_time_multiplier,
            required_output,
            effective_capacity,
            shortfall,
        }
    }
}

// ==========================================
// MonteCarloSimulator - 蒙特卡洛仿真器
// ==========================================
pub struct MonteCarloSimulator {
    config: MonteCarloConfig,
}

impl MonteCarloSimulator {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// 运行仿真
    ///
    /// # 返回
    /// - Ok(SimulationResult): 含实际使用的种子
    /// - Err(InsufficientSample): 试验次数低于 MIN_ITERATIONS
    /// - Err(Validation): 分布参数非法
    #[instrument(skip(self, baseline), fields(iterations = self.config.iterations))]
    pub fn simulate(&self, baseline: &CapacityBaseline) -> AnalysisResult<SimulationResult> {
        let iterations = self.config.iterations;
        if iterations < MIN_ITERATIONS {
            return Err(AnalysisError::InsufficientSample {
                requested: iterations,
                minimum: MIN_ITERATIONS,
            });
        }

        let distributions = TrialDistributions::from_config(&self.config)?;
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());

        // 并行试验，按序号收集
        let trials: Vec<TrialSample> = (0..iterations as u64)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i));
                distributions.sample(&mut rng, baseline)
            })
            .collect();

        let result = self.summarize(seed, baseline, trials);

        tracing::info!(
            seed,
            mean_shortfall = result.mean_shortfall,
            service_level = result.service_level_probability,
            capacity_at_risk = result.capacity_at_risk_p95,
            "蒙特卡洛仿真完成"
        );

        Ok(result)
    }

    // ==========================================
    // 统计汇总
    // ==========================================

    fn summarize(&self, seed: u64, baseline: &CapacityBaseline, trials: Vec<TrialSample>) -> SimulationResult {
        let n = trials.len();

        let mut shortfalls: Vec<f64> = trials.iter().map(|t| t.shortfall).collect();
        let mut capacities: Vec<f64> = trials.iter().map(|t| t.effective_capacity).collect();
        let mut required: Vec<f64> = trials.iter().map(|t| t.required_output).collect();
        let mut utilizations: Vec<f64> = trials.iter().map(|t| t.utilization()).collect();
        let yields: Vec<f64> = trials.iter().map(|t| t.yield_rate).collect();
        let availabilities: Vec<f64> = trials.iter().map(|t| t.availability).collect();

        let served = trials.iter().filter(|t| t.shortfall <= 0.0).count();
        let service_level_probability = served as f64 / n as f64;

        let mean_shortfall = stats::mean(&shortfalls);
        let mean_effective_capacity = stats::mean(&capacities);
        let mean_required_output = stats::mean(&required);
        let mean_utilization = stats::mean(&utilizations);

        stats::sort_values(&mut shortfalls);
        stats::sort_values(&mut capacities);
        stats::sort_values(&mut required);
        stats::sort_values(&mut utilizations);

        SimulationResult {
            iterations: n,
            seed,
            baseline_capacity: baseline.capacity,
            baseline_demand: baseline.demand,
            mean_shortfall,
            median_shortfall: stats::percentile_sorted(&shortfalls, 0.50),
            p95_shortfall: stats::percentile_sorted(&shortfalls, 0.95),
            p99_shortfall: stats::percentile_sorted(&shortfalls, 0.99),
            service_level_probability,
            probability_of_shortfall: 1.0 - service_level_probability,
            capacity_at_risk_p95: stats::percentile_sorted(&capacities, 0.05),
            demand_at_risk_p95: stats::percentile_sorted(&required, 0.95),
            mean_required_output,
            mean_effective_capacity,
            mean_utilization,
            p95_utilization: stats::percentile_sorted(&utilizations, 0.95),
            mean_yield: stats::mean(&yields),
            mean_availability: stats::mean(&availabilities),
            trials: if self.config.keep_trials { trials } else { Vec::new() },
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new(MonteCarloConfig::default())
    }
}
