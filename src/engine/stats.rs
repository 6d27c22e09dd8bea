// ==========================================
// 晶圆厂产能分析引擎 - 统计工具
// ==========================================
// 百分位采用线性插值: rank = p × (n - 1)
// ==========================================

/// 算术平均 (空切片返回 0.0)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 就地排序 (NaN 视为相等，不会出现在引擎数据中)
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// 已排序切片的百分位 (p ∈ [0, 1])
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

/// 未排序数据的百分位 (复制后排序)
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sort_values(&mut sorted);
    percentile_sorted(&sorted, p)
}
