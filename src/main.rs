// ==========================================
// 晶圆厂产能分析引擎 - 命令行入口
// ==========================================
// 用法: fab-capacity <data_dir> [config.json]
// 输出: 分析报告 (JSON) 写入 stdout，日志写入 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use fab_capacity_analytics::config::ConfigManager;
use fab_capacity_analytics::importer::TableLoader;
use fab_capacity_analytics::{logging, AnalyticsFacade};
use std::path::PathBuf;

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_dir, config_path) = match args.as_slice() {
        [dir] => (PathBuf::from(dir), None),
        [dir, config] => (PathBuf::from(dir), Some(PathBuf::from(config))),
        _ => bail!("用法: fab-capacity <data_dir> [config.json]"),
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", fab_capacity_analytics::APP_NAME, fab_capacity_analytics::VERSION);
    tracing::info!("==================================================");

    // 1. 配置: 默认值 < 配置文件 < 环境变量
    let mut manager = match &config_path {
        Some(path) => ConfigManager::from_json_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => ConfigManager::new(),
    };
    let overrides = manager.apply_env_overrides().context("环境变量覆写失败")?;
    if overrides > 0 {
        tracing::info!(overrides, "已应用环境变量覆写");
    }
    let config = manager.build().context("配置校验失败")?;

    // 2. 输入表
    let dataset = TableLoader::new()
        .load_all(&data_dir)
        .with_context(|| format!("加载输入表失败: {}", data_dir.display()))?;

    // 3. 分析
    let facade = AnalyticsFacade::new(config);
    let report = facade
        .run_analysis(
            &dataset.equipment,
            &dataset.operations,
            &dataset.demand,
            &dataset.projects,
            &dataset.milestones,
        )
        .context("输入校验失败")?;

    // 4. 输出
    println!("{}", serde_json::to_string_pretty(&report)?);

    let failed = report.failed_components();
    if !failed.is_empty() {
        tracing::warn!(?failed, "部分分析组件失败");
    }

    Ok(())
}
