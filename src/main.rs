// ==========================================
// 奶牛日粮优化系统 - 命令行入口
// ==========================================
// 流程: 导入四表 → 分组优化 → 导出 CSV
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use dairy_ration_opt::config::RunConfig;
use dairy_ration_opt::domain::types::{GroupCriterion, MethaneEquation, ObjectiveKind};
use dairy_ration_opt::engine::{CohortOutcome, RationOrchestrator};
use dairy_ration_opt::export::CsvExporter;
use dairy_ration_opt::importer::{CropImporter, HerdImporter};
use dairy_ration_opt::logging;
use std::path::PathBuf;
use tracing::info;

/// 奶牛日粮优化系统: 按营养分组求解最低成本/最低甲烷日粮
#[derive(Parser, Debug)]
#[command(name = "dairy-ration-opt", version, about)]
struct Cli {
    /// 牛群表路径 (.csv/.xlsx/.xls)
    #[arg(long)]
    cow_path: PathBuf,

    /// 配料营养库路径 (.csv/.xlsx/.xls)
    #[arg(long)]
    crop_path: PathBuf,

    /// 饲料价格表路径 (.csv/.xlsx/.xls)
    #[arg(long)]
    feed_price_path: PathBuf,

    /// 进食上下限表路径 (.csv/.xlsx/.xls)
    #[arg(long)]
    crop_min_max_path: PathBuf,

    /// JSON 运行配置文件(缺省用内置默认值)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 营养分组数 (1/2/3)
    #[arg(long)]
    group_num: Option<usize>,

    /// 分组依据 (dim/nel/milk)
    #[arg(long)]
    criteria: Option<String>,

    /// 甲烷预测方程 (ellis/nasem)
    #[arg(long)]
    methane_eqn: Option<String>,

    /// 优化目标 (cost/methane/both)
    #[arg(long)]
    obj: Option<String>,

    /// objective=both 时的甲烷权重
    #[arg(long)]
    methane_weight: Option<f64>,

    /// DM 需求容差 (比例,如 0.01)
    #[arg(long)]
    dm_vary: Option<f64>,

    /// NEL 需求容差 (比例,如 0.01)
    #[arg(long)]
    nel_vary: Option<f64>,

    /// 结果输出目录
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// 安静模式,只输出告警与错误
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    /// 配置文件为底,命令行参数覆盖
    fn resolve_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(group_num) = self.group_num {
            config.group_count = group_num;
        }
        if let Some(criteria) = &self.criteria {
            config.criterion = match GroupCriterion::parse(criteria) {
                Some(c) => c,
                None => bail!("分组依据不识别: {criteria}(可选 dim/nel/milk)"),
            };
        }
        if let Some(eqn) = &self.methane_eqn {
            config.methane_equation = match MethaneEquation::parse(eqn) {
                Some(e) => e,
                None => bail!("甲烷方程不识别: {eqn}(可选 ellis/nasem)"),
            };
        }
        if let Some(obj) = &self.obj {
            config.objective = match ObjectiveKind::parse(obj) {
                Some(o) => o,
                None => bail!("优化目标不识别: {obj}(可选 cost/methane/both)"),
            };
        }
        if let Some(weight) = self.methane_weight {
            config.methane_weight = weight;
        }
        if let Some(dm_vary) = self.dm_vary {
            config.dm_vary = dm_vary;
        }
        if let Some(nel_vary) = self.nel_vary {
            config.nel_vary = nel_vary;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        logging::init_quiet();
    } else {
        logging::init();
    }

    let config = cli.resolve_config()?;

    // ===== 导入四表 =====
    let herd = HerdImporter::import(&cli.cow_path)
        .with_context(|| format!("牛群表导入失败: {}", cli.cow_path.display()))?;
    let library = CropImporter::import_library(&cli.crop_path)
        .with_context(|| format!("配料营养库导入失败: {}", cli.crop_path.display()))?;
    let prices = CropImporter::import_prices(&cli.feed_price_path)
        .with_context(|| format!("饲料价格表导入失败: {}", cli.feed_price_path.display()))?;
    let limits = CropImporter::import_limits(&cli.crop_min_max_path)
        .with_context(|| format!("进食上下限表导入失败: {}", cli.crop_min_max_path.display()))?;

    // ===== 分组优化 =====
    let orchestrator = RationOrchestrator::new(&library, &prices, &limits, &config);
    let report = orchestrator.run(&herd)?;

    for cohort in &report.cohorts {
        match &cohort.outcome {
            CohortOutcome::Solved(_) => {}
            CohortOutcome::Failed { status, message } => {
                eprintln!("分组 {} 求解失败 ({}): {}", cohort.index, status, message);
            }
        }
    }

    // ===== 跨组平均 =====
    if let Some(averages) = report.herd_averages() {
        for (label, value) in &averages {
            info!("跨组平均 {}: {:.4}", label, value);
        }
    } else {
        bail!("所有分组求解均失败,无结果可导出");
    }

    // ===== 导出 CSV =====
    let written = CsvExporter::export_report(&report, &cli.out_dir)?;
    info!(
        "完成: {}/{} 组求解成功,{} 个结果文件写入 {}",
        report.solved_count(),
        report.cohorts.len(),
        written.len(),
        cli.out_dir.display()
    );
    Ok(())
}
