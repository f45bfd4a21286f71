// ==========================================
// 奶牛日粮优化系统 - 日粮编排器
// ==========================================
// 职责: 串联 分组 → 需求 → 建模 → 求解 → 提取 全流程
// 红线: 单组求解失败不中断其余分组,失败状态原样记录
// ==========================================

use crate::config::RunConfig;
use crate::domain::cow::{Cow, CohortStats};
use crate::domain::ingredient::{CropLibrary, FeedPriceTable, InclusionLimitTable};
use crate::domain::types::SolveStatus;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::extract::{CohortSolution, ResultExtractor};
use crate::engine::grouping::HerdPartitioner;
use crate::engine::ration_model::RationModelBuilder;
use crate::engine::requirement::RequirementCalculator;
use crate::engine::solver::RationSolver;
use std::time::Duration;
use tracing::{info, warn};

// ==========================================
// CohortOutcome - 分组求解结局
// ==========================================
#[derive(Debug, Clone)]
pub enum CohortOutcome {
    Solved(CohortSolution),
    Failed { status: SolveStatus, message: String },
}

// ==========================================
// CohortReport - 分组报告
// ==========================================
#[derive(Debug, Clone)]
pub struct CohortReport {
    pub index: usize,
    pub stats: CohortStats,
    pub outcome: CohortOutcome,
}

// ==========================================
// RationPlanReport - 全群日粮方案报告
// ==========================================
#[derive(Debug, Clone)]
pub struct RationPlanReport {
    pub cohorts: Vec<CohortReport>,
}

impl RationPlanReport {
    pub fn solved_count(&self) -> usize {
        self.cohorts
            .iter()
            .filter(|c| matches!(c.outcome, CohortOutcome::Solved(_)))
            .count()
    }

    /// 跨组简单平均的汇总指标(仅统计求解成功的分组,逐组等权)
    ///
    /// # 返回
    /// - None: 无任何分组求解成功
    pub fn herd_averages(&self) -> Option<Vec<(String, f64)>> {
        let solved: Vec<&CohortSolution> = self
            .cohorts
            .iter()
            .filter_map(|c| match &c.outcome {
                CohortOutcome::Solved(solution) => Some(solution),
                CohortOutcome::Failed { .. } => None,
            })
            .collect();
        if solved.is_empty() {
            return None;
        }

        let n = solved.len() as f64;
        let averages = solved[0]
            .summary
            .rows
            .iter()
            .enumerate()
            .map(|(i, (label, _))| {
                let sum: f64 = solved.iter().map(|s| s.summary.rows[i].1).sum();
                (label.clone(), sum / n)
            })
            .collect();
        Some(averages)
    }
}

// ==========================================
// RationOrchestrator - 日粮编排器
// ==========================================
pub struct RationOrchestrator<'a> {
    library: &'a CropLibrary,
    prices: &'a FeedPriceTable,
    limits: &'a InclusionLimitTable,
    config: &'a RunConfig,
}

impl<'a> RationOrchestrator<'a> {
    pub fn new(
        library: &'a CropLibrary,
        prices: &'a FeedPriceTable,
        limits: &'a InclusionLimitTable,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            library,
            prices,
            limits,
            config,
        }
    }

    /// 执行全群日粮优化
    ///
    /// # 规则
    /// - 配置校验 → 牛群分组 → 逐组独立求解
    /// - 建模期错误(配置/跨表引用)对所有分组同样成立,直接上抛
    /// - 求解期失败只记录该分组结局,其余分组照常求解
    pub fn run(&self, herd: &[Cow]) -> EngineResult<RationPlanReport> {
        self.config.validate()?;
        let cohorts =
            HerdPartitioner::partition(herd, self.config.group_count, self.config.criterion)?;
        info!(
            "日粮优化开始: 牛数={} 分组数={} 目标={} 甲烷方程={}",
            herd.len(),
            cohorts.len(),
            self.config.objective,
            self.config.methane_equation
        );

        let builder =
            RationModelBuilder::new(self.library, self.prices, self.limits, self.config);
        let solver = RationSolver::new(self.config.solver_timeout_secs.map(Duration::from_secs));

        let mut reports = Vec::with_capacity(cohorts.len());
        for cohort in &cohorts {
            let stats = cohort.stats(self.config.nel_req_percentile);
            info!(
                "分组 {}: 牛数={} DMI均值={:.2} NEL需求分位={:.3}",
                cohort.index, stats.count, stats.dmi_mean, stats.nel_req
            );

            let requirements = RequirementCalculator::compute(
                stats.dmi_mean,
                stats.nel_req,
                self.config.dm_vary,
                self.config.nel_vary,
                &self.config.nutrient_policy,
            )?;
            let model = builder.build(cohort.size(), &requirements)?;

            let outcome = match solver.solve(model) {
                Ok(assignment) => {
                    let solution = ResultExtractor::extract(&assignment);
                    info!(
                        "分组 {} 求解成功: 成本={:.4} $/cow/d",
                        cohort.index, assignment.cost
                    );
                    CohortOutcome::Solved(solution)
                }
                Err(EngineError::SolverFailure { status, message }) => {
                    warn!("分组 {} 求解失败 ({}): {}", cohort.index, status, message);
                    CohortOutcome::Failed { status, message }
                }
                Err(other) => return Err(other),
            };
            reports.push(CohortReport {
                index: cohort.index,
                stats,
                outcome,
            });
        }

        info!(
            "日粮优化结束: 成功 {}/{} 组",
            reports
                .iter()
                .filter(|r| matches!(r.outcome, CohortOutcome::Solved(_)))
                .count(),
            reports.len()
        );
        Ok(RationPlanReport { cohorts: reports })
    }
}
