// ==========================================
// 奶牛日粮优化系统 - 结果 CSV 导出器
// ==========================================
// 产物: 每个分组两个文件
//   results_group{i}.csv — Variable,Value 汇总表
//   feed_group{i}.csv    — 配料进食表
// ==========================================

use crate::engine::orchestrator::{CohortOutcome, RationPlanReport};
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录创建失败 {path}: {message}")]
    DirectoryCreation { path: String, message: String },

    #[error("CSV 写出失败: {0}")]
    CsvWriteError(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// CsvExporter - 结果 CSV 导出器
// ==========================================
pub struct CsvExporter;

impl CsvExporter {
    /// 导出全群报告,返回写出的文件路径
    ///
    /// # 规则
    /// - 仅导出求解成功的分组,失败分组记告警后跳过
    /// - 文件名分组编号从 1 起: results_group{i}.csv / feed_group{i}.csv
    pub fn export_report<P: AsRef<Path>>(
        report: &RationPlanReport,
        out_dir: P,
    ) -> ExportResult<Vec<PathBuf>> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir).map_err(|e| ExportError::DirectoryCreation {
            path: out_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut written = Vec::new();
        for cohort in &report.cohorts {
            let solution = match &cohort.outcome {
                CohortOutcome::Solved(solution) => solution,
                CohortOutcome::Failed { status, message } => {
                    warn!(
                        "分组 {} 未求解成功 ({}),跳过导出: {}",
                        cohort.index, status, message
                    );
                    continue;
                }
            };

            let results_path = out_dir.join(format!("results_group{}.csv", cohort.index + 1));
            let mut writer = Writer::from_path(&results_path)?;
            writer.write_record(["Variable", "Value"])?;
            for (label, value) in &solution.summary.rows {
                writer.write_record([label.clone(), value.to_string()])?;
            }
            writer.flush()?;
            written.push(results_path);

            let feed_path = out_dir.join(format!("feed_group{}.csv", cohort.index + 1));
            let mut writer = Writer::from_path(&feed_path)?;
            writer.write_record(["Ingredient", "Amount as fed (kg/cow/d)"])?;
            for (name, amount) in &solution.ingredients.rows {
                writer.write_record([name.clone(), amount.to_string()])?;
            }
            writer.flush()?;
            written.push(feed_path);
        }

        info!("结果导出完成: {} 个文件 → {}", written.len(), out_dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cow::CohortStats;
    use crate::domain::types::SolveStatus;
    use crate::engine::extract::{CohortSolution, IngredientTable, SummaryTable};
    use crate::engine::orchestrator::CohortReport;
    use tempfile::tempdir;

    fn stats() -> CohortStats {
        CohortStats {
            count: 3,
            dmi_mean: 25.0,
            dmi_std: 0.5,
            nel_mean: 1.6,
            nel_std: 0.05,
            milk_mean: 35.0,
            nel_req: 1.62,
        }
    }

    fn report() -> RationPlanReport {
        RationPlanReport {
            cohorts: vec![
                CohortReport {
                    index: 0,
                    stats: stats(),
                    outcome: CohortOutcome::Solved(CohortSolution {
                        summary: SummaryTable {
                            rows: vec![
                                ("$/cow/d".to_string(), 2.3457),
                                ("methane (g/cow/d)".to_string(), 432.7),
                            ],
                        },
                        ingredients: IngredientTable {
                            rows: vec![("Corn silage".to_string(), 23.5714)],
                        },
                    }),
                },
                CohortReport {
                    index: 1,
                    stats: stats(),
                    outcome: CohortOutcome::Failed {
                        status: SolveStatus::Infeasible,
                        message: "约束不可行".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_export_writes_solved_cohorts_only() {
        let dir = tempdir().unwrap();
        let written = CsvExporter::export_report(&report(), dir.path()).unwrap();

        // 仅首个分组的两个文件,文件名编号从 1 起
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("results_group1.csv").exists());
        assert!(dir.path().join("feed_group1.csv").exists());
        assert!(!dir.path().join("results_group0.csv").exists());
        assert!(!dir.path().join("results_group2.csv").exists());

        let content = fs::read_to_string(dir.path().join("results_group1.csv")).unwrap();
        assert!(content.starts_with("Variable,Value"));
        assert!(content.contains("$/cow/d,2.3457"));

        let feed = fs::read_to_string(dir.path().join("feed_group1.csv")).unwrap();
        assert!(feed.starts_with("Ingredient,Amount as fed (kg/cow/d)"));
        assert!(feed.contains("Corn silage,23.5714"));
    }
}
