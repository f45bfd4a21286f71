// ==========================================
// 奶牛日粮优化系统 - 优化引擎层
// ==========================================
// 职责: 需求推导、牛群分组、日粮建模、LP 求解、结果提取
// 红线: 引擎只依赖领域模型与配置,不做任何 I/O
// ==========================================

pub mod error;
pub mod extract;
pub mod grouping;
pub mod orchestrator;
pub mod ration_model;
pub mod requirement;
pub mod solver;

// 重导出核心类型
pub use error::{EngineError, EngineResult};
pub use extract::{CohortSolution, IngredientTable, ResultExtractor, SummaryTable};
pub use grouping::HerdPartitioner;
pub use orchestrator::{CohortOutcome, CohortReport, RationOrchestrator, RationPlanReport};
pub use ration_model::{ModelHandles, RationModel, RationModelBuilder};
pub use requirement::{NutrientBounds, NutrientRequirementTable, RequirementCalculator};
pub use solver::{RationSolver, SolvedAssignment};
