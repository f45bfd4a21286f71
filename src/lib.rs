// ==========================================
// 奶牛日粮优化系统 - 核心库
// ==========================================
// 技术栈: Rust + good_lp (microlp 后端)
// 系统定位: 决策支持系统 (营养师最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 需求/分组/建模/求解/提取
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行参数与政策表
pub mod config;

// 导出层 - 结果 CSV
pub mod export;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    GroupCriterion, IngredientRole, MethaneEquation, Nutrient, ObjectiveKind, SolveStatus,
};

// 领域实体
pub use domain::{Cohort, CohortStats, Cow, CropLibrary, FeedPriceTable, InclusionLimitTable, Ingredient};

// 引擎
pub use engine::{
    CohortOutcome, CohortReport, EngineError, EngineResult, HerdPartitioner, RationModelBuilder,
    RationOrchestrator, RationPlanReport, RationSolver, RequirementCalculator, ResultExtractor,
};

// 配置
pub use config::{ForagePolicy, LandUsePolicy, NutrientPolicy, RunConfig};

// 导入与导出
pub use export::CsvExporter;
pub use importer::{CropImporter, HerdImporter, ImportError, ImportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "奶牛日粮优化系统";

// ==========================================
// 预编译检查
// ==========================================
