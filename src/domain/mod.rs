// ==========================================
// 奶牛日粮优化系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与统计工具
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod cow;
pub mod ingredient;
pub mod types;

// 重导出核心类型
pub use cow::{percentile, Cohort, CohortStats, Cow};
pub use ingredient::{CropLibrary, FeedPriceTable, InclusionLimitTable, Ingredient};
pub use types::{
    GroupCriterion, IngredientRole, MethaneEquation, Nutrient, ObjectiveKind, SolveStatus,
    TRACKED_NUTRIENTS,
};
