// ==========================================
// 奶牛日粮优化系统 - 配置层
// ==========================================
// 职责: 运行参数与可注入政策表
// 存储: JSON 配置文件(可选),缺省值内置
// ==========================================

pub mod run_config;

// 重导出核心配置类型
pub use run_config::{
    ForagePolicy, LandUsePolicy, NutrientPolicy, RunConfig, DEFAULT_NEL_REQ_PERCENTILE,
};
