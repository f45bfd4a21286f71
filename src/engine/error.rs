// ==========================================
// 奶牛日粮优化系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 错误立即上抛,引擎内部不重试不兜底
// ==========================================

use crate::domain::types::SolveStatus;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入错误 =====
    // 非正基线、越界容差、空牛群、非法分组数/分组依据等
    #[error("输入无效: {0}")]
    InvalidInput(String),

    // ===== 跨表引用错误 =====
    // 约束引用的配料(粗饲料、轮作耦合、进食上下限)在某张表中缺失
    #[error("配料缺失: {0}")]
    MissingIngredient(String),

    // ===== 配置错误 =====
    #[error("配置无效: {0}")]
    InvalidConfiguration(String),

    // ===== 求解失败 =====
    // 不可行/无界/超时/求解器内部错误,状态必须区分
    #[error("求解失败 ({status}): {message}")]
    SolverFailure {
        status: SolveStatus,
        message: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// 求解失败时的状态(非求解失败返回 None)
    pub fn solve_status(&self) -> Option<SolveStatus> {
        match self {
            EngineError::SolverFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
