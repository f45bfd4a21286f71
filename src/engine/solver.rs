// ==========================================
// 奶牛日粮优化系统 - 线性规划求解器封装
// ==========================================
// 职责: 将装配好的日粮模型交给 LP 求解器,回收变量取值
// 红线: 不可行/无界/超时必须如实区分上报,绝不放宽约束重试
// ==========================================

use crate::domain::types::{Nutrient, SolveStatus};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ration_model::RationModel;
use good_lp::{microlp, ResolutionError, Solution, SolverModel};
use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

// ==========================================
// SolvedAssignment - 求解结果取值
// ==========================================
// feed 为全群鲜重口径,其余均为每头牛每日口径
#[derive(Debug, Clone)]
pub struct SolvedAssignment {
    pub feed: Vec<(String, f64)>, // 全群鲜重进食量 (kg as-fed/d)
    pub dmi: f64,
    pub nutrients: BTreeMap<Nutrient, f64>,
    pub me: Option<f64>,
    pub tfa: f64,
    pub dndf: f64,
    pub methane: f64, // kg CH4/cow/d
    pub cost: f64,    // $/cow/d
    pub objective_value: f64,
    pub cohort_size: usize,
}

// ==========================================
// RationSolver - 求解器封装
// ==========================================
pub struct RationSolver {
    timeout: Option<Duration>,
}

impl RationSolver {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// 求解日粮模型
    ///
    /// # 返回
    /// - Ok: 最优解取值
    /// - Err(SolverFailure): 状态区分 INFEASIBLE / UNBOUNDED / TIMEOUT / ERROR
    pub fn solve(&self, model: RationModel) -> EngineResult<SolvedAssignment> {
        match self.timeout {
            None => Self::solve_inner(model),
            Some(limit) => {
                // 求解在工作线程进行,超时后线程被放弃,结果不再回收
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    let _ = tx.send(Self::solve_inner(model));
                });
                match rx.recv_timeout(limit) {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("求解超时: 超过 {:?}", limit);
                        Err(EngineError::SolverFailure {
                            status: SolveStatus::Timeout,
                            message: format!("求解超过时限 {:?}", limit),
                        })
                    }
                }
            }
        }
    }

    fn solve_inner(model: RationModel) -> EngineResult<SolvedAssignment> {
        let RationModel {
            vars,
            constraints,
            objective,
            handles,
            cohort_size,
        } = model;

        let objective_expr = objective.clone();
        let mut problem = vars.minimise(objective).using(microlp);
        for c in constraints {
            problem = problem.with(c);
        }

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                return Err(EngineError::SolverFailure {
                    status: SolveStatus::Infeasible,
                    message: "约束不可行".to_string(),
                })
            }
            Err(ResolutionError::Unbounded) => {
                return Err(EngineError::SolverFailure {
                    status: SolveStatus::Unbounded,
                    message: "目标无界".to_string(),
                })
            }
            Err(e) => {
                return Err(EngineError::SolverFailure {
                    status: SolveStatus::Error,
                    message: e.to_string(),
                })
            }
        };

        let feed = handles
            .feed
            .iter()
            .map(|(name, v)| (name.clone(), solution.value(*v)))
            .collect();
        let nutrients = handles
            .nutrients
            .iter()
            .map(|(&n, &v)| (n, solution.value(v)))
            .collect();
        let assignment = SolvedAssignment {
            feed,
            dmi: solution.value(handles.dmi),
            nutrients,
            me: handles.me.map(|v| solution.value(v)),
            tfa: solution.value(handles.tfa),
            dndf: solution.value(handles.dndf),
            methane: solution.value(handles.methane),
            cost: solution.value(handles.cost),
            objective_value: objective_expr.eval_with(&solution),
            cohort_size,
        };

        debug!(
            "求解完成: 目标值={:.4} 成本={:.4} 甲烷={:.4}",
            assignment.objective_value, assignment.cost, assignment.methane
        );
        Ok(assignment)
    }
}
