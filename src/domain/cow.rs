// ==========================================
// 奶牛日粮优化系统 - 牛群领域模型
// ==========================================
// 职责: 牛只输入记录与分组实体
// 红线: Cow 为不可变输入记录,只读取与排序,绝不就地修改
// ==========================================

use crate::domain::types::GroupCriterion;
use serde::{Deserialize, Serialize};

// ==========================================
// Cow - 牛只输入记录
// ==========================================
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cow {
    pub cow_id: String,           // 牛只唯一标识
    pub dim: f64,                 // 泌乳天数 (days in milk)
    pub milk_yield: f64,          // 产奶量 (kg/d)
    pub dmi: f64,                 // 干物质摄入量 (kg DM/d,观测或估计)
    pub nel: f64,                 // 泌乳净能 (Mcal/kg DM,观测或估计)
    pub body_weight: Option<f64>, // 体重 (kg,可缺失)
}

impl Cow {
    /// 取分组依据对应的排序键
    pub fn criterion_value(&self, criterion: GroupCriterion) -> f64 {
        match criterion {
            GroupCriterion::Dim => self.dim,
            GroupCriterion::Nel => self.nel,
            GroupCriterion::Milk => self.milk_yield,
        }
    }
}

// ==========================================
// Cohort - 营养分组
// ==========================================
// 由 HerdPartitioner 产出的有序连续切片,不可为空,不再合并
#[derive(Debug, Clone)]
pub struct Cohort {
    pub index: usize,   // 分组序号(从 0 开始,按排序依据升序)
    pub cows: Vec<Cow>, // 成员列表
}

impl Cohort {
    pub fn size(&self) -> usize {
        self.cows.len()
    }

    /// 分组描述性统计(求解前记录,便于追溯需求表来源)
    ///
    /// # 参数
    /// - nel_req_percentile: 能量需求取用的 NEL 分位(0-100)
    pub fn stats(&self, nel_req_percentile: f64) -> CohortStats {
        let dmi: Vec<f64> = self.cows.iter().map(|c| c.dmi).collect();
        let nel: Vec<f64> = self.cows.iter().map(|c| c.nel).collect();
        let milk: Vec<f64> = self.cows.iter().map(|c| c.milk_yield).collect();

        CohortStats {
            count: self.cows.len(),
            dmi_mean: mean(&dmi),
            dmi_std: std_dev(&dmi),
            nel_mean: mean(&nel),
            nel_std: std_dev(&nel),
            milk_mean: mean(&milk),
            nel_req: percentile(&nel, nel_req_percentile),
        }
    }
}

// ==========================================
// CohortStats - 分组描述性统计
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct CohortStats {
    pub count: usize,   // 分组牛只数
    pub dmi_mean: f64,  // DMI 均值 → 需求表 DM 基线
    pub dmi_std: f64,   // DMI 标准差
    pub nel_mean: f64,  // NEL 均值
    pub nel_std: f64,   // NEL 标准差
    pub milk_mean: f64, // 产奶量均值
    pub nel_req: f64,   // NEL 需求分位值 → 需求表 NEL 基线
}

// ==========================================
// 统计工具函数
// ==========================================

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 样本标准差(n-1 口径);单元素序列返回 0
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// 线性插值分位数
///
/// # 规则
/// - 排序后 rank = p/100 * (n-1),在相邻两点间线性插值
/// - p 截断到 [0, 100]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let p = p.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
