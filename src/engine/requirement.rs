// ==========================================
// 奶牛日粮优化系统 - 营养需求计算器
// ==========================================
// 职责: 由分组基线统计推导每头牛每日营养需求上下界表
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::config::NutrientPolicy;
use crate::domain::types::Nutrient;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::BTreeMap;

// ==========================================
// NutrientBounds - 单营养素上下界
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientBounds {
    pub min: f64,
    pub max: f64,
}

// ==========================================
// NutrientRequirementTable - 营养需求表
// ==========================================
// 口径: 每头牛每日绝对量(kg 或 Mcal),不是百分比
// 不变式: 每行 min <= max; DM 下界严格为正
// 每个分组独立推导,分组间不共享
#[derive(Debug, Clone)]
pub struct NutrientRequirementTable {
    bounds: BTreeMap<Nutrient, NutrientBounds>,
}

impl NutrientRequirementTable {
    pub fn bounds_of(&self, nutrient: Nutrient) -> Option<NutrientBounds> {
        self.bounds.get(&nutrient).copied()
    }

    /// DM 摄入量上下界(表不变式保证存在且下界为正)
    pub fn dm_bounds(&self) -> NutrientBounds {
        self.bounds[&Nutrient::Dm]
    }

    /// DM 需求带中点,NASEM 比值项线性化的参考摄入量
    pub fn dm_reference(&self) -> f64 {
        let dm = self.dm_bounds();
        (dm.min + dm.max) / 2.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, NutrientBounds)> + '_ {
        self.bounds.iter().map(|(&n, &b)| (n, b))
    }
}

// ==========================================
// RequirementCalculator - 需求计算器(纯函数)
// ==========================================
pub struct RequirementCalculator;

impl RequirementCalculator {
    /// 构造分组营养需求表
    ///
    /// # 规则
    /// - DM:  [DM_baseline*(1-DM_vary), DM_baseline*(1+DM_vary)]
    /// - NEL: [DM_baseline*NEL_baseline*(1-NEL_vary), DM_baseline*NEL_baseline*(1+NEL_vary)]
    ///   (绝对 Mcal/d 口径,非每 kg DM)
    /// - CP/NDF/STARCH/FAT: 政策表比例区间 * DM_baseline
    ///
    /// # 参数
    /// - dm_baseline: 干物质摄入基线 (kg DM/cow/d),必须有限且为正
    /// - nel_baseline: 泌乳净能基线 (Mcal/kg DM),必须有限且为正
    /// - dm_vary / nel_vary: 容差比例,必须在 [0,1)
    /// - policy: 营养素占 DM 比例政策表
    pub fn compute(
        dm_baseline: f64,
        nel_baseline: f64,
        dm_vary: f64,
        nel_vary: f64,
        policy: &NutrientPolicy,
    ) -> EngineResult<NutrientRequirementTable> {
        for (label, v) in [("DM_baseline", dm_baseline), ("NEL_baseline", nel_baseline)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "基线 {} 必须为有限正数,实际 {}",
                    label, v
                )));
            }
        }
        for (label, v) in [("DM_vary", dm_vary), ("NEL_vary", nel_vary)] {
            if !v.is_finite() || !(0.0..1.0).contains(&v) {
                return Err(EngineError::InvalidInput(format!(
                    "容差 {} 必须在 [0,1) 内,实际 {}",
                    label, v
                )));
            }
        }

        let mut bounds = BTreeMap::new();
        bounds.insert(
            Nutrient::Dm,
            NutrientBounds {
                min: dm_baseline * (1.0 - dm_vary),
                max: dm_baseline * (1.0 + dm_vary),
            },
        );

        let nel_abs = dm_baseline * nel_baseline;
        bounds.insert(
            Nutrient::Nel,
            NutrientBounds {
                min: nel_abs * (1.0 - nel_vary),
                max: nel_abs * (1.0 + nel_vary),
            },
        );

        for nutrient in [Nutrient::Cp, Nutrient::Ndf, Nutrient::Starch, Nutrient::Fat] {
            // range_of 对这四种营养素必然有值
            let (lo, hi) = policy.range_of(nutrient).ok_or_else(|| {
                EngineError::InvalidConfiguration(format!("营养政策表缺少 {} 区间", nutrient))
            })?;
            bounds.insert(
                nutrient,
                NutrientBounds {
                    min: dm_baseline * lo,
                    max: dm_baseline * hi,
                },
            );
        }

        Ok(NutrientRequirementTable { bounds })
    }
}
