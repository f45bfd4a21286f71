// ==========================================
// 奶牛日粮优化系统 - 日粮模型构建器
// ==========================================
// 职责: 将分组需求表 + 配料三表 + 政策表装配为线性规划模型
// 红线: 跨表引用缺失必须在求解前报 MissingIngredient,绝不静默补零
// ==========================================

use crate::config::RunConfig;
use crate::domain::ingredient::{CropLibrary, FeedPriceTable, InclusionLimitTable};
use crate::domain::types::{MethaneEquation, Nutrient, ObjectiveKind, TRACKED_NUTRIENTS};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::requirement::NutrientRequirementTable;
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use std::collections::BTreeMap;
use tracing::debug;

// ===== 甲烷方程常数 =====
// Ellis: CH4(MJ/d) = 4.41 + 0.0224*GE + 0.98*NDF,GE 由 ME 换算(Mcal → MJ 乘 4.184)
const ELLIS_INTERCEPT: f64 = 4.41;
const ELLIS_ME_COEF: f64 = 0.0224 * 4.184;
const ELLIS_NDF_COEF: f64 = 0.98;
// ME(Mcal/kg DM) 与 NEL 的线性换算
const ME_FROM_NEL_SLOPE: f64 = 1.818;
const ME_FROM_NEL_INTERCEPT: f64 = 0.2319;
// NASEM: CH4(MJ/d) = (0.294*DMI - 0.347*TFA% + 0.0409*DNDF%)*4.184
const NASEM_DMI_COEF: f64 = 0.294;
const NASEM_TFA_COEF: f64 = 0.347;
const NASEM_DNDF_COEF: f64 = 0.0409;
const MCAL_TO_MJ: f64 = 4.184;
// 甲烷能值 (MJ/kg CH4),能量口径 → 质量口径
const CH4_ENERGY_MJ_PER_KG: f64 = 55.65;

// ==========================================
// ModelHandles - 决策变量句柄
// ==========================================
// 求解后按句柄取值,feed 顺序与配料库导入顺序一致
#[derive(Debug, Clone)]
pub struct ModelHandles {
    pub feed: Vec<(String, Variable)>, // 全群鲜重进食量 (kg as-fed/d)
    pub dmi: Variable,                 // 每头牛干物质摄入 (kg DM/cow/d)
    pub nutrients: BTreeMap<Nutrient, Variable>, // 每头牛营养素绝对量
    pub me: Option<Variable>,          // 代谢能 (Mcal/cow/d),仅 Ellis 方程用
    pub tfa: Variable,                 // 总脂肪酸 (kg/cow/d)
    pub dndf: Variable,                // 可消化 NDF (kg/cow/d)
    pub methane: Variable,             // 肠道甲烷 (kg CH4/cow/d)
    pub cost: Variable,                // 饲料成本 ($/cow/d)
}

// ==========================================
// RationModel - 待求解的日粮模型
// ==========================================
pub struct RationModel {
    pub(crate) vars: ProblemVariables,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Expression,
    pub handles: ModelHandles,
    pub cohort_size: usize,
}

impl RationModel {
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

// ==========================================
// RationModelBuilder - 日粮模型构建器
// ==========================================
pub struct RationModelBuilder<'a> {
    library: &'a CropLibrary,
    prices: &'a FeedPriceTable,
    limits: &'a InclusionLimitTable,
    config: &'a RunConfig,
}

impl<'a> RationModelBuilder<'a> {
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

    /// 装配分组的线性规划模型
    ///
    /// # 规则
    /// - 进食变量为全群鲜重口径,营养恒等式除以牛数换算为每头牛口径
    /// - 需求上下界直接落在营养变量边界上
    /// - 粗饲料 DM 占比、进食上下限、轮作耦合依次装配
    /// - 甲烷按配置方程线性关联;NASEM 比值项用 DM 需求带中点线性化
    ///
    /// # 参数
    /// - cohort_size: 分组牛数,必须 > 0
    /// - requirements: 分组营养需求表(绝对量口径)
    pub fn build(
        &self,
        cohort_size: usize,
        requirements: &NutrientRequirementTable,
    ) -> EngineResult<RationModel> {
        self.validate_cross_references()?;
        if cohort_size == 0 {
            return Err(EngineError::InvalidInput("分组牛数为 0".to_string()));
        }

        let n = cohort_size as f64;
        let mut vars = ProblemVariables::new();
        let mut constraints: Vec<Constraint> = Vec::new();

        // ===== 进食变量 (全群鲜重) =====
        // 上下限表为每头牛口径,乘牛数换算;交叉引用校验保证每个配料都有上下限
        let mut feed = Vec::with_capacity(self.library.len());
        for ing in self.library.iter() {
            let (lo, hi) = self.limits.range_of(&ing.name).ok_or_else(|| {
                EngineError::MissingIngredient(format!("进食上下限表缺少配料 {}", ing.name))
            })?;
            let v = vars.add(
                variable()
                    .min(lo * n)
                    .max(hi * n)
                    .name(format!("feed_{}", sanitize(&ing.name))),
            );
            feed.push((ing.name.clone(), v));
        }

        // ===== 每头牛口径变量,需求上下界落在变量边界 =====
        let dm_bounds = requirements.dm_bounds();
        let dmi = vars.add(variable().min(dm_bounds.min).max(dm_bounds.max).name("dmi"));

        let mut nutrients = BTreeMap::new();
        for nutrient in TRACKED_NUTRIENTS {
            let b = requirements.bounds_of(nutrient).ok_or_else(|| {
                EngineError::InvalidConfiguration(format!("需求表缺少 {} 上下界", nutrient))
            })?;
            let v = vars.add(
                variable()
                    .min(b.min)
                    .max(b.max)
                    .name(format!("{}", nutrient).to_lowercase()),
            );
            nutrients.insert(nutrient, v);
        }

        let tfa = vars.add(variable().min(0.0).name("tfa"));
        let dndf = vars.add(variable().min(0.0).name("dndf"));
        let methane = vars.add(variable().min(0.0).name("methane"));
        let cost = vars.add(variable().min(0.0).name("cost"));

        // ===== 营养恒等式 =====
        // 每头牛营养量 = Σ 进食量 * DM 换算 * 营养系数 / 牛数
        let mut dm_expr = Expression::default();
        for ((_, v), ing) in feed.iter().zip(self.library.iter()) {
            dm_expr += *v * (ing.dm / n);
        }
        constraints.push(constraint!(dm_expr == dmi));

        for nutrient in TRACKED_NUTRIENTS {
            let mut expr = Expression::default();
            for ((_, v), ing) in feed.iter().zip(self.library.iter()) {
                expr += *v * (ing.dm * ing.nutrient_per_kg_dm(nutrient) / n);
            }
            constraints.push(constraint!(expr == nutrients[&nutrient]));
        }

        let mut tfa_expr = Expression::default();
        let mut dndf_expr = Expression::default();
        let mut cost_expr = Expression::default();
        for ((name, v), ing) in feed.iter().zip(self.library.iter()) {
            tfa_expr += *v * (ing.dm * ing.tfa / n);
            dndf_expr += *v * (ing.dm * ing.dndf / n);
            // 交叉引用校验保证价格存在
            let price = self.prices.price_of(name).ok_or_else(|| {
                EngineError::MissingIngredient(format!("价格表缺少配料 {}", name))
            })?;
            cost_expr += *v * (price / n);
        }
        constraints.push(constraint!(tfa_expr == tfa));
        constraints.push(constraint!(dndf_expr == dndf));
        constraints.push(constraint!(cost_expr == cost));

        // ===== 粗饲料 DM 占比 =====
        let fp = &self.config.forage_policy;
        let mut forage_dm = Expression::default();
        for ((_, v), ing) in feed.iter().zip(self.library.iter()) {
            if ing.role == crate::domain::types::IngredientRole::Forage {
                forage_dm += *v * (ing.dm / n);
            }
        }
        constraints.push(constraint!(forage_dm.clone() >= fp.min_dm_share * dmi));
        constraints.push(constraint!(forage_dm <= fp.max_dm_share * dmi));

        // ===== 轮作耦合 (全群鲜重口径) =====
        let lp = &self.config.land_use_policy;
        if lp.enabled {
            let primary = self.feed_var(&feed, &lp.primary)?;
            let secondary = self.feed_var(&feed, &lp.secondary)?;
            constraints.push(constraint!(primary >= secondary));
            constraints.push(constraint!(primary <= lp.max_ratio * secondary));
        }

        // ===== 甲烷方程 =====
        let me = match self.config.methane_equation {
            MethaneEquation::Ellis => {
                // ME 与 NEL 线性换算后代入 Ellis 能量口径方程
                let me = vars.add(variable().name("me"));
                let nel = nutrients[&Nutrient::Nel];
                constraints
                    .push(constraint!(me == ME_FROM_NEL_SLOPE * nel - ME_FROM_NEL_INTERCEPT));
                let ndf = nutrients[&Nutrient::Ndf];
                let mut ch4_mj = Expression::default();
                ch4_mj += ELLIS_INTERCEPT;
                ch4_mj += ELLIS_ME_COEF * me;
                ch4_mj += ELLIS_NDF_COEF * ndf;
                constraints.push(constraint!(CH4_ENERGY_MJ_PER_KG * methane == ch4_mj));
                Some(me)
            }
            MethaneEquation::Nasem => {
                // TFA%/DNDF% 含 1/DMI 比值项,用 DM 需求带中点作参考摄入量线性化
                let dm_ref = requirements.dm_reference();
                let pct = 100.0 / dm_ref;
                let mut ch4_mj = Expression::default();
                ch4_mj += NASEM_DMI_COEF * MCAL_TO_MJ * dmi;
                ch4_mj += -NASEM_TFA_COEF * pct * MCAL_TO_MJ * tfa;
                ch4_mj += NASEM_DNDF_COEF * pct * MCAL_TO_MJ * dndf;
                constraints.push(constraint!(CH4_ENERGY_MJ_PER_KG * methane == ch4_mj));
                None
            }
        };

        // ===== 优化目标 =====
        let objective: Expression = match self.config.objective {
            ObjectiveKind::Cost => cost.into(),
            ObjectiveKind::Methane => methane.into(),
            ObjectiveKind::Both => {
                let mut obj = Expression::from(cost);
                obj += self.config.methane_weight * methane;
                obj
            }
        };

        debug!(
            "日粮模型装配完成: 配料={} 约束={} 方程={} 目标={}",
            feed.len(),
            constraints.len(),
            self.config.methane_equation,
            self.config.objective
        );

        Ok(RationModel {
            vars,
            constraints,
            objective,
            handles: ModelHandles {
                feed,
                dmi,
                nutrients,
                me,
                tfa,
                dndf,
                methane,
                cost,
            },
            cohort_size,
        })
    }

    /// 跨表引用校验,任何缺失在装配变量前报错
    fn validate_cross_references(&self) -> EngineResult<()> {
        if self.library.is_empty() {
            return Err(EngineError::InvalidInput("配料库为空".to_string()));
        }
        for ing in self.library.iter() {
            if self.prices.price_of(&ing.name).is_none() {
                return Err(EngineError::MissingIngredient(format!(
                    "价格表缺少配料 {}",
                    ing.name
                )));
            }
            if self.limits.range_of(&ing.name).is_none() {
                return Err(EngineError::MissingIngredient(format!(
                    "进食上下限表缺少配料 {}",
                    ing.name
                )));
            }
        }
        if self.library.forages().is_empty() {
            return Err(EngineError::MissingIngredient(
                "配料库中无 forage 角色配料,粗饲料占比约束无法装配".to_string(),
            ));
        }
        let lp = &self.config.land_use_policy;
        if lp.enabled {
            for name in [&lp.primary, &lp.secondary] {
                if !self.library.contains(name) {
                    return Err(EngineError::MissingIngredient(format!(
                        "轮作耦合引用的配料 {} 不在配料库中",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    fn feed_var(&self, feed: &[(String, Variable)], name: &str) -> EngineResult<Variable> {
        feed.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                EngineError::MissingIngredient(format!("配料 {} 不在进食变量表中", name))
            })
    }
}

/// 变量命名只保留字母数字与下划线
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
