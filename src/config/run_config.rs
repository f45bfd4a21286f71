// ==========================================
// 奶牛日粮优化系统 - 运行配置
// ==========================================
// 职责: 运行参数、可注入营养政策表的加载与校验
// 存储: JSON 配置文件(可选),字段均有缺省值
// ==========================================

use crate::domain::types::{GroupCriterion, MethaneEquation, ObjectiveKind, Nutrient};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 能量需求取用的 NEL 分位缺省值(牛群 NEL 分布的第 83 百分位)
pub const DEFAULT_NEL_REQ_PERCENTILE: f64 = 83.0;

// ==========================================
// NutrientPolicy - 营养素占干物质比例政策表
// ==========================================
// 固定比例区间是领域政策(区域饲养标准),按配置注入而非硬编码,
// 便于替换不同地区的饲养标准
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientPolicy {
    pub cp_range: (f64, f64),     // 粗蛋白占 DM 比例区间
    pub ndf_range: (f64, f64),    // NDF 占 DM 比例区间
    pub starch_range: (f64, f64), // 淀粉占 DM 比例区间
    pub fat_range: (f64, f64),    // 粗脂肪占 DM 比例区间
}

impl Default for NutrientPolicy {
    fn default() -> Self {
        Self {
            cp_range: (0.15, 0.20),
            ndf_range: (0.25, 0.33),
            starch_range: (0.22, 0.30),
            fat_range: (0.00, 0.07),
        }
    }
}

impl NutrientPolicy {
    /// 取营养素的占 DM 比例区间(DM/NEL 不由政策表约束,返回 None)
    pub fn range_of(&self, nutrient: Nutrient) -> Option<(f64, f64)> {
        match nutrient {
            Nutrient::Cp => Some(self.cp_range),
            Nutrient::Ndf => Some(self.ndf_range),
            Nutrient::Starch => Some(self.starch_range),
            Nutrient::Fat => Some(self.fat_range),
            Nutrient::Dm | Nutrient::Nel => None,
        }
    }

    fn validate(&self) -> EngineResult<()> {
        for (label, (lo, hi)) in [
            ("cp_range", self.cp_range),
            ("ndf_range", self.ndf_range),
            ("starch_range", self.starch_range),
            ("fat_range", self.fat_range),
        ] {
            if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || hi > 1.0 || lo > hi {
                return Err(EngineError::InvalidConfiguration(format!(
                    "营养政策区间 {} 非法: ({}, {}),要求 0 <= min <= max <= 1",
                    label, lo, hi
                )));
            }
        }
        Ok(())
    }
}

// ==========================================
// ForagePolicy - 粗饲料干物质占比政策
// ==========================================
// 下限保证结构性纤维,上限避免纯粗饲料不可行日粮
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForagePolicy {
    pub min_dm_share: f64, // 粗饲料 DM 占总 DMI 下限
    pub max_dm_share: f64, // 粗饲料 DM 占总 DMI 上限
}

impl Default for ForagePolicy {
    fn default() -> Self {
        Self {
            min_dm_share: 0.40,
            max_dm_share: 0.60,
        }
    }
}

// ==========================================
// LandUsePolicy - 轮作耦合政策
// ==========================================
// 两种青贮作物的农艺轮作约束: primary >= secondary 且 primary <= max_ratio * secondary
// 这是土地政策而非营养规则,可整体关闭
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandUsePolicy {
    pub enabled: bool,
    pub primary: String,   // 主作物配料名
    pub secondary: String, // 副作物配料名
    pub max_ratio: f64,    // primary / secondary 鲜重上限倍数
}

impl Default for LandUsePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            primary: "Corn silage".to_string(),
            secondary: "Legume silage, mid maturity".to_string(),
            max_ratio: 2.0,
        }
    }
}

// ==========================================
// RunConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    // ===== 分组 =====
    pub group_count: usize,        // 营养分组数 (1/2/3)
    pub criterion: GroupCriterion, // 分组依据

    // ===== 需求容差 =====
    pub dm_vary: f64,  // DM 需求容差 (比例, [0,1))
    pub nel_vary: f64, // NEL 需求容差 (比例, [0,1))

    // ===== 优化目标 =====
    pub methane_equation: MethaneEquation, // 甲烷预测方程
    pub objective: ObjectiveKind,          // 优化目标
    pub methane_weight: f64,               // objective=both 时的甲烷权重

    // ===== 政策表 =====
    pub nel_req_percentile: f64, // NEL 需求分位 (0-100)
    pub nutrient_policy: NutrientPolicy,
    pub forage_policy: ForagePolicy,
    pub land_use_policy: LandUsePolicy,

    // ===== 求解器 =====
    pub solver_timeout_secs: Option<u64>, // 求解超时(秒),None 为不限时
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            group_count: 1,
            criterion: GroupCriterion::Milk,
            dm_vary: 0.01,
            nel_vary: 0.01,
            methane_equation: MethaneEquation::Nasem,
            objective: ObjectiveKind::Cost,
            methane_weight: 1.0,
            nel_req_percentile: DEFAULT_NEL_REQ_PERCENTILE,
            nutrient_policy: NutrientPolicy::default(),
            forage_policy: ForagePolicy::default(),
            land_use_policy: LandUsePolicy::default(),
            solver_timeout_secs: None,
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载配置(未出现的字段取缺省值)
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::InvalidConfiguration(format!(
                "配置文件读取失败 {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: RunConfig = serde_json::from_str(&raw)
            .map_err(|e| EngineError::InvalidConfiguration(format!("配置文件解析失败: {}", e)))?;
        Ok(config)
    }

    /// 校验配置
    ///
    /// # 规则
    /// - group_count ∈ {1,2,3}
    /// - dm_vary / nel_vary ∈ [0,1)
    /// - methane_weight 有限且 >= 0
    /// - nel_req_percentile ∈ [0,100]
    /// - 粗饲料占比区间 0 < min <= max <= 1
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=3).contains(&self.group_count) {
            return Err(EngineError::InvalidInput(format!(
                "分组数必须为 1/2/3,实际 {}",
                self.group_count
            )));
        }
        for (label, v) in [("dm_vary", self.dm_vary), ("nel_vary", self.nel_vary)] {
            if !v.is_finite() || !(0.0..1.0).contains(&v) {
                return Err(EngineError::InvalidInput(format!(
                    "容差 {} 必须在 [0,1) 内,实际 {}",
                    label, v
                )));
            }
        }
        if !self.methane_weight.is_finite() || self.methane_weight < 0.0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "甲烷权重必须为有限非负数,实际 {}",
                self.methane_weight
            )));
        }
        if !self.nel_req_percentile.is_finite()
            || !(0.0..=100.0).contains(&self.nel_req_percentile)
        {
            return Err(EngineError::InvalidConfiguration(format!(
                "NEL 需求分位必须在 [0,100] 内,实际 {}",
                self.nel_req_percentile
            )));
        }
        let fp = &self.forage_policy;
        if !(fp.min_dm_share.is_finite() && fp.max_dm_share.is_finite())
            || fp.min_dm_share <= 0.0
            || fp.max_dm_share > 1.0
            || fp.min_dm_share > fp.max_dm_share
        {
            return Err(EngineError::InvalidConfiguration(format!(
                "粗饲料占比区间非法: ({}, {}),要求 0 < min <= max <= 1",
                fp.min_dm_share, fp.max_dm_share
            )));
        }
        let lp = &self.land_use_policy;
        if lp.enabled && (!lp.max_ratio.is_finite() || lp.max_ratio < 1.0) {
            return Err(EngineError::InvalidConfiguration(format!(
                "轮作耦合倍数必须 >= 1,实际 {}",
                lp.max_ratio
            )));
        }
        self.nutrient_policy.validate()?;
        Ok(())
    }
}
