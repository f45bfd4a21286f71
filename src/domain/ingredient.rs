// ==========================================
// 奶牛日粮优化系统 - 配料领域模型
// ==========================================
// 职责: 配料营养库、价格表、进食上下限表
// 红线: 配料名必须跨表一致,缺失交叉引用是配置错误而非静默默认
// ==========================================

use crate::domain::types::{IngredientRole, Nutrient};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Ingredient - 配料营养记录
// ==========================================
// DM 为鲜样干物质占比(0-1,鲜重 → 干物质换算系数)
// NEL 为每 kg DM 的能量密度,其余营养素均为干物质占比(0-1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,         // 配料名(跨表主键)
    pub role: IngredientRole, // 角色(forage/concentrate)
    pub dm: f64,              // 干物质占鲜重比例 (0-1)
    pub nel: f64,             // 泌乳净能 (Mcal/kg DM)
    pub cp: f64,              // 粗蛋白占 DM 比例 (0-1)
    pub ndf: f64,             // 中性洗涤纤维占 DM 比例 (0-1)
    pub starch: f64,          // 淀粉占 DM 比例 (0-1)
    pub fat: f64,             // 粗脂肪占 DM 比例 (0-1)
    pub tfa: f64,             // 总脂肪酸占 DM 比例 (0-1)
    pub dndf: f64,            // 可消化 NDF 占 DM 比例 (0-1)
}

impl Ingredient {
    /// 取营养素在每 kg DM 中的含量系数
    ///
    /// # 说明
    /// - NEL 返回能量密度 (Mcal/kg DM),其余返回质量占比 (0-1)
    /// - DM 不在此口径内(由 dm 字段单独承担鲜重换算)
    pub fn nutrient_per_kg_dm(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Dm => 1.0,
            Nutrient::Nel => self.nel,
            Nutrient::Cp => self.cp,
            Nutrient::Ndf => self.ndf,
            Nutrient::Starch => self.starch,
            Nutrient::Fat => self.fat,
        }
    }
}

// ==========================================
// CropLibrary - 配料营养库
// ==========================================
// 保持导入顺序(决策变量与输出表按此顺序),按名索引
#[derive(Debug, Clone, Default)]
pub struct CropLibrary {
    ingredients: Vec<Ingredient>,
    name_index: HashMap<String, usize>,
}

impl CropLibrary {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        let name_index = ingredients
            .iter()
            .enumerate()
            .map(|(i, ing)| (ing.name.clone(), i))
            .collect();
        Self {
            ingredients,
            name_index,
        }
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.name_index.get(name).map(|&i| &self.ingredients[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    /// 角色为 forage 的配料(粗饲料占比约束的成员集)
    pub fn forages(&self) -> Vec<&Ingredient> {
        self.ingredients
            .iter()
            .filter(|ing| ing.role == IngredientRole::Forage)
            .collect()
    }
}

// ==========================================
// FeedPriceTable - 饲料价格表
// ==========================================
// 价格按鲜重计 ($/kg as-fed)
#[derive(Debug, Clone, Default)]
pub struct FeedPriceTable {
    prices: HashMap<String, f64>,
}

impl FeedPriceTable {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }

    pub fn price_of(&self, name: &str) -> Option<f64> {
        self.prices.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ==========================================
// InclusionLimitTable - 进食上下限表
// ==========================================
// 每头牛每日鲜重进食范围 (kg as-fed/cow/d)
#[derive(Debug, Clone, Default)]
pub struct InclusionLimitTable {
    limits: HashMap<String, (f64, f64)>,
}

impl InclusionLimitTable {
    pub fn new(limits: HashMap<String, (f64, f64)>) -> Self {
        Self { limits }
    }

    /// 取配料的 (min, max) 进食范围
    pub fn range_of(&self, name: &str) -> Option<(f64, f64)> {
        self.limits.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}
