// ==========================================
// 奶牛日粮优化系统 - 领域类型定义
// ==========================================
// 职责: 定义全系统共享的封闭枚举
// 红线: 配置枚举必须是封闭集合,不允许默认分支吞掉未知值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 营养素 (Nutrient)
// ==========================================
// DM 为干物质摄入口径,其余均按绝对量口径(kg 或 Mcal / cow / d)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Nutrient {
    Dm,     // 干物质 (kg DM/cow/d)
    Nel,    // 泌乳净能 (Mcal/cow/d)
    Cp,     // 粗蛋白 (kg/cow/d)
    Ndf,    // 中性洗涤纤维 (kg/cow/d)
    Starch, // 淀粉 (kg/cow/d)
    Fat,    // 粗脂肪 (kg/cow/d)
}

/// 参与需求上下界约束的营养素(不含 DM,DM 由摄入量恒等式单独约束)
pub const TRACKED_NUTRIENTS: [Nutrient; 5] = [
    Nutrient::Nel,
    Nutrient::Cp,
    Nutrient::Ndf,
    Nutrient::Starch,
    Nutrient::Fat,
];

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nutrient::Dm => write!(f, "DM"),
            Nutrient::Nel => write!(f, "NEL"),
            Nutrient::Cp => write!(f, "CP"),
            Nutrient::Ndf => write!(f, "NDF"),
            Nutrient::Starch => write!(f, "STARCH"),
            Nutrient::Fat => write!(f, "FAT"),
        }
    }
}

// ==========================================
// 分组依据 (Group Criterion)
// ==========================================
// 用于将牛群按生理指标升序排序后切分为营养同质分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupCriterion {
    Dim,  // 泌乳天数 (days in milk)
    Nel,  // 泌乳净能
    Milk, // 产奶量
}

impl GroupCriterion {
    /// 从字符串解析分组依据(大小写不敏感)
    ///
    /// # 返回
    /// - None: 不识别的依据,由调用方转为 InvalidInput
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dim" => Some(GroupCriterion::Dim),
            "nel" => Some(GroupCriterion::Nel),
            "milk" => Some(GroupCriterion::Milk),
            _ => None,
        }
    }
}

impl fmt::Display for GroupCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupCriterion::Dim => write!(f, "dim"),
            GroupCriterion::Nel => write!(f, "nel"),
            GroupCriterion::Milk => write!(f, "milk"),
        }
    }
}

// ==========================================
// 甲烷预测方程 (Methane Equation)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethaneEquation {
    Ellis, // Ellis 方程 (MJ/d 口径,基于 ME 与 NDF)
    Nasem, // NASEM 方程 (Mcal/d 口径,基于 DMI/TFA/DNDF)
}

impl MethaneEquation {
    /// 从字符串解析甲烷方程(大小写不敏感)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ellis" => Some(MethaneEquation::Ellis),
            "nasem" => Some(MethaneEquation::Nasem),
            _ => None,
        }
    }
}

impl fmt::Display for MethaneEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethaneEquation::Ellis => write!(f, "Ellis"),
            MethaneEquation::Nasem => write!(f, "NASEM"),
        }
    }
}

// ==========================================
// 优化目标 (Objective Kind)
// ==========================================
// both 为加权和: cost + methane_weight * methane
// 注意单位不可通约($ 与 kg CH4),权重是政策旋钮而非物理常数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    Cost,    // 最小化饲料成本
    Methane, // 最小化肠道甲烷
    Both,    // 加权和
}

impl ObjectiveKind {
    /// 从字符串解析优化目标(大小写不敏感)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cost" => Some(ObjectiveKind::Cost),
            "methane" => Some(ObjectiveKind::Methane),
            "both" => Some(ObjectiveKind::Both),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveKind::Cost => write!(f, "cost"),
            ObjectiveKind::Methane => write!(f, "methane"),
            ObjectiveKind::Both => write!(f, "both"),
        }
    }
}

// ==========================================
// 配料角色 (Ingredient Role)
// ==========================================
// 粗饲料占比约束与轮作耦合约束按角色解析,不依赖具体配料名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRole {
    Forage,      // 粗饲料(青贮类)
    Concentrate, // 精饲料
}

impl IngredientRole {
    /// 从配料库 Role 列解析角色
    ///
    /// # 规则
    /// - 空白 → Concentrate(缺省角色)
    /// - "forage" / "concentrate" 大小写不敏感
    /// - 其余非空值 → None,由导入层报行级错误(静默默认会掩盖配置错误)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "concentrate" => Some(IngredientRole::Concentrate),
            "forage" => Some(IngredientRole::Forage),
            _ => None,
        }
    }
}

impl fmt::Display for IngredientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientRole::Forage => write!(f, "forage"),
            IngredientRole::Concentrate => write!(f, "concentrate"),
        }
    }
}

// ==========================================
// 求解状态 (Solve Status)
// ==========================================
// 外部 LP 求解器的结果状态;Timeout 与 Infeasible 必须区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,    // 最优解
    Infeasible, // 约束不可行
    Unbounded,  // 目标无界
    Timeout,    // 求解超时
    Error,      // 求解器内部错误
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Unbounded => write!(f, "UNBOUNDED"),
            SolveStatus::Timeout => write!(f, "TIMEOUT"),
            SolveStatus::Error => write!(f, "ERROR"),
        }
    }
}
