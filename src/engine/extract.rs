// ==========================================
// 奶牛日粮优化系统 - 结果提取器
// ==========================================
// 职责: 将求解取值换算为报表口径(每头牛、百分比、克)
// 红线: 换算只在此处发生一次,求解器口径绝不泄漏到报表
// ==========================================

use crate::domain::types::Nutrient;
use crate::engine::solver::SolvedAssignment;

// 报表数值统一保留 4 位小数
const REPORT_DECIMALS: i32 = 4;
// 每头牛鲜重进食量不超过此阈值视为数值噪声,配料表不收该行
const FEED_TRACE_THRESHOLD: f64 = 0.01;

// ==========================================
// SummaryTable - 分组结果汇总表
// ==========================================
// 行序固定,标签即报表列名,不做本地化
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub rows: Vec<(String, f64)>,
}

// ==========================================
// IngredientTable - 分组配料进食表
// ==========================================
// 每头牛每日鲜重口径,按进食量降序
#[derive(Debug, Clone)]
pub struct IngredientTable {
    pub rows: Vec<(String, f64)>,
}

// ==========================================
// CohortSolution - 分组提取结果
// ==========================================
#[derive(Debug, Clone)]
pub struct CohortSolution {
    pub summary: SummaryTable,
    pub ingredients: IngredientTable,
}

// ==========================================
// ResultExtractor - 结果提取器(纯函数)
// ==========================================
pub struct ResultExtractor;

impl ResultExtractor {
    /// 提取分组报表
    ///
    /// # 规则
    /// - 进食量除以牛数换算为每头牛口径,不超过 0.01 kg 的配料整行剔除,按进食量降序
    /// - 甲烷 kg → g (乘 1000)
    /// - dm (%) = DMI / 每头牛鲜重总进食量 * 100
    /// - NEL 报能量密度 (Mcal/kg DM),其余营养素报占 DM 百分比
    /// - DMI 为 0 时比值类指标置 NaN,不伪造为 0
    /// - 所有数值保留 4 位小数
    pub fn extract(assignment: &SolvedAssignment) -> CohortSolution {
        let n = assignment.cohort_size as f64;

        let mut ingredient_rows = Vec::with_capacity(assignment.feed.len());
        let mut as_fed_per_cow_total = 0.0;
        for (name, herd_amount) in &assignment.feed {
            let per_cow = herd_amount / n;
            // dm (%) 的分母取剔除前的鲜重总量
            as_fed_per_cow_total += per_cow;
            if per_cow > FEED_TRACE_THRESHOLD {
                ingredient_rows.push((name.clone(), round_to(per_cow, REPORT_DECIMALS)));
            }
        }
        // 进食量降序,占比最高的配料排最前
        ingredient_rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let dmi = assignment.dmi;
        // 比值类指标在 DMI 为 0 时无定义
        let per_dm = |value: f64| -> f64 {
            if dmi > 0.0 {
                value / dmi
            } else {
                f64::NAN
            }
        };
        let dm_pct = if as_fed_per_cow_total > 0.0 {
            dmi / as_fed_per_cow_total * 100.0
        } else {
            f64::NAN
        };

        let nutrient = |n: Nutrient| assignment.nutrients.get(&n).copied().unwrap_or(f64::NAN);

        let mut rows = vec![
            ("$/cow/d".to_string(), assignment.cost),
            ("methane (g/cow/d)".to_string(), assignment.methane * 1000.0),
            ("dmi (kg DM/cow/d)".to_string(), dmi),
            ("dm (%)".to_string(), dm_pct),
            ("NEL (Mcal/kg DM)".to_string(), per_dm(nutrient(Nutrient::Nel))),
            ("CP (% of DM)".to_string(), per_dm(nutrient(Nutrient::Cp)) * 100.0),
            ("NDF (% of DM)".to_string(), per_dm(nutrient(Nutrient::Ndf)) * 100.0),
            (
                "STARCH (% of DM)".to_string(),
                per_dm(nutrient(Nutrient::Starch)) * 100.0,
            ),
            ("FAT (% of DM)".to_string(), per_dm(nutrient(Nutrient::Fat)) * 100.0),
            ("TFA (% of DM)".to_string(), per_dm(assignment.tfa) * 100.0),
            ("DNDF (% of DM)".to_string(), per_dm(assignment.dndf) * 100.0),
        ];
        for (_, value) in rows.iter_mut() {
            *value = round_to(*value, REPORT_DECIMALS);
        }

        CohortSolution {
            summary: SummaryTable { rows },
            ingredients: IngredientTable {
                rows: ingredient_rows,
            },
        }
    }
}

/// 四舍五入到指定小数位,NaN 原样保留
fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
