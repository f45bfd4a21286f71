// ==========================================
// 集成测试共享夹具
// ==========================================
// 手工核验过可行的四配料饲养场景与六头牛牛群
// ==========================================

use dairy_ration_opt::domain::types::IngredientRole;
use dairy_ration_opt::domain::{
    Cow, CropLibrary, FeedPriceTable, InclusionLimitTable, Ingredient,
};
use std::collections::HashMap;

pub fn sample_library() -> CropLibrary {
    CropLibrary::new(vec![
        Ingredient {
            name: "Corn silage".to_string(),
            role: IngredientRole::Forage,
            dm: 0.35,
            nel: 1.45,
            cp: 0.088,
            ndf: 0.45,
            starch: 0.20,
            fat: 0.032,
            tfa: 0.025,
            dndf: 0.28,
        },
        Ingredient {
            name: "Legume silage, mid maturity".to_string(),
            role: IngredientRole::Forage,
            dm: 0.42,
            nel: 1.27,
            cp: 0.20,
            ndf: 0.42,
            starch: 0.025,
            fat: 0.028,
            tfa: 0.020,
            dndf: 0.21,
        },
        Ingredient {
            name: "Corn grain".to_string(),
            role: IngredientRole::Concentrate,
            dm: 0.88,
            nel: 2.01,
            cp: 0.094,
            ndf: 0.095,
            starch: 0.72,
            fat: 0.042,
            tfa: 0.035,
            dndf: 0.04,
        },
        Ingredient {
            name: "Soybean meal".to_string(),
            role: IngredientRole::Concentrate,
            dm: 0.90,
            nel: 1.93,
            cp: 0.53,
            ndf: 0.097,
            starch: 0.02,
            fat: 0.016,
            tfa: 0.012,
            dndf: 0.05,
        },
    ])
}

pub fn sample_prices() -> FeedPriceTable {
    FeedPriceTable::new(HashMap::from([
        ("Corn silage".to_string(), 0.06),
        ("Legume silage, mid maturity".to_string(), 0.08),
        ("Corn grain".to_string(), 0.18),
        ("Soybean meal".to_string(), 0.40),
    ]))
}

pub fn sample_limits() -> InclusionLimitTable {
    InclusionLimitTable::new(HashMap::from([
        ("Corn silage".to_string(), (0.0, 40.0)),
        ("Legume silage, mid maturity".to_string(), (0.0, 40.0)),
        ("Corn grain".to_string(), (0.0, 15.0)),
        ("Soybean meal".to_string(), (0.0, 8.0)),
    ]))
}

/// 每头牛进食上限压到 1 kg 鲜重,任何 DMI 需求带都不可行
pub fn infeasible_limits() -> InclusionLimitTable {
    InclusionLimitTable::new(
        sample_library()
            .iter()
            .map(|ing| (ing.name.clone(), (0.0, 1.0)))
            .collect(),
    )
}

fn cow(id: &str, dim: f64, milk: f64, dmi: f64, nel: f64) -> Cow {
    Cow {
        cow_id: id.to_string(),
        dim,
        milk_yield: milk,
        dmi,
        nel,
        body_weight: None,
    }
}

pub fn sample_herd() -> Vec<Cow> {
    vec![
        cow("C001", 220.0, 30.0, 24.0, 1.50),
        cow("C002", 200.0, 32.0, 24.5, 1.55),
        cow("C003", 160.0, 34.0, 25.0, 1.58),
        cow("C004", 120.0, 36.0, 25.0, 1.60),
        cow("C005", 90.0, 38.0, 25.5, 1.62),
        cow("C006", 60.0, 40.0, 26.0, 1.65),
    ]
}
