// ==========================================
// 奶牛日粮优化系统 - 配料三表导入器
// ==========================================
// 职责: 配料营养库 / 价格表 / 进食上下限表的列映射与单位归一
// 口径: 源表营养列为百分比,载入时统一除以 100(NEL 为能量密度除外)
// ==========================================

use crate::domain::ingredient::{CropLibrary, FeedPriceTable, InclusionLimitTable, Ingredient};
use crate::domain::types::IngredientRole;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

// ===== 配料营养库列契约(源表列名 → 内部字段) =====
const COLUMN_INGREDIENT: &str = "Ingredient";
const COLUMN_DM: &str = "DM, % as fed";
const COLUMN_NEL: &str = "NEL (Mcal/kg)";
const COLUMN_CP: &str = "CP, % DM";
const COLUMN_NDF: &str = "NDF, % DM";
const COLUMN_STARCH: &str = "Starch, % DM";
const COLUMN_FAT: &str = "Crude fat, % DM";
const COLUMN_TFA: &str = "TFAs, % DM";
const COLUMN_DNDF: &str = "DNDF, %DM";
const COLUMN_ROLE: &str = "Role";

// ===== 价格表与上下限表列契约 =====
const COLUMN_PRICE: &str = "price ($/kg)";
const COLUMN_MIN: &str = "min";
const COLUMN_MAX: &str = "max";

// ==========================================
// CropImporter - 配料三表导入器
// ==========================================
pub struct CropImporter;

impl CropImporter {
    /// 从 CSV/Excel 文件导入配料营养库
    pub fn import_library<P: AsRef<Path>>(path: P) -> ImportResult<CropLibrary> {
        let records = UniversalFileParser.parse(path.as_ref())?;
        let library = Self::map_library(&records)?;
        info!(
            "配料营养库导入完成: {} 种配料,其中粗饲料 {} 种",
            library.len(),
            library.forages().len()
        );
        Ok(library)
    }

    /// 从 CSV/Excel 文件导入饲料价格表
    pub fn import_prices<P: AsRef<Path>>(path: P) -> ImportResult<FeedPriceTable> {
        let records = UniversalFileParser.parse(path.as_ref())?;
        let prices = Self::map_prices(&records)?;
        info!("饲料价格表导入完成: {} 条", prices.len());
        Ok(prices)
    }

    /// 从 CSV/Excel 文件导入进食上下限表
    pub fn import_limits<P: AsRef<Path>>(path: P) -> ImportResult<InclusionLimitTable> {
        let records = UniversalFileParser.parse(path.as_ref())?;
        let limits = Self::map_limits(&records)?;
        info!("进食上下限表导入完成: {} 条", limits.len());
        Ok(limits)
    }

    /// 原始记录 → 配料营养库
    ///
    /// # 规则
    /// - 营养列按百分比读入,除以 100 归一为比例;NEL 为 Mcal/kg DM,原样读入
    /// - Role 列: 空白 → concentrate;非空未知值 → 行级错误
    /// - 配料名重复 → DuplicateIngredient
    pub fn map_library(records: &[RawRecord]) -> ImportResult<CropLibrary> {
        const TABLE: &str = "crop_library";
        if records.is_empty() {
            return Err(ImportError::EmptyTable(TABLE.to_string()));
        }
        for column in [
            COLUMN_INGREDIENT,
            COLUMN_DM,
            COLUMN_NEL,
            COLUMN_CP,
            COLUMN_NDF,
            COLUMN_STARCH,
            COLUMN_FAT,
            COLUMN_TFA,
            COLUMN_DNDF,
        ] {
            if !records[0].contains_key(column) {
                return Err(ImportError::MissingColumn {
                    table: TABLE.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut ingredients = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            let name = required_name(record, row, COLUMN_INGREDIENT)?;
            if !seen.insert(name.clone()) {
                return Err(ImportError::DuplicateIngredient { row, name });
            }

            let role_raw = field(record, COLUMN_ROLE);
            let role = IngredientRole::parse(role_raw).ok_or_else(|| {
                ImportError::FieldMappingError {
                    row,
                    message: format!("Role 列值不识别: {:?}", role_raw),
                }
            })?;

            ingredients.push(Ingredient {
                name,
                role,
                dm: parse_percent(record, row, COLUMN_DM)?,
                nel: parse_non_negative(record, row, COLUMN_NEL)?,
                cp: parse_percent(record, row, COLUMN_CP)?,
                ndf: parse_percent(record, row, COLUMN_NDF)?,
                starch: parse_percent(record, row, COLUMN_STARCH)?,
                fat: parse_percent(record, row, COLUMN_FAT)?,
                tfa: parse_percent(record, row, COLUMN_TFA)?,
                dndf: parse_percent(record, row, COLUMN_DNDF)?,
            });
        }
        Ok(CropLibrary::new(ingredients))
    }

    /// 原始记录 → 饲料价格表 ($/kg 鲜重)
    pub fn map_prices(records: &[RawRecord]) -> ImportResult<FeedPriceTable> {
        const TABLE: &str = "feed_price";
        if records.is_empty() {
            return Err(ImportError::EmptyTable(TABLE.to_string()));
        }
        for column in [COLUMN_INGREDIENT, COLUMN_PRICE] {
            if !records[0].contains_key(column) {
                return Err(ImportError::MissingColumn {
                    table: TABLE.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let mut prices = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            let name = required_name(record, row, COLUMN_INGREDIENT)?;
            let price = parse_non_negative(record, row, COLUMN_PRICE)?;
            if prices.insert(name.clone(), price).is_some() {
                return Err(ImportError::DuplicateIngredient { row, name });
            }
        }
        Ok(FeedPriceTable::new(prices))
    }

    /// 原始记录 → 进食上下限表 (kg 鲜重/cow/d)
    pub fn map_limits(records: &[RawRecord]) -> ImportResult<InclusionLimitTable> {
        const TABLE: &str = "crop_min_max";
        if records.is_empty() {
            return Err(ImportError::EmptyTable(TABLE.to_string()));
        }
        for column in [COLUMN_INGREDIENT, COLUMN_MIN, COLUMN_MAX] {
            if !records[0].contains_key(column) {
                return Err(ImportError::MissingColumn {
                    table: TABLE.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let mut limits = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            let name = required_name(record, row, COLUMN_INGREDIENT)?;
            let min = parse_non_negative(record, row, COLUMN_MIN)?;
            let max = parse_non_negative(record, row, COLUMN_MAX)?;
            if min > max {
                return Err(ImportError::FieldMappingError {
                    row,
                    message: format!("进食范围倒置: min {} > max {}", min, max),
                });
            }
            if limits.insert(name.clone(), (min, max)).is_some() {
                return Err(ImportError::DuplicateIngredient { row, name });
            }
        }
        Ok(InclusionLimitTable::new(limits))
    }
}

fn field<'a>(record: &'a RawRecord, column: &str) -> &'a str {
    record.get(column).map(|v| v.as_str()).unwrap_or("")
}

fn required_name(record: &RawRecord, row: usize, column: &str) -> ImportResult<String> {
    let name = field(record, column);
    if name.is_empty() {
        return Err(ImportError::FieldMappingError {
            row,
            message: format!("{} 为空", column),
        });
    }
    Ok(name.to_string())
}

fn parse_non_negative(record: &RawRecord, row: usize, column: &str) -> ImportResult<f64> {
    let raw = field(record, column);
    let value: f64 = raw
        .parse()
        .map_err(|_| ImportError::TypeConversionError {
            row,
            field: column.to_string(),
            message: format!("无法解析为数值: {:?}", raw),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ImportError::ValueRangeError {
            row,
            field: column.to_string(),
            value,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    Ok(value)
}

/// 百分比列: 解析后除以 100 归一为比例,要求落在 [0, 100]
fn parse_percent(record: &RawRecord, row: usize, column: &str) -> ImportResult<f64> {
    let value = parse_non_negative(record, row, column)?;
    if value > 100.0 {
        return Err(ImportError::ValueRangeError {
            row,
            field: column.to_string(),
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(value / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn library_record(name: &str, role: &str) -> RawRecord {
        [
            (COLUMN_INGREDIENT, name),
            (COLUMN_DM, "35.0"),
            (COLUMN_NEL, "1.45"),
            (COLUMN_CP, "8.8"),
            (COLUMN_NDF, "45.0"),
            (COLUMN_STARCH, "20.0"),
            (COLUMN_FAT, "3.2"),
            (COLUMN_TFA, "2.5"),
            (COLUMN_DNDF, "28.0"),
            (COLUMN_ROLE, role),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    // ==========================================
    // 配料营养库
    // ==========================================

    #[test]
    fn test_library_percent_to_fraction() {
        let library =
            CropImporter::map_library(&[library_record("Corn silage", "forage")]).unwrap();
        let ing = library.get("Corn silage").unwrap();
        // 百分比列除以 100,NEL 原样
        assert_relative_eq!(ing.dm, 0.35, epsilon = 1e-12);
        assert_relative_eq!(ing.cp, 0.088, epsilon = 1e-12);
        assert_relative_eq!(ing.nel, 1.45, epsilon = 1e-12);
        assert_eq!(ing.role, IngredientRole::Forage);
    }

    #[test]
    fn test_library_empty_role_defaults_to_concentrate() {
        let library = CropImporter::map_library(&[library_record("Corn grain", "")]).unwrap();
        assert_eq!(
            library.get("Corn grain").unwrap().role,
            IngredientRole::Concentrate
        );
    }

    #[test]
    fn test_library_unknown_role_rejected() {
        let err = CropImporter::map_library(&[library_record("Corn grain", "hay?")]).unwrap_err();
        assert!(matches!(err, ImportError::FieldMappingError { row: 1, .. }));
    }

    #[test]
    fn test_library_duplicate_name_rejected() {
        let err = CropImporter::map_library(&[
            library_record("Corn silage", "forage"),
            library_record("Corn silage", "forage"),
        ])
        .unwrap_err();
        assert!(matches!(err, ImportError::DuplicateIngredient { row: 2, .. }));
    }

    #[test]
    fn test_library_missing_column_rejected() {
        let mut r = library_record("Corn silage", "forage");
        r.remove(COLUMN_NDF);
        let err = CropImporter::map_library(&[r]).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumn { ref column, .. } if column == COLUMN_NDF
        ));
    }

    #[test]
    fn test_library_percent_above_100_rejected() {
        let mut r = library_record("Corn silage", "forage");
        r.insert(COLUMN_NDF.to_string(), "120".to_string());
        let err = CropImporter::map_library(&[r]).unwrap_err();
        assert!(matches!(err, ImportError::ValueRangeError { row: 1, .. }));
    }

    // ==========================================
    // 价格表与上下限表
    // ==========================================

    fn price_record(name: &str, price: &str) -> RawRecord {
        [(COLUMN_INGREDIENT, name), (COLUMN_PRICE, price)]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn limit_record(name: &str, min: &str, max: &str) -> RawRecord {
        [
            (COLUMN_INGREDIENT, name),
            (COLUMN_MIN, min),
            (COLUMN_MAX, max),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_prices_mapped() {
        let prices = CropImporter::map_prices(&[
            price_record("Corn silage", "0.06"),
            price_record("Soybean meal", "0.40"),
        ])
        .unwrap();
        assert_eq!(prices.price_of("Corn silage"), Some(0.06));
        assert_eq!(prices.price_of("Oats"), None);
    }

    #[test]
    fn test_price_negative_rejected() {
        let err = CropImporter::map_prices(&[price_record("Corn silage", "-0.1")]).unwrap_err();
        assert!(matches!(err, ImportError::ValueRangeError { row: 1, .. }));
    }

    #[test]
    fn test_limits_mapped() {
        let limits =
            CropImporter::map_limits(&[limit_record("Corn silage", "0", "40")]).unwrap();
        assert_eq!(limits.range_of("Corn silage"), Some((0.0, 40.0)));
    }

    #[test]
    fn test_limits_inverted_range_rejected() {
        let err = CropImporter::map_limits(&[limit_record("Corn silage", "10", "5")]).unwrap_err();
        assert!(matches!(err, ImportError::FieldMappingError { row: 1, .. }));
    }

    #[test]
    fn test_empty_tables_rejected() {
        assert!(matches!(
            CropImporter::map_library(&[]),
            Err(ImportError::EmptyTable(_))
        ));
        assert!(matches!(
            CropImporter::map_prices(&[]),
            Err(ImportError::EmptyTable(_))
        ));
        assert!(matches!(
            CropImporter::map_limits(&[]),
            Err(ImportError::EmptyTable(_))
        ));
    }
}
