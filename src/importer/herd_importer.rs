// ==========================================
// 奶牛日粮优化系统 - 牛群表导入器
// ==========================================
// 列契约: ID / DIM / MILK / DMI / NEL,可选 BW
// 红线: 缺列与行级转换错误立即上报,绝不静默跳行
// ==========================================

use crate::domain::cow::Cow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::path::Path;
use tracing::info;

const TABLE_NAME: &str = "herd";
const REQUIRED_COLUMNS: [&str; 5] = ["ID", "DIM", "MILK", "DMI", "NEL"];
const COLUMN_BW: &str = "BW";

// ==========================================
// HerdImporter - 牛群表导入器
// ==========================================
pub struct HerdImporter;

impl HerdImporter {
    /// 从 CSV/Excel 文件导入牛群表
    pub fn import<P: AsRef<Path>>(path: P) -> ImportResult<Vec<Cow>> {
        let records = UniversalFileParser.parse(path.as_ref())?;
        let cows = Self::map_records(&records)?;
        info!("牛群表导入完成: {} 头", cows.len());
        Ok(cows)
    }

    /// 原始记录 → 牛只实体
    ///
    /// # 规则
    /// - 必需列缺失 → MissingColumn(以第一行为准,各行列集一致)
    /// - ID 为空 → FieldMappingError
    /// - 数值列不可解析 → TypeConversionError,负值 → ValueRangeError
    /// - BW 列可整体缺失,出现则逐行解析
    pub fn map_records(records: &[RawRecord]) -> ImportResult<Vec<Cow>> {
        if records.is_empty() {
            return Err(ImportError::EmptyTable(TABLE_NAME.to_string()));
        }
        for column in REQUIRED_COLUMNS {
            if !records[0].contains_key(column) {
                return Err(ImportError::MissingColumn {
                    table: TABLE_NAME.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let mut cows = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1; // 数据行号从 1 起
            let cow_id = field(record, "ID");
            if cow_id.is_empty() {
                return Err(ImportError::FieldMappingError {
                    row,
                    message: "ID 为空".to_string(),
                });
            }

            let cow = Cow {
                cow_id: cow_id.to_string(),
                dim: parse_non_negative(record, row, "DIM")?,
                milk_yield: parse_non_negative(record, row, "MILK")?,
                dmi: parse_non_negative(record, row, "DMI")?,
                nel: parse_non_negative(record, row, "NEL")?,
                body_weight: match field(record, COLUMN_BW) {
                    "" => None,
                    _ => Some(parse_non_negative(record, row, COLUMN_BW)?),
                },
            };
            cows.push(cow);
        }
        Ok(cows)
    }
}

fn field<'a>(record: &'a RawRecord, column: &str) -> &'a str {
    record.get(column).map(|v| v.as_str()).unwrap_or("")
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
