// ==========================================
// 奶牛日粮优化系统 - 数据导入层
// ==========================================
// 职责: CSV/Excel 表文件 → 领域实体,列契约与单位归一
// 红线: 导入层只产出领域模型,不做任何优化逻辑
// ==========================================

pub mod crop_importer;
pub mod error;
pub mod file_parser;
pub mod herd_importer;

// 重导出核心类型
pub use crop_importer::CropImporter;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRecord, UniversalFileParser};
pub use herd_importer::HerdImporter;
