// ==========================================
// 奶牛日粮优化系统 - 结果导出层
// ==========================================
// 职责: 分组报表 → CSV 文件
// ==========================================

pub mod csv_writer;

// 重导出核心类型
pub use csv_writer::{CsvExporter, ExportError, ExportResult};
