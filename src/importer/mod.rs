// ==========================================
// SLA Hub 报表系统 - 导入层
// ==========================================
// 职责: 外部表格读取,生成原始表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod source_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use source_trait::SpreadsheetSource;
