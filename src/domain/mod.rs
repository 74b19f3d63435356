// ==========================================
// SLA Hub 报表系统 - 领域模型层
// ==========================================
// 职责: 定义单元格值、SLA 记录、汇总行、运行报告
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod record;
pub mod report;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use record::{RawTable, SlaField, SlaRecord, SlaTable, MAPPING_STATUS_COLUMN};
pub use report::{MergeStats, ProcessingReport, ResolutionStats};
pub use summary::{MasterField, SummaryRow};
pub use types::{CellKey, CellValue, MappingStatus};
