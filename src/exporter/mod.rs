// ==========================================
// SLA Hub 报表系统 - 导出层
// ==========================================
// 职责: 富化表 + 汇总表 → 多工作表 xlsx
// 红线: 输出文件要么完整写出，要么保持原状
// ==========================================

pub mod atomic_file;
pub mod error;
pub mod report_exporter;

pub use atomic_file::atomic_write_bytes;
pub use error::{ExportError, ExportResult};
pub use report_exporter::{hub_sheet_code, HubPartition, ReportExporter, SLA_SHEET, SUMMARY_SHEET};
