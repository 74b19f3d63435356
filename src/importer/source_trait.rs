// ==========================================
// SLA Hub 报表系统 - 表格数据源 Trait
// ==========================================
// 职责: 定义原始表读取接口（不包含实现）
// ==========================================

use crate::domain::RawTable;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// SpreadsheetSource Trait
// ==========================================
// 用途: 将文件读取为带表头的原始表
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait SpreadsheetSource: Send + Sync {
    /// 读取文件为原始表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 数据行（已跳过全空行）
    /// - Err: 文件不存在、格式不支持、解析失败
    fn read_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}
