// ==========================================
// SLA Hub 报表系统 - 运行报告模型
// ==========================================
// 用途: 各阶段统计 + 单次处理的结果汇总
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ResolutionStats - Hub/邮编解析统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub mapped: usize,                     // 状态 OK
    pub unmapped: usize,                   // 状态 UNMAPPED
    pub hub_filled_from_directory: usize,  // Hub 代码由目录补全
    pub zip_overridden: usize,             // 始发邮编由目录覆盖
    pub unmapped_city_names: Vec<String>,  // 未映射的城市名称（去重，首次出现顺序）
}

// ==========================================
// MergeStats - Master 合并统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub summary_rows: usize,              // 去重后的投影行数
    pub master_rows: usize,               // Master 原始行数
    pub master_duplicates_dropped: usize, // 按键去重丢弃的 Master 行
    pub matched: usize,
    pub unmatched: usize,
}

// ==========================================
// ProcessingReport - 单次处理结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub run_id: String,
    pub main_file: String,
    pub master_file: String,
    pub output_file: String,
    pub total_records: usize,
    pub resolution: ResolutionStats,
    pub merge: MergeStats,
    pub sheet_names: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
}

impl ProcessingReport {
    /// Hub 分表名称（不含 SLA / Summary）
    pub fn hub_sheet_names(&self) -> Vec<&str> {
        self.sheet_names
            .iter()
            .map(String::as_str)
            .filter(|n| *n != crate::exporter::SLA_SHEET && *n != crate::exporter::SUMMARY_SHEET)
            .collect()
    }
}
