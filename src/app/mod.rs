// ==========================================
// SLA Hub 报表系统 - 应用层
// ==========================================
// 职责: 对外服务入口，连接流水线与制品库
// ==========================================

pub mod processing_service;

// 重导出
pub use processing_service::{
    default_output_dir, output_artifact_name, ProcessOutcome, ProcessRequest, ProcessingService,
    ServiceError, ServiceResult, DEFAULT_OUTPUT_DIR, OUTPUT_PREFIX,
};
