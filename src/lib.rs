// ==========================================
// SLA Hub 报表系统 - 核心库
// ==========================================
// 流程: 主表 + Master 表 → 富化 → 多工作表 xlsx
// 系统定位: 批处理工具（无跨调用状态，共享存储只在制品库层）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格 / 记录 / 汇总 / 报告
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 富化规则与合并
pub mod engine;

// 导出层 - xlsx 报表
pub mod exporter;

// 配置层 - 处理配置
pub mod config;

// 制品库层 - 结果共享存储
pub mod artifact;

// 应用层 - 处理服务
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, MappingStatus, ProcessingReport, RawTable, SlaField, SlaRecord, SlaTable,
    SummaryRow,
};

// 流水线
pub use engine::{process_workbooks, PipelineError, PipelineResult, SlaPipeline};

// 服务与制品库
pub use app::{ProcessRequest, ProcessingService, ServiceError};
pub use artifact::{publish_replacing, ArtifactSink, LocalReleaseStore};
pub use config::PipelineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SLA Hub 报表系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
