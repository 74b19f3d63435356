// ==========================================
// SLA Hub 报表系统 - 引擎层
// ==========================================
// 职责: 主表富化规则与汇总合并，不做文件读写
// 红线: 每个阶段只负责一种变换（补缺与覆写分属不同阶段）
// ==========================================

pub mod attribute_defaulter;
pub mod directory;
pub mod master_merger;
pub mod orchestrator;
pub mod resolver;
pub mod schema_normalizer;

// 重导出核心引擎
pub use attribute_defaulter::AttributeDefaulter;
pub use directory::{FacilityDirectory, PostalDirectory};
pub use master_merger::MasterMerger;
pub use orchestrator::{process_workbooks, PipelineError, PipelineResult, SlaPipeline};
pub use resolver::Resolver;
pub use schema_normalizer::SchemaNormalizer;
