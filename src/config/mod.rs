// ==========================================
// SLA Hub 报表系统 - 配置层
// ==========================================
// 职责: 处理配置加载与校验
// 存储: JSON 文件 + 环境变量覆写
// ==========================================

pub mod pipeline_config;

// 重导出核心配置
pub use pipeline_config::{config_keys, ConfigError, ConfigResult, PipelineConfig};
