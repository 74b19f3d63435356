// ==========================================
// SLA Hub 报表系统 - 制品库层
// ==========================================
// 职责: 处理结果的共享存储（列出 / 删除 / 上传 / 下载地址）
// 红线: 流水线本身无状态，共享存储只在本层出现
// ==========================================

pub mod error;
pub mod local_store;
pub mod publisher;
pub mod sink_trait;

pub use error::{ArtifactError, ArtifactResult};
pub use local_store::{LocalReleaseStore, DEFAULT_RELEASE_TAG};
pub use publisher::publish_replacing;
pub use sink_trait::{ArtifactInfo, ArtifactSink};
