// ==========================================
// SLA Hub 报表系统 - 制品库 Trait
// ==========================================
// 职责: 定义共享制品库的最小接口（不包含实现）
// 约束: 制品按名称寻址；同名制品的唯一性由 publish_replacing 保证
// ==========================================

use crate::artifact::error::ArtifactResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 制品元信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub name: String,
    pub size_bytes: u64,
}

// ==========================================
// ArtifactSink Trait
// ==========================================
// 实现者: LocalReleaseStore
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// 列出全部制品（按名称排序）
    async fn list_artifacts(&self) -> ArtifactResult<Vec<ArtifactInfo>>;

    /// 删除制品
    ///
    /// # 返回
    /// - Err(NotFound): 制品不存在
    async fn delete_artifact(&self, name: &str) -> ArtifactResult<()>;

    /// 上传本地文件为制品
    ///
    /// # 参数
    /// - name: 制品名称
    /// - file: 本地文件路径
    async fn upload_artifact(&self, name: &str, file: &Path) -> ArtifactResult<()>;

    /// 制品下载地址（不存在时为 None）
    async fn artifact_url(&self, name: &str) -> ArtifactResult<Option<String>>;
}
