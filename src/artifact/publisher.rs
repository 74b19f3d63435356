// ==========================================
// SLA Hub 报表系统 - 制品发布
// ==========================================
// 规则: 每个名称只保留一个版本（先删同名，再上传）
// ==========================================

use crate::artifact::error::{ArtifactError, ArtifactResult};
use crate::artifact::sink_trait::ArtifactSink;
use std::path::Path;
use tracing::{info, warn};

/// 替换式发布
///
/// # 参数
/// - sink: 制品库
/// - name: 制品名称
/// - file: 待上传的本地文件
///
/// # 返回
/// - Ok(Some(url)): 发布后的下载地址
/// - Ok(None): 制品库不提供地址
pub async fn publish_replacing(
    sink: &dyn ArtifactSink,
    name: &str,
    file: &Path,
) -> ArtifactResult<Option<String>> {
    let existing = sink.list_artifacts().await?;
    for artifact in existing.iter().filter(|a| a.name == name) {
        match sink.delete_artifact(&artifact.name).await {
            Ok(()) => {}
            // 并发发布时可能已被删除
            Err(ArtifactError::NotFound(_)) => {
                warn!(artifact = %artifact.name, "同名制品已不存在，跳过删除");
            }
            Err(e) => return Err(e),
        }
    }

    sink.upload_artifact(name, file).await?;
    let url = sink.artifact_url(name).await?;

    info!(
        artifact = %name,
        replaced = existing.iter().any(|a| a.name == name),
        url = url.as_deref().unwrap_or(""),
        "制品已发布"
    );
    Ok(url)
}
