// ==========================================
// SLA Hub 报表系统 - 本地发布目录制品库
// ==========================================
// 布局: <root>/<release_tag>/<artifact name>
// 上传: 同目录 .part 临时文件 → rename（读者看不到半成品）
// 地址: file:// 绝对路径
// ==========================================

use crate::artifact::error::{ArtifactError, ArtifactResult};
use crate::artifact::sink_trait::{ArtifactInfo, ArtifactSink};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// 默认发布标签
pub const DEFAULT_RELEASE_TAG: &str = "v1.0";

/// 上传中临时文件后缀
const PART_SUFFIX: &str = ".part";

pub struct LocalReleaseStore {
    release_dir: PathBuf,
}

impl LocalReleaseStore {
    /// 使用默认发布标签
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_release_tag(root, DEFAULT_RELEASE_TAG)
    }

    pub fn with_release_tag(root: impl AsRef<Path>, release_tag: &str) -> Self {
        Self {
            release_dir: root.as_ref().join(release_tag),
        }
    }

    pub fn release_dir(&self) -> &Path {
        &self.release_dir
    }

    /// 制品名称校验（单层文件名，不允许路径穿越）
    fn artifact_path(&self, name: &str) -> ArtifactResult<PathBuf> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed != name
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.ends_with(PART_SUFFIX)
        {
            return Err(ArtifactError::InvalidName(name.to_string()));
        }
        Ok(self.release_dir.join(name))
    }

    /// 发布目录（不存在时创建）
    async fn ensure_release_dir(&self) -> ArtifactResult<()> {
        fs::create_dir_all(&self.release_dir).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactSink for LocalReleaseStore {
    async fn list_artifacts(&self) -> ArtifactResult<Vec<ArtifactInfo>> {
        let mut entries = match fs::read_dir(&self.release_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            // 隐藏文件为上传中的 .part
            if name.starts_with('.') {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // 并发删除
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            artifacts.push(ArtifactInfo {
                name,
                size_bytes: metadata.len(),
            });
        }

        artifacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(artifacts)
    }

    async fn delete_artifact(&self, name: &str) -> ArtifactResult<()> {
        let path = self.artifact_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(artifact = %name, "制品已删除");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_artifact(&self, name: &str, file: &Path) -> ArtifactResult<()> {
        let dest = self.artifact_path(name)?;
        if !fs::try_exists(file).await.unwrap_or(false) {
            return Err(ArtifactError::SourceMissing(file.display().to_string()));
        }

        self.ensure_release_dir().await?;

        let part = self
            .release_dir
            .join(format!(".{}.{}{}", name, Uuid::new_v4(), PART_SUFFIX));
        let bytes = match fs::copy(file, &part).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&part).await;
                return Err(e.into());
            }
        };
        if let Err(e) = fs::rename(&part, &dest).await {
            let _ = fs::remove_file(&part).await;
            return Err(e.into());
        }

        debug!(artifact = %name, bytes, "制品已上传");
        Ok(())
    }

    async fn artifact_url(&self, name: &str) -> ArtifactResult<Option<String>> {
        let path = self.artifact_path(name)?;
        match fs::canonicalize(&path).await {
            Ok(absolute) => Ok(Some(format!("file://{}", absolute.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
