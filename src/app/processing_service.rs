// ==========================================
// SLA Hub 报表系统 - 处理服务
// ==========================================
// 职责: 输入校验 → 调用级工作区 → 流水线 → （可选）制品发布
// 红线: 每次调用使用独立工作区（运行 ID 命名），流水线只写工作区；
//       并发同名请求的输出、报告与发布制品互不串扰
// ==========================================

use crate::artifact::{publish_replacing, ArtifactError, ArtifactSink};
use crate::config::PipelineConfig;
use crate::domain::ProcessingReport;
use crate::engine::{PipelineError, PipelineResult, SlaPipeline};
use crate::exporter::atomic_write_bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// 输出文件名前缀
pub const OUTPUT_PREFIX: &str = "Processed_";
/// 缺省输出根目录名（位于系统临时目录下）
pub const DEFAULT_OUTPUT_DIR: &str = "sla-hub-processor";

// ==========================================
// ServiceError - 服务层错误
// ==========================================
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("缺少输入文件: {0}")]
    MissingInput(String),

    #[error("工作区读写失败: {0}")]
    WorkArea(#[from] std::io::Error),

    #[error("输出写入失败 (path: {path}): {message}")]
    OutputWrite { path: String, message: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("制品发布失败: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("未配置制品库，无法发布")]
    PublishUnavailable,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ==========================================
// ProcessRequest / ProcessOutcome
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub main_file: Option<PathBuf>,
    pub master_file: Option<PathBuf>,
    /// 输出路径（缺省: 临时目录下 sla-hub-processor/<运行 ID>/Processed_<主表名>.xlsx）
    pub output_path: Option<PathBuf>,
    pub publish: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub report: ProcessingReport,
    pub output_path: PathBuf,
    pub artifact_name: String,
    pub artifact_url: Option<String>,
}

// ==========================================
// ProcessingService
// ==========================================
pub struct ProcessingService {
    config: PipelineConfig,
    sink: Option<Arc<dyn ArtifactSink>>,
}

impl ProcessingService {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 处理一次请求
    ///
    /// 流水线输出先写入调用级工作区，发布与交付均以该文件为准；
    /// 交付到目标路径时原子替换
    ///
    /// # 返回
    /// - Ok(ProcessOutcome): 运行报告 + 输出路径 + 发布地址
    /// - Err(MissingInput): 主表或 Master 表缺失，流水线不执行
    /// - Err(Pipeline): 配置非法或流水线失败，目标路径保持原状
    #[instrument(skip(self, request), fields(publish = request.publish))]
    pub async fn process(&self, request: ProcessRequest) -> ServiceResult<ProcessOutcome> {
        let main_file = require_input(request.main_file.as_deref(), "main")?;
        let master_file = require_input(request.master_file.as_deref(), "master")?;

        if request.publish && self.sink.is_none() {
            return Err(ServiceError::PublishUnavailable);
        }

        let artifact_name = output_artifact_name(&main_file);
        let run_id = Uuid::new_v4().to_string();
        let output_path = match request.output_path {
            Some(path) => path,
            None => default_output_dir(&run_id).join(&artifact_name),
        };

        // === 调用级工作区: 复制输入、承接流水线输出，隔离并发请求 ===
        let work_area = tempfile::Builder::new()
            .prefix(&format!("sla-hub-{}-", run_id))
            .tempdir()?;
        let staged_main = stage_input(&main_file, work_area.path()).await?;
        let staged_master = stage_input(&master_file, work_area.path()).await?;
        let staged_output = work_area.path().join(&artifact_name);
        debug!(run_id = %run_id, work_area = %work_area.path().display(), "工作区已就绪");

        // === 流水线（同步计算，放到阻塞线程池） ===
        let config = self.config.clone();
        let pipeline_output = staged_output.clone();
        let pipeline_run_id = run_id.clone();
        let mut report = tokio::task::spawn_blocking(move || -> PipelineResult<ProcessingReport> {
            SlaPipeline::try_new(&config)?.run_with_id(
                &pipeline_run_id,
                &staged_main,
                &staged_master,
                &pipeline_output,
            )
        })
        .await
        .map_err(|e| anyhow::anyhow!("流水线任务异常终止: {}", e))??;

        // 报告中记录调用方可见的路径，而非工作区副本
        report.main_file = main_file.display().to_string();
        report.master_file = master_file.display().to_string();
        report.output_file = output_path.display().to_string();

        let artifact_url = match (&self.sink, request.publish) {
            (Some(sink), true) => {
                publish_replacing(sink.as_ref(), &artifact_name, &staged_output).await?
            }
            _ => None,
        };

        deliver_output(&staged_output, &output_path).await?;

        info!(
            run_id = %run_id,
            output = %output_path.display(),
            published = artifact_url.is_some(),
            "请求处理完成"
        );

        Ok(ProcessOutcome {
            report,
            output_path,
            artifact_name,
            artifact_url,
        })
    }
}

/// 输出制品名: Processed_<主表文件名>，扩展名统一为 .xlsx
pub fn output_artifact_name(main_file: &Path) -> String {
    let stem = main_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());
    format!("{}{}.xlsx", OUTPUT_PREFIX, stem)
}

/// 缺省输出目录: 系统临时目录下按运行 ID 划分
pub fn default_output_dir(run_id: &str) -> PathBuf {
    std::env::temp_dir().join(DEFAULT_OUTPUT_DIR).join(run_id)
}

fn require_input(path: Option<&Path>, role: &str) -> ServiceResult<PathBuf> {
    match path {
        Some(p) if p.is_file() => Ok(p.to_path_buf()),
        Some(p) => Err(ServiceError::MissingInput(format!("{}: {}", role, p.display()))),
        None => Err(ServiceError::MissingInput(role.to_string())),
    }
}

/// 复制输入到工作区（保留原文件名，解析器依赖扩展名）
async fn stage_input(source: &Path, work_area: &Path) -> ServiceResult<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| ServiceError::MissingInput(source.display().to_string()))?;
    let role_dir = work_area.join(Uuid::new_v4().simple().to_string());
    tokio::fs::create_dir_all(&role_dir).await?;
    let staged = role_dir.join(file_name);
    tokio::fs::copy(source, &staged).await?;
    Ok(staged)
}

/// 工作区结果 → 目标路径（同目录临时文件 + rename，失败时目标保持原状）
async fn deliver_output(staged: &Path, dest: &Path) -> ServiceResult<()> {
    let bytes = tokio::fs::read(staged).await?;
    let target = dest.to_path_buf();
    tokio::task::spawn_blocking(move || atomic_write_bytes(&target, &bytes))
        .await
        .map_err(|e| anyhow::anyhow!("输出交付任务异常终止: {}", e))?
        .map_err(|e| ServiceError::OutputWrite {
            path: dest.display().to_string(),
            message: e.to_string(),
        })
}
