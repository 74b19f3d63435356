// ==========================================
// SLA Hub 报表系统 - 制品库错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("制品库 I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("制品不存在: {0}")]
    NotFound(String),

    #[error("制品名称非法: {0}")]
    InvalidName(String),

    #[error("待上传文件不存在: {0}")]
    SourceMissing(String),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;
