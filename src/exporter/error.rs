// ==========================================
// SLA Hub 报表系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("工作簿生成失败: {0}")]
    WorkbookError(String),

    #[error("工作表超出行/列上限 (sheet: {sheet}): {message}")]
    SheetLimitExceeded { sheet: String, message: String },

    #[error("输出文件写入失败 (path: {path}): {message}")]
    OutputWriteError { path: String, message: String },
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::WorkbookError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
