// ==========================================
// SLA Hub 报表系统 - 处理配置
// ==========================================
// 职责: 业务默认值、分表前缀、制品库目录的加载与校验
// 存储: JSON 文件（可选），缺省时使用内置默认值
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ==========================================
// 配置键 / 环境变量
// ==========================================
pub mod config_keys {
    /// 配置文件路径环境变量
    pub const ENV_CONFIG_PATH: &str = "SLA_HUB_CONFIG";
    /// 制品库目录环境变量（优先级最高）
    pub const ENV_ARTIFACT_DIR: &str = "SLA_HUB_ARTIFACT_DIR";

    pub const REGION: &str = "region";
    pub const CARRIER_TYPE: &str = "carrier_type";
    pub const HUB_SHEET_PREFIX: &str = "hub_sheet_prefix";
}

/// 默认区域
pub const DEFAULT_REGION: &str = "NORTHLAKE01";
/// 默认承运类型
pub const DEFAULT_CARRIER_TYPE: &str = "A";
/// 默认 Hub 分表前缀
pub const DEFAULT_HUB_SHEET_PREFIX: &str = "HUB";

/// Excel 工作表名禁止字符
const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置读取失败 (path: {path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// PipelineConfig - 处理配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// 区域（默认值覆写阶段写入 RGN）
    pub region: String,
    /// 承运类型（默认值覆写阶段写入 CAR_TYP）
    pub carrier_type: String,
    /// Hub 分表名前缀
    pub hub_sheet_prefix: String,
    /// 本地制品库目录（未设置时使用用户数据目录）
    pub artifact_store_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            carrier_type: DEFAULT_CARRIER_TYPE.to_string(),
            hub_sheet_prefix: DEFAULT_HUB_SHEET_PREFIX.to_string(),
            artifact_store_dir: None,
        }
    }
}

impl PipelineConfig {
    /// 加载配置
    ///
    /// # 优先级
    /// 1. 显式传入的路径
    /// 2. 环境变量 SLA_HUB_CONFIG
    /// 3. 内置默认值
    ///
    /// 显式指定（参数或环境变量）的文件不存在时返回错误
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let env_path = std::env::var(config_keys::ENV_CONFIG_PATH)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let chosen = path.map(Path::to_path_buf).or(env_path);

        let config = match chosen {
            Some(p) => {
                let raw = std::fs::read_to_string(&p).map_err(|e| ConfigError::ReadError {
                    path: p.display().to_string(),
                    message: e.to_string(),
                })?;
                let config = Self::from_json_str(&raw)?;
                info!(path = %p.display(), "已加载配置文件");
                config
            }
            None => {
                debug!("未指定配置文件，使用默认配置");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文本解析（缺省字段取默认值，未知字段报错）
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: PipelineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::ValueError {
                key: config_keys::REGION.to_string(),
                value: self.region.clone(),
                message: "区域不能为空".to_string(),
            });
        }

        if self.carrier_type.trim().is_empty() {
            return Err(ConfigError::ValueError {
                key: config_keys::CARRIER_TYPE.to_string(),
                value: self.carrier_type.clone(),
                message: "承运类型不能为空".to_string(),
            });
        }

        let prefix = &self.hub_sheet_prefix;
        // 前缀 + 最长 i64 (20 位) 不得超过工作表名上限 31
        if prefix.is_empty()
            || prefix.chars().count() > 11
            || prefix.contains(SHEET_NAME_FORBIDDEN)
            || prefix.starts_with('\'')
        {
            return Err(ConfigError::ValueError {
                key: config_keys::HUB_SHEET_PREFIX.to_string(),
                value: prefix.clone(),
                message: "分表前缀须为 1-11 个字符且不含 []:*?/\\".to_string(),
            });
        }

        Ok(())
    }

    /// 解析制品库目录
    ///
    /// # 优先级
    /// 1. 环境变量 SLA_HUB_ARTIFACT_DIR
    /// 2. 配置项 artifact_store_dir
    /// 3. 用户数据目录/sla-hub-processor/artifacts
    /// 4. ./artifacts
    pub fn resolve_artifact_store_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var(config_keys::ENV_ARTIFACT_DIR) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        if let Some(dir) = &self.artifact_store_dir {
            return dir.clone();
        }

        match dirs::data_dir() {
            Some(data_dir) => data_dir.join("sla-hub-processor").join("artifacts"),
            None => PathBuf::from("./artifacts"),
        }
    }
}
