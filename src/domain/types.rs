// ==========================================
// SLA Hub 报表系统 - 领域类型定义
// ==========================================
// 职责: 单元格值 / 映射状态 等基础类型
// 红线: 空值必须显式表达（Missing / Blank），禁止用 NaN 充当哨兵
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单元格值 (Cell Value)
// ==========================================
// Missing: 缺失/未知（源列不存在、空单元格、无法解析）
// Blank:   显式空标记（布尔标志位 false 归一化结果）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Missing,
    Blank,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// 文本值（仅 Text 变体）
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 整数值：Int，或小数部分为 0 的有限 Float
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => float_to_integral(*f),
            _ => None,
        }
    }

    /// 数值强制转换（不可转换 → Missing）
    ///
    /// # 规则
    /// - Int 保持
    /// - 整数值 Float → Int；其他有限 Float 保持；NaN/Inf → Missing
    /// - Text 去空白后按整数/浮点解析，失败 → Missing
    /// - Bool → 1 / 0
    /// - Missing / Blank → Missing
    pub fn to_numeric(&self) -> CellValue {
        match self {
            CellValue::Int(i) => CellValue::Int(*i),
            CellValue::Float(f) => numeric_from_float(*f),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    CellValue::Int(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    numeric_from_float(f)
                } else {
                    CellValue::Missing
                }
            }
            CellValue::Bool(b) => CellValue::Int(i64::from(*b)),
            CellValue::Missing | CellValue::Blank => CellValue::Missing,
        }
    }

    /// 归一化连接键：值的字符串形式去空白
    ///
    /// # 返回
    /// - None: Missing（不参与任何匹配）
    /// - Some(String): 整数值不带小数部分（380.0 → "380"）
    pub fn key_string(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            CellValue::Blank => Some(String::new()),
            CellValue::Bool(true) => Some("True".to_string()),
            CellValue::Bool(false) => Some("False".to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(match float_to_integral(*f) {
                Some(i) => i.to_string(),
                None => f.to_string(),
            }),
            CellValue::Text(s) => Some(s.trim().to_string()),
        }
    }

    /// 去重用的可哈希键（NaN 之间视为相等，整数值 Float 与 Int 视为相等）
    pub fn dedup_key(&self) -> CellKey {
        match self {
            CellValue::Missing => CellKey::Missing,
            CellValue::Blank => CellKey::Blank,
            CellValue::Bool(b) => CellKey::Bool(*b),
            CellValue::Int(i) => CellKey::Int(*i),
            CellValue::Float(f) => match float_to_integral(*f) {
                Some(i) => CellKey::Int(i),
                None if f.is_nan() => CellKey::Missing,
                None => CellKey::Float(f.to_bits()),
            },
            CellValue::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing | CellValue::Blank => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

fn float_to_integral(value: f64) -> Option<i64> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

fn numeric_from_float(value: f64) -> CellValue {
    if !value.is_finite() {
        return CellValue::Missing;
    }
    match float_to_integral(value) {
        Some(i) => CellValue::Int(i),
        None => CellValue::Float(value),
    }
}

// ==========================================
// 单元格去重键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Missing,
    Blank,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

// ==========================================
// Hub 映射状态 (Mapping Status)
// ==========================================
// 红线: 未映射记录保留在表中，通过状态列显式报告
// 序列化格式: SCREAMING_SNAKE_CASE (与报表一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    Ok,       // Hub 代码已确定（源数据提供或目录解析）
    Unmapped, // Hub 代码缺失
}

impl MappingStatus {
    /// 根据最终 Hub 代码判定状态
    pub fn from_hub_code(hub_cd: &CellValue) -> Self {
        if hub_cd.is_missing() {
            MappingStatus::Unmapped
        } else {
            MappingStatus::Ok
        }
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingStatus::Ok => write!(f, "OK"),
            MappingStatus::Unmapped => write!(f, "UNMAPPED"),
        }
    }
}
