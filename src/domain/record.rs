// ==========================================
// SLA Hub 报表系统 - SLA 记录领域模型
// ==========================================
// 职责: 原始表 / 标准字段 / SLA 记录 / 富化表
// 红线: 归一化后每条记录必须包含全部标准字段（缺失用 Missing 表达）
// ==========================================

use crate::domain::types::{CellValue, MappingStatus};

/// 映射状态列名
pub const MAPPING_STATUS_COLUMN: &str = "HUB_MAPPING_STATUS";

// ==========================================
// RawTable - 原始表（Spreadsheet Source 输出）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 按列名查找列下标（首个匹配）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 读取单元格（行长度不足时视为 Missing）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static MISSING: CellValue = CellValue::Missing;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&MISSING)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// SlaField - 标准字段（按标准顺序）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlaField {
    ScacCd,         // 承运商代码
    LocNbr,         // 站点编号
    DestZipCd,      // 目的邮编
    OrigZipCd,      // 始发邮编
    LineHaulDays,   // 干线天数
    HubToCustDays,  // Hub 到客户天数
    TotDays,        // 总天数
    HubCityNm,      // Hub 城市/运营名称
    HubCd,          // Hub 代码
    IsActive,       // 启用标记
    SatPromise,     // 周六承诺
    SunPromise,     // 周日承诺
    SatOvnMove,     // 周六隔夜转运
    SunOvnMove,     // 周日隔夜转运
    Rgn,            // 区域
    CarTyp,         // 承运类型
    EdgeCalendarId, // 日历标识（不透明）
}

impl SlaField {
    pub const COUNT: usize = 17;

    /// 标准字段全集（标准顺序）
    pub const ALL: [SlaField; SlaField::COUNT] = [
        SlaField::ScacCd,
        SlaField::LocNbr,
        SlaField::DestZipCd,
        SlaField::OrigZipCd,
        SlaField::LineHaulDays,
        SlaField::HubToCustDays,
        SlaField::TotDays,
        SlaField::HubCityNm,
        SlaField::HubCd,
        SlaField::IsActive,
        SlaField::SatPromise,
        SlaField::SunPromise,
        SlaField::SatOvnMove,
        SlaField::SunOvnMove,
        SlaField::Rgn,
        SlaField::CarTyp,
        SlaField::EdgeCalendarId,
    ];

    /// 三值布尔标志位字段
    pub const FLAGS: [SlaField; 4] = [
        SlaField::SatPromise,
        SlaField::SunPromise,
        SlaField::SatOvnMove,
        SlaField::SunOvnMove,
    ];

    /// 汇总投影键字段
    pub const SUMMARY_KEYS: [SlaField; 4] = [
        SlaField::ScacCd,
        SlaField::LocNbr,
        SlaField::HubCityNm,
        SlaField::HubCd,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            SlaField::ScacCd => "SCAC_CD",
            SlaField::LocNbr => "LOC_NBR",
            SlaField::DestZipCd => "DEST_ZIP_CD",
            SlaField::OrigZipCd => "ORIG_ZIP_CD",
            SlaField::LineHaulDays => "LINE_HAUL_DAYS",
            SlaField::HubToCustDays => "HUB_TO_CUST_DAYS",
            SlaField::TotDays => "TOT_DAYS",
            SlaField::HubCityNm => "HUB_CITY_NM",
            SlaField::HubCd => "HUB_CD",
            SlaField::IsActive => "IS_ACTIVE",
            SlaField::SatPromise => "SAT_PROMISE",
            SlaField::SunPromise => "SUN_PROMISE",
            SlaField::SatOvnMove => "SAT_OVN_MOVE",
            SlaField::SunOvnMove => "SUN_OVN_MOVE",
            SlaField::Rgn => "RGN",
            SlaField::CarTyp => "CAR_TYP",
            SlaField::EdgeCalendarId => "EDGE_CALENDAR_ID",
        }
    }

    /// 标准列名 → 字段（精确匹配）
    pub fn from_column_name(name: &str) -> Option<SlaField> {
        SlaField::ALL
            .iter()
            .copied()
            .find(|f| f.column_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ==========================================
// SlaRecord - SLA 记录（主表一行）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SlaRecord {
    values: [CellValue; SlaField::COUNT],

    /// 映射状态（Resolver 之前为 None）
    pub mapping_status: Option<MappingStatus>,

    /// 非标准列的透传值（与 SlaTable::extra_columns 对齐）
    pub extras: Vec<CellValue>,

    /// 源数据行号（用于诊断日志）
    pub row_number: usize,
}

impl SlaRecord {
    /// 创建全字段为 Missing 的记录
    pub fn new(row_number: usize) -> Self {
        Self {
            values: std::array::from_fn(|_| CellValue::Missing),
            mapping_status: None,
            extras: Vec::new(),
            row_number,
        }
    }

    pub fn get(&self, field: SlaField) -> &CellValue {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: SlaField, value: CellValue) {
        self.values[field.index()] = value;
    }

    pub fn with(mut self, field: SlaField, value: impl Into<CellValue>) -> Self {
        self.set(field, value.into());
        self
    }
}

// ==========================================
// SlaTable - 富化表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlaTable {
    /// 非标准透传列（源表顺序）
    pub extra_columns: Vec<String>,
    pub records: Vec<SlaRecord>,
}

impl SlaTable {
    pub fn new(records: Vec<SlaRecord>) -> Self {
        Self {
            extra_columns: Vec::new(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按透传列名读取值
    pub fn extra<'a>(&self, record: &'a SlaRecord, column: &str) -> Option<&'a CellValue> {
        self.extra_columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| record.extras.get(idx))
    }
}
