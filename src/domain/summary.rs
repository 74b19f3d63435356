// ==========================================
// SLA Hub 报表系统 - 汇总表领域模型
// ==========================================
// 职责: Master 参考表字段 / 汇总行
// 对齐: Summary sheet 列顺序
// ==========================================

use crate::domain::types::CellValue;

// ==========================================
// MasterField - Master 参考表标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterField {
    HubCd,         // Hub 代码（连接键）
    ShipSchedule,  // 发运计划
    Oect,          // 订单录入截止时间
    Cpt,           // 关键拣货时间
    ScanCut,       // 扫描截止时间
}

impl MasterField {
    /// 合并时读取的字段（连接键 + 辅助字段）；Master 的城市名称列不参与合并
    pub const ALL: [MasterField; 5] = [
        MasterField::HubCd,
        MasterField::ShipSchedule,
        MasterField::Oect,
        MasterField::Cpt,
        MasterField::ScanCut,
    ];

    /// 并入汇总表的辅助排程字段
    pub const AUXILIARY: [MasterField; 4] = [
        MasterField::ShipSchedule,
        MasterField::Oect,
        MasterField::Cpt,
        MasterField::ScanCut,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            MasterField::HubCd => "HUB_CD",
            MasterField::ShipSchedule => "Ship_Schedule",
            MasterField::Oect => "OECT",
            MasterField::Cpt => "CPT",
            MasterField::ScanCut => "Scan Cut",
        }
    }

    /// Master 源表列名（含标准列名本身）
    pub fn source_aliases(self) -> &'static [&'static str] {
        match self {
            MasterField::HubCd => &["Hub Code", "HUB_CD"],
            MasterField::ShipSchedule => &["Ship Schedule", "Ship_Schedule"],
            MasterField::Oect => &["Order Entry Cut Time", "OECT"],
            MasterField::Cpt => &["Critical Pull Time", "CPT"],
            MasterField::ScanCut => &["Master ScanCutTime", "Scan Cut"],
        }
    }
}

// ==========================================
// SummaryRow - 汇总行
// ==========================================
// 一行 = 一个去重后的 (SCAC_CD, LOC_NBR, HUB_CITY_NM, HUB_CD) 组合
// 未匹配 Master 的行，辅助字段为 Missing（保留，不丢弃）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryRow {
    pub scac_cd: CellValue,
    pub loc_nbr: CellValue,
    pub hub_city_name: CellValue,
    pub hub_cd: CellValue,
    pub hub_cd_norm: Option<String>,
    pub ship_schedule: CellValue,
    pub oect: CellValue,
    pub cpt: CellValue,
    pub scan_cut: CellValue,
}

impl SummaryRow {
    pub const HEADERS: [&'static str; 9] = [
        "SCAC_CD",
        "LOC_NBR",
        "HUB_City_Name",
        "HUB_CD",
        "HUB_CD_norm",
        "Ship_Schedule",
        "OECT",
        "CPT",
        "Scan Cut",
    ];

    /// 是否匹配到 Master 记录
    pub fn matched(&self) -> bool {
        !(self.ship_schedule.is_missing()
            && self.oect.is_missing()
            && self.cpt.is_missing()
            && self.scan_cut.is_missing())
    }

    /// 按 HEADERS 顺序输出单元格
    pub fn cells(&self) -> [CellValue; 9] {
        [
            self.scac_cd.clone(),
            self.loc_nbr.clone(),
            self.hub_city_name.clone(),
            self.hub_cd.clone(),
            self.hub_cd_norm
                .clone()
                .map(CellValue::Text)
                .unwrap_or(CellValue::Missing),
            self.ship_schedule.clone(),
            self.oect.clone(),
            self.cpt.clone(),
            self.scan_cut.clone(),
        ]
    }
}
