// ==========================================
// SLA Hub 报表系统 - Hub / 邮编解析
// ==========================================
// 职责: Hub 代码补缺 + 数值化 + 映射状态 / 始发邮编目录覆盖
// 策略: Hub 代码只补空缺（源值优先）；邮编目录命中即覆盖（目录优先）
// 说明: 邮编未命中不打任何标记，与 Hub 状态列不对称，保持现状
// ==========================================

use crate::domain::{CellValue, MappingStatus, ResolutionStats, SlaField, SlaRecord, SlaTable};
use crate::engine::directory::{FacilityDirectory, PostalDirectory};
use tracing::{debug, info, warn};

pub struct Resolver<'a> {
    facilities: &'a FacilityDirectory,
    postal: &'a PostalDirectory,
}

impl Resolver<'static> {
    /// 使用全局静态目录
    pub fn new() -> Self {
        Self::with_directories(FacilityDirectory::global(), PostalDirectory::global())
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn with_directories(facilities: &'a FacilityDirectory, postal: &'a PostalDirectory) -> Self {
        Self { facilities, postal }
    }

    /// 解析整表（未映射记录保留，调用方通过状态列检查）
    pub fn resolve(&self, table: &mut SlaTable) -> ResolutionStats {
        let mut stats = ResolutionStats::default();

        for record in &mut table.records {
            if self.resolve_hub_code(record) {
                stats.hub_filled_from_directory += 1;
            }
            match record.mapping_status {
                Some(MappingStatus::Ok) => stats.mapped += 1,
                _ => {
                    stats.unmapped += 1;
                    let name = record.get(SlaField::HubCityNm).to_string();
                    let name = name.trim();
                    if !name.is_empty() && !stats.unmapped_city_names.iter().any(|n| n == name) {
                        stats.unmapped_city_names.push(name.to_string());
                    }
                }
            }

            if self.resolve_postal_code(record) {
                stats.zip_overridden += 1;
            }
        }

        info!(
            mapped = stats.mapped,
            unmapped = stats.unmapped,
            hub_filled = stats.hub_filled_from_directory,
            zip_overridden = stats.zip_overridden,
            "Hub/邮编解析完成"
        );
        if stats.unmapped > 0 {
            warn!(
                unmapped = stats.unmapped,
                names = ?stats.unmapped_city_names,
                "存在未映射 Hub，请检查 HUB_MAPPING_STATUS 列"
            );
        }

        stats
    }

    /// Hub 代码解析
    ///
    /// # 规则
    /// 1. HUB_CD 缺失 → 用 TRIM+UPPER 后的 HUB_CITY_NM 查目录（可能仍缺失）
    /// 2. HUB_CD 数值化，无法转换 → Missing
    /// 3. 状态 = HUB_CD 非缺失 ? OK : UNMAPPED
    ///
    /// # 返回
    /// - true: HUB_CD 由目录补全
    pub fn resolve_hub_code(&self, record: &mut SlaRecord) -> bool {
        let mut filled = false;

        if record.get(SlaField::HubCd).is_missing() {
            let looked_up = record
                .get(SlaField::HubCityNm)
                .as_text()
                .and_then(|name| self.facilities.lookup(name));
            if let Some(code) = looked_up {
                record.set(SlaField::HubCd, CellValue::Int(code));
                filled = true;
            }
        }

        let coerced = record.get(SlaField::HubCd).to_numeric();
        if coerced.is_missing() && !record.get(SlaField::HubCd).is_missing() {
            debug!(
                row = record.row_number,
                value = %record.get(SlaField::HubCd),
                "HUB_CD 非数值，按缺失处理"
            );
        }
        record.mapping_status = Some(MappingStatus::from_hub_code(&coerced));
        record.set(SlaField::HubCd, coerced);

        filled
    }

    /// 始发邮编解析（目录命中即覆盖，未命中保留原值）
    ///
    /// # 返回
    /// - true: ORIG_ZIP_CD 被目录值覆盖
    pub fn resolve_postal_code(&self, record: &mut SlaRecord) -> bool {
        let zip = record
            .get(SlaField::LocNbr)
            .as_integral()
            .and_then(|loc| self.postal.lookup(loc));

        match zip {
            Some(zip) => {
                record.set(SlaField::OrigZipCd, CellValue::Int(zip));
                true
            }
            None => false,
        }
    }
}
