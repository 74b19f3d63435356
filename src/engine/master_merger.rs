// ==========================================
// SLA Hub 报表系统 - Master 参考表合并
// ==========================================
// 职责: 汇总投影去重 / Master 列名标准化 / 归一化键 / Master 去重 / 左连接
// 策略: Master 同键多行 → 首行生效，后续行静默丢弃
// 保证: 汇总行数 == 去重后的投影行数（左连接不增不减）
// ==========================================

use crate::domain::{
    CellKey, CellValue, MasterField, MergeStats, RawTable, SlaField, SlaTable, SummaryRow,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// 去重后的 Master 辅助字段（按 MasterField::AUXILIARY 顺序）
type AuxiliaryValues = [CellValue; 4];

pub struct MasterMerger;

impl MasterMerger {
    /// 生成汇总表
    pub fn merge(&self, table: &SlaTable, master: &RawTable) -> (Vec<SummaryRow>, MergeStats) {
        let mut rows = self.project_summary_keys(table);
        let (lookup, duplicates_dropped) = self.dedup_master(master);

        let mut stats = MergeStats {
            summary_rows: rows.len(),
            master_rows: master.len(),
            master_duplicates_dropped: duplicates_dropped,
            ..Default::default()
        };

        for row in &mut rows {
            let matched = row.hub_cd_norm.as_ref().and_then(|key| lookup.get(key));
            match matched {
                Some([ship_schedule, oect, cpt, scan_cut]) => {
                    row.ship_schedule = ship_schedule.clone();
                    row.oect = oect.clone();
                    row.cpt = cpt.clone();
                    row.scan_cut = scan_cut.clone();
                    stats.matched += 1;
                }
                None => stats.unmatched += 1,
            }
        }

        info!(
            summary_rows = stats.summary_rows,
            master_rows = stats.master_rows,
            duplicates_dropped = stats.master_duplicates_dropped,
            matched = stats.matched,
            unmatched = stats.unmatched,
            "Master 合并完成"
        );

        (rows, stats)
    }

    /// 投影 (SCAC_CD, LOC_NBR, HUB_CITY_NM, HUB_CD) 并去重（首次出现顺序）
    pub fn project_summary_keys(&self, table: &SlaTable) -> Vec<SummaryRow> {
        let mut seen: HashSet<[CellKey; 4]> = HashSet::new();
        let mut rows = Vec::new();

        for record in &table.records {
            let key = SlaField::SUMMARY_KEYS.map(|f| record.get(f).dedup_key());
            if !seen.insert(key) {
                continue;
            }

            let hub_cd = record.get(SlaField::HubCd).clone();
            rows.push(SummaryRow {
                scac_cd: record.get(SlaField::ScacCd).clone(),
                loc_nbr: record.get(SlaField::LocNbr).clone(),
                hub_city_name: record.get(SlaField::HubCityNm).clone(),
                hub_cd_norm: hub_cd.key_string(),
                hub_cd,
                ..Default::default()
            });
        }

        debug!(records = table.len(), distinct = rows.len(), "汇总投影去重完成");
        rows
    }

    /// Master 列定位（标准名或源别名，首个命中）
    ///
    /// 只定位连接键与辅助字段，其余 Master 列（如城市名称）忽略
    pub fn master_columns(&self, master: &RawTable) -> HashMap<MasterField, usize> {
        let mut columns = HashMap::new();
        for field in MasterField::ALL {
            let found = field
                .source_aliases()
                .iter()
                .find_map(|alias| master.column_index(alias));
            match found {
                Some(idx) => {
                    columns.insert(field, idx);
                }
                None => warn!(field = field.column_name(), "Master 表缺少列，按缺失处理"),
            }
        }
        columns
    }

    /// Master 按归一化键去重（首行生效）
    ///
    /// # 返回
    /// - HashMap<键, 辅助字段>: 键缺失的行不参与连接
    /// - usize: 被丢弃的重复行数
    pub fn dedup_master(&self, master: &RawTable) -> (HashMap<String, AuxiliaryValues>, usize) {
        let columns = self.master_columns(master);
        let value_of = |row: usize, field: MasterField| -> CellValue {
            columns
                .get(&field)
                .map(|col| master.cell(row, *col).clone())
                .unwrap_or_default()
        };

        let mut first_occurrence: HashMap<String, AuxiliaryValues> = HashMap::new();
        let mut duplicates = 0;

        for row in 0..master.len() {
            let key = match value_of(row, MasterField::HubCd).key_string() {
                Some(key) => key,
                None => continue,
            };

            if first_occurrence.contains_key(&key) {
                // 重复键：静默丢弃
                duplicates += 1;
                continue;
            }

            let aux = MasterField::AUXILIARY.map(|f| value_of(row, f));
            first_occurrence.insert(key, aux);
        }

        if duplicates > 0 {
            debug!(duplicates, "Master 重复键已丢弃（首行生效）");
        }

        (first_occurrence, duplicates)
    }
}
