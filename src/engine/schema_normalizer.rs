// ==========================================
// SLA Hub 报表系统 - 表结构归一化
// ==========================================
// 职责: 旧列名 → 标准列名 / 布尔标志位三值归一 / 缺失标准列补 Missing
// 红线: 不报错；缺失或异常的列一律降级为 Missing
// ==========================================

use crate::domain::{CellValue, RawTable, SlaField, SlaRecord, SlaTable, MAPPING_STATUS_COLUMN};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// 旧列名 → 标准字段
const LEGACY_ALIASES: &[(&str, SlaField)] = &[("PLND_ORIG_HUB_CITY_NM", SlaField::HubCityNm)];

pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// 归一化主表
    ///
    /// # 返回
    /// - SlaTable: 每条记录均包含全部标准字段；非标准列按源顺序透传
    pub fn normalize(&self, raw: RawTable) -> SlaTable {
        let RawTable { headers, rows } = raw;

        // === 列规划: 标准字段 → 源列下标；其余列透传 ===
        let mut field_columns: HashMap<SlaField, usize> = HashMap::new();
        let mut extra_columns: Vec<(usize, String)> = Vec::new();

        // 透传列改名时需避开的列名: 标准列 + 状态列 + 全部源列
        let reserved: HashSet<&str> = SlaField::ALL
            .iter()
            .map(|f| f.column_name())
            .chain(std::iter::once(MAPPING_STATUS_COLUMN))
            .chain(headers.iter().map(String::as_str))
            .collect();
        let mut extra_names: HashSet<String> = HashSet::new();

        for (idx, header) in headers.iter().enumerate() {
            if header == MAPPING_STATUS_COLUMN {
                // 状态列由 Resolver 重新计算
                debug!(column = %header, "忽略输入中的映射状态列");
                continue;
            }

            let claimed = match self.canonical_field(header) {
                Some(field) => match field_columns.get(&field) {
                    Some(first) => Some((field, *first)),
                    None => {
                        if header != field.column_name() {
                            debug!(from = %header, to = field.column_name(), "列名别名替换");
                        }
                        field_columns.insert(field, idx);
                        continue;
                    }
                },
                None => None,
            };

            let name = passthrough_name(header, &reserved, &extra_names);
            if let Some((field, first)) = claimed {
                warn!(
                    column = %header,
                    field = field.column_name(),
                    kept_column = %headers[first],
                    passthrough = %name,
                    "标准字段重复映射，保留首列，后续列透传"
                );
            } else if &name != header {
                warn!(column = %header, renamed = %name, "列名重复，改名后透传");
            }
            extra_names.insert(name.clone());
            extra_columns.push((idx, name));
        }

        let absent: Vec<&str> = SlaField::ALL
            .iter()
            .filter(|f| !field_columns.contains_key(f))
            .map(|f| f.column_name())
            .collect();
        if !absent.is_empty() {
            info!(columns = ?absent, "缺失标准列，补充 Missing");
        }

        // === 逐行构建记录 ===
        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, mut row) in rows.into_iter().enumerate() {
            let mut record = SlaRecord::new(row_idx + 1);

            for (field, col) in &field_columns {
                let value = row.get_mut(*col).map(std::mem::take).unwrap_or_default();
                let value = if SlaField::FLAGS.contains(field) {
                    self.normalize_flag(value)
                } else {
                    value
                };
                record.set(*field, value);
            }

            record.extras = extra_columns
                .iter()
                .map(|(col, _)| row.get_mut(*col).map(std::mem::take).unwrap_or_default())
                .collect();

            records.push(record);
        }

        debug!(records = records.len(), extras = extra_columns.len(), "表结构归一化完成");

        SlaTable {
            extra_columns: extra_columns.into_iter().map(|(_, name)| name).collect(),
            records,
        }
    }

    /// 源列名 → 标准字段（标准名或旧别名，精确匹配）
    pub fn canonical_field(&self, header: &str) -> Option<SlaField> {
        SlaField::from_column_name(header).or_else(|| {
            LEGACY_ALIASES
                .iter()
                .find(|(alias, _)| *alias == header)
                .map(|(_, field)| *field)
        })
    }

    /// 布尔标志位三值归一
    ///
    /// # 规则
    /// - true → 1
    /// - false → Blank（显式空标记）
    /// - 其他 → 原值
    pub fn normalize_flag(&self, value: CellValue) -> CellValue {
        match value {
            CellValue::Bool(true) => CellValue::Int(1),
            CellValue::Bool(false) => CellValue::Blank,
            other => other,
        }
    }
}

/// 透传列名（重复列按 `<列名>.N` 编号，N 从 1 起取首个未占用值）
fn passthrough_name(header: &str, reserved: &HashSet<&str>, taken: &HashSet<String>) -> String {
    let duplicate = taken.contains(header)
        || SlaField::from_column_name(header).is_some()
        || header == MAPPING_STATUS_COLUMN;
    if !duplicate {
        return header.to_string();
    }

    (1..)
        .map(|n| format!("{}.{}", header, n))
        .find(|name| !reserved.contains(name.as_str()) && !taken.contains(name))
        .unwrap_or_else(|| header.to_string())
}
