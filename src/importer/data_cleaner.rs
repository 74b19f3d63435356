// ==========================================
// SLA Hub 报表系统 - 单元格清洗器
// ==========================================
// 职责: 表头 TRIM / 源单元格 → CellValue 类型识别 / NULL 标准化
// 红线: 数据值不做 TRIM（名称解析阶段自行处理空白）
// ==========================================

use crate::domain::CellValue;
use calamine::{Data, DataType};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// 视为缺失的文本标记（大小写敏感）
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#NA", "N/A", "NA", "NULL", "NaN", "nan", "null", "None", "<NA>",
];

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗表头（TRIM；空表头按列号命名）
    pub fn clean_header(&self, value: &str, col_idx: usize) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            format!("Unnamed: {}", col_idx)
        } else {
            trimmed.to_string()
        }
    }

    /// 识别文本单元格（CSV 来源）
    ///
    /// # 规则
    /// - 空白 / NA 标记 → Missing
    /// - True/TRUE/true, False/FALSE/false → Bool
    /// - 整数 → Int；有限浮点 → Float
    /// - 其他 → Text（保留原始空白）
    pub fn infer_text_cell(&self, raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if NA_MARKERS.contains(&trimmed) {
            return CellValue::Missing;
        }

        match trimmed {
            "True" | "TRUE" | "true" => return CellValue::Bool(true),
            "False" | "FALSE" | "false" => return CellValue::Bool(false),
            _ => {}
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        CellValue::Text(raw.to_string())
    }

    /// 转换 Excel 单元格
    pub fn excel_cell(&self, cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Missing,
            Data::String(s) if s.is_empty() => CellValue::Missing,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) if f.is_finite() => CellValue::Float(*f),
            Data::Float(_) => CellValue::Missing,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
                Some(dt) => CellValue::Text(self.format_datetime(dt)),
                None => CellValue::Text(cell.to_string()),
            },
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }

    /// 日期时间文本化
    ///
    /// # 规则
    /// - 纯时间（Excel 序列号 < 1）→ HH:MM:SS
    /// - 零点日期 → YYYY-MM-DD
    /// - 其他 → YYYY-MM-DD HH:MM:SS
    pub fn format_datetime(&self, dt: NaiveDateTime) -> String {
        let epoch_end = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap_or(NaiveDate::MIN);
        if dt.date() <= epoch_end {
            dt.format("%H:%M:%S").to_string()
        } else if dt.time().num_seconds_from_midnight() == 0 {
            dt.format("%Y-%m-%d").to_string()
        } else {
            dt.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    }

    /// 整行是否全部缺失
    pub fn is_blank_row(&self, row: &[CellValue]) -> bool {
        row.iter().all(CellValue::is_missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_header() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_header("  HUB_CD ", 0), "HUB_CD");
        assert_eq!(cleaner.clean_header("   ", 3), "Unnamed: 3");
    }

    #[test]
    fn test_infer_text_cell() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.infer_text_cell(""), CellValue::Missing);
        assert_eq!(cleaner.infer_text_cell("  "), CellValue::Missing);
        assert_eq!(cleaner.infer_text_cell("N/A"), CellValue::Missing);
        assert_eq!(cleaner.infer_text_cell("TRUE"), CellValue::Bool(true));
        assert_eq!(cleaner.infer_text_cell("false"), CellValue::Bool(false));
        assert_eq!(cleaner.infer_text_cell("5854"), CellValue::Int(5854));
        assert_eq!(cleaner.infer_text_cell("08861"), CellValue::Int(8861));
        assert_eq!(cleaner.infer_text_cell("2.5"), CellValue::Float(2.5));
        assert_eq!(cleaner.infer_text_cell("inf"), CellValue::text("inf"));
        assert_eq!(
            cleaner.infer_text_cell(" columbus_fedex "),
            CellValue::text(" columbus_fedex ")
        );
    }

    #[test]
    fn test_excel_cell() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.excel_cell(&Data::Empty), CellValue::Missing);
        assert_eq!(cleaner.excel_cell(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cleaner.excel_cell(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(cleaner.excel_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cleaner.excel_cell(&Data::String("UPS".to_string())),
            CellValue::text("UPS")
        );
        assert_eq!(
            cleaner.excel_cell(&Data::String(String::new())),
            CellValue::Missing
        );
    }

    #[test]
    fn test_format_datetime() {
        let cleaner = DataCleaner;
        let time_only = NaiveDate::from_ymd_opt(1899, 12, 30)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(cleaner.format_datetime(time_only), "14:30:00");

        let date_only = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(cleaner.format_datetime(date_only), "2025-03-01");

        let full = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 5, 9)
            .unwrap();
        assert_eq!(cleaner.format_datetime(full), "2025-03-01 08:05:09");
    }

    #[test]
    fn test_is_blank_row() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_blank_row(&[CellValue::Missing, CellValue::Missing]));
        assert!(!cleaner.is_blank_row(&[CellValue::Missing, CellValue::Int(0)]));
    }
}
