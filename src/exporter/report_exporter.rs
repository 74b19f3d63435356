// ==========================================
// SLA Hub 报表系统 - 报表分表与导出
// ==========================================
// 输出: SLA（全量，去日历列）→ HUB<code>（按首次出现顺序）→ Summary
// 红线: 全部工作表写完后才整体落盘（内存渲染 + 原子替换）
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::{CellValue, SlaField, SlaRecord, SlaTable, SummaryRow, MAPPING_STATUS_COLUMN};
use crate::exporter::atomic_file::atomic_write_bytes;
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

/// 全量工作表名
pub const SLA_SHEET: &str = "SLA";
/// 汇总工作表名
pub const SUMMARY_SHEET: &str = "Summary";

/// Excel 单表最大行数（含表头）
const MAX_ROWS: usize = 1_048_576;

static MISSING: CellValue = CellValue::Missing;

// ==========================================
// RecordColumn - 记录类工作表的列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordColumn {
    Field(SlaField),
    Status,
    Extra(usize),
}

// ==========================================
// HubPartition - Hub 分区
// ==========================================
#[derive(Debug)]
pub struct HubPartition<'a> {
    pub sheet_name: String,
    pub hub_code: i64,
    pub records: Vec<&'a SlaRecord>,
}

pub struct ReportExporter {
    hub_sheet_prefix: String,
}

impl ReportExporter {
    pub fn new(hub_sheet_prefix: impl Into<String>) -> Self {
        Self {
            hub_sheet_prefix: hub_sheet_prefix.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.hub_sheet_prefix.clone())
    }

    /// 渲染并原子写出报表
    ///
    /// # 返回
    /// - Ok(Vec<String>): 按顺序写出的工作表名
    pub fn export(
        &self,
        table: &SlaTable,
        summary: &[SummaryRow],
        output_path: &Path,
    ) -> ExportResult<Vec<String>> {
        let (bytes, sheet_names) = self.render(table, summary)?;

        atomic_write_bytes(output_path, &bytes).map_err(|e| ExportError::OutputWriteError {
            path: output_path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(
            path = %output_path.display(),
            sheets = sheet_names.len(),
            bytes = bytes.len(),
            "报表已写出"
        );
        Ok(sheet_names)
    }

    /// 在内存中渲染工作簿
    pub fn render(
        &self,
        table: &SlaTable,
        summary: &[SummaryRow],
    ) -> ExportResult<(Vec<u8>, Vec<String>)> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let mut sheet_names = Vec::new();

        // === SLA: 全量记录，去掉日历列 ===
        let sla_columns = self.record_columns(table, false);
        let sheet = workbook.add_worksheet();
        sheet.set_name(SLA_SHEET)?;
        let all_records: Vec<&SlaRecord> = table.records.iter().collect();
        self.write_record_sheet(
            sheet,
            SLA_SHEET,
            &header_format,
            table,
            &sla_columns,
            &all_records,
        )?;
        sheet_names.push(SLA_SHEET.to_string());

        // === HUB<code>: 每个 Hub 一张表，保留日历列 ===
        let hub_columns = self.record_columns(table, true);
        for partition in self.partition(table) {
            let sheet = workbook.add_worksheet();
            sheet.set_name(partition.sheet_name.as_str())?;
            self.write_record_sheet(
                sheet,
                &partition.sheet_name,
                &header_format,
                table,
                &hub_columns,
                &partition.records,
            )?;
            debug!(
                sheet = %partition.sheet_name,
                records = partition.records.len(),
                "Hub 分表写入完成"
            );
            sheet_names.push(partition.sheet_name);
        }

        // === Summary ===
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        self.write_summary_sheet(sheet, &header_format, summary)?;
        sheet_names.push(SUMMARY_SHEET.to_string());

        let bytes = workbook.save_to_buffer()?;
        Ok((bytes, sheet_names))
    }

    /// 按 Hub 分区（Hub 代码缺失的记录不进入任何分表）
    ///
    /// 分区键为分表名：截断后相同的代码共用一张表
    pub fn partition<'a>(&self, table: &'a SlaTable) -> Vec<HubPartition<'a>> {
        let mut partitions: Vec<HubPartition<'a>> = Vec::new();

        for record in &table.records {
            let code = match hub_sheet_code(record.get(SlaField::HubCd)) {
                Some(code) => code,
                None => continue,
            };

            match partitions.iter_mut().find(|p| p.hub_code == code) {
                Some(partition) => partition.records.push(record),
                None => partitions.push(HubPartition {
                    sheet_name: format!("{}{}", self.hub_sheet_prefix, code),
                    hub_code: code,
                    records: vec![record],
                }),
            }
        }

        partitions
    }

    fn record_columns(&self, table: &SlaTable, include_calendar: bool) -> Vec<RecordColumn> {
        SlaField::ALL
            .iter()
            .filter(|f| include_calendar || **f != SlaField::EdgeCalendarId)
            .map(|f| RecordColumn::Field(*f))
            .chain(std::iter::once(RecordColumn::Status))
            .chain((0..table.extra_columns.len()).map(RecordColumn::Extra))
            .collect()
    }

    fn write_record_sheet(
        &self,
        sheet: &mut Worksheet,
        sheet_name: &str,
        header_format: &Format,
        table: &SlaTable,
        columns: &[RecordColumn],
        records: &[&SlaRecord],
    ) -> ExportResult<()> {
        check_limits(sheet_name, records.len(), columns.len())?;

        for (col, column) in columns.iter().enumerate() {
            let header = match column {
                RecordColumn::Field(field) => field.column_name(),
                RecordColumn::Status => MAPPING_STATUS_COLUMN,
                RecordColumn::Extra(idx) => table.extra_columns[*idx].as_str(),
            };
            sheet.write_string_with_format(0, col as u16, header, header_format)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, column) in columns.iter().enumerate() {
                let status;
                let value = match column {
                    RecordColumn::Field(field) => record.get(*field),
                    RecordColumn::Status => {
                        status = record
                            .mapping_status
                            .map(|s| CellValue::Text(s.to_string()))
                            .unwrap_or_default();
                        &status
                    }
                    RecordColumn::Extra(i) => record.extras.get(*i).unwrap_or(&MISSING),
                };
                write_cell(sheet, row, col as u16, value)?;
            }
        }

        Ok(())
    }

    fn write_summary_sheet(
        &self,
        sheet: &mut Worksheet,
        header_format: &Format,
        summary: &[SummaryRow],
    ) -> ExportResult<()> {
        check_limits(SUMMARY_SHEET, summary.len(), SummaryRow::HEADERS.len())?;

        for (col, header) in SummaryRow::HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, header_format)?;
        }

        for (idx, row) in summary.iter().enumerate() {
            for (col, value) in row.cells().iter().enumerate() {
                write_cell(sheet, (idx + 1) as u32, col as u16, value)?;
            }
        }

        Ok(())
    }
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// 分表代码：整数截断；缺失 → None
pub fn hub_sheet_code(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Int(i) => Some(*i),
        CellValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

fn check_limits(sheet: &str, rows: usize, columns: usize) -> ExportResult<()> {
    if rows + 1 > MAX_ROWS || columns > u16::MAX as usize {
        return Err(ExportError::SheetLimitExceeded {
            sheet: sheet.to_string(),
            message: format!("rows={}, columns={}", rows + 1, columns),
        });
    }
    Ok(())
}

/// 写单元格（Missing / Blank 不写）
fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> ExportResult<()> {
    match value {
        CellValue::Missing | CellValue::Blank => {}
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) => {
            sheet.write_number(row, col, *f)?;
        }
        CellValue::Text(s) => {
            sheet.write_string(row, col, s.as_str())?;
        }
    }
    Ok(())
}
