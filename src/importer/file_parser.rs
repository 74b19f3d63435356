// ==========================================
// SLA Hub 报表系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 说明: Excel 只读取第一个工作表
// ==========================================

use crate::domain::{CellValue, RawTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::source_trait::SpreadsheetSource;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl SpreadsheetSource for CsvParser {
    fn read_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        ensure_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let cleaner = DataCleaner;

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| cleaner.clean_header(h, idx))
            .collect();
        if headers.is_empty() {
            return Err(ImportError::MissingHeader(path.display().to_string()));
        }

        // 读取所有行
        let mut table = RawTable::new(headers);
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .take(table.headers.len())
                .map(|value| cleaner.infer_text_cell(value))
                .collect();

            // 跳过完全空白的行
            if cleaner.is_blank_row(&row) {
                continue;
            }

            table.rows.push(row);
        }

        debug!(file = %path.display(), rows = table.len(), "CSV 解析完成");
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl SpreadsheetSource for ExcelParser {
    fn read_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        ensure_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件（calamine 按扩展名识别格式）
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::NoWorksheet(path.display().to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let cleaner = DataCleaner;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::MissingHeader(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| cleaner.clean_header(&cleaner.excel_cell(cell).to_string(), idx))
            .collect();

        // 读取数据行
        let mut table = RawTable::new(headers);
        for data_row in rows {
            let row: Vec<CellValue> = data_row
                .iter()
                .take(table.headers.len())
                .map(|cell| cleaner.excel_cell(cell))
                .collect();

            // 跳过完全空白的行
            if cleaner.is_blank_row(&row) {
                continue;
            }

            table.rows.push(row);
        }

        debug!(
            file = %path.display(),
            sheet = %sheet_name,
            rows = table.len(),
            "Excel 解析完成"
        );
        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl SpreadsheetSource for UniversalFileParser {
    fn read_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let ext = extension_of(file_path);

        match ext.as_str() {
            "csv" => CsvParser.read_table(file_path),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.read_table(file_path),
            _ => {
                ensure_exists(file_path)?;
                Err(ImportError::UnsupportedFormat(ext))
            }
        }
    }
}
