// ==========================================
// 流水线端到端测试
// ==========================================
// 场景: xlsx 主表 + xlsx Master 表 → 多工作表报表 → calamine 回读校验
// ==========================================


use sla_hub_processor::domain::SummaryRow;
use sla_hub_processor::exporter::ExportError;
use sla_hub_processor::{
    process_workbooks, CellValue, PipelineConfig, PipelineError, SlaField, SlaPipeline,
};
use std::fs;
use test_helpers::*;

fn run_standard() -> (tempfile::TempDir, Vec<Sheet>, sla_hub_processor::ProcessingReport) {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();
    let output = dir.path().join("out.xlsx");

    let report = process_workbooks(&main, &master, &output).unwrap();
    let sheets = read_workbook(&output).unwrap();
    (dir, sheets, report)
}

#[test]
fn test_sheet_order_and_names() {
    let (_dir, sheets, report) = run_standard();

    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["SLA", "HUB380", "HUB614", "HUB171", "Summary"]);
    assert_eq!(report.sheet_names, names);
    assert_eq!(report.hub_sheet_names(), vec!["HUB380", "HUB614", "HUB171"]);
}

#[test]
fn test_sla_sheet_columns() {
    let (_dir, sheets, _) = run_standard();
    let sla = sheet(&sheets, "SLA");

    let expected: Vec<String> = SlaField::ALL
        .iter()
        .filter(|f| **f != SlaField::EdgeCalendarId)
        .map(|f| f.column_name().to_string())
        .chain(["HUB_MAPPING_STATUS".to_string(), "NOTES".to_string()])
        .collect();
    assert_eq!(sla.headers, expected);
    assert!(sla.column("PLND_ORIG_HUB_CITY_NM").is_none());
    assert_eq!(sla.rows.len(), 5);
}

#[test]
fn test_hub_sheets_keep_calendar_column() {
    let (_dir, sheets, _) = run_standard();

    let hub = sheet(&sheets, "HUB380");
    assert_eq!(hub.column("EDGE_CALENDAR_ID"), Some(16));
    assert_eq!(hub.values("EDGE_CALENDAR_ID"), vec![CellValue::text("CAL-5854"); 2]);
    assert_eq!(hub.values("NOTES"), vec![CellValue::text("first"), CellValue::text("fourth")]);
}

#[test]
fn test_facility_name_resolution_scenario() {
    let (_dir, sheets, _) = run_standard();
    let sla = sheet(&sheets, "SLA");

    // " columbus_fedex " + HUB_CD 缺失 → 380 / OK
    assert_eq!(sla.value(0, "HUB_CD"), num(380));
    assert_eq!(sla.value(0, "HUB_MAPPING_STATUS"), CellValue::text("OK"));
    assert_eq!(sla.value(0, "HUB_CITY_NM"), CellValue::text(" columbus_fedex "));

    // 源值优先于目录
    assert_eq!(sla.value(1, "HUB_CD"), num(614));

    // 小写名称同样解析
    assert_eq!(sla.value(4, "HUB_CD"), num(171));
}

#[test]
fn test_unknown_facility_only_on_sla_sheet() {
    let (_dir, sheets, report) = run_standard();
    let sla = sheet(&sheets, "SLA");

    assert_eq!(sla.value(2, "HUB_CD"), CellValue::Missing);
    assert_eq!(sla.value(2, "HUB_MAPPING_STATUS"), CellValue::text("UNMAPPED"));

    for hub in report.hub_sheet_names() {
        let notes = sheet(&sheets, hub).values("NOTES");
        assert!(!notes.contains(&CellValue::text("third")), "{hub}");
    }
    assert_eq!(report.resolution.unmapped, 1);
    assert_eq!(report.resolution.unmapped_city_names, vec!["NOWHERE_HUB".to_string()]);
}

#[test]
fn test_postal_code_directory_wins_and_fallback() {
    let (_dir, sheets, report) = run_standard();
    let sla = sheet(&sheets, "SLA");

    assert_eq!(sla.value(0, "ORIG_ZIP_CD"), num(8861));
    assert_eq!(sla.value(1, "ORIG_ZIP_CD"), num(60164));
    // 不在目录: 原值保留
    assert_eq!(sla.value(2, "ORIG_ZIP_CD"), num(11111));
    assert_eq!(sla.value(4, "ORIG_ZIP_CD"), num(11111));
    assert_eq!(report.resolution.zip_overridden, 3);
}

#[test]
fn test_defaults_overwrite_every_record() {
    let (_dir, sheets, _) = run_standard();
    let sla = sheet(&sheets, "SLA");

    for row in 0..sla.rows.len() {
        assert_eq!(sla.value(row, "LINE_HAUL_DAYS"), num(0));
        assert_eq!(sla.value(row, "IS_ACTIVE"), num(1));
        assert_eq!(sla.value(row, "RGN"), CellValue::text("NORTHLAKE01"));
        assert_eq!(sla.value(row, "CAR_TYP"), CellValue::text("A"));
        assert_eq!(sla.value(row, "HUB_TO_CUST_DAYS"), sla.value(row, "TOT_DAYS"));
    }
}

#[test]
fn test_flags_three_valued() {
    let (_dir, sheets, _) = run_standard();
    let sla = sheet(&sheets, "SLA");

    assert_eq!(sla.value(0, "SAT_PROMISE"), num(1));
    // false → 空标记，未写单元格
    assert_eq!(sla.value(1, "SAT_PROMISE"), CellValue::Missing);
    assert_eq!(sla.value(2, "SAT_PROMISE"), CellValue::Missing);
    assert_eq!(sla.value(0, "SUN_OVN_MOVE"), num(1));
}

#[test]
fn test_partition_completeness() {
    let (_dir, sheets, report) = run_standard();

    let hub_rows: usize = report
        .hub_sheet_names()
        .iter()
        .map(|name| sheet(&sheets, name).rows.len())
        .sum();
    assert_eq!(hub_rows, report.resolution.mapped);
    assert_eq!(hub_rows + report.resolution.unmapped, report.total_records);

    for name in report.hub_sheet_names() {
        let hub = sheet(&sheets, name);
        let code: i64 = name.trim_start_matches("HUB").parse().unwrap();
        assert!(hub.values("HUB_CD").iter().all(|v| *v == num(code)));
    }
}

#[test]
fn test_summary_join() {
    let (_dir, sheets, report) = run_standard();
    let summary = sheet(&sheets, "Summary");

    assert_eq!(summary.headers, SummaryRow::HEADERS.to_vec());
    // 行4 与行1 组合相同，去重
    assert_eq!(summary.rows.len(), 4);
    assert_eq!(report.merge.summary_rows, 4);

    // 浮点 380.0 与整数 380 连接；重复键首行生效
    assert_eq!(summary.value(0, "HUB_CD_norm"), CellValue::text("380"));
    assert_eq!(summary.value(0, "Ship_Schedule"), CellValue::text("MON-FRI"));
    assert_eq!(summary.value(0, "OECT"), CellValue::text("14:00:00"));
    assert_eq!(summary.value(1, "Ship_Schedule"), CellValue::text("DAILY"));

    // 未匹配行保留，辅助字段为空
    assert_eq!(summary.value(2, "SCAC_CD"), CellValue::text("XXXX"));
    assert_eq!(summary.value(2, "HUB_CD_norm"), CellValue::Missing);
    assert_eq!(summary.value(2, "Ship_Schedule"), CellValue::Missing);
    assert_eq!(summary.value(3, "HUB_CD"), num(171));
    assert_eq!(summary.value(3, "Scan Cut"), CellValue::Missing);

    assert_eq!(report.merge.master_duplicates_dropped, 1);
    assert_eq!(report.merge.matched, 2);
    assert_eq!(report.merge.unmatched, 2);
}

#[test]
fn test_deterministic_output() {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();
    let first = dir.path().join("first.xlsx");
    let second = dir.path().join("second.xlsx");

    process_workbooks(&main, &master, &first).unwrap();
    process_workbooks(&main, &master, &second).unwrap();

    assert_eq!(read_workbook(&first).unwrap(), read_workbook(&second).unwrap());
}

#[test]
fn test_csv_and_excel_sources_agree() {
    let dir = tempfile::tempdir().unwrap();
    let (main_xlsx, master) = write_standard_inputs(dir.path()).unwrap();

    let main_csv = dir.path().join("main.csv");
    fs::write(
        &main_csv,
        "SCAC_CD,LOC_NBR,DEST_ZIP_CD,ORIG_ZIP_CD,LINE_HAUL_DAYS,HUB_TO_CUST_DAYS,TOT_DAYS,PLND_ORIG_HUB_CITY_NM,HUB_CD,IS_ACTIVE,SAT_PROMISE,SUN_PROMISE,SAT_OVN_MOVE,SUN_OVN_MOVE,EDGE_CALENDAR_ID,NOTES\n\
         FDEG,5854,43004,11111,5,7,3, columbus_fedex ,,0,True,False,,True,CAL-5854,first\n\
         UPSN,5820,43004,11111,5,7,4,CHICAGO_EARLY,614,0,False,False,,True,CAL-5820,second\n\
         XXXX,9999,43004,11111,5,7,2,NOWHERE_HUB,,0,,False,,True,CAL-9999,third\n\
         FDEG,5854,43004,11111,5,7,3, columbus_fedex ,,0,True,False,,True,CAL-5854,fourth\n\
         UPSN,1234,43004,11111,5,7,6,chicago_early,,0,True,False,,True,CAL-1234,fifth\n",
    )
    .unwrap();

    let from_xlsx = dir.path().join("from_xlsx.xlsx");
    let from_csv = dir.path().join("from_csv.xlsx");
    process_workbooks(&main_xlsx, &master, &from_xlsx).unwrap();
    process_workbooks(&main_csv, &master, &from_csv).unwrap();

    assert_eq!(read_workbook(&from_xlsx).unwrap(), read_workbook(&from_csv).unwrap());
}

#[test]
fn test_missing_columns_degrade_to_missing() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("sparse.xlsx");
    let master = dir.path().join("master.xlsx");
    write_xlsx(
        &main,
        &["SCAC_CD", "HUB_CITY_NM"],
        &[vec![CellValue::text("FDEG"), CellValue::text("TAMPA_UPS")]],
    )
    .unwrap();
    write_xlsx(&master, &["Hub Code"], &[vec![CellValue::Int(812)]]).unwrap();
    let output = dir.path().join("out.xlsx");

    let report = process_workbooks(&main, &master, &output).unwrap();
    let sheets = read_workbook(&output).unwrap();
    let sla = sheet(&sheets, "SLA");

    assert_eq!(sla.headers.len(), SlaField::COUNT - 1 + 1);
    assert_eq!(sla.value(0, "HUB_CD"), num(812));
    assert_eq!(sla.value(0, "LOC_NBR"), CellValue::Missing);
    assert_eq!(sla.value(0, "HUB_TO_CUST_DAYS"), CellValue::Missing);
    assert_eq!(report.hub_sheet_names(), vec!["HUB812"]);
    assert_eq!(report.merge.matched, 1);
}

#[test]
fn test_configured_constants_flow_through() {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();
    let output = dir.path().join("out.xlsx");
    let config = PipelineConfig::from_json_str(
        r#"{"region": "SOUTH02", "carrier_type": "B", "hub_sheet_prefix": "H-"}"#,
    )
    .unwrap();

    let report = SlaPipeline::new(&config).run(&main, &master, &output).unwrap();
    let sheets = read_workbook(&output).unwrap();

    assert_eq!(report.hub_sheet_names(), vec!["H-380", "H-614", "H-171"]);
    let sla = sheet(&sheets, "SLA");
    assert_eq!(sla.value(0, "RGN"), CellValue::text("SOUTH02"));
    assert_eq!(sla.value(0, "CAR_TYP"), CellValue::text("B"));
}

#[test]
fn test_failed_run_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.xlsx");
    fs::write(&output, b"previous").unwrap();

    let result = process_workbooks(
        &dir.path().join("absent.xlsx"),
        &dir.path().join("absent_master.xlsx"),
        &output,
    );

    assert!(result.is_err());
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

#[test]
fn test_failed_final_write_leaves_destination_intact() {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();

    // 目标路径被非空目录占据，最终 rename 必然失败
    let output = dir.path().join("out.xlsx");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("keep.txt"), b"keep").unwrap();

    let result = process_workbooks(&main, &master, &output);

    assert!(matches!(
        result,
        Err(PipelineError::Export(ExportError::OutputWriteError { .. }))
    ));
    assert!(output.is_dir());
    assert_eq!(fs::read(output.join("keep.txt")).unwrap(), b"keep");

    // 临时文件已清理
    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}
