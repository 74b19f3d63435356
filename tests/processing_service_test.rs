// ==========================================
// 处理服务 + 制品库集成测试
// ==========================================


use sla_hub_processor::app::{default_output_dir, ProcessOutcome, ProcessRequest, ProcessingService};
use sla_hub_processor::artifact::{ArtifactSink, LocalReleaseStore};
use sla_hub_processor::{logging, CellValue, PipelineConfig};
use std::path::Path;
use std::sync::Arc;
use test_helpers::*;

fn service_with_store(store: Arc<LocalReleaseStore>) -> ProcessingService {
    ProcessingService::new(PipelineConfig::default()).with_sink(store)
}

#[tokio::test]
async fn test_process_writes_default_output_name() {
    logging::init_test();
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();

    let outcome = ProcessingService::new(PipelineConfig::default())
        .process(ProcessRequest {
            main_file: Some(main.clone()),
            master_file: Some(master),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.artifact_name, "Processed_main.xlsx");
    assert_eq!(
        outcome.output_path,
        default_output_dir(&outcome.report.run_id).join("Processed_main.xlsx")
    );
    assert!(outcome.output_path.is_file());
    assert!(!dir.path().join("Processed_main.xlsx").exists());
    assert_eq!(outcome.report.output_file, outcome.output_path.display().to_string());
    assert_eq!(outcome.artifact_url, None);
    assert_eq!(outcome.report.main_file, main.display().to_string());

    let sheets = read_workbook(&outcome.output_path).unwrap();
    assert_eq!(sheets.first().map(|s| s.name.as_str()), Some("SLA"));
}

#[tokio::test]
async fn test_publish_replaces_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();
    let store = Arc::new(LocalReleaseStore::new(dir.path().join("store")));
    let service = service_with_store(store.clone());

    let request = ProcessRequest {
        main_file: Some(main),
        master_file: Some(master),
        output_path: Some(dir.path().join("result.xlsx")),
        publish: true,
    };

    let first = service.process(request.clone()).await.unwrap();
    let second = service.process(request).await.unwrap();

    let url = second.artifact_url.unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.ends_with("Processed_main.xlsx"));
    assert_ne!(first.report.run_id, second.report.run_id);

    let artifacts = store.list_artifacts().await.unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].name, "Processed_main.xlsx");

    // 发布的制品与本地输出一致
    let published = read_workbook(&store.release_dir().join("Processed_main.xlsx")).unwrap();
    assert_eq!(published, read_workbook(&second.output_path).unwrap());
}

/// 同一主表 + 指定 Master 表的一次请求
fn spawn_request(
    service: &Arc<ProcessingService>,
    main: &Path,
    master: &Path,
) -> tokio::task::JoinHandle<Result<ProcessOutcome, sla_hub_processor::app::ServiceError>> {
    let service = service.clone();
    let request = ProcessRequest {
        main_file: Some(main.to_path_buf()),
        master_file: Some(master.to_path_buf()),
        ..Default::default()
    };
    tokio::spawn(async move { service.process(request).await })
}

/// Summary 中 Hub 380 的发运计划
fn schedule_for_380(outcome: &ProcessOutcome) -> CellValue {
    let sheets = read_workbook(&outcome.output_path).unwrap();
    let summary = sheet(&sheets, "Summary");
    let row = summary
        .values("HUB_CD")
        .iter()
        .position(|v| v == &num(380))
        .expect("Summary 缺少 Hub 380");
    summary.value(row, "Ship_Schedule")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_named_uploads_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    // 同一主表路径，两份内容不同的 Master 表
    let (main, _) = write_standard_inputs(dir.path()).unwrap();
    let master_a = dir.path().join("master_a.xlsx");
    let master_b = dir.path().join("master_b.xlsx");
    write_xlsx(
        &master_a,
        &MASTER_HEADERS,
        &[master_row(CellValue::Int(380), "COLUMBUS", "A-SCHEDULE")],
    )
    .unwrap();
    write_xlsx(
        &master_b,
        &MASTER_HEADERS,
        &[master_row(CellValue::Int(380), "COLUMBUS", "B-SCHEDULE")],
    )
    .unwrap();

    let service = Arc::new(ProcessingService::new(PipelineConfig::default()));

    for _ in 0..8 {
        let a = spawn_request(&service, &main, &master_a);
        let b = spawn_request(&service, &main, &master_b);

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();

        assert_eq!(a.artifact_name, b.artifact_name);
        assert_ne!(a.output_path, b.output_path);
        assert_eq!(schedule_for_380(&a), CellValue::text("A-SCHEDULE"));
        assert_eq!(schedule_for_380(&b), CellValue::text("B-SCHEDULE"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publish_keeps_whole_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (main, master) = write_standard_inputs(dir.path()).unwrap();
    let store = Arc::new(LocalReleaseStore::new(dir.path().join("store")));
    let service = Arc::new(service_with_store(store.clone()));

    let requests: Vec<_> = (0..2)
        .map(|i| {
            let service = service.clone();
            let request = ProcessRequest {
                main_file: Some(main.clone()),
                master_file: Some(master.clone()),
                output_path: Some(dir.path().join(format!("out_{}.xlsx", i))),
                publish: true,
            };
            tokio::spawn(async move { service.process(request).await })
        })
        .collect();
    for handle in requests {
        handle.await.unwrap().unwrap();
    }

    let artifacts = store.list_artifacts().await.unwrap();
    assert_eq!(artifacts.len(), 1);
    let published = read_workbook(&store.release_dir().join("Processed_main.xlsx")).unwrap();
    assert_eq!(published, read_workbook(&dir.path().join("out_0.xlsx")).unwrap());
}
