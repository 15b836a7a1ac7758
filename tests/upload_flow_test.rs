// ==========================================
// 顺序上传集成测试
// ==========================================
// 测试目标: 上限截取 / 顺序提交 / 失败隔离 / 成功不重传
// ==========================================

mod helpers;

use bed_import::inventory::InventorySnapshot;
use bed_import::review::ReviewSession;
use bed_import::uploader::{BatchUploader, UploadSettings};
use bed_import::{logging, ReviewError, UploadStatus};
use helpers::{BatchBuilder, MockProductionApi};
use std::sync::Arc;

fn session_with(count: usize) -> ReviewSession {
    let batches = (1..=count)
        .map(|i| {
            BatchBuilder::new(&format!("Bed {}", i))
                .matched("Cement", "CEM-50", "Cement 50kg", 10.0)
                .labour(100.0)
                .build()
        })
        .collect();
    ReviewSession::new(batches, Arc::new(InventorySnapshot::empty()), 50)
}

fn uploader(api: Arc<MockProductionApi>, max_batch_size: usize) -> BatchUploader {
    BatchUploader::new(
        api,
        UploadSettings {
            max_batch_size,
            username: "tester".to_string(),
            ..UploadSettings::default()
        },
    )
}

#[tokio::test]
async fn test_upload_cap_leaves_remaining_pending() {
    logging::init_test();

    let api = Arc::new(MockProductionApi::new());
    let mut session = session_with(25);

    let report = uploader(api.clone(), 20).run(&mut session).await;

    assert_eq!(report.attempted, 20);
    assert_eq!(report.succeeded, 20);
    assert_eq!(report.remaining, 5);
    assert_eq!(api.requests().len(), 20);

    let statuses: Vec<_> = session.batches().iter().map(|b| b.upload_status).collect();
    assert!(statuses[..20].iter().all(|s| *s == UploadStatus::Success));
    assert!(statuses[20..].iter().all(|s| *s == UploadStatus::Pending));

    // 第二轮处理剩余批次
    let report = uploader(api.clone(), 20).run(&mut session).await;
    assert_eq!(report.attempted, 5);
    assert_eq!(report.remaining, 0);
    assert_eq!(api.requests().len(), 25);
}

#[tokio::test]
async fn test_requests_are_sequential_and_ordered() {
    let api = Arc::new(MockProductionApi::new());
    let mut session = session_with(6);

    uploader(api.clone(), 20).run(&mut session).await;

    assert_eq!(api.max_in_flight(), 1);
    let expected: Vec<String> = (1..=6).map(|i| format!("Bed {}", i)).collect();
    assert_eq!(api.request_names(), expected);
}

#[tokio::test]
async fn test_failure_is_isolated() {
    let api = Arc::new(
        MockProductionApi::new()
            .fail_with_server_error("Bed 2", Some("Insufficient stock for Cement 50kg"))
            .respond_with_message("Bed 3", "Something else happened"),
    );
    let mut session = session_with(4);

    let report = uploader(api.clone(), 20).run(&mut session).await;

    assert_eq!(report.attempted, 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(api.request_names().len(), 4);

    let batches = session.batches();
    assert_eq!(batches[0].upload_status, UploadStatus::Success);
    assert_eq!(batches[1].upload_status, UploadStatus::Error);
    assert_eq!(
        batches[1].error_message.as_deref(),
        Some("Insufficient stock for Cement 50kg")
    );
    assert_eq!(batches[2].upload_status, UploadStatus::Error);
    assert_eq!(
        batches[2].error_message.as_deref(),
        Some("Something else happened")
    );
    assert_eq!(batches[3].upload_status, UploadStatus::Success);
}

#[tokio::test]
async fn test_successful_batches_never_reuploaded() {
    let api = Arc::new(MockProductionApi::new().fail_with_server_error("Bed 2", None));
    let mut session = session_with(3);

    uploader(api.clone(), 20).run(&mut session).await;
    assert_eq!(session.batches()[1].upload_status, UploadStatus::Error);

    // 修复后再次触发: 仅重试失败批次
    api.clear_failure("Bed 2");
    let report = uploader(api.clone(), 20).run(&mut session).await;

    assert_eq!(report.attempted, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(
        api.request_names(),
        vec!["Bed 1", "Bed 2", "Bed 3", "Bed 2"]
    );
    assert!(session
        .batches()
        .iter()
        .all(|b| b.upload_status == UploadStatus::Success));
    assert_eq!(session.batches()[1].error_message, None);
}

#[tokio::test]
async fn test_invalid_batches_skipped() {
    let api = Arc::new(MockProductionApi::new());
    let batches = vec![
        BatchBuilder::new("Good")
            .matched("Cement", "CEM-50", "Cement 50kg", 1.0)
            .build(),
        BatchBuilder::new("Bad")
            .matched("Cement", "CEM-50", "Cement 50kg", 1.0)
            .unmatched("Gravel", 2.0)
            .build(),
    ];
    let mut session = ReviewSession::new(batches, Arc::new(InventorySnapshot::empty()), 50);

    let report = uploader(api.clone(), 20).run(&mut session).await;

    assert_eq!(report.attempted, 1);
    assert_eq!(api.request_names(), vec!["Good"]);
    assert_eq!(session.batches()[1].upload_status, UploadStatus::Pending);
}

#[tokio::test]
async fn test_payload_contents() {
    let api = Arc::new(MockProductionApi::new());
    let batches = vec![BatchBuilder::new("Bed P")
        .matched("Cement", "CEM-50", "Cement 50kg", 10.0)
        .matched("cement bag", "CEM-50", "Cement 50kg", 2.5)
        .matched("Sand", "SND-R", "Sand (River)", 3.0)
        .labour(750.0)
        .build()];
    let mut session = ReviewSession::new(batches, Arc::new(InventorySnapshot::empty()), 50);

    uploader(api.clone(), 20).run(&mut session).await;

    let request = &api.requests()[0];
    assert_eq!(request.product_name, "Bed P");
    assert_eq!(request.username, "tester");
    assert_eq!(request.labour_cost, 750.0);
    assert_eq!(request.stock_needed.len(), 2);
    assert_eq!(request.stock_needed["Cement 50kg"], "12.5");
    assert_eq!(request.stock_needed["Sand (River)"], "3");
}

#[tokio::test]
async fn test_uploaded_batch_locked_for_edits() {
    let api = Arc::new(MockProductionApi::new());
    let mut session = session_with(1);
    let id = session.batches()[0].id;

    uploader(api, 20).run(&mut session).await;

    let err = session.update_quantity(id, 0, 99.0).unwrap_err();
    assert!(matches!(
        err,
        ReviewError::BatchLocked {
            status: UploadStatus::Success,
            ..
        }
    ));
    assert!(session.remove_batch(id).is_err());
}

#[tokio::test]
async fn test_pull_based_run_reports_progress() {
    let api = Arc::new(MockProductionApi::new());
    let mut session = session_with(3);
    let uploader = uploader(api, 2);

    let mut run = uploader.start(&mut session);
    assert_eq!(run.pending_in_run(), 2);
    assert_eq!(run.remaining(), 1);

    let first = run.next().await.unwrap();
    assert_eq!(first.batch_name, "Bed 1");
    assert_eq!(first.status, UploadStatus::Success);
    assert_eq!(run.pending_in_run(), 1);

    assert!(run.next().await.is_some());
    assert!(run.next().await.is_none());

    let report = run.finish();
    assert_eq!(report.attempted, 2);
    assert_eq!(report.remaining, 1);
}
