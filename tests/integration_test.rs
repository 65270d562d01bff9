use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use batch_report_client::app::RunOptions;
use batch_report_client::{
    App, Config, GenerateOutcome, GenerationState, HttpReportClient, InputFile, ReportWorkflow, WorkflowError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// (字段名, 文件名, 内容)
type Received = Arc<Mutex<Vec<(String, String, String)>>>;

/// 启动本地模拟报告服务，返回服务地址
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 与真实服务一致：按文件拼接内容
async fn concatenate_upload(State(received): State<Received>, mut multipart: Multipart) -> Json<Value> {
    let mut sections = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let text = field.text().await.unwrap();
        sections.push(format!(
            "--- START OF FILE: {file_name} ---\n{text}\n--- END OF FILE: {file_name} ---\n"
        ));
        received.lock().unwrap().push((name, file_name, text));
    }
    Json(json!({ "report": sections.join("\n") }))
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "Batch Report Generator API is running." }))
}

fn report_backend(received: Received) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/upload/", post(concatenate_upload))
        .with_state(received)
}

fn config_for(base_url: &str, export_dir: &std::path::Path) -> Config {
    Config {
        backend_base_url: base_url.to_string(),
        export_dir: export_dir.to_path_buf(),
        ..Config::default()
    }
}

fn workflow_for(config: &Config) -> ReportWorkflow<HttpReportClient> {
    ReportWorkflow::from_config(HttpReportClient::new(config).unwrap(), config)
}

#[tokio::test]
async fn uploads_only_txt_files_and_exports_raw_report() {
    let received = Received::default();
    let base = spawn_backend(report_backend(received.clone())).await;
    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_for(&config_for(&base, dir.path()));

    workflow.set_selection(vec![
        InputFile::new("a.txt", "Operator: John D."),
        InputFile::new("b.png", vec![0x89u8, 0x50, 0x4e, 0x47]),
    ]);

    assert_eq!(
        workflow.generate().await,
        GenerateOutcome::Finished(GenerationState::Succeeded)
    );

    let received = received.lock().unwrap().clone();
    assert_eq!(
        received,
        vec![(
            "files".to_string(),
            "a.txt".to_string(),
            "Operator: John D.".to_string()
        )]
    );

    let expected = "--- START OF FILE: a.txt ---\nOperator: John D.\n--- END OF FILE: a.txt ---\n";
    let path = workflow.export_report().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    assert!(workflow.preview().unwrap().contains("<br>"));
}

#[tokio::test]
async fn server_error_detail_is_surfaced() {
    let app = Router::new().route(
        "/upload/",
        post(|_body: Bytes| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "DB down" })),
            )
        }),
    );
    let base = spawn_backend(app).await;
    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_for(&config_for(&base, dir.path()));
    workflow.set_selection(vec![InputFile::new("a.txt", "x")]);

    workflow.generate().await;

    assert_eq!(
        workflow.state(),
        GenerationState::Failed(WorkflowError::server_error(500, "DB down"))
    );
    assert!(workflow.trigger().enabled);
}

#[tokio::test]
async fn plain_text_error_body_is_tolerated() {
    let app = Router::new().route(
        "/upload/",
        post(|_body: Bytes| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
    );
    let base = spawn_backend(app).await;
    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_for(&config_for(&base, dir.path()));
    workflow.set_selection(vec![InputFile::new("a.txt", "x")]);

    workflow.generate().await;

    match workflow.state() {
        GenerationState::Failed(WorkflowError::ServerError { status, .. }) => assert_eq!(status, 502),
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn empty_json_body_is_invalid_response() {
    let app = Router::new().route("/upload/", post(|_body: Bytes| async { Json(json!({})) }));
    let base = spawn_backend(app).await;
    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_for(&config_for(&base, dir.path()));
    workflow.set_selection(vec![InputFile::new("a.txt", "x")]);

    workflow.generate().await;

    assert_eq!(
        workflow.state(),
        GenerationState::Failed(WorkflowError::InvalidResponse)
    );
    assert_eq!(
        workflow.export_report(),
        Err(WorkflowError::NothingToExport)
    );
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_for(&config_for(&format!("http://{}", addr), dir.path()));
    workflow.set_selection(vec![InputFile::new("a.txt", "x")]);

    workflow.generate().await;

    assert!(matches!(
        workflow.state(),
        GenerationState::Failed(WorkflowError::NetworkError { .. })
    ));
    assert!(workflow.trigger().enabled);
}

#[tokio::test]
async fn app_runs_from_files_on_disk() {
    let received = Received::default();
    let base = spawn_backend(report_backend(received.clone())).await;
    let input_dir = tempfile::tempdir().unwrap();
    let export_dir = tempfile::tempdir().unwrap();

    let batch_record = input_dir.path().join("batch_record.txt");
    let label_scan = input_dir.path().join("label.jpg");
    std::fs::write(&batch_record, "Batch No.: BP-CAP-23004").unwrap();
    std::fs::write(&label_scan, [0xffu8, 0xd8]).unwrap();

    let app = App::initialize(config_for(&base, export_dir.path())).await.unwrap();
    assert_eq!(
        app.ping().await.unwrap(),
        "Batch Report Generator API is running."
    );

    let state = app
        .run(&[batch_record, label_scan], RunOptions::default())
        .await
        .unwrap();

    assert_eq!(state, GenerationState::Succeeded);
    assert_eq!(received.lock().unwrap().len(), 1);
    let exported = std::fs::read_to_string(export_dir.path().join("batch_report.txt")).unwrap();
    assert!(exported.contains("Batch No.: BP-CAP-23004"));
}

#[tokio::test]
async fn app_run_fails_without_eligible_files() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.png");
    std::fs::write(&scan, [0x89u8]).unwrap();

    // 不会发出请求，服务地址无需可达
    let app = App::initialize(config_for("http://127.0.0.1:9", dir.path())).await.unwrap();
    let err = app.run(&[scan], RunOptions::default()).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<WorkflowError>(),
        Some(&WorkflowError::NoEligibleInput)
    );
}
