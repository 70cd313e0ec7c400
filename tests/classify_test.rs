//! 分類フローの統合テスト
//!
//! ローカルに立てたHTTPサーバーへ ReqwestTransport で送信し、
//! セッション・集約・エクスポートまで通しで検証する。

use chrono::NaiveDate;
use doc_classify::transport::ReqwestTransport;
use doc_classify::{export, report, scanner};
use doc_classify_common::{
    FileBlob, PresentationStatus, RecordFilter, RejectReason, SessionController, SessionPhase,
    UploadGateway,
};
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const SUCCESS_BODY: &str = r#"{
    "a.pdf": {"category": "ID", "subcategory": "Driver License", "renamed": "Jane_Doe_ID_DL",
              "metadata": {"client_name": "Jane Doe"},
              "id_validation": {"is_valid": true, "id_type": "Driver License", "confidence": 0.92}},
    "b.png": {"category": "Income", "subcategory": "Paystub", "renamed": "Jane_Doe_Income_Paystub",
              "date_validation": {"is_valid": false, "days_old": 95, "max_allowed_days": 60}}
}"#;

/// 1回だけリクエストを受けて固定レスポンスを返すサーバー
///
/// 受け取ったリクエスト（ヘッダ+ボディ）を文字列で返す
async fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept失敗");
        let request = read_request(&mut stream).await;

        tokio::time::sleep(delay).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.expect("読み込み失敗");
        if n == 0 {
            return String::from_utf8_lossy(&buf).to_string();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());

    match content_length {
        Some(len) => {
            while buf.len() < header_end + len {
                let n = stream.read(&mut chunk).await.expect("読み込み失敗");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
        }
        None => {
            // chunked
            while find(&buf[header_end..], b"0\r\n\r\n").is_none() {
                let n = stream.read(&mut chunk).await.expect("読み込み失敗");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn sample_files() -> Vec<FileBlob> {
    vec![
        FileBlob::new("a.pdf", "application/pdf", b"%PDF-1.4 sample".to_vec()),
        FileBlob::new("b.png", "image/png", b"\x89PNG sample".to_vec()),
    ]
}

#[tokio::test]
async fn test_classify_end_to_end() {
    let (base_url, server) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();

    let ids = session.submit(&gateway, sample_files()).await.unwrap();
    let request = server.await.unwrap();

    // マルチパートで files パートが2つ
    assert!(request.starts_with("POST /classify "));
    assert!(request.to_lowercase().contains("multipart/form-data"));
    assert_eq!(request.matches("name=\"files\"").count(), 2);
    assert!(request.contains("filename=\"a.pdf\""));
    assert!(request.contains("filename=\"b.png\""));

    assert_eq!(ids.len(), 2);
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.last_error().is_none());

    let groups = session.group_by_category();
    let categories: Vec<&str> = groups.iter().map(|g| g.category).collect();
    assert_eq!(categories, vec!["ID", "Income"]);

    let text = report::render_results(&session, &RecordFilter::default());
    assert!(text.contains("✅ a.pdf → Jane_Doe_ID_DL"));
    assert!(text.contains("⚠️ b.png → Jane_Doe_Income_Paystub"));

    let invalid = session.filter(&RecordFilter {
        category: None,
        status: Some(PresentationStatus::PartiallyInvalid),
    });
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].original_name, "b.png");

    // エクスポートしてファイルに書き出す
    let dir = tempdir().expect("Failed to create temp dir");
    let date = NaiveDate::from_ymd_opt(2025, 1, 18).unwrap();
    let artifact = session.export(date).unwrap();
    let path = export::write_artifact(&artifact, dir.path()).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "mortgage_classification_results_2025-01-18.json"
    );
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let entries = written.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["original_name"], "a.pdf");
    assert_eq!(entries[0]["validation"]["id_validation"]["is_valid"], true);
    assert!(entries[0]["validation"]["date_validation"].is_null());
}

#[tokio::test]
async fn test_unsupported_format_status() {
    let (base_url, server) = serve_once("422 Unprocessable Entity", r#"{"detail": "bad"}"#, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();

    let ids = session.submit(&gateway, sample_files()).await.unwrap();
    server.await.unwrap();

    assert!(ids.is_empty());
    assert!(session.records().is_empty());
    assert_eq!(session.phase(), SessionPhase::IdleWithError);
    assert_eq!(
        session.last_error(),
        Some("Unsupported file format. Please upload PDF or image files.")
    );
}

#[tokio::test]
async fn test_server_unavailable_status() {
    let (base_url, server) = serve_once("503 Service Unavailable", "", Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();

    session.submit(&gateway, sample_files()).await.unwrap();
    server.await.unwrap();

    assert_eq!(session.last_error(), Some("Server error. Please try again later."));
}

#[tokio::test]
async fn test_failure_keeps_previous_results() {
    let (base_url, server) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();
    session.submit(&gateway, sample_files()).await.unwrap();
    server.await.unwrap();

    let (base_url, server) = serve_once("500 Internal Server Error", "", Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    session.submit(&gateway, sample_files()).await.unwrap();
    server.await.unwrap();

    assert_eq!(session.records().len(), 2);
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_request_timeout() {
    let (base_url, server) = serve_once("200 OK", SUCCESS_BODY, Duration::from_secs(3)).await;
    let transport = ReqwestTransport::with_timeout(&base_url, Duration::from_millis(300)).unwrap();
    let gateway = UploadGateway::new(transport);
    let mut session = SessionController::new();

    session.submit(&gateway, sample_files()).await.unwrap();

    assert_eq!(
        session.last_error(),
        Some("Request timed out after 30 seconds. Please try again.")
    );
    assert!(session.records().is_empty());
    server.abort();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // bindしてすぐ閉じたポートへ送る
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = UploadGateway::new(ReqwestTransport::new(&format!("http://{}", addr)).unwrap());
    let mut session = SessionController::new();
    session.submit(&gateway, sample_files()).await.unwrap();

    let message = session.last_error().expect("エラーが設定されていない");
    assert!(message.starts_with("Network error"));
}

#[tokio::test]
async fn test_scanned_folder_is_submitted() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("a.pdf"), b"%PDF-1.4 a").unwrap();
    std::fs::write(dir.path().join("b.png"), b"\x89PNG b").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

    let scan = scanner::scan_paths(&[dir.path().to_path_buf()], false).unwrap();
    assert_eq!(scan.files.len(), 2);

    let (base_url, server) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();
    session.submit(&gateway, scan.files).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.contains("Content-Type: application/pdf") || request.contains("content-type: application/pdf"));
    assert!(!request.contains("notes.txt"));
    assert_eq!(session.records().len(), 2);
}

#[tokio::test]
async fn test_same_name_in_subfolders_sent_once() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("jan")).unwrap();
    std::fs::create_dir_all(dir.path().join("feb")).unwrap();
    std::fs::write(dir.path().join("jan").join("paystub.pdf"), b"%PDF jan").unwrap();
    std::fs::write(dir.path().join("feb").join("paystub.pdf"), b"%PDF feb").unwrap();

    let scan = scanner::scan_paths(&[dir.path().to_path_buf()], true).unwrap();
    assert_eq!(scan.files.len(), 2);

    let body = r#"{"paystub.pdf": {"category": "Income", "subcategory": "Paystub"}}"#;
    let (base_url, server) = serve_once("200 OK", body, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();
    session.submit(&gateway, scan.files).await.unwrap();

    let request = server.await.unwrap();
    assert_eq!(request.matches("filename=\"paystub.pdf\"").count(), 1);
    assert_eq!(session.records().len(), 1);
    assert_eq!(session.excluded().len(), 1);
    assert_eq!(session.excluded()[0].name, "paystub.pdf");
    assert_eq!(session.excluded()[0].reason, RejectReason::DuplicateName);

    let text = report::render_excluded(session.excluded());
    assert!(text.contains("⚠ 除外: paystub.pdf"));
}

#[tokio::test]
async fn test_failed_request_keeps_this_batch_exclusions() {
    let (base_url, server) = serve_once("200 OK", SUCCESS_BODY, Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let mut session = SessionController::new();
    let mut files = sample_files();
    files.push(FileBlob::new("old.txt", "text/plain", b"old".to_vec()));
    session.submit(&gateway, files).await.unwrap();
    server.await.unwrap();

    let (base_url, server) = serve_once("503 Service Unavailable", "", Duration::ZERO).await;
    let gateway = UploadGateway::new(ReqwestTransport::new(&base_url).unwrap());
    let files = vec![
        FileBlob::new("c.pdf", "application/pdf", b"%PDF c".to_vec()),
        FileBlob::new("new.txt", "text/plain", b"new".to_vec()),
    ];
    session.submit(&gateway, files).await.unwrap();
    server.await.unwrap();

    let names: Vec<&str> = session.excluded().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["new.txt"]);
    assert_eq!(session.last_error(), Some("Server error. Please try again later."));
}
