//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use doc_classify::error::ClassifyError;
use doc_classify::scanner;
use std::path::PathBuf;
use tempfile::tempdir;

/// 存在しないパスを指定した場合
#[test]
fn test_scan_nonexistent_path() {
    let result = scanner::scan_paths(&[PathBuf::from("/nonexistent/path/12345")], false);

    let err = result.unwrap_err();
    assert!(matches!(err, ClassifyError::FileNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_paths(&[dir.path().to_path_buf()], false);

    // 空フォルダはエラーではなく空の結果を返す
    let scan = result.expect("スキャン失敗");
    assert!(scan.files.is_empty());
    assert!(scan.duplicates.is_empty());
}

/// 対応ファイルのないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_documents() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let scan = scanner::scan_paths(&[dir.path().to_path_buf()], false).unwrap();
    assert!(scan.files.is_empty());
}

/// ClassifyErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ClassifyError::Config("テスト設定エラー".to_string()),
        ClassifyError::FileNotFound("a.pdf".to_string()),
        ClassifyError::NoFilesFound("docs".to_string()),
        ClassifyError::Submission("Server error. Please try again later.".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 送信失敗はサーバー向けメッセージをそのまま含む
#[test]
fn test_submission_error_message() {
    let err = ClassifyError::Submission("Unsupported file format. Please upload PDF or image files.".to_string());
    let display = format!("{}", err);

    assert!(display.contains("分類に失敗しました"));
    assert!(display.contains("Unsupported file format"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: ClassifyError = io_err.into();

    assert!(matches!(err, ClassifyError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: ClassifyError = json_err.into();

    assert!(matches!(err, ClassifyError::JsonParse(_)));
}

/// セッションエラーからの変換
#[test]
fn test_session_error_conversion() {
    let err: ClassifyError = doc_classify_common::SessionError::SubmissionInFlight.into();
    assert!(matches!(err, ClassifyError::Session(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = doc_classify_common::Error::Parse("パースエラー".to_string());
    let err: ClassifyError = common_err.into();

    assert!(matches!(err, ClassifyError::Common(_)));
    assert!(format!("{}", err).contains("パースエラー"));
}
