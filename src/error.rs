use doc_classify_common::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("送信できるファイルがありません: {0}")]
    NoFilesFound(String),

    #[error("HTTPクライアントの初期化に失敗: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("分類に失敗しました: {0}")]
    Submission(String),

    #[error("セッションエラー: {0}")]
    Session(#[from] SessionError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] doc_classify_common::Error),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
