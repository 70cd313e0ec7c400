//! アップロードゲートウェイ
//!
//! 複数ファイルを1リクエストにまとめて `/classify` へ送信する。
//! - 送信前にファイル形式・サイズを検査し、条件外のファイルは除外
//! - 通信結果（成功/タイムアウト/422/5xx/その他）を GatewayError に正規化
//!
//! 実際の通信は Transport トレイトに委譲する（CLIはreqwest、WASMはfetch）。
//! ゲートウェイ自体は集約器に触れない。

use crate::error;
use crate::parser::parse_batch_response;
use crate::types::BatchResponse;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/tiff",
    "image/bmp",
];

/// 1ファイルあたりの上限（10 MiB）
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// リクエストのタイムアウト
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 分類エンドポイントのパス
pub const CLASSIFY_PATH: &str = "/classify";

/// ベースURLから分類エンドポイントのURLを組み立てる
pub fn classify_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), CLASSIFY_PATH)
}

/// ベースURLが http(s) か確認
pub fn validate_base_url(base_url: &str) -> error::Result<()> {
    let url = base_url.trim();
    let host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| error::Error::Config(format!("base URL must start with http:// or https://: {}", url)))?;

    if host.trim_matches('/').is_empty() {
        return Err(error::Error::Config(format!("base URL has no host: {}", url)));
    }
    Ok(())
}

/// 拡張子からMIMEタイプを推定
pub fn mime_type_for_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// 送信するファイル
#[derive(Debug, Clone, PartialEq)]
pub struct FileBlob {
    pub name: String,
    /// 申告されたMIMEタイプ（空文字可）
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// 送信時に使うMIMEタイプ
    ///
    /// 申告があればそれを正規化して使い、空または `application/octet-stream`
    /// の場合のみ拡張子から推定する
    pub fn effective_mime_type(&self) -> String {
        let declared = self
            .mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if declared.is_empty() || declared == "application/octet-stream" {
            mime_type_for_name(&self.name)
                .map(str::to_string)
                .unwrap_or(declared)
        } else {
            declared
        }
    }
}

/// 送信前に除外された理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType(String),
    TooLarge { size: u64 },
    /// 同じバッチに同名のファイルがある（レスポンスがファイル名キーのため）
    DuplicateName,
    /// 読み込みに失敗した
    Unreadable(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnsupportedType(mime) if mime.is_empty() => {
                write!(f, "unsupported file type")
            }
            RejectReason::UnsupportedType(mime) => write!(f, "unsupported file type ({})", mime),
            RejectReason::TooLarge { size } => write!(
                f,
                "file is too large ({:.1} MiB, limit {} MiB)",
                *size as f64 / (1024.0 * 1024.0),
                MAX_FILE_BYTES / (1024 * 1024)
            ),
            RejectReason::DuplicateName => write!(f, "another file with the same name is in this batch"),
            RejectReason::Unreadable(message) => write!(f, "could not be read ({})", message),
        }
    }
}

/// 除外されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub name: String,
    pub reason: RejectReason,
}

/// サイズ上限を超えているか（読み込み前の判定にも使う）
pub fn exceeds_size_limit(size: u64) -> bool {
    size > MAX_FILE_BYTES
}

/// ファイルを送信対象と除外対象に振り分ける（順序保持）
///
/// 同名ファイルは最初に受け付けたものだけを送る
pub fn screen_files(files: Vec<FileBlob>) -> (Vec<FileBlob>, Vec<RejectedFile>) {
    let mut accepted: Vec<FileBlob> = Vec::new();
    let mut rejected = Vec::new();

    for file in files {
        let mime = file.effective_mime_type();
        let reason = if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
            Some(RejectReason::UnsupportedType(mime))
        } else if exceeds_size_limit(file.size()) {
            Some(RejectReason::TooLarge { size: file.size() })
        } else if accepted.iter().any(|a| a.name == file.name) {
            Some(RejectReason::DuplicateName)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                tracing::debug!(file = %file.name, %reason, "excluded from upload");
                rejected.push(RejectedFile { name: file.name, reason });
            }
            None => accepted.push(file),
        }
    }

    (accepted, rejected)
}

/// HTTPレスポンス（ステータスと本文のみ）
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// 通信層のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),
}

/// 通信層
///
/// 実装はマルチパートの `files` パートを1ファイルずつ付けて
/// `POST {base_url}/classify` を送り、REQUEST_TIMEOUT で打ち切る。
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, files: &[FileBlob]) -> Result<HttpReply, TransportError>;
}

/// ゲートウェイのエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Request timed out after 30 seconds. Please try again.")]
    Timeout,

    #[error("Unsupported file format. Please upload PDF or image files.")]
    UnsupportedFormat,

    #[error("Server error. Please try again later.")]
    ServerUnavailable,

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => GatewayError::Timeout,
            TransportError::Network(message) => {
                GatewayError::Other(format!("Network error: {}", message))
            }
        }
    }
}

/// HTTPレスポンスを結果に変換
pub fn map_reply(reply: HttpReply) -> Result<BatchResponse, GatewayError> {
    match reply.status {
        200..=299 => parse_batch_response(&reply.body)
            .map_err(|e| GatewayError::Other(format!("Unexpected response from server: {}", e))),
        422 => Err(GatewayError::UnsupportedFormat),
        status if status >= 500 => Err(GatewayError::ServerUnavailable),
        status => Err(GatewayError::Other(format!(
            "Upload failed with status {}",
            status
        ))),
    }
}

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 送信して分類結果を得た
    Classified {
        response: BatchResponse,
        excluded: Vec<RejectedFile>,
    },
    /// 全ファイルが除外されたため送信しなかった
    NothingToSend { excluded: Vec<RejectedFile> },
}

impl SubmitOutcome {
    pub fn excluded(&self) -> &[RejectedFile] {
        match self {
            SubmitOutcome::Classified { excluded, .. } => excluded,
            SubmitOutcome::NothingToSend { excluded } => excluded,
        }
    }
}

/// アップロードゲートウェイ
pub struct UploadGateway<T> {
    transport: T,
}

impl<T: Transport> UploadGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// ファイルを検査して送信
    pub async fn submit(&self, files: Vec<FileBlob>) -> Result<SubmitOutcome, GatewayError> {
        let (accepted, excluded) = screen_files(files);

        if accepted.is_empty() {
            tracing::info!(excluded = excluded.len(), "no uploadable files; request skipped");
            return Ok(SubmitOutcome::NothingToSend { excluded });
        }

        tracing::info!(
            files = accepted.len(),
            excluded = excluded.len(),
            "uploading batch for classification"
        );

        let reply = self.transport.send(&accepted).await.map_err(|e| {
            tracing::warn!(error = %e, "upload transport failed");
            GatewayError::from(e)
        })?;

        let status = reply.status;
        let response = map_reply(reply).map_err(|e| {
            tracing::warn!(status, error = %e, "classification request failed");
            e
        })?;

        tracing::debug!(status, entries = response.len(), "classification response received");
        Ok(SubmitOutcome::Classified { response, excluded })
    }
}
