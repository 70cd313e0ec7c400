//! Document Classification Client Core
//!
//! CLIとWeb(WASM)で共有される型とロジック
//! - アップロードゲートウェイ（送信前の検査とエラー正規化）
//! - 結果集約（ID付与・追加・削除・カテゴリ別グルーピング）
//! - 検証ステータスの表示判定
//! - JSONエクスポート
//! - セッション制御

pub mod types;
pub mod error;
pub mod parser;
pub mod gateway;
pub mod aggregator;
pub mod presenter;
pub mod export;
pub mod session;

pub use types::{
    BatchResponse, ClassificationResponse, DateValidation, IdValidation, Metadata,
    ProcessedFileRecord, RecordId, ERROR_CATEGORY, FALLBACK_CATEGORY,
};
pub use error::{Error, Result};
pub use parser::parse_batch_response;
pub use gateway::{
    classify_url, exceeds_size_limit, screen_files, validate_base_url, FileBlob, GatewayError,
    HttpReply, RejectReason, RejectedFile, SubmitOutcome, Transport, TransportError,
    UploadGateway, MAX_FILE_BYTES, REQUEST_TIMEOUT,
};
pub use aggregator::{CategoryGroup, RecordFilter, ResultAggregator};
pub use presenter::{metadata_rows, presentation_status, PresentationStatus};
pub use export::{serialize_records, suggested_filename, ExportArtifact};
pub use session::{SessionController, SessionError, SessionPhase, SubmissionTicket};
