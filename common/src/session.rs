//! セッション制御
//!
//! 状態: Idle / Submitting / IdleWithError
//!
//! - 送信は begin_submission → screen → (ゲートウェイ呼び出し) → complete_submission。
//!   UI側は await の間に状態の借用を手放せる
//! - 除外ファイルの一覧は送信ごとに作り直す（送信が失敗しても今回分を保持）
//! - 同時に進行できる送信は1件のみ
//! - エラーメッセージは常に最大1件（新しい失敗で上書き、成功で消去）
//! - プレビューはレコードIDのみ保持し、参照時に検索する

use crate::aggregator::{CategoryGroup, RecordFilter, ResultAggregator};
use crate::error::Result;
use crate::export::{serialize_records, ExportArtifact};
use crate::gateway::{
    screen_files, FileBlob, GatewayError, RejectedFile, SubmitOutcome, Transport, UploadGateway,
};
use crate::types::{ProcessedFileRecord, RecordId};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Submitting,
    IdleWithError,
}

/// 進行中の送信を識別するチケット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No matching submission is in progress")]
    UnknownSubmission,
}

#[derive(Debug, Default)]
pub struct SessionController {
    aggregator: ResultAggregator,
    in_flight: Option<SubmissionTicket>,
    issued_tickets: u64,
    last_error: Option<String>,
    last_excluded: Vec<RejectedFile>,
    previewed: Option<RecordId>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.in_flight.is_some() {
            SessionPhase::Submitting
        } else if self.last_error.is_some() {
            SessionPhase::IdleWithError
        } else {
            SessionPhase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 直近の送信で除外されたファイル
    pub fn excluded(&self) -> &[RejectedFile] {
        &self.last_excluded
    }

    /// 集約器（読み取り専用）
    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    pub fn records(&self) -> &[ProcessedFileRecord] {
        self.aggregator.records()
    }

    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        self.aggregator.group_by_category()
    }

    pub fn filter(&self, filter: &RecordFilter) -> Vec<&ProcessedFileRecord> {
        self.aggregator.filter(filter)
    }

    /// 送信開始（Idle/IdleWithError → Submitting）
    pub fn begin_submission(&mut self) -> std::result::Result<SubmissionTicket, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::SubmissionInFlight);
        }

        self.issued_tickets += 1;
        let ticket = SubmissionTicket(self.issued_tickets);
        self.in_flight = Some(ticket);
        self.last_error = None;
        self.last_excluded.clear();
        Ok(ticket)
    }

    /// 送信前に除外したファイルを記録（読み込み失敗など）
    pub fn record_excluded(
        &mut self,
        ticket: SubmissionTicket,
        excluded: Vec<RejectedFile>,
    ) -> std::result::Result<(), SessionError> {
        if self.in_flight != Some(ticket) {
            return Err(SessionError::UnknownSubmission);
        }
        self.last_excluded.extend(excluded);
        Ok(())
    }

    /// ファイルを検査し、除外分を記録して送信対象を返す
    pub fn screen(
        &mut self,
        ticket: SubmissionTicket,
        files: Vec<FileBlob>,
    ) -> std::result::Result<Vec<FileBlob>, SessionError> {
        let (accepted, excluded) = screen_files(files);
        self.record_excluded(ticket, excluded)?;
        Ok(accepted)
    }

    /// 送信完了
    ///
    /// 成功時はレスポンスを一括で追加し、追加したIDを返す。
    /// ゲートウェイの失敗はエラーメッセージとして保持し、コレクションは変更しない。
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: std::result::Result<SubmitOutcome, GatewayError>,
    ) -> std::result::Result<Vec<RecordId>, SessionError> {
        if self.in_flight != Some(ticket) {
            return Err(SessionError::UnknownSubmission);
        }
        self.in_flight = None;

        match outcome {
            Ok(SubmitOutcome::Classified { response, excluded }) => {
                let ids = self.aggregator.append(&response);
                self.last_error = None;
                self.last_excluded.extend(excluded);
                Ok(ids)
            }
            Ok(SubmitOutcome::NothingToSend { excluded }) => {
                self.last_error = None;
                self.last_excluded.extend(excluded);
                Ok(Vec::new())
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.last_error = Some(err.to_string());
                Ok(Vec::new())
            }
        }
    }

    /// 送信（開始 → 検査 → ゲートウェイ → 完了）
    pub async fn submit<T: Transport>(
        &mut self,
        gateway: &UploadGateway<T>,
        files: Vec<FileBlob>,
    ) -> std::result::Result<Vec<RecordId>, SessionError> {
        let ticket = self.begin_submission()?;
        let accepted = self.screen(ticket, files)?;
        let outcome = gateway.submit(accepted).await;
        self.complete_submission(ticket, outcome)
    }

    /// エラー表示を閉じる
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// レコードを削除（どの状態でも可）
    pub fn remove(&mut self, id: RecordId) -> bool {
        let removed = self.aggregator.remove(id);
        if self.previewed == Some(id) {
            self.previewed = None;
        }
        removed
    }

    /// 全レコードを削除（送信中は不可）
    pub fn clear(&mut self) -> std::result::Result<(), SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::SubmissionInFlight);
        }
        self.aggregator.clear();
        self.previewed = None;
        self.last_excluded.clear();
        Ok(())
    }

    /// プレビューを開く（存在しないIDなら false）
    pub fn open_preview(&mut self, id: RecordId) -> bool {
        if self.aggregator.contains(id) {
            self.previewed = Some(id);
            true
        } else {
            false
        }
    }

    pub fn close_preview(&mut self) {
        self.previewed = None;
    }

    /// プレビュー中のレコード（削除済みなら None）
    pub fn previewed_record(&self) -> Option<&ProcessedFileRecord> {
        self.previewed.and_then(|id| self.aggregator.get(id))
    }

    /// 現在のコレクションをエクスポート
    pub fn export(&self, date: NaiveDate) -> Result<ExportArtifact> {
        serialize_records(self.aggregator.records(), date)
    }
}
