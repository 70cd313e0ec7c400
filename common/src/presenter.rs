//! 検証ステータスの表示判定
//!
//! 判定順（この順序で評価する）:
//! 1. エラーがあれば Error
//! 2. ID/日付のどちらかの検証が true なら Validated
//! 3. どちらかの検証が false なら PartiallyInvalid
//! 4. それ以外（検証なし・判定不能）は Pending

use crate::types::ProcessedFileRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStatus {
    Error,
    Validated,
    PartiallyInvalid,
    Pending,
}

impl PresentationStatus {
    pub const ALL: [PresentationStatus; 4] = [
        PresentationStatus::Error,
        PresentationStatus::Validated,
        PresentationStatus::PartiallyInvalid,
        PresentationStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationStatus::Error => "error",
            PresentationStatus::Validated => "validated",
            PresentationStatus::PartiallyInvalid => "partially-invalid",
            PresentationStatus::Pending => "pending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PresentationStatus::Error => "Processing error",
            PresentationStatus::Validated => "Validated",
            PresentationStatus::PartiallyInvalid => "Validation failed",
            PresentationStatus::Pending => "Not validated",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PresentationStatus::Error => "❌",
            PresentationStatus::Validated => "✅",
            PresentationStatus::PartiallyInvalid => "⚠️",
            PresentationStatus::Pending => "⏳",
        }
    }
}

impl fmt::Display for PresentationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresentationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(PresentationStatus::Error),
            "validated" | "ok" => Ok(PresentationStatus::Validated),
            "partially-invalid" | "partially_invalid" | "invalid" => {
                Ok(PresentationStatus::PartiallyInvalid)
            }
            "pending" => Ok(PresentationStatus::Pending),
            _ => Err(format!(
                "Unknown status: {}. Use error, validated, partially-invalid, or pending",
                s
            )),
        }
    }
}

/// レコードの表示ステータスを判定
pub fn presentation_status(record: &ProcessedFileRecord) -> PresentationStatus {
    if record.has_error() {
        return PresentationStatus::Error;
    }

    let id_verdict = record.id_validation.as_ref().and_then(|v| v.is_valid);
    let date_verdict = record.date_validation.as_ref().and_then(|v| v.is_valid);

    if id_verdict == Some(true) || date_verdict == Some(true) {
        PresentationStatus::Validated
    } else if id_verdict == Some(false) || date_verdict == Some(false) {
        PresentationStatus::PartiallyInvalid
    } else {
        PresentationStatus::Pending
    }
}

/// メタデータの既知キーと表示名
pub const METADATA_LABELS: &[(&str, &str)] = &[
    ("client_name", "Client"),
    ("date", "Date"),
    ("amount", "Amount"),
    ("account_number", "Account"),
];

/// メタデータを表示用の (ラベル, 値) に変換
///
/// 既知キーを先に定義順で並べ、未知キーはレスポンス順でその後に続ける
pub fn metadata_rows(record: &ProcessedFileRecord) -> Vec<(String, String)> {
    let mut rows = Vec::with_capacity(record.metadata.len());

    for (key, label) in METADATA_LABELS {
        if let Some(value) = record.metadata.get(*key) {
            if let Some(text) = display_value(value) {
                rows.push((label.to_string(), text));
            }
        }
    }

    for (key, value) in &record.metadata {
        if METADATA_LABELS.iter().any(|(known, _)| known == key) {
            continue;
        }
        if let Some(text) = display_value(value) {
            rows.push((key.clone(), text));
        }
    }

    rows
}

fn display_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
