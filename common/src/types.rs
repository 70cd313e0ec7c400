//! 分類結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ClassificationResponse: バックエンドが返す1ファイル分の結果（ワイヤ形式）
//! - BatchResponse: 1回のアップロードに対するレスポンス全体（元ファイル名 → 結果、順序保持）
//! - ProcessedFileRecord: 集約後のレコード（クライアント側でIDを付与）

use serde::{Deserialize, Serialize};
use std::fmt;

/// メタデータ（キー順序はレスポンスのまま保持）
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// エラーレコードのカテゴリ
pub const ERROR_CATEGORY: &str = "Error";

/// カテゴリ未設定時のカテゴリ（バックエンドの既定値と同じ）
pub const FALLBACK_CATEGORY: &str = "Other";

/// 本人確認書類の検証結果
///
/// `is_valid` が `None` の場合は判定不能として扱う
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdValidation {
    pub is_valid: Option<bool>,
    pub id_type: Option<String>,
    /// 0.0〜1.0
    pub confidence: Option<f64>,
}

/// 書類日付の鮮度検証結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateValidation {
    pub is_valid: Option<bool>,
    pub days_old: Option<i64>,
    pub max_allowed_days: Option<i64>,
}

/// バックエンドが返す1ファイル分の分類結果
///
/// 値の組み立ては parser::parse_entry が行う（型の揺れを吸収するため）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResponse {
    pub renamed: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub text: Option<String>,
    pub metadata: Metadata,
    pub id_validation: Option<IdValidation>,
    pub date_validation: Option<DateValidation>,
    pub error: Option<String>,
}

/// バッチレスポンス: 元ファイル名 → 分類結果（レスポンスの順序を保持）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResponse {
    entries: Vec<(String, ClassificationResponse)>,
}

impl BatchResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを追加（同名のファイルは位置を保ったまま置換）
    pub fn insert(&mut self, original_name: impl Into<String>, response: ClassificationResponse) {
        let original_name = original_name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == original_name) {
            slot.1 = response;
        } else {
            self.entries.push((original_name, response));
        }
    }

    pub fn get(&self, original_name: &str) -> Option<&ClassificationResponse> {
        self.entries
            .iter()
            .find(|(name, _)| name == original_name)
            .map(|(_, response)| response)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassificationResponse)> {
        self.entries.iter().map(|(name, response)| (name.as_str(), response))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ClassificationResponse)> for BatchResponse {
    fn from_iter<I: IntoIterator<Item = (String, ClassificationResponse)>>(iter: I) -> Self {
        let mut batch = BatchResponse::new();
        for (name, response) in iter {
            batch.insert(name, response);
        }
        batch
    }
}

/// レコードID（セッション内で単調増加、再利用しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec-{}", self.0)
    }
}

/// 集約済みレコード
///
/// 生成後は変更されない。集約器は共有参照しか渡さない。
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFileRecord {
    pub id: RecordId,
    pub original_name: String,
    pub renamed: String,
    pub category: String,
    pub subcategory: String,
    /// 抽出テキスト（プレビュー表示専用）
    pub preview: String,
    pub metadata: Metadata,
    pub id_validation: Option<IdValidation>,
    pub date_validation: Option<DateValidation>,
    pub error: Option<String>,
}

impl ProcessedFileRecord {
    /// レスポンス1件からレコードを生成
    pub(crate) fn from_response(
        id: RecordId,
        original_name: &str,
        response: &ClassificationResponse,
    ) -> Self {
        let error = response
            .error
            .as_ref()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let (renamed, category) = if error.is_some() {
            (String::new(), ERROR_CATEGORY.to_string())
        } else {
            let category = response
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(FALLBACK_CATEGORY)
                .to_string();
            (response.renamed.clone().unwrap_or_default(), category)
        };

        Self {
            id,
            original_name: original_name.to_string(),
            renamed,
            category,
            subcategory: response.subcategory.clone().unwrap_or_default(),
            preview: response.text.clone().unwrap_or_default(),
            metadata: response.metadata.clone(),
            id_validation: response.id_validation.clone(),
            date_validation: response.date_validation.clone(),
            error,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// 表示用のファイル名（リネーム案がなければ元の名前）
    pub fn display_name(&self) -> &str {
        if self.renamed.is_empty() {
            &self.original_name
        } else {
            &self.renamed
        }
    }
}
