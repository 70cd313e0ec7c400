//! APIレスポンスパーサー
//!
//! `/classify` のレスポンス本文（元ファイル名 → 結果 のJSONオブジェクト）を
//! BatchResponse に変換する。
//!
//! 各エントリは寛容にパースする:
//! - `null` や欠落は「なし」
//! - 文字列以外のスカラーは文字列化
//! - 検証結果の `is_valid` は bool のほか "true"/"false" 等の文字列も受け付ける

use crate::error::{Error, Result};
use crate::types::{BatchResponse, ClassificationResponse, DateValidation, IdValidation, Metadata};
use serde_json::{Map, Value};

/// オブジェクト以外のエントリに付けるエラーメッセージ
pub const MALFORMED_ENTRY_ERROR: &str = "Malformed classification result";

/// レスポンス本文をパース
///
/// # Returns
/// * `Ok(BatchResponse)` - レスポンスの順序を保持した結果
/// * `Err` - JSONでない、またはトップレベルがオブジェクトでない場合
pub fn parse_batch_response(body: &str) -> Result<BatchResponse> {
    let value: Value = serde_json::from_str(body.trim())?;

    let Value::Object(entries) = value else {
        return Err(Error::Parse("レスポンスがJSONオブジェクトではありません".into()));
    };

    Ok(entries
        .into_iter()
        .map(|(name, entry)| (name, parse_entry(&entry)))
        .collect())
}

/// 1エントリをパース
pub fn parse_entry(value: &Value) -> ClassificationResponse {
    let Some(map) = value.as_object() else {
        return ClassificationResponse {
            error: Some(MALFORMED_ENTRY_ERROR.to_string()),
            ..Default::default()
        };
    };

    ClassificationResponse {
        renamed: get_string(map, "renamed"),
        category: get_string(map, "category"),
        subcategory: get_string(map, "subcategory"),
        text: get_string(map, "text"),
        metadata: get_metadata(map, "metadata"),
        id_validation: map
            .get("id_validation")
            .and_then(Value::as_object)
            .map(parse_id_validation),
        date_validation: map
            .get("date_validation")
            .and_then(Value::as_object)
            .map(parse_date_validation),
        error: get_string(map, "error").filter(|e| !e.trim().is_empty()),
    }
}

fn parse_id_validation(map: &Map<String, Value>) -> IdValidation {
    IdValidation {
        is_valid: get_bool(map, "is_valid"),
        id_type: get_string(map, "id_type"),
        confidence: get_f64(map, "confidence").map(|c| c.clamp(0.0, 1.0)),
    }
}

fn parse_date_validation(map: &Map<String, Value>) -> DateValidation {
    DateValidation {
        is_valid: get_bool(map, "is_valid"),
        days_old: get_i64(map, "days_old"),
        max_allowed_days: get_i64(map, "max_allowed_days"),
    }
}

fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    let value = map.get(key)?;
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if value.is_null() {
        return None;
    }
    Some(value.to_string())
}

fn get_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = map.get(key)?;
    if let Some(b) = value.as_bool() {
        return Some(b);
    }
    if let Some(s) = value.as_str() {
        return match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        };
    }
    None
}

fn get_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = map.get(key)?;
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    value.as_str().and_then(|s| s.trim().parse().ok())
}

fn get_i64(map: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = map.get(key)?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(n) = value.as_f64() {
        return Some(n as i64);
    }
    value.as_str().and_then(|s| s.trim().parse().ok())
}

fn get_metadata(map: &Map<String, Value>, key: &str) -> Metadata {
    map.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}
