//! JSONエクスポート（CLI/WASM共通）
//!
//! 集約済みレコードを配列形式のJSONに変換する。
//! プレビュー用テキスト（preview）は出力しない。

use crate::error::Result;
use crate::types::{DateValidation, IdValidation, Metadata, ProcessedFileRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 出力ファイル名の接頭辞
pub const EXPORT_FILE_PREFIX: &str = "mortgage_classification_results";

/// 出力ファイルのMIMEタイプ
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// エクスポート1件分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub original_name: String,
    pub renamed: String,
    pub category: String,
    pub subcategory: String,
    pub metadata: Metadata,
    pub validation: ExportValidation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportValidation {
    pub id_validation: Option<IdValidation>,
    pub date_validation: Option<DateValidation>,
}

impl From<&ProcessedFileRecord> for ExportEntry {
    fn from(record: &ProcessedFileRecord) -> Self {
        Self {
            original_name: record.original_name.clone(),
            renamed: record.renamed.clone(),
            category: record.category.clone(),
            subcategory: record.subcategory.clone(),
            metadata: record.metadata.clone(),
            validation: ExportValidation {
                id_validation: record.id_validation.clone(),
                date_validation: record.date_validation.clone(),
            },
        }
    }
}

/// ダウンロード用の成果物
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// 推奨ファイル名 `mortgage_classification_results_YYYY-MM-DD.json`
pub fn suggested_filename(date: NaiveDate) -> String {
    format!("{}_{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// レコードをJSON配列に変換（コレクション順）
pub fn serialize_records<'a>(
    records: impl IntoIterator<Item = &'a ProcessedFileRecord>,
    date: NaiveDate,
) -> Result<ExportArtifact> {
    let entries: Vec<ExportEntry> = records.into_iter().map(ExportEntry::from).collect();
    let bytes = serde_json::to_vec_pretty(&entries)?;

    tracing::debug!(entries = entries.len(), bytes = bytes.len(), "export serialized");

    Ok(ExportArtifact {
        bytes,
        file_name: suggested_filename(date),
        mime_type: EXPORT_MIME_TYPE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ResultAggregator;
    use crate::types::{BatchResponse, ClassificationResponse};
    use serde_json::Value;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).expect("日付が不正")
    }

    fn aggregator_with(names: &[&str]) -> ResultAggregator {
        let response: BatchResponse = names
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    ClassificationResponse {
                        renamed: Some(format!("renamed_{}", name)),
                        category: Some("Income".to_string()),
                        subcategory: Some("Paystub".to_string()),
                        text: Some("very long extracted text".to_string()),
                        ..Default::default()
                    },
                )
            })
            .collect();
        let mut agg = ResultAggregator::new();
        agg.append(&response);
        agg
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(
            suggested_filename(date()),
            "mortgage_classification_results_2024-03-09.json"
        );
    }

    #[test]
    fn test_serialize_records_order_and_length() {
        let agg = aggregator_with(&["c.pdf", "a.pdf", "b.png"]);
        let artifact = serialize_records(agg.records(), date()).expect("エクスポート失敗");

        let value: Value = serde_json::from_slice(&artifact.bytes).expect("JSONではない");
        let array = value.as_array().expect("配列ではない");
        assert_eq!(array.len(), 3);
        for (i, record) in agg.records().iter().enumerate() {
            assert_eq!(array[i]["original_name"], Value::String(record.original_name.clone()));
        }
    }

    #[test]
    fn test_serialize_records_excludes_preview() {
        let agg = aggregator_with(&["a.pdf", "b.png"]);
        let artifact = serialize_records(agg.records(), date()).expect("エクスポート失敗");

        let value: Value = serde_json::from_slice(&artifact.bytes).expect("JSONではない");
        for element in value.as_array().expect("配列ではない") {
            let object = element.as_object().expect("オブジェクトではない");
            assert!(!object.contains_key("preview"));
            assert!(!object.contains_key("text"));
        }
        let text = String::from_utf8(artifact.bytes).expect("UTF-8ではない");
        assert!(!text.contains("very long extracted text"));
    }

    #[test]
    fn test_serialize_records_field_shape() {
        let agg = aggregator_with(&["a.pdf"]);
        let artifact = serialize_records(agg.records(), date()).expect("エクスポート失敗");

        let value: Value = serde_json::from_slice(&artifact.bytes).expect("JSONではない");
        let keys: Vec<&String> = value[0].as_object().expect("オブジェクトではない").keys().collect();
        assert_eq!(
            keys,
            vec!["original_name", "renamed", "category", "subcategory", "metadata", "validation"]
        );
        assert_eq!(value[0]["validation"]["id_validation"], Value::Null);
        assert_eq!(value[0]["validation"]["date_validation"], Value::Null);
        assert_eq!(artifact.mime_type, "application/json");
    }

    #[test]
    fn test_serialize_records_empty() {
        let agg = ResultAggregator::new();
        let artifact = serialize_records(agg.records(), date()).expect("エクスポート失敗");
        let value: Value = serde_json::from_slice(&artifact.bytes).expect("JSONではない");
        assert_eq!(value, Value::Array(vec![]));
    }
}
