//! 結果集約
//!
//! 処理済みレコードのコレクションを所有する。
//! - ID付与（単調増加、clear後も再利用しない）
//! - 追加・削除・全消去
//! - カテゴリ別グルーピング（読み出し時に毎回計算）

use crate::presenter::{presentation_status, PresentationStatus};
use crate::types::{BatchResponse, ProcessedFileRecord, RecordId};
use std::collections::HashMap;

/// カテゴリ別のグループ
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub records: Vec<&'a ProcessedFileRecord>,
}

/// 絞込み条件（未指定の項目は全件一致）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub category: Option<String>,
    pub status: Option<PresentationStatus>,
}

impl RecordFilter {
    pub fn matches(&self, record: &ProcessedFileRecord) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| record.category == c);
        let status_ok = self
            .status
            .map_or(true, |s| presentation_status(record) == s);
        category_ok && status_ok
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    records: Vec<ProcessedFileRecord>,
    next_id: u64,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// レスポンスの全エントリをレコード化して末尾に追加
    ///
    /// 追加したレコードのIDをレスポンス順で返す
    pub fn append(&mut self, response: &BatchResponse) -> Vec<RecordId> {
        let mut ids = Vec::with_capacity(response.len());

        for (original_name, entry) in response.iter() {
            let id = self.issue_id();
            self.records
                .push(ProcessedFileRecord::from_response(id, original_name, entry));
            ids.push(id);
        }

        tracing::debug!(added = ids.len(), total = self.records.len(), "records appended");
        ids
    }

    /// 指定IDのレコードを削除
    pub fn remove(&mut self, id: RecordId) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(index) => {
                self.records.remove(index);
                tracing::debug!(%id, "record removed");
                true
            }
            None => false,
        }
    }

    /// 全レコードを削除
    pub fn clear(&mut self) {
        self.records.clear();
        tracing::debug!("records cleared");
    }

    pub fn get(&self, id: RecordId) -> Option<&ProcessedFileRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// 追加順のレコード
    pub fn records(&self) -> &[ProcessedFileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// カテゴリ別にグルーピング
    ///
    /// グループは初出順、グループ内はコレクション順
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        group_records(self.records.iter())
    }

    /// 条件に一致するレコード（コレクション順）
    pub fn filter(&self, filter: &RecordFilter) -> Vec<&ProcessedFileRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// カテゴリごとの件数（初出順）
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.group_by_category()
            .into_iter()
            .map(|g| (g.category, g.records.len()))
            .collect()
    }

    fn issue_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(self.next_id)
    }
}

/// 任意のレコード列をカテゴリ別にグルーピング
pub fn group_records<'a>(
    records: impl IntoIterator<Item = &'a ProcessedFileRecord>,
) -> Vec<CategoryGroup<'a>> {
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for record in records {
        let category = record.category.as_str();
        match index.get(category) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(category, groups.len());
                groups.push(CategoryGroup {
                    category,
                    records: vec![record],
                });
            }
        }
    }

    groups
}
