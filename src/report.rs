//! 分類結果のターミナル表示

use doc_classify_common::aggregator::group_records;
use doc_classify_common::{
    metadata_rows, presentation_status, PresentationStatus, ProcessedFileRecord, RecordFilter,
    RejectedFile, SessionController,
};
use std::fmt::Write;

/// カテゴリ別の結果一覧を文字列化
pub fn render_results(session: &SessionController, filter: &RecordFilter) -> String {
    let records = session.filter(filter);
    let mut out = String::new();

    if records.is_empty() {
        if filter.is_empty() {
            out.push_str("（結果なし）\n");
        } else {
            out.push_str("（条件に一致する結果なし）\n");
        }
        return out;
    }

    for group in group_records(records) {
        let _ = writeln!(out, "📂 {} ({})", group.category, group.records.len());
        for record in group.records {
            render_record(&mut out, record);
        }
        out.push('\n');
    }

    out
}

fn render_record(out: &mut String, record: &ProcessedFileRecord) {
    let status = presentation_status(record);

    if let Some(error) = &record.error {
        let _ = writeln!(out, "  {} {}  {}", status.icon(), record.original_name, error);
        return;
    }

    let subcategory = if record.subcategory.is_empty() {
        String::new()
    } else {
        format!("  [{}]", record.subcategory)
    };
    let _ = writeln!(
        out,
        "  {} {} → {}{}",
        status.icon(),
        record.original_name,
        record.display_name(),
        subcategory
    );

    if let Some(id) = &record.id_validation {
        let _ = writeln!(
            out,
            "     ID: {}{}{}",
            verdict_text(id.is_valid),
            id.id_type.as_deref().map(|t| format!(" ({})", t)).unwrap_or_default(),
            id.confidence
                .map(|c| format!(" {:.0}%", c * 100.0))
                .unwrap_or_default()
        );
    }

    if let Some(date) = &record.date_validation {
        let age = match (date.days_old, date.max_allowed_days) {
            (Some(days), Some(max)) => format!(" ({}/{}日)", days, max),
            (Some(days), None) => format!(" ({}日)", days),
            _ => String::new(),
        };
        let _ = writeln!(out, "     日付: {}{}", verdict_text(date.is_valid), age);
    }

    let rows = metadata_rows(record);
    if !rows.is_empty() {
        let joined: Vec<String> = rows.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        let _ = writeln!(out, "     {}", joined.join(" / "));
    }
}

fn verdict_text(verdict: Option<bool>) -> &'static str {
    match verdict {
        Some(true) => "OK",
        Some(false) => "NG",
        None => "判定不能",
    }
}

/// 除外ファイルの一覧
pub fn render_excluded(excluded: &[RejectedFile]) -> String {
    let mut out = String::new();
    for file in excluded {
        let _ = writeln!(out, "⚠ 除外: {} ({})", file.name, file.reason);
    }
    out
}

/// ステータス別の件数サマリ
pub fn render_summary(session: &SessionController) -> String {
    let records = session.records();
    let counts: Vec<String> = PresentationStatus::ALL
        .iter()
        .map(|status| {
            let n = records
                .iter()
                .filter(|r| presentation_status(r) == *status)
                .count();
            (status, n)
        })
        .filter(|(_, n)| *n > 0)
        .map(|(status, n)| format!("{} {} {}", status.icon(), status.label(), n))
        .collect();

    format!("合計 {}件: {}", records.len(), counts.join(", "))
}
