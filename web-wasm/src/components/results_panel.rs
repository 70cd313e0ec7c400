//! 分類結果パネル
//!
//! カテゴリ別のグループ表示、カテゴリ・ステータスでの絞り込み、
//! 検証バッジ、プレビュー/削除ボタン

use leptos::prelude::*;
use doc_classify_common::aggregator::group_records;
use doc_classify_common::{
    metadata_rows, presentation_status, PresentationStatus, ProcessedFileRecord, RecordFilter,
    RecordId, SessionController,
};

/// 表示用のグループ（所有データ）
#[derive(Clone, PartialEq)]
struct GroupView {
    category: String,
    records: Vec<ProcessedFileRecord>,
}

#[component]
pub fn ResultsPanel(
    session: RwSignal<SessionController>,
    filter: ReadSignal<RecordFilter>,
    set_filter: WriteSignal<RecordFilter>,
    on_remove: Callback<RecordId>,
    on_preview: Callback<RecordId>,
) -> impl IntoView {
    let categories = Memo::new(move |_| {
        session.with(|s| {
            s.aggregator()
                .category_counts()
                .into_iter()
                .map(|(category, n)| (category.to_string(), n))
                .collect::<Vec<_>>()
        })
    });

    let groups = Memo::new(move |_| {
        let filter = filter.get();
        session.with(|s| {
            group_records(s.filter(&filter))
                .into_iter()
                .map(|g| GroupView {
                    category: g.category.to_string(),
                    records: g.records.into_iter().cloned().collect(),
                })
                .collect::<Vec<_>>()
        })
    });

    let on_category_change = move |ev| {
        let value = event_target_value(&ev);
        set_filter.update(|f| f.category = (!value.is_empty()).then_some(value));
    };

    let on_status_change = move |ev| {
        let value = event_target_value(&ev);
        set_filter.update(|f| f.status = value.parse::<PresentationStatus>().ok());
    };

    view! {
        <div class="results-panel">
            <div class="results-filter">
                <label for="category-filter">"カテゴリ"</label>
                <select id="category-filter" on:change=on_category_change>
                    <option value="" selected=move || filter.get().category.is_none()>"すべて"</option>
                    {move || {
                        categories
                            .get()
                            .into_iter()
                            .map(|(category, n)| {
                                let selected_value = category.clone();
                                let selected = move || filter.get().category.as_deref() == Some(selected_value.as_str());
                                view! {
                                    <option value=category.clone() selected=selected>
                                        {format!("{} ({})", category, n)}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>

                <label for="status-filter">"ステータス"</label>
                <select id="status-filter" on:change=on_status_change>
                    <option value="" selected=move || filter.get().status.is_none()>"すべて"</option>
                    {PresentationStatus::ALL
                        .iter()
                        .map(|status| {
                            let status = *status;
                            view! {
                                <option
                                    value=status.as_str()
                                    selected=move || filter.get().status == Some(status)
                                >
                                    {format!("{} {}", status.icon(), status.label())}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <Show
                when=move || !groups.get().is_empty()
                fallback=|| view! { <p class="text-muted">"条件に一致する結果はありません"</p> }
            >
                {move || {
                    groups
                        .get()
                        .into_iter()
                        .map(|group| {
                            view! {
                                <section class="category-group">
                                    <h2>{format!("{} ({})", group.category, group.records.len())}</h2>
                                    {group
                                        .records
                                        .into_iter()
                                        .map(|record| view! {
                                            <RecordCard record=record on_remove=on_remove on_preview=on_preview />
                                        })
                                        .collect_view()}
                                </section>
                            }
                        })
                        .collect_view()
                }}
            </Show>
        </div>
    }
}

#[component]
fn RecordCard(
    record: ProcessedFileRecord,
    on_remove: Callback<RecordId>,
    on_preview: Callback<RecordId>,
) -> impl IntoView {
    let id = record.id;
    let status = presentation_status(&record);
    let rows = metadata_rows(&record);
    let has_preview = !record.preview.is_empty();

    let subcategory = (!record.subcategory.is_empty()).then(|| {
        view! { <span class="record-subcategory">{record.subcategory.clone()}</span> }
    });

    let id_line = record.id_validation.as_ref().map(|v| {
        let mut text = format!("ID: {}", verdict_text(v.is_valid));
        if let Some(id_type) = &v.id_type {
            text.push_str(&format!(" ({})", id_type));
        }
        if let Some(confidence) = v.confidence {
            text.push_str(&format!(" {:.0}%", confidence * 100.0));
        }
        view! { <li class=verdict_class(v.is_valid)>{text}</li> }
    });

    let date_line = record.date_validation.as_ref().map(|v| {
        let mut text = format!("日付: {}", verdict_text(v.is_valid));
        match (v.days_old, v.max_allowed_days) {
            (Some(days), Some(max)) => text.push_str(&format!(" ({}日経過 / 上限{}日)", days, max)),
            (Some(days), None) => text.push_str(&format!(" ({}日経過)", days)),
            _ => {}
        }
        view! { <li class=verdict_class(v.is_valid)>{text}</li> }
    });

    let body = match &record.error {
        Some(error) => view! { <p class="record-error">{error.clone()}</p> }.into_any(),
        None => view! {
            <div class="record-details">
                <p class="record-renamed">{record.display_name().to_string()} {subcategory}</p>
                <ul class="record-validation">{id_line} {date_line}</ul>
                <dl class="record-metadata">
                    {rows
                        .into_iter()
                        .map(|(label, value)| view! { <dt>{label}</dt> <dd>{value}</dd> })
                        .collect_view()}
                </dl>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class=format!("record-card status-{}", status.as_str())>
            <div class="record-header">
                <span class="status-badge" title=status.label()>{status.icon()}</span>
                <span class="record-name">{record.original_name.clone()}</span>
            </div>
            {body}
            <div class="record-actions">
                <button
                    class="btn btn-secondary btn-small"
                    disabled=!has_preview
                    on:click=move |_| on_preview.run(id)
                >
                    "プレビュー"
                </button>
                <button class="btn btn-tertiary btn-small" on:click=move |_| on_remove.run(id)>
                    "削除"
                </button>
            </div>
        </div>
    }
}

fn verdict_text(verdict: Option<bool>) -> &'static str {
    match verdict {
        Some(true) => "OK",
        Some(false) => "NG",
        None => "判定不能",
    }
}

fn verdict_class(verdict: Option<bool>) -> &'static str {
    match verdict {
        Some(true) => "verdict-ok",
        Some(false) => "verdict-ng",
        None => "verdict-unknown",
    }
}
