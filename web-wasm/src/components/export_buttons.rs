//! エクスポートボタンコンポーネント

use leptos::prelude::*;

#[component]
pub fn ExportButtons(
    has_records: Memo<bool>,
    is_loading: Memo<bool>,
    on_export: Callback<()>,
    on_clear: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="export-buttons">
            <button
                class="btn btn-primary"
                disabled=move || !has_records.get()
                on:click=move |_| on_export.run(())
            >
                "JSON出力"
            </button>

            <button
                class="btn btn-secondary"
                disabled=move || !has_records.get() || is_loading.get()
                on:click=move |_| on_clear.run(())
            >
                "すべてクリア"
            </button>
        </div>
    }
}
