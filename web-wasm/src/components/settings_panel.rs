//! 設定パネルコンポーネント

use leptos::prelude::*;
use doc_classify_common::validate_base_url;

#[component]
pub fn SettingsPanel(
    base_url: ReadSignal<String>,
    set_base_url: WriteSignal<String>,
    is_loading: Memo<bool>,
) -> impl IntoView {
    let is_valid = move || validate_base_url(&base_url.get()).is_ok();

    view! {
        <div class="settings-panel">
            <div class="settings-grid">
                <div class="form-group">
                    <label for="base-url">"分類サービスURL"</label>
                    <input
                        type="url"
                        id="base-url"
                        placeholder="http://localhost:8000"
                        disabled=move || is_loading.get()
                        prop:value=move || base_url.get()
                        on:input=move |ev| {
                            set_base_url.set(event_target_value(&ev).trim().to_string());
                        }
                    />
                    <Show when=move || !is_valid()>
                        <div class="settings-warning">"http:// または https:// で始まるURLを入力してください"</div>
                    </Show>
                </div>
            </div>
        </div>
    }
}
