//! エラーバナー

use leptos::prelude::*;
use doc_classify_common::SessionController;

#[component]
pub fn ErrorBanner(
    session: RwSignal<SessionController>,
    on_dismiss: Callback<()>,
) -> impl IntoView {
    let message = Memo::new(move |_| session.with(|s| s.last_error().map(str::to_string)));
    let excluded = Memo::new(move |_| {
        session.with(|s| {
            s.excluded()
                .iter()
                .map(|f| format!("{} ({})", f.name, f.reason))
                .collect::<Vec<_>>()
        })
    });

    view! {
        <Show when=move || message.get().is_some()>
            <div class="error-banner" role="alert">
                <span>{move || message.get().unwrap_or_default()}</span>
                <button class="btn btn-tertiary btn-small" on:click=move |_| on_dismiss.run(())>
                    "閉じる"
                </button>
            </div>
        </Show>

        <Show when=move || !excluded.get().is_empty()>
            <div class="excluded-list">
                <p>"送信されなかったファイル:"</p>
                <ul>
                    {move || excluded.get().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            </div>
        </Show>
    }
}
