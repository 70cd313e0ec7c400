//! 抽出テキストのプレビュー

use leptos::prelude::*;
use doc_classify_common::SessionController;

#[component]
pub fn PreviewModal(
    session: RwSignal<SessionController>,
    on_close: Callback<()>,
) -> impl IntoView {
    // 削除済みのレコードは参照時に見つからずモーダルが閉じる
    let previewed = Memo::new(move |_| {
        session.with(|s| {
            s.previewed_record()
                .map(|r| (r.original_name.clone(), r.preview.clone()))
        })
    });

    view! {
        {move || {
            previewed.get().map(|(name, text)| {
                view! {
                    <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                        <div class="modal" on:click=|ev| ev.stop_propagation()>
                            <div class="modal-header">
                                <h3>{name}</h3>
                                <button class="btn btn-tertiary btn-small" on:click=move |_| on_close.run(())>
                                    "閉じる"
                                </button>
                            </div>
                            <pre class="modal-body">{text}</pre>
                        </div>
                    </div>
                }
            })
        }}
    }
}
