//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::api::classify::{read_files, FetchTransport, DEFAULT_BASE_URL};
use crate::components::{
    error_banner::ErrorBanner,
    export_buttons::ExportButtons,
    header::Header,
    preview_modal::PreviewModal,
    progress_bar::ProgressBar,
    results_panel::ResultsPanel,
    settings_panel::SettingsPanel,
    upload_area::UploadArea,
};
use crate::download::{download_artifact, today};
use doc_classify_common::{
    validate_base_url, GatewayError, RecordFilter, RecordId, SessionController, UploadGateway,
};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let session = RwSignal::new(SessionController::new());
    let (base_url, set_base_url) = signal(DEFAULT_BASE_URL.to_string());
    let (filter, set_filter) = signal(RecordFilter::default());

    let is_loading = Memo::new(move |_| session.with(|s| s.is_loading()));
    let has_records = Memo::new(move |_| session.with(|s| !s.records().is_empty()));

    // ファイル追加 → 送信
    let on_files = Callback::new(move |files: Vec<web_sys::File>| {
        if files.is_empty() {
            return;
        }

        let ticket = match session.try_update(|s| s.begin_submission()) {
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                web_sys::console::warn_1(&e.to_string().into());
                return;
            }
            None => return,
        };

        let url = base_url.get_untracked();
        if let Err(e) = validate_base_url(&url) {
            session.update(|s| {
                let _ = s.complete_submission(ticket, Err(GatewayError::Other(e.to_string())));
            });
            return;
        }

        spawn_local(async move {
            let (blobs, unreadable) = read_files(files).await;
            let accepted = session.try_update(|s| {
                s.record_excluded(ticket, unreadable)?;
                s.screen(ticket, blobs)
            });
            let Some(Ok(accepted)) = accepted else {
                return;
            };

            let gateway = UploadGateway::new(FetchTransport::new(&url));
            let outcome = gateway.submit(accepted).await;

            session.update(|s| {
                if let Err(e) = s.complete_submission(ticket, outcome) {
                    web_sys::console::error_1(&e.to_string().into());
                }
            });
        });
    });

    let on_remove = Callback::new(move |id: RecordId| {
        session.update(|s| {
            s.remove(id);
        });
    });

    let on_preview = Callback::new(move |id: RecordId| {
        session.update(|s| {
            s.open_preview(id);
        });
    });

    let on_close_preview = Callback::new(move |_: ()| session.update(|s| s.close_preview()));

    let on_dismiss_error = Callback::new(move |_: ()| session.update(|s| s.dismiss_error()));

    // JSON出力ハンドラ
    let on_export = Callback::new(move |_: ()| {
        let Some(date) = today() else {
            return;
        };
        let result = session.with_untracked(|s| s.export(date));
        match result {
            Ok(artifact) => {
                if let Err(e) = download_artifact(&artifact) {
                    web_sys::console::error_2(&"ダウンロード失敗".into(), &e);
                }
            }
            Err(e) => web_sys::console::error_1(&e.to_string().into()),
        }
    });

    let on_clear = Callback::new(move |_: ()| {
        session.update(|s| {
            if let Err(e) = s.clear() {
                web_sys::console::warn_1(&e.to_string().into());
            }
        });
        set_filter.set(RecordFilter::default());
    });

    view! {
        <div class="container">
            <Header />

            <SettingsPanel base_url=base_url set_base_url=set_base_url is_loading=is_loading />

            <ErrorBanner session=session on_dismiss=on_dismiss_error />

            <UploadArea is_loading=is_loading on_files=on_files />

            <Show when=move || is_loading.get()>
                <ProgressBar />
            </Show>

            <Show
                when=move || has_records.get()
                fallback=|| view! { <p class="text-muted">"書類をドラッグ&ドロップまたはクリックしてアップロード"</p> }
            >
                <ResultsPanel
                    session=session
                    filter=filter
                    set_filter=set_filter
                    on_remove=on_remove
                    on_preview=on_preview
                />
            </Show>

            <PreviewModal session=session on_close=on_close_preview />

            <ExportButtons
                has_records=has_records
                is_loading=is_loading
                on_export=on_export
                on_clear=on_clear
            />
        </div>
    }
}
