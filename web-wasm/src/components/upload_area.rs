//! アップロードエリアコンポーネント

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, FileList, HtmlInputElement};

const ACCEPT: &str = ".pdf,.png,.jpg,.jpeg,.tif,.tiff,.bmp,application/pdf,image/png,image/jpeg,image/tiff,image/bmp";

#[component]
pub fn UploadArea(
    is_loading: Memo<bool>,
    on_files: Callback<Vec<web_sys::File>>,
) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let is_enabled = move || !is_loading.get();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if !is_enabled() {
            return;
        }

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            on_files.run(collect_files(&files));
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if is_enabled() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if !is_enabled() {
            return;
        }
        if let Err(e) = open_file_dialog(on_files) {
            web_sys::console::error_2(&"ファイル選択を開けません".into(), &e);
        }
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if !is_enabled() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <div class="upload-icon">"📄"</div>
            <p>"書類をドラッグ&ドロップ または クリックして選択"</p>
            <p class="text-muted">"対応形式: PDF, PNG, JPEG, TIFF, BMP（1ファイル10MBまで）"</p>
        </div>
    }
}

fn collect_files(files: &FileList) -> Vec<web_sys::File> {
    (0..files.length()).filter_map(|i| files.get(i)).collect()
}

/// ファイル選択ダイアログを開く
fn open_file_dialog(on_files: Callback<Vec<web_sys::File>>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;
    let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
    input.set_type("file");
    input.set_accept(ACCEPT);
    input.set_multiple(true);

    let input_clone = input.clone();
    let closure = Closure::once(move |_: web_sys::Event| {
        if let Some(files) = input_clone.files() {
            on_files.run(collect_files(&files));
        }
    });

    input.set_onchange(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
    input.click();
    Ok(())
}
