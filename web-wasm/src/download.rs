//! ブラウザでのファイル保存

use chrono::NaiveDate;
use doc_classify_common::ExportArtifact;
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const REVOKE_DELAY_MS: u32 = 1_000;

/// エクスポート結果をダウンロードさせる
pub fn download_artifact(artifact: &ExportArtifact) -> Result<(), JsValue> {
    let bag = BlobPropertyBag::new();
    bag.set_type(artifact.mime_type);

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(artifact.bytes.as_slice()));
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is unavailable"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.file_name);
    anchor.click();

    // クリック直後に解放するとダウンロードが始まらないブラウザがある
    Timeout::new(REVOKE_DELAY_MS, move || {
        let _ = Url::revoke_object_url(&url);
    })
    .forget();

    Ok(())
}

/// ブラウザのローカル日付
pub fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_today_matches_browser_clock() {
        let now = js_sys::Date::new_0();
        let date = today().expect("browser date out of range");

        assert_eq!(date.format("%Y").to_string(), now.get_full_year().to_string());
        assert_eq!(date.format("%-d").to_string(), now.get_date().to_string());
    }
}
