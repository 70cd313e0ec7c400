//! 分類サービス連携（fetch）
//!
//! `POST {base_url}/classify` に FormData（`files` をファイル数分）で送信する。
//! 30秒で AbortController により中断し Timeout を返す。

use doc_classify_common::{
    classify_url, exceeds_size_limit, FileBlob, HttpReply, RejectReason, RejectedFile, Transport,
    TransportError, REQUEST_TIMEOUT,
};
use futures::future::{self, Either};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub struct FetchTransport {
    url: String,
    timeout_ms: u32,
}

impl FetchTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: classify_url(base_url),
            timeout_ms: REQUEST_TIMEOUT.as_millis() as u32,
        }
    }
}

impl Transport for FetchTransport {
    async fn send(&self, files: &[FileBlob]) -> Result<HttpReply, TransportError> {
        let form = build_form(files).map_err(js_error)?;

        let controller = AbortController::new().map_err(js_error)?;
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);
        opts.set_signal(Some(&controller.signal()));

        let request = Request::new_with_str_and_init(&self.url, &opts).map_err(js_error)?;
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("window is unavailable".to_string()))?;

        let fetch = async {
            let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
            let resp: Response = resp_value.dyn_into()?;
            let text = JsFuture::from(resp.text()?).await?;
            Ok::<_, JsValue>(HttpReply {
                status: resp.status(),
                body: text.as_string().unwrap_or_default(),
            })
        };
        let timeout = TimeoutFuture::new(self.timeout_ms);
        futures::pin_mut!(fetch, timeout);

        match future::select(fetch, timeout).await {
            Either::Left((result, _)) => result.map_err(js_error),
            Either::Right(_) => {
                controller.abort();
                Err(TransportError::Timeout)
            }
        }
    }
}

fn build_form(files: &[FileBlob]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;

    for file in files {
        let bag = BlobPropertyBag::new();
        bag.set_type(&file.effective_mime_type());

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(file.content.as_slice()));
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)?;

        form.append_with_blob_and_filename("files", &blob, &file.name)?;
    }

    Ok(form)
}

fn js_error(err: JsValue) -> TransportError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "request failed".to_string());
    TransportError::Network(message)
}

/// ブラウザのFileを読み込んでFileBlobにする
///
/// MIMEタイプはブラウザの申告値のまま（空ならゲートウェイが拡張子から推定）。
/// サイズ上限を超えるファイルは読み込まずに、読めなかったファイルとともに除外として返す
pub async fn read_files(files: Vec<web_sys::File>) -> (Vec<FileBlob>, Vec<RejectedFile>) {
    let mut blobs = Vec::with_capacity(files.len());
    let mut rejected = Vec::new();

    for file in files {
        let name = file.name();
        let size = file.size() as u64;
        if exceeds_size_limit(size) {
            rejected.push(RejectedFile { name, reason: RejectReason::TooLarge { size } });
            continue;
        }

        let declared = file.type_();
        let file = gloo::file::File::from(file);

        match gloo::file::futures::read_as_bytes(&file).await {
            Ok(content) => blobs.push(FileBlob::new(name, declared, content)),
            Err(e) => {
                web_sys::console::warn_1(&format!("ファイル読み込み失敗: {} ({})", name, e).into());
                rejected.push(RejectedFile { name, reason: RejectReason::Unreadable(e.to_string()) });
            }
        }
    }

    (blobs, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_transport_url() {
        let transport = FetchTransport::new("http://localhost:8000/");
        assert_eq!(transport.url, "http://localhost:8000/classify");
        assert_eq!(transport.timeout_ms, 30_000);
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(classify_url(DEFAULT_BASE_URL), "http://localhost:8000/classify");
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use doc_classify_common::MAX_FILE_BYTES;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn browser_file(name: &str, bytes: &js_sys::Uint8Array) -> web_sys::File {
        let parts = js_sys::Array::new();
        parts.push(bytes);
        web_sys::File::new_with_u8_array_sequence(&parts, name).expect("File creation failed")
    }

    #[wasm_bindgen_test]
    fn wasm_build_form_appends_each_file() {
        let files = vec![
            FileBlob::new("a.pdf", "application/pdf", b"%PDF".to_vec()),
            FileBlob::new("b.png", "", vec![0x89, 0x50]),
        ];

        let form = build_form(&files).expect("form build failed");
        assert_eq!(form.get_all("files").length(), 2);
    }

    #[wasm_bindgen_test]
    async fn wasm_read_files_excludes_oversized_without_reading() {
        let small = browser_file("w2.pdf", &js_sys::Uint8Array::from(&b"%PDF-1.4"[..]));
        let big = browser_file(
            "scan.pdf",
            &js_sys::Uint8Array::new_with_length((MAX_FILE_BYTES + 1) as u32),
        );

        let (blobs, rejected) = read_files(vec![small, big]).await;

        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].name, "w2.pdf");
        assert_eq!(blobs[0].content, b"%PDF-1.4");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].name, "scan.pdf");
        assert_eq!(rejected[0].reason, RejectReason::TooLarge { size: MAX_FILE_BYTES + 1 });
    }
}
