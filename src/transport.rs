//! reqwest による Transport 実装
//!
//! `POST {base_url}/classify` にマルチパート（`files` パートをファイル数分）で送信する。

use crate::error::Result;
use doc_classify_common::{
    classify_url, FileBlob, HttpReply, Transport, TransportError, REQUEST_TIMEOUT,
};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const USER_AGENT: &str = concat!("doc-classify/", env!("CARGO_PKG_VERSION"));

pub struct ReqwestTransport {
    http_client: reqwest::Client,
    url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: classify_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, files: &[FileBlob]) -> std::result::Result<HttpReply, TransportError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content.clone())
                .file_name(file.name.clone())
                .mime_str(&file.effective_mime_type())
                .map_err(map_reqwest_error)?;
            form = form.part("files", part);
        }

        tracing::debug!(url = %self.url, files = files.len(), "POST classify");

        let response = self
            .http_client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpReply { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
