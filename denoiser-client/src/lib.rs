//! `reqwest` transport for the denoising endpoint.
//!
//! Works natively and on `wasm32`, where requests go through the browser's
//! `fetch` with credentials so the session cookie is sent along.

use std::time::Duration;

use async_trait::async_trait;
use denoiser_core::{
    DenoiseRequest, DenoiseResponse, DenoiseTransport, TransportError, AUDIO_FIELD_NAME,
    CSRF_HEADER_NAME, DENOISE_PATH,
};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Whole-request timeout. Ignored in the browser.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// `<base>/api/denoise/`, tolerating a trailing slash on the base.
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), DENOISE_PATH)
}

#[derive(Clone, Debug)]
pub struct DenoiseClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DenoiseClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let endpoint = endpoint_url(&config.base_url);
        reqwest::Url::parse(&endpoint).map_err(|e| ClientError::InvalidEndpoint {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        let http = builder.build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// The `audio_file` form part. `Part::bytes` needs owned `'static` data, so
/// the shared input buffer is copied once per request.
fn audio_part(request: &DenoiseRequest) -> Result<Part, TransportError> {
    Part::bytes(request.audio.to_vec())
        .file_name(request.file_name.clone())
        .mime_str("audio/wav")
        .map_err(|e| TransportError::new(e.to_string()))
}

#[async_trait(?Send)]
impl DenoiseTransport for DenoiseClient {
    async fn send(&self, request: DenoiseRequest) -> Result<DenoiseResponse, TransportError> {
        let form = Form::new().part(AUDIO_FIELD_NAME, audio_part(&request)?);

        let mut builder = self.http.post(&self.endpoint).multipart(form);
        if let Some(token) = request.csrf_token.as_deref() {
            builder = builder.header(CSRF_HEADER_NAME, token);
        }
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }

        log::info!(
            "POST {} ({}, {} bytes)",
            self.endpoint,
            request.file_name,
            request.audio.len()
        );
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, CONTENT_DISPOSITION);
        log::debug!("Response {} {}", status.as_u16(), status_text);

        let body = if status.is_success() {
            response
                .bytes()
                .await
                .map_err(|e| TransportError::new(format!("reading response body: {e}")))?
                .to_vec()
        } else {
            Vec::new()
        };

        Ok(DenoiseResponse {
            status: status.as_u16(),
            status_text,
            content_type,
            content_disposition,
            body,
        })
    }
}
