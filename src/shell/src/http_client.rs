//! Device transport
//!
//! Executes the core's HTTP requests and image uploads against the garage
//! door controller. Transport failures are reported to the core as
//! [`HttpError::Io`] or [`HttpError::Timeout`]; any HTTP status, including
//! errors, is a regular response.

use anyhow::{Context, Result};
use crux_http::{
    protocol::{HttpRequest, HttpResponse, HttpResult},
    HttpError,
};
use garage_panel_core::{UploadOperation, UploadOutput, BASE_URL};
use log::{debug, info, warn};
use reqwest::{
    multipart::{Form, Part},
    Client, Method,
};
use std::path::Path;
use trait_variant::make;

use crate::config::DeviceConfig;

#[make(Send)]
pub trait DeviceTransport {
    async fn execute(&self, request: HttpRequest) -> HttpResult;
    async fn upload(&self, upload: UploadOperation) -> UploadOutput;
}

/// Rewrite a core URL (`http://device/...`) onto the configured device address
///
/// # Examples
/// ```
/// use garage_panel::http_client::device_url;
///
/// let url = device_url("http://192.168.4.1", "http://device/api/doorStatus");
/// assert_eq!(url, "http://192.168.4.1/api/doorStatus");
/// ```
pub fn device_url(device: &str, url: &str) -> String {
    match url.strip_prefix(BASE_URL) {
        Some(path) => format!("{device}{path}"),
        None => url.to_string(),
    }
}

/// reqwest backed transport talking to the real device
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    device_url: String,
    upload_path: String,
}

impl ReqwestTransport {
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            device_url: config.url.clone(),
            upload_path: config.upload_path.clone(),
        })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = device_url(&self.device_url, &request.url);
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| HttpError::Io(format!("invalid method {}: {e}", request.method)))?;
        info!("{method} {url}");

        let mut builder = self.client.request(method, &url);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();

        let mut result = HttpResponse::status(status);
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                result.header(name.as_str(), value);
            }
        }
        let body = response.bytes().await.map_err(transport_error)?;
        debug!("{url} answered {status} with {} bytes", body.len());

        Ok(result.body(body.to_vec()).build())
    }

    async fn submit(&self, upload: &UploadOperation) -> Result<u16> {
        let path = Path::new(&upload.file);
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", upload.file))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| upload.file.clone());

        let url = format!("{}{}", self.device_url, self.upload_path);
        info!(
            "POST {url} ({} image, {} bytes)",
            upload.kind.field_name(),
            content.len()
        );

        let part = Part::bytes(content).file_name(file_name);
        let form = Form::new().part(upload.kind.field_name(), part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context(format!("failed to send POST request to {url}"))?;

        Ok(response.status().as_u16())
    }
}

fn transport_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Io(e.to_string())
    }
}

impl DeviceTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> HttpResult {
        match self.send(request).await {
            Ok(response) => HttpResult::Ok(response),
            Err(e) => {
                warn!("request failed: {e}");
                HttpResult::Err(e)
            }
        }
    }

    async fn upload(&self, upload: UploadOperation) -> UploadOutput {
        match self.submit(&upload).await {
            Ok(status) => UploadOutput::Completed { status },
            Err(e) => {
                warn!("upload failed: {e:#}");
                UploadOutput::Failed {
                    message: format!("{e:#}"),
                }
            }
        }
    }
}
