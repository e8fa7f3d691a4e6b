//! HTTP transport for the catalog backend
//!
//! Every call yields the backend's JSON envelope, whatever the HTTP status.
//! Transport failures and non-JSON bodies are the only errors.

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, multipart};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use shared::Envelope;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: Url,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments..}?{query}`; segments are percent-encoded
    pub fn endpoint(&self, segments: &[&str], query: &[(&'static str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let mut req = self.client.request(method, url);
        if let Some(token) = token {
            // Token is sent verbatim; the backend expects the raw access token
            req = req.header(reqwest::header::AUTHORIZATION, token);
        }
        req
    }

    pub async fn get(&self, url: Url) -> ClientResult<Value> {
        tracing::debug!(%url, "GET");
        let req = self.request(Method::GET, url, None);
        Self::handle_response(req.send().await?).await
    }

    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ClientResult<Value> {
        tracing::debug!(%method, %url, "request");
        let mut req = self.request(method, url, token);
        if let Some(body) = body {
            req = req.json(body);
        }
        Self::handle_response(req.send().await?).await
    }

    pub async fn post_multipart(
        &self,
        url: Url,
        form: multipart::Form,
        token: Option<&str>,
    ) -> ClientResult<Value> {
        tracing::debug!(%url, "POST multipart");
        let req = self.request(Method::POST, url, token).multipart(form);
        Self::handle_response(req.send().await?).await
    }

    /// Read the body as an envelope object, stamping the HTTP status when
    /// the backend omitted it
    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, "backend returned non-success status");
        }
        normalize_envelope(status, &text)
    }
}

/// Parse a response body into an envelope object
///
/// A missing `status` is taken from the HTTP status, a missing `success`
/// from whether that status is 2xx.
fn normalize_envelope(status: StatusCode, text: &str) -> ClientResult<Value> {
    let mut value: Value = serde_json::from_str(text).map_err(|e| {
        ClientError::InvalidResponse(format!("HTTP {status}: body is not JSON ({e})"))
    })?;

    let Some(object) = value.as_object_mut() else {
        return Err(ClientError::InvalidResponse(format!(
            "HTTP {status}: body is not an envelope object"
        )));
    };
    if !object.get("status").is_some_and(Value::is_u64) {
        object.insert("status".into(), Value::from(status.as_u16()));
    }
    if !object.contains_key("success") {
        object.insert("success".into(), Value::Bool(status.is_success()));
    }
    Ok(value)
}

/// Decode a raw envelope into its typed form
pub fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<Envelope<T>> {
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
