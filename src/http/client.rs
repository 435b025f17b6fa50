use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Proxy};
use tracing::debug;

use super::request::RequestInput;
use super::response::HttpResponse;
use crate::environment::{SuiteConfig, expand_path};
use crate::error::{Result, SuiteError};
use crate::history::{ExchangeEntry, History};

/// HTTP client bound to one pet-store base URL.
///
/// Requests are sent one at a time; every exchange, failed or not, is kept
/// in the client's history.
#[derive(Debug)]
pub struct PetStoreClient {
    client: Client,
    base_url: String,
    history: History,
}

impl PetStoreClient {
    pub fn new(config: &SuiteConfig) -> Result<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        if let Some(ref proxy_url) = config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|err| SuiteError::InvalidConfig {
                field: "proxy_url".to_string(),
                reason: err.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(SuiteError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            history: History::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn url_for(&self, input: &RequestInput) -> Result<String> {
        let path = expand_path(&input.path, &input.path_params)?;
        Ok(format!("{}{}", self.base_url, path))
    }

    pub async fn send(&mut self, input: RequestInput) -> Result<HttpResponse> {
        let url = self.url_for(&input)?;
        let timestamp = unix_timestamp();
        let started = Instant::now();

        let result = self.execute(&input, &url, started).await;

        let entry = match &result {
            Ok(response) => ExchangeEntry {
                timestamp,
                method: input.method,
                url: url.clone(),
                status: Some(response.status),
                content_type: Some(response.content_type.clone()),
                duration_ms: Some(response.duration_ms),
                error: None,
            },
            Err(err) => ExchangeEntry {
                timestamp,
                method: input.method,
                url: url.clone(),
                status: None,
                content_type: None,
                duration_ms: None,
                error: Some(err.to_string()),
            },
        };
        debug!(method = %entry.method, url = %entry.url, status = ?entry.status, "exchange");
        self.history.push(entry);

        result
    }

    async fn execute(&self, input: &RequestInput, url: &str, started: Instant) -> Result<HttpResponse> {
        let mut request = self
            .client
            .request(input.method.into(), url)
            .headers(request_headers(input)?);

        if !input.query.is_empty() {
            request = request.query(&input.query);
        }
        if let Some(ref body) = input.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/plain")
            .to_string();

        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status: status.as_u16(),
            content_type,
            body,
            duration_ms: started.elapsed().as_millis(),
        })
    }
}

fn request_headers(input: &RequestInput) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(ref accept) = input.accept {
        headers.insert(ACCEPT, header_value("accept", accept)?);
    }
    if let Some(ref content_type) = input.content_type {
        headers.insert(CONTENT_TYPE, header_value("content-type", content_type)?);
    }
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<reqwest::header::HeaderValue> {
    reqwest::header::HeaderValue::from_str(value).map_err(|err| SuiteError::InvalidConfig {
        field: name.to_string(),
        reason: format!("invalid header value `{value}`: {err}"),
    })
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
