use std::time::{Duration, Instant};

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use url::Url;

use crate::accumulate::accumulate_reply;
use crate::chat::ChatConfig;
use crate::error::{Error, Result};
use crate::ndjson::process_ndjson;
use crate::observability::{CHAT_REQUEST_DURATION, CHAT_REQUEST_ERRORS, CHAT_REQUESTS};
use crate::transport::ChatTransport;
use crate::types::{ChatRequest, StreamChunk};

/// Client for an Ollama-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct Ollama {
    client: ReqwestClient,
    chat_url: Url,
    timeout: Duration,
}

impl Ollama {
    /// Create a new client for the endpoint described by `config`.
    ///
    /// `config.timeout` bounds connecting, waiting for the response headers,
    /// and every gap between body reads.  It does not bound the total length
    /// of a reply.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let chat_url = config.chat_url()?;
        let timeout = config.timeout;
        let client = ReqwestClient::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            chat_url,
            timeout,
        })
    }

    /// The full chat endpoint address.
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// The per-read timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/x-ndjson"),
        );
        headers
    }

    /// Process a non-success response into our Error type.
    ///
    /// Ollama reports failures as `{"error": "..."}`; anything else is passed
    /// through verbatim.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();

        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| {
                let trimmed = error_body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });

        Error::api(status.as_u16(), message)
    }

    /// Send a chat request and get a streaming response.
    ///
    /// Returns a lazy stream of decoded records.  The stream is not
    /// restartable; issue a new request to retry.
    pub async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<impl Stream<Item = Result<StreamChunk>>> {
        let timeout_secs = Some(self.timeout.as_secs_f64());
        let send = self
            .client
            .post(self.chat_url.clone())
            .headers(Self::default_headers())
            .json(request)
            .send();

        let response = match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result.map_err(|e| Error::from_reqwest(e, timeout_secs))?,
            Err(_) => {
                return Err(Error::timeout(
                    "no response from server",
                    timeout_secs,
                ));
            }
        };

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let bytes = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e)))
            })
        });

        Ok(process_ndjson(bytes))
    }
}

#[async_trait::async_trait]
impl ChatTransport for Ollama {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        CHAT_REQUESTS.click();
        let start = Instant::now();
        tracing::debug!(
            url = %self.chat_url,
            model = %request.model,
            turns = request.messages.len(),
            "sending chat request"
        );

        let result = match self.chat_stream(request).await {
            Ok(chunks) => accumulate_reply(chunks, Some(self.timeout)).await,
            Err(err) => Err(err),
        };

        CHAT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CHAT_REQUEST_ERRORS.click();
            tracing::debug!(error = %err, "chat request failed");
        }
        result
    }
}
