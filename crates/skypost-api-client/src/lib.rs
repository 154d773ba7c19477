//! Shared HTTP client for XRPC endpoints.
//!
//! Provides a minimal client with optional bearer auth, generic GET/POST helpers keyed by
//! lexicon NSID, and domain methods for the personal data server (session, blob upload,
//! service auth, record creation) and the video-processing service (upload, job status).
//! The CLI and the attachment pipeline use this client directly.

pub mod error;
pub mod pds;
pub mod video;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

pub use error::{ApiError, ApiResult};
pub use pds::CreateRecordResponse;
pub use video::{service_audience, VideoServiceClient};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared `reqwest` client. Requests have no overall timeout unless a call sets one.
pub fn http_client() -> ApiResult<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("skypost/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| ApiError::Transport {
            operation: "client setup",
            source,
        })
}

/// HTTP client for one XRPC host with optional bearer auth.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self::with_client(http_client()?, base_url))
    }

    /// Reuse an existing connection pool.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: None,
        }
    }

    /// Copy of this client that sends `Authorization: Bearer {token}`.
    pub fn with_bearer(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            bearer: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn xrpc_url(&self, nsid: &str) -> String {
        self.build_url(&format!("/xrpc/{}", nsid))
    }

    /// Raw client for custom requests. No auth is applied to requests built from it.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Apply auth and send. Transport failures are tagged with the operation.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<Response> {
        self.apply_auth(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation, source })
    }

    /// GET an XRPC query. Deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        nsid: &'static str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let mut request = self.client.get(self.xrpc_url(nsid));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.send(nsid, request).await?;
        expect_success(nsid, response).await
    }

    /// POST a JSON body to an XRPC procedure and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        nsid: &'static str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.client.post(self.xrpc_url(nsid)).json(body);
        let response = self.send(nsid, request).await?;
        expect_success(nsid, response).await
    }

    /// POST raw bytes with the given content type and deserialize the response.
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        nsid: &'static str,
        data: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<T> {
        let request = self
            .client
            .post(self.xrpc_url(nsid))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);
        let response = self.send(nsid, request).await?;
        expect_success(nsid, response).await
    }
}

/// Read the full body as text.
pub(crate) async fn read_body(
    operation: &'static str,
    response: Response,
) -> ApiResult<(StatusCode, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ApiError::Transport { operation, source })?;
    Ok((status, body))
}

pub(crate) fn decode<T: DeserializeOwned>(operation: &'static str, body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode { operation, source })
}

async fn expect_success<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> ApiResult<T> {
    let (status, body) = read_body(operation, response).await?;
    if !status.is_success() {
        return Err(ApiError::Rejected {
            operation,
            status,
            body,
        });
    }
    decode(operation, &body)
}
