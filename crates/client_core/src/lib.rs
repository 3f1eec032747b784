//! HTTP boundary for the canvas page: auth status, canvas generation, showcase
//! publishing and gallery listing.

use async_trait::async_trait;
use image::ImageFormat;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AuthState, CanvasParams, ShowcaseItem},
    protocol::{
        AuthStatusResponse, HealthCheck, ShareAck, ShareRequest, TopCanvasQuery,
        AUTH_STATUS_PATH, HEALTHCHECK_PATH, SHARE_TO_SHOWCASE_PATH, SHOWCASE_ITEMS_PATH,
        TOP_CANVAS_PATH,
    },
};
use tracing::debug;
use url::Url;

pub mod error;

pub use error::{ClientError, ClientResult};

/// A generated canvas as returned by the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl CanvasImage {
    /// Sniffs the payload; anything that is not a recognisable image is rejected.
    pub fn from_bytes(bytes: Vec<u8>) -> ClientResult<Self> {
        if bytes.is_empty() {
            return Err(ClientError::payload(TOP_CANVAS_PATH, "empty image body"));
        }
        let format = image::guess_format(&bytes).map_err(|err| {
            ClientError::payload(TOP_CANVAS_PATH, format!("not an image: {err}"))
        })?;
        Ok(Self { bytes, format })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

#[async_trait]
pub trait CanvasApi: Send + Sync {
    async fn auth_status(&self) -> ClientResult<AuthState>;
    async fn top_canvas(&self, params: CanvasParams) -> ClientResult<CanvasImage>;
    async fn share_to_showcase(&self, request: ShareRequest) -> ClientResult<ShareAck>;
    async fn showcase_items(&self) -> ClientResult<Vec<ShowcaseItem>>;
    async fn healthcheck(&self) -> ClientResult<HealthCheck>;
}

/// `CanvasApi` over HTTP against the canvas server.
#[derive(Debug, Clone)]
pub struct HttpCanvasApi {
    http: Client,
    server_url: String,
}

impl HttpCanvasApi {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        Self::with_session_cookie(server_url, None)
    }

    /// Sends `session_cookie` as the `Cookie` header on every request.
    pub fn with_session_cookie(server_url: &str, session_cookie: Option<&str>) -> ClientResult<Self> {
        let parsed = Url::parse(server_url)
            .map_err(|err| ClientError::Config(format!("server url {server_url:?}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "server url {server_url:?} must use http or https"
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie.filter(|cookie| !cookie.trim().is_empty()) {
            let value = HeaderValue::from_str(cookie.trim())
                .map_err(|err| ClientError::Config(format!("session cookie: {err}")))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| ClientError::Config(format!("http client: {err}")))?;

        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> ClientResult<T> {
        let response = self
            .http
            .get(self.endpoint_url(path))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: path,
                source,
            })?;
        decode_json(path, response).await
    }
}

async fn checked_body(endpoint: &'static str, response: Response) -> ClientResult<Vec<u8>> {
    let status = response.status();
    debug!(endpoint, status = status.as_u16(), "received response");
    if !status.is_success() {
        return Err(ClientError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    Ok(bytes.to_vec())
}

async fn decode_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> ClientResult<T> {
    let body = checked_body(endpoint, response).await?;
    serde_json::from_slice(&body).map_err(|err| ClientError::payload(endpoint, err.to_string()))
}

#[async_trait]
impl CanvasApi for HttpCanvasApi {
    async fn auth_status(&self) -> ClientResult<AuthState> {
        let response: AuthStatusResponse = self.get_json(AUTH_STATUS_PATH).await?;
        Ok(AuthState {
            logged_in: response.logged_in,
        })
    }

    async fn top_canvas(&self, params: CanvasParams) -> ClientResult<CanvasImage> {
        debug!(
            item_type = %params.item_type,
            time_range = %params.time_range,
            limit = params.limit.get(),
            "requesting canvas"
        );
        let response = self
            .http
            .get(self.endpoint_url(TOP_CANVAS_PATH))
            .query(&TopCanvasQuery::from(params))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: TOP_CANVAS_PATH,
                source,
            })?;
        let body = checked_body(TOP_CANVAS_PATH, response).await?;
        CanvasImage::from_bytes(body)
    }

    async fn share_to_showcase(&self, request: ShareRequest) -> ClientResult<ShareAck> {
        let response = self
            .http
            .post(self.endpoint_url(SHARE_TO_SHOWCASE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: SHARE_TO_SHOWCASE_PATH,
                source,
            })?;
        decode_json(SHARE_TO_SHOWCASE_PATH, response).await
    }

    async fn showcase_items(&self) -> ClientResult<Vec<ShowcaseItem>> {
        self.get_json(SHOWCASE_ITEMS_PATH).await
    }

    async fn healthcheck(&self) -> ClientResult<HealthCheck> {
        self.get_json(HEALTHCHECK_PATH).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
