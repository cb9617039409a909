use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use edudesk_access::Actor;
use edudesk_session::{StartTransferRequest, TransferStarter, TransferTarget};
use edudesk_upload::{AssetFinalizer, FinalizeRequest};
use reqwest::{Method, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::chapter::{AssetStatus, Chapter, ChapterData, ChapterVideoUpdate};
use crate::envelope::decode;
use crate::error::{ApiError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

/// Backend client sharing one connection pool and bearer token across clones.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client, for reuse by other transports.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;
        tracing::debug!(%url, status, bytes = body.len(), "backend response");

        let decoded = decode(status, &body);
        if let Err(ApiError::Unauthorized(message)) = &decoded {
            tracing::warn!(%url, %message, "backend rejected credentials, dropping token");
            self.set_token(None);
        }
        decoded
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request).await?.ok_or(ApiError::MissingData)
    }

    /// `POST /upload/start`: allocates a remote upload slot.
    pub async fn start_upload(&self, request: &StartTransferRequest) -> Result<TransferTarget> {
        let target: TransferTarget = self
            .fetch(self.request(Method::POST, "upload/start").json(request))
            .await?;
        tracing::info!(
            target_id = %request.target_id,
            asset = %target.remote_asset_id,
            "backend allocated upload slot"
        );
        Ok(target)
    }

    /// `GET /admin/chapters/{id}`
    pub async fn chapter(&self, chapter_id: &str) -> Result<Chapter> {
        let data: ChapterData = self
            .fetch(self.request(Method::GET, &format!("admin/chapters/{chapter_id}")))
            .await?;
        Ok(data.into())
    }

    pub async fn asset_status(&self, chapter_id: &str) -> Result<AssetStatus> {
        Ok(self.chapter(chapter_id).await?.video_status)
    }

    /// `PATCH /admin/chapters/{id}` with the video fields only.
    pub async fn update_chapter_video(&self, chapter_id: &str, update: &ChapterVideoUpdate) -> Result<()> {
        self.send::<IgnoredAny>(
            self.request(Method::PATCH, &format!("admin/chapters/{chapter_id}"))
                .json(update),
        )
        .await?;
        Ok(())
    }

    /// `GET /auth/me`: the actor behind the current token.
    pub async fn current_actor(&self) -> Result<Actor> {
        self.fetch(self.request(Method::GET, "auth/me")).await
    }
}

impl TransferStarter for ApiClient {
    type Error = ApiError;

    async fn start_transfer(&self, request: &StartTransferRequest) -> Result<TransferTarget> {
        self.start_upload(request).await
    }
}

impl AssetFinalizer for ApiClient {
    type Error = ApiError;

    async fn finalize(&self, target_id: &str, request: &FinalizeRequest) -> Result<()> {
        let update = ChapterVideoUpdate {
            video_url: request.remote_asset_id.clone(),
            video_duration: request.duration_secs,
        };
        self.update_chapter_video(target_id, &update).await
    }
}
