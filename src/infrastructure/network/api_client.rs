use crate::application::ports::{
    AccessTokenProvider, MutationReplayClient, PhotoUploadClient, ProgressHook, ReachabilityProbe,
    ReplayOutcome,
};
use crate::domain::entities::{MutationEntry, QueuedPhoto};
use crate::domain::value_objects::{MutationKind, PhotoKind};
use crate::shared::config::ApiConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Talks to the remote API: JSON replay for queued mutations, multipart
/// upload for queued photos, HEAD probe for reachability. Classifies every
/// outcome instead of surfacing transport errors to the caller.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl HttpApiClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn mutation_request(&self, entry: &MutationEntry, token: &str) -> reqwest::RequestBuilder {
        let resource = entry.operation.resource.as_str();
        let (method, url) = match entry.operation.kind {
            MutationKind::Create => (Method::POST, format!("{}/{resource}", self.base_url)),
            MutationKind::Update => (
                Method::PUT,
                format!("{}/{resource}/{}", self.base_url, entry.operation.target),
            ),
            MutationKind::Delete => (
                Method::DELETE,
                format!("{}/{resource}/{}", self.base_url, entry.operation.target),
            ),
        };
        let request = self.http.request(method, url).bearer_auth(token);
        match entry.operation.kind {
            MutationKind::Delete => request,
            _ => request.json(&entry.payload),
        }
    }

    fn upload_url(&self, kind: PhotoKind) -> String {
        match kind {
            PhotoKind::Element => format!("{}/upload/photo", self.base_url),
            PhotoKind::Compteur => format!("{}/upload/compteur-photo", self.base_url),
        }
    }
}

/// 5xx and transport failures are worth retrying unchanged; 4xx will not
/// succeed without user intervention; 401/403 needs a re-login. Nothing in
/// here ever discards the queued entry.
fn classify(status: StatusCode, assigned_id: Option<String>) -> ReplayOutcome {
    if status.is_success() {
        ReplayOutcome::Success { assigned_id }
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ReplayOutcome::AuthExpired
    } else if status.is_client_error() {
        ReplayOutcome::Fatal(format!("HTTP {}", status.as_u16()))
    } else {
        ReplayOutcome::Retryable(format!("HTTP {}", status.as_u16()))
    }
}

/// Pulls the server-assigned id out of a create response body.
fn extract_assigned_id(body: &serde_json::Value) -> Option<String> {
    match body.get("id") {
        Some(serde_json::Value::String(id)) => Some(id.clone()),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("heic") => "image/heic",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[async_trait]
impl MutationReplayClient for HttpApiClient {
    async fn replay(&self, entry: &MutationEntry) -> ReplayOutcome {
        let Some(token) = self.tokens.access_token() else {
            return ReplayOutcome::AuthExpired;
        };
        debug!(
            "replaying {} {} {}",
            entry.operation.kind.as_str(),
            entry.operation.resource.as_str(),
            entry.operation.target
        );
        match self.mutation_request(entry, &token).send().await {
            Ok(response) => {
                let status = response.status();
                let assigned_id = if status.is_success()
                    && entry.operation.kind == MutationKind::Create
                {
                    response
                        .json::<serde_json::Value>()
                        .await
                        .ok()
                        .as_ref()
                        .and_then(extract_assigned_id)
                } else {
                    None
                };
                classify(status, assigned_id)
            }
            Err(err) => ReplayOutcome::Retryable(err.to_string()),
        }
    }
}

#[async_trait]
impl PhotoUploadClient for HttpApiClient {
    async fn upload(&self, photo: &QueuedPhoto, progress: Option<ProgressHook>) -> ReplayOutcome {
        let Some(token) = self.tokens.access_token() else {
            return ReplayOutcome::AuthExpired;
        };
        let file = match tokio::fs::File::open(&photo.staged_path).await {
            Ok(file) => file,
            Err(err) => {
                // A lost staged file cannot be re-captured; needs a human.
                return ReplayOutcome::Fatal(format!(
                    "staged file missing ({}): {err}",
                    photo.staged_path.display()
                ));
            }
        };
        let total = match file.metadata().await {
            Ok(metadata) => metadata.len(),
            Err(err) => return ReplayOutcome::Fatal(err.to_string()),
        };

        let mut sent: u64 = 0;
        let stream = ReaderStream::new(file).inspect(move |chunk| {
            if let (Some(hook), Ok(chunk)) = (progress.as_ref(), chunk) {
                sent += chunk.len() as u64;
                hook(sent, total);
            }
        });
        let file_name = photo
            .staged_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.jpg", photo.id));
        let part = match Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file_name)
            .mime_str(mime_for(&photo.staged_path))
        {
            Ok(part) => part,
            Err(err) => return ReplayOutcome::Fatal(err.to_string()),
        };

        let id_field = match photo.kind {
            PhotoKind::Element => "elementId",
            PhotoKind::Compteur => "compteurId",
        };
        let mut form = Form::new()
            .part("file", part)
            .text(id_field, photo.target.id().to_string())
            .text("ordre", photo.ordinal.to_string());
        if let Some(caption) = &photo.caption {
            form = form.text("commentaire", caption.clone());
        }
        if let (Some(latitude), Some(longitude)) = (photo.latitude, photo.longitude) {
            form = form
                .text("latitude", latitude.to_string())
                .text("longitude", longitude.to_string());
        }

        let request = self
            .http
            .post(self.upload_url(photo.kind))
            .bearer_auth(token)
            .multipart(form);
        match request.send().await {
            Ok(response) => classify(response.status(), None),
            Err(err) => ReplayOutcome::Retryable(err.to_string()),
        }
    }
}

#[async_trait]
impl ReachabilityProbe for HttpApiClient {
    async fn check(&self) -> bool {
        // Any HTTP answer at all means the API is reachable.
        self.http.head(&self.base_url).send().await.is_ok()
    }
}
