//! HTTP surface: comic SSE stream, image generation, companion chat and health.

use std::convert::Infallible;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive};
use axum::response::{IntoResponse, Response, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use dcomic::{ComicError, ComicErrorKind, StreamFrame, validate_prompt};
use dcompanion::{CompanionErrorKind, SessionId};
use dprovider::{GeneratedImage, ImageRequest};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::{Any, CorsLayer};

use crate::AppServices;

/// Frames buffered between the producer task and the response body.
const FRAME_BUFFER: usize = 32;

pub fn build_router(services: AppServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/generate-comic", post(generate_comic))
        .route("/api/generate-image", post(generate_image))
        .route("/api/companion", post(companion))
        .layer(cors)
        .with_state(services)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
            },
        }
    }

    fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    fn from_rejection(rejection: JsonRejection) -> Self {
        tracing::info!(
            phase = "serve",
            event = "request_rejected",
            reason = %rejection.body_text(),
            "Malformed request body"
        );
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ComicError> for ApiError {
    fn from(err: ComicError) -> Self {
        match err.kind {
            ComicErrorKind::InvalidRequest => ApiError::bad_request(err.message),
            _ => ApiError::internal(format!("Failed to generate comic: {}", err.message)),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

#[derive(Debug, Deserialize)]
struct ComicBody {
    prompt: Option<String>,
}

async fn generate_comic(
    State(services): State<AppServices>,
    body: Result<Json<ComicBody>, JsonRejection>,
) -> Response {
    let prompt = match body {
        Ok(Json(body)) => body.prompt.unwrap_or_default(),
        Err(rejection) => return ApiError::from_rejection(rejection).into_response(),
    };

    if let Err(err) = validate_prompt(&prompt) {
        return ApiError::from(err).into_response();
    }

    let (ready_tx, ready_rx) = oneshot::channel::<Result<(), ComicError>>();
    let (frame_tx, frame_rx) = mpsc::channel::<StreamFrame>(FRAME_BUFFER);
    let producer = services.comic.clone();

    tokio::spawn(async move {
        let mut frames = match producer.open(&prompt).await {
            Ok(frames) => {
                let _ = ready_tx.send(Ok(()));
                frames
            }
            Err(err) => {
                let _ = ready_tx.send(Err(err));
                return;
            }
        };

        while let Some(frame) = frames.next().await {
            if frame_tx.send(frame).await.is_err() {
                tracing::info!(
                    phase = "serve",
                    event = "client_disconnected",
                    "Comic stream receiver dropped"
                );
                return;
            }
        }
    });

    match ready_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::error!(
                phase = "serve",
                event = "comic_open_failed",
                error = %err,
                "Comic generation failed before streaming"
            );
            return ApiError::from(err).into_response();
        }
        Err(_) => {
            return ApiError::internal("Failed to generate comic: producer task ended")
                .into_response();
        }
    }

    let events = futures_util::stream::unfold(frame_rx, |mut rx| async move {
        let frame = rx.recv().await?;
        Some((Ok::<_, Infallible>(Event::default().data(frame.to_json())), rx))
    });

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageBody {
    prompt: Option<String>,
    negative_prompt: Option<String>,
    aspect_ratio: Option<String>,
    sample_count: Option<u32>,
}

impl ImageBody {
    fn into_request(self) -> ImageRequest {
        let mut request = ImageRequest::new(self.prompt.unwrap_or_default());
        if let Some(negative_prompt) = self.negative_prompt.filter(|value| !value.is_empty()) {
            request = request.with_negative_prompt(negative_prompt);
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            request = request.with_aspect_ratio(aspect_ratio);
        }
        if let Some(sample_count) = self.sample_count {
            request = request.with_sample_count(sample_count);
        }
        request
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageEntry {
    base64_data: String,
    mime_type: String,
}

impl From<GeneratedImage> for ImageEntry {
    fn from(image: GeneratedImage) -> Self {
        Self {
            base64_data: image.base64_data,
            mime_type: image.mime_type,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImagesBody {
    images: Vec<ImageEntry>,
}

async fn generate_image(
    State(services): State<AppServices>,
    body: Result<Json<ImageBody>, JsonRejection>,
) -> Result<Json<ImagesBody>, ApiError> {
    let Json(body) = body.map_err(ApiError::from_rejection)?;
    let request = body.into_request();
    request
        .validate()
        .map_err(|err| ApiError::bad_request(err.message))?;

    let Some(generator) = services.images.as_ref() else {
        return Err(ApiError::internal("Failed to generate image")
            .with_details("image generation is not configured"));
    };

    let images = generator.generate_images(request).await.map_err(|err| {
        tracing::error!(
            phase = "serve",
            event = "image_failed",
            error = %err,
            "Image generation failed"
        );
        ApiError::internal("Failed to generate image").with_details(err.message)
    })?;

    Ok(Json(ImagesBody {
        images: images.into_iter().map(ImageEntry::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanionBody {
    message: Option<String>,
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompanionReplyBody {
    reply: String,
}

async fn companion(
    State(services): State<AppServices>,
    body: Result<Json<CompanionBody>, JsonRejection>,
) -> Result<Json<CompanionReplyBody>, ApiError> {
    let Json(body) = body.map_err(ApiError::from_rejection)?;
    let message = body.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }

    let result = match body.session_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => {
            services
                .companion
                .reply(&SessionId::from(id), &message)
                .await
        }
        None => services.companion.reply_once(&message).await,
    };

    let reply = result.map_err(|err| match err.kind {
        CompanionErrorKind::InvalidRequest => ApiError::bad_request(err.message),
        _ => ApiError::internal(err.message),
    })?;

    Ok(Json(CompanionReplyBody { reply }))
}
