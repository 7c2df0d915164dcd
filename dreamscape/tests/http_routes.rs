use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dreamscape::prelude::*;
use dreamscape::{
    ChunkStream, ComicErrorKind, GenerateChunk, GenerateRequest, GenerateResponse, GeneratedImage,
    ImageRequest, Part, ProviderFuture, ProviderId, build_services_with,
};
use dreamscape::dprovider::VecChunkStream;
use dreamscape::dcompanion::FALLBACK_REPLY;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct FakeModel {
    chunks: Vec<Result<GenerateChunk, ProviderError>>,
    open_error: Option<ProviderError>,
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl FakeModel {
    fn streaming(chunks: Vec<Result<GenerateChunk, ProviderError>>) -> Self {
        Self {
            chunks,
            open_error: None,
            reply: Ok("A sky of lanterns.".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl GenerativeModel for FakeModel {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>> {
        Box::pin(async move {
            let model = request.model.clone();
            self.requests.lock().expect("requests lock").push(request);
            let text = self.reply.clone()?;
            Ok(GenerateResponse {
                model,
                parts: vec![Part::text(text)],
                finish_reason: None,
            })
        })
    }

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            if let Some(err) = self.open_error.clone() {
                return Err(err);
            }
            Ok(Box::pin(VecChunkStream::new(self.chunks.clone())) as ChunkStream<'a>)
        })
    }
}

#[derive(Default)]
struct FakeImages {
    requests: Mutex<Vec<ImageRequest>>,
    fail: bool,
}

impl ImageGenerator for FakeImages {
    fn generate_images<'a>(
        &'a self,
        request: ImageRequest,
    ) -> ProviderFuture<'a, Result<Vec<GeneratedImage>, ProviderError>> {
        Box::pin(async move {
            let count = request.sample_count;
            self.requests.lock().expect("requests lock").push(request);
            if self.fail {
                return Err(ProviderError::malformed_response(
                    "Image generation failed, no predictions returned.",
                ));
            }
            Ok((0..count)
                .map(|_| GeneratedImage {
                    base64_data: "QQ==".to_string(),
                    mime_type: "image/png".to_string(),
                })
                .collect())
        })
    }
}

fn app_with(
    comic: Arc<FakeModel>,
    companion: Arc<FakeModel>,
    images: Option<Arc<FakeImages>>,
) -> axum::Router {
    let config = DreamscapeConfig::default();
    let images = images.map(|images| images as Arc<dyn ImageGenerator>);
    build_router(build_services_with(&config, comic, companion, images))
}

fn default_app() -> axum::Router {
    app_with(
        Arc::new(FakeModel::streaming(Vec::new())),
        Arc::new(FakeModel::streaming(Vec::new())),
        None,
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is json")
}

#[tokio::test]
async fn health_reports_ok() {
    let response = default_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn comic_route_streams_frames_that_reassemble_into_slides() {
    let comic = Arc::new(FakeModel::streaming(vec![
        Ok(GenerateChunk::new(vec![Part::text("Hello world")])),
        Ok(GenerateChunk::new(vec![Part::inline_data("image/png", "QQ==")])),
        Ok(GenerateChunk::new(vec![Part::text(
            "B[data:image/png;base64,Qg==]",
        )])),
    ]));
    let app = app_with(comic.clone(), Arc::new(FakeModel::streaming(Vec::new())), None);

    let response = app
        .oneshot(post_json("/api/generate-comic", json!({ "prompt": "explain DNS" })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/event-stream")
    );

    let bytes = body_bytes(response).await;
    let text = String::from_utf8(bytes.clone()).expect("utf8 body");
    assert!(text.contains(r#"data: {"type":"text","data":"Hello world"}"#));
    assert!(text.contains(r#"data: {"type":"image","data":"QQ==","mimeType":"image/png"}"#));

    let mut consumer = ComicConsumer::new();
    let mut slides = consumer.feed(&bytes).slides;
    slides.extend(consumer.finish().slides);
    let summary = slides
        .iter()
        .map(|slide| (slide.id, slide.text.as_str(), slide.image_url.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            (0, "Hello world", "data:image/png;base64,QQ=="),
            (1, "B", "data:image/png;base64,Qg=="),
        ]
    );

    let requests = comic.requests.lock().expect("requests lock");
    assert!(requests[0].contents[0].text().starts_with("explain DNS\n"));
}

#[tokio::test]
async fn comic_route_reports_mid_stream_failure_as_error_frame() {
    let comic = Arc::new(FakeModel::streaming(vec![
        Ok(GenerateChunk::new(vec![Part::text(
            "A[data:image/png;base64,QQ==]",
        )])),
        Err(ProviderError::transport("reset")),
    ]));
    let app = app_with(comic, Arc::new(FakeModel::streaming(Vec::new())), None);

    let response = app
        .oneshot(post_json("/api/generate-comic", json!({ "prompt": "p" })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body_bytes(response).await;
    let mut consumer = ComicConsumer::new();
    let outcome = consumer.feed(&bytes);

    assert_eq!(outcome.slides.len(), 1);
    let err = outcome.error.expect("error frame");
    assert_eq!(err.kind, ComicErrorKind::Upstream);
    assert_eq!(err.message, "Error processing Vertex AI stream");
}

#[tokio::test]
async fn comic_route_rejects_missing_prompt() {
    for body in [json!({}), json!({ "prompt": "   " })] {
        let response = default_app()
            .oneshot(post_json("/api/generate-comic", body))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Prompt is required" })
        );
    }
}

#[tokio::test]
async fn comic_route_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate-comic")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request builds");

    let response = default_app().oneshot(request).await.expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn comic_route_returns_json_500_when_stream_cannot_open() {
    let mut comic = FakeModel::streaming(Vec::new());
    comic.open_error = Some(ProviderError::authentication("missing credentials"));
    let app = app_with(
        Arc::new(comic),
        Arc::new(FakeModel::streaming(Vec::new())),
        None,
    );

    let response = app
        .oneshot(post_json("/api/generate-comic", json!({ "prompt": "p" })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let message = body["error"].as_str().expect("error message");
    assert!(message.starts_with("Failed to generate comic: "));
    assert!(message.contains("missing credentials"));
}

#[tokio::test]
async fn image_route_returns_generated_images() {
    let images = Arc::new(FakeImages::default());
    let app = app_with(
        Arc::new(FakeModel::streaming(Vec::new())),
        Arc::new(FakeModel::streaming(Vec::new())),
        Some(images.clone()),
    );

    let response = app
        .oneshot(post_json(
            "/api/generate-image",
            json!({ "prompt": "a glass desert", "negativePrompt": "people", "sampleCount": 2 }),
        ))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "images": [
            { "base64Data": "QQ==", "mimeType": "image/png" },
            { "base64Data": "QQ==", "mimeType": "image/png" }
        ] })
    );

    let requests = images.requests.lock().expect("requests lock");
    assert_eq!(requests[0].negative_prompt.as_deref(), Some("people"));
    assert_eq!(requests[0].aspect_ratio, "1:1");
}

#[tokio::test]
async fn image_route_validates_and_reports_failures() {
    let failing = Arc::new(FakeImages {
        fail: true,
        ..FakeImages::default()
    });
    let app = app_with(
        Arc::new(FakeModel::streaming(Vec::new())),
        Arc::new(FakeModel::streaming(Vec::new())),
        Some(failing),
    );

    let response = app
        .clone()
        .oneshot(post_json("/api/generate-image", json!({ "sampleCount": 1 })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Prompt is required");

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/generate-image",
            json!({ "prompt": "p", "sampleCount": 9 }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json("/api/generate-image", json!({ "prompt": "p" })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Failed to generate image",
            "details": "Image generation failed, no predictions returned."
        })
    );
}

#[tokio::test]
async fn image_route_without_generator_is_a_500() {
    let response = default_app()
        .oneshot(post_json("/api/generate-image", json!({ "prompt": "p" })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["details"],
        "image generation is not configured"
    );
}

#[tokio::test]
async fn companion_route_replies_and_keeps_session_history() {
    let companion = Arc::new(FakeModel::streaming(Vec::new()));
    let app = app_with(
        Arc::new(FakeModel::streaming(Vec::new())),
        companion.clone(),
        None,
    );

    for message in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/companion",
                json!({ "message": message, "sessionId": "dreamer" }),
            ))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "reply": "A sky of lanterns." })
        );
    }

    let requests = companion.requests.lock().expect("requests lock");
    assert_eq!(requests[0].contents.len(), 3);
    assert_eq!(requests[1].contents.len(), 5);
}

#[tokio::test]
async fn companion_route_falls_back_on_provider_failure() {
    let mut companion = FakeModel::streaming(Vec::new());
    companion.reply = Err(ProviderError::unavailable("overloaded"));
    let app = app_with(
        Arc::new(FakeModel::streaming(Vec::new())),
        Arc::new(companion),
        None,
    );

    let response = app
        .clone()
        .oneshot(post_json("/api/companion", json!({ "message": "hello" })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reply"], FALLBACK_REPLY);

    let response = app
        .oneshot(post_json("/api/companion", json!({ "message": " " })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Message is required" })
    );
}
