#![cfg(feature = "provider-gemini")]

use std::sync::{Arc, Mutex};

use dprovider::adapters::gemini::{GeminiProvider, GeminiTransport, GoogleAuth};
use dprovider::{
    ChunkStream, Content, GenerateChunk, GenerateRequest, GenerateResponse, GenerativeModel, Part,
    ProviderError, ProviderErrorKind, ProviderFuture, ProviderId, SecureCredentialManager,
    VecChunkStream,
};
use futures_util::StreamExt;

#[derive(Debug, Default)]
struct FakeTransport {
    captured_auth: Mutex<Option<GoogleAuth>>,
    captured_request: Mutex<Option<GenerateRequest>>,
}

impl GeminiTransport for FakeTransport {
    fn generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<GenerateResponse, ProviderError>> {
        Box::pin(async move {
            let model = request.model.clone();
            *self.captured_request.lock().expect("request lock") = Some(request);
            *self.captured_auth.lock().expect("auth lock") = Some(auth);

            Ok(GenerateResponse {
                model,
                parts: vec![Part::text("a sky of glass")],
                finish_reason: Some("STOP".to_string()),
            })
        })
    }

    fn stream_generate<'a>(
        &'a self,
        request: GenerateRequest,
        auth: GoogleAuth,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            *self.captured_request.lock().expect("request lock") = Some(request);
            *self.captured_auth.lock().expect("auth lock") = Some(auth);

            let stream = VecChunkStream::new(vec![
                Ok(GenerateChunk::new(vec![Part::text("Once")])),
                Ok(GenerateChunk::default()),
                Ok(GenerateChunk::new(vec![Part::inline_data("image/png", "QQ==")])),
                Err(ProviderError::transport("connection reset")),
            ]);

            Ok(Box::pin(stream) as ChunkStream<'a>)
        })
    }
}

fn provider_with_key(transport: Arc<FakeTransport>) -> GeminiProvider {
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_api_key(ProviderId::Gemini, "AIza-test")
        .expect("key should store");
    GeminiProvider::new(credentials, transport)
}

#[tokio::test]
async fn generate_passes_api_key_auth_and_fallback_model() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport.clone()).with_fallback_model("gemini-1.5-flash");

    let response = provider
        .generate(GenerateRequest::new("", vec![Content::user("describe a dream")]))
        .await
        .expect("generate should succeed");

    assert_eq!(response.text(), "a sky of glass");
    assert_eq!(response.model, "gemini-1.5-flash");

    let auth = transport
        .captured_auth
        .lock()
        .expect("auth lock")
        .clone()
        .expect("auth captured");
    match auth {
        GoogleAuth::ApiKey(key) => assert_eq!(key.expose(), "AIza-test"),
        GoogleAuth::Bearer(_) => panic!("expected api key auth"),
    }
}

#[tokio::test]
async fn vertex_provider_uses_bearer_token() {
    let transport = Arc::new(FakeTransport::default());
    let credentials = Arc::new(SecureCredentialManager::new());
    credentials
        .set_access_token(ProviderId::VertexAi, "ya29.token", None)
        .expect("token should store");
    let provider =
        GeminiProvider::new(credentials, transport.clone()).with_provider_id(ProviderId::VertexAi);

    assert_eq!(provider.id(), ProviderId::VertexAi);
    provider
        .generate(GenerateRequest::new("m", vec![Content::user("hi")]))
        .await
        .expect("generate should succeed");

    let auth = transport.captured_auth.lock().expect("auth lock").clone();
    assert!(matches!(auth, Some(GoogleAuth::Bearer(_))));
}

#[tokio::test]
async fn missing_credentials_fail_before_transport() {
    let transport = Arc::new(FakeTransport::default());
    let provider = GeminiProvider::new(Arc::new(SecureCredentialManager::new()), transport.clone());

    let error = provider
        .generate(GenerateRequest::new("m", vec![Content::user("hi")]))
        .await
        .expect_err("missing credentials must fail");

    assert_eq!(error.kind, ProviderErrorKind::Authentication);
    assert!(transport.captured_request.lock().expect("lock").is_none());
}

#[tokio::test]
async fn stream_generate_skips_empty_chunks_and_surfaces_errors_in_order() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport);

    let mut stream = provider
        .stream_generate(GenerateRequest::new("m", vec![Content::user("comic please")]))
        .await
        .expect("stream should open");

    let first = stream.next().await.expect("first").expect("ok");
    assert_eq!(first.parts, vec![Part::text("Once")]);

    let second = stream.next().await.expect("second").expect("ok");
    assert_eq!(second.parts, vec![Part::inline_data("image/png", "QQ==")]);

    let third = stream.next().await.expect("third");
    assert_eq!(
        third.expect_err("transport error").kind,
        ProviderErrorKind::Transport
    );
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn invalid_request_is_rejected_by_provider() {
    let transport = Arc::new(FakeTransport::default());
    let provider = provider_with_key(transport.clone());

    let result = provider
        .stream_generate(GenerateRequest::new("m", Vec::new()))
        .await;
    let error = match result {
        Ok(_) => panic!("empty contents must fail"),
        Err(error) => error,
    };

    assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    assert!(transport.captured_request.lock().expect("lock").is_none());
}
