//! Chat-completion client for a local Ollama server.

use std::time::Duration;

use async_trait::async_trait;
use faxdesk_core::{PromptMessage, SamplingParameters, clean_output};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Upper bound on a whole inference call, connect to last byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Negative duration: keep the model loaded indefinitely between calls.
const KEEP_ALIVE_FOREVER: &str = "-1m";

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("inference timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("ollama post: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("ollama error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode: {0}")]
    Decode(String),
}

/// Anything that can turn a prompt into generated text.
///
/// One call, one attempt: implementations must not retry.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn invoke(
        &self,
        messages: &[PromptMessage],
        params: &SamplingParameters,
    ) -> Result<String, InferenceError>;

    fn model_name(&self) -> &str;
}

/// Connection settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OllamaConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ── Wire format ──

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    stream: bool,
    keep_alive: &'a str,
    options: ChatOptions<'a>,
}

#[derive(Serialize)]
struct ChatOptions<'a> {
    temperature: f32,
    num_predict: u32,
    num_ctx: u32,
    top_p: f32,
    stop: &'a [String],
}

impl<'a> From<&'a SamplingParameters> for ChatOptions<'a> {
    fn from(p: &'a SamplingParameters) -> Self {
        Self {
            temperature: p.temperature,
            num_predict: p.max_output_tokens,
            num_ctx: p.context_window,
            top_p: p.top_p,
            stop: &p.stop_sequences,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

/// Ollama `/api/chat` client. Cheap to share; holds a connection pool.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Build a client for the given Ollama server.
    ///
    /// `base_url` should be like `http://localhost:11434`; a trailing slash
    /// is removed.
    pub fn new(config: OllamaConfig) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InferenceError::Transport)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.timeout)
        } else {
            InferenceError::Transport(err)
        }
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    #[instrument(skip_all, fields(model = %self.model, message_count = messages.len()))]
    async fn invoke(
        &self,
        messages: &[PromptMessage],
        params: &SamplingParameters,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            keep_alive: KEEP_ALIVE_FOREVER,
            options: params.into(),
        };

        debug!(url = %url, "posting chat request");
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| InferenceError::Decode(e.to_string()))?;
        let text = clean_output(&parsed.message.content);
        if text.is_empty() {
            return Err(InferenceError::Decode("empty generation".into()));
        }
        Ok(text.to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str, timeout: Duration) -> OllamaClient {
        OllamaClient::new(OllamaConfig::new(base_url, "test-model").with_timeout(timeout)).unwrap()
    }

    fn sample_messages() -> Vec<PromptMessage> {
        vec![
            PromptMessage::system("policy"),
            PromptMessage::user("Sender: Clown"),
        ]
    }

    fn sample_params() -> SamplingParameters {
        SamplingParameters {
            temperature: 0.1,
            max_output_tokens: 150,
            context_window: 2048,
            top_p: 0.9,
            stop_sequences: vec!["User:".into()],
        }
    }

    #[test]
    fn trims_trailing_slash() {
        let c = client("http://localhost:11434/", DEFAULT_TIMEOUT);
        assert_eq!(c.base_url(), "http://localhost:11434");
        assert_eq!(c.model_name(), "test-model");
    }

    #[tokio::test]
    async fn sends_wire_format_and_cleans_reply() {
        let captured: Arc<Mutex<Option<Value>>> = Arc::default();
        let app = Router::new()
            .route(
                "/api/chat",
                post(
                    |State(seen): State<Arc<Mutex<Option<Value>>>>, axum::Json(body): axum::Json<Value>| async move {
                        *seen.lock().unwrap() = Some(body);
                        axum::Json(json!({
                            "model": "test-model",
                            "message": {"role": "assistant", "content": "  \"Summary: ok\nUrgency: Low\"\n"},
                            "done": true
                        }))
                    },
                ),
            )
            .with_state(captured.clone());
        let base = spawn(app).await;

        let text = client(&base, DEFAULT_TIMEOUT)
            .invoke(&sample_messages(), &sample_params())
            .await
            .unwrap();
        assert_eq!(text, "Summary: ok\nUrgency: Low");

        let body = captured.lock().unwrap().take().unwrap();
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["stream"], false);
        assert_eq!(body["keep_alive"], "-1m");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Sender: Clown");
        assert_eq!(body["options"]["num_predict"], 150);
        assert_eq!(body["options"]["num_ctx"], 2048);
        assert_eq!(body["options"]["stop"], json!(["User:"]));
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async { (StatusCode::NOT_FOUND, "model \"test-model\" not found") }),
        );
        let base = spawn(app).await;

        let err = client(&base, DEFAULT_TIMEOUT)
            .invoke(&sample_messages(), &sample_params())
            .await
            .unwrap_err();
        match err {
            InferenceError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let app = Router::new().route(
            "/api/chat",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = spawn(app).await;

        let err = client(&base, Duration::from_millis(100))
            .invoke(&sample_messages(), &sample_params())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let app = Router::new().route("/api/chat", post(|| async { "not json" }));
        let base = spawn(app).await;

        let err = client(&base, DEFAULT_TIMEOUT)
            .invoke(&sample_messages(), &sample_params())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_generation_is_decode_error() {
        for reply in [
            json!({"message": {"role": "assistant", "content": "   \n"}}),
            json!({"message": {"role": "assistant", "content": "  \"\"  "}}),
            json!({"message": {}}),
        ] {
            let app = Router::new().route(
                "/api/chat",
                post(move || {
                    let reply = reply.clone();
                    async move { axum::Json(reply) }
                }),
            );
            let base = spawn(app).await;

            let err = client(&base, DEFAULT_TIMEOUT)
                .invoke(&sample_messages(), &sample_params())
                .await
                .unwrap_err();
            match err {
                InferenceError::Decode(msg) => assert_eq!(msg, "empty generation"),
                other => panic!("expected decode error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}"), DEFAULT_TIMEOUT)
            .invoke(&sample_messages(), &sample_params())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Transport(_)), "got {err:?}");
    }
}
