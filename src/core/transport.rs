//! HTTP adapter for the inference server.
//!
//! [`ChatTransport`] is the seam the controller, turn service and connection
//! monitor depend on; [`InferenceClient`] is the reqwest-backed
//! implementation. The adapter never recovers from failures itself, it only
//! normalizes them into [`ConnectivityError`] and [`CompletionError`].

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatRequest, ChatResponse, ModelsResponse};
use crate::core::config::Settings;
use crate::core::error::{CompletionError, ConnectivityError};
use crate::core::message::Message;
use crate::utils::url::{construct_api_url, normalize_base_url, CHAT_COMPLETIONS_PATH, MODELS_PATH};

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Lightweight availability check against the model-listing endpoint.
    async fn probe(&self) -> Result<(), ConnectivityError>;

    /// Send the full conversation and return the first choice's content.
    async fn complete(
        &self,
        messages: &[Message],
        cancel_token: &CancellationToken,
    ) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl InferenceClient {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            base_url: normalize_base_url(&settings.base_url),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn connect_hint(&self) -> String {
        format!(
            "Cannot connect to the inference server at {}. Please ensure:\n\
1. The server is running\n\
2. A model is loaded\n\
3. The API server is enabled in its settings",
            self.base_url
        )
    }

    fn network_error(&self, err: &reqwest::Error) -> CompletionError {
        if err.is_connect() {
            CompletionError::network(self.connect_hint())
        } else {
            CompletionError::network(format!("Network error: {err}"))
        }
    }

    async fn send_completion(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let url = construct_api_url(&self.base_url, CHAT_COMPLETIONS_PATH);
        let request = ChatRequest {
            messages,
            model: &self.model,
            temperature: self.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| self.network_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::status(status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.network_error(&err))?;
        let parsed: ChatResponse =
            serde_json::from_slice(&body).map_err(|_| CompletionError::malformed())?;
        parsed
            .first_content()
            .map(str::to_owned)
            .ok_or_else(CompletionError::malformed)
    }

    /// Fetch the server's model list.
    pub async fn list_models(&self) -> Result<ModelsResponse, CompletionError> {
        let url = construct_api_url(&self.base_url, MODELS_PATH);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| self.network_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::status(status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.network_error(&err))?;
        serde_json::from_slice(&body).map_err(|_| CompletionError::malformed())
    }
}

#[async_trait]
impl ChatTransport for InferenceClient {
    async fn probe(&self) -> Result<(), ConnectivityError> {
        let url = construct_api_url(&self.base_url, MODELS_PATH);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ConnectivityError::Unreachable {
                reason: err.to_string(),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ConnectivityError::Status {
                status: response.status().as_u16(),
            })
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        cancel_token: &CancellationToken,
    ) -> Result<String, CompletionError> {
        debug!(
            base_url = %self.base_url,
            model = %self.model,
            message_count = messages.len(),
            "sending chat completion"
        );

        tokio::select! {
            result = self.send_completion(messages) => result,
            _ = cancel_token.cancelled() => {
                debug!("chat completion cancelled");
                Err(CompletionError::cancelled())
            }
        }
    }
}
