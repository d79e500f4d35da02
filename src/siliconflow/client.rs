use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ProviderError;
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ImageGenerationRequest, ImageGenerationResponse,
};

/// Sends chat completion requests. Implemented by [`SiliconFlowClient`] and by mocks in tests.
pub trait ChatCompleter {
    fn complete(
        &self,
        req: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse, ProviderError>> + Send;
}

/// Sends image generation requests.
pub trait ImageGenerator {
    fn generate_image(
        &self,
        req: &ImageGenerationRequest,
    ) -> impl Future<Output = Result<ImageGenerationResponse, ProviderError>> + Send;
}

pub struct SiliconFlowClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl SiliconFlowClient {
    /// Create a client for the API rooted at `base_url`; a trailing slash is ignored.
    pub fn with_base_url(api_key: String, base_url: String) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<R>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(1000);
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

impl ChatCompleter for SiliconFlowClient {
    async fn complete(
        &self,
        req: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        self.post_json("/chat/completions", req).await
    }
}

impl ImageGenerator for SiliconFlowClient {
    async fn generate_image(
        &self,
        req: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ProviderError> {
        self.post_json("/images/generations", req).await
    }
}
