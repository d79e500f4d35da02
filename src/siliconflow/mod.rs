pub mod client;
pub mod error;
pub mod types;

pub use client::{ChatCompleter, ImageGenerator, SiliconFlowClient};
pub use error::ProviderError;
pub use types::{ChatCompletionRequest, ImageGenerationRequest};
