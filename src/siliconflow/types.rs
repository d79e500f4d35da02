//! Tipos de dados para os endpoints `chat/completions` e `images/generations`.
//!
//! As requisições seguem o formato compatível com OpenAI usado pela
//! SiliconFlow. As respostas são desserializadas de forma tolerante: campos
//! ausentes viram `None` ou listas vazias em vez de erro.

use serde::{Deserialize, Serialize};

/// Corpo da requisição para `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Requisição com um prompt de sistema e um de usuário e os parâmetros de geração padrão.
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: Some(system.into()),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Some(user.into()),
                },
            ],
            max_tokens: 2000,
            temperature: 0.8,
            top_p: 0.9,
            stream: false,
        }
    }
}

/// Uma mensagem da conversa. O conteúdo pode vir `null` na resposta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Resposta do endpoint `/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

impl ChatCompletionResponse {
    /// Texto da primeira escolha, se existir e não estiver vazio.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Corpo da requisição para `/images/generations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image_size: String,
    pub batch_size: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub negative_prompt: String,
}

impl ImageGenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            image_size: "1024x1024".into(),
            batch_size: 1,
            num_inference_steps: 20,
            guidance_scale: 7.5,
            negative_prompt: "模糊, 低质量, 扭曲, 不完整".into(),
        }
    }
}

/// Resposta do endpoint `/images/generations`.
///
/// As URLs retornadas expiram em uma hora e não devem ser persistidas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageGenerationResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.images
            .first()
            .and_then(|img| img.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}
