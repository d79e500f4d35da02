//! Tipos de erro para o cliente da API SiliconFlow.
//!
//! Define [`ProviderError`] com variantes para rate limiting, erros da API,
//! erros de rede e respostas sem conteúdo. Usa `thiserror` para derivar
//! `Display` e `Error` a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com os endpoints de geração.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// O servidor retornou HTTP 429 (rate limit).
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Qualquer outro erro HTTP (4xx/5xx), com o corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout) ou corpo inválido.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A resposta chegou, mas sem nenhum texto gerado.
    #[error("completion returned no content")]
    EmptyCompletion,
}
