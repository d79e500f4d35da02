//! Configuração do dateplan carregada a partir de `dateplan.toml`.
//!
//! A struct [`AppConfig`] contém todos os parâmetros configuráveis, agrupados
//! por colaborador externo. Valores não presentes no arquivo usam defaults
//! sensíveis. Variáveis de ambiente têm precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::plan::ImageCatalog;

/// Caminho padrão do arquivo de configuração.
pub const DEFAULT_CONFIG_PATH: &str = "dateplan.toml";

/// Erros de configuração. Sempre fatais e detectados antes de qualquer chamada de rede.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Credenciais ausentes ou com valor de exemplo (placeholder).
    #[error("missing or placeholder credentials: {}", .keys.join(", "))]
    MissingCredentials { keys: Vec<&'static str> },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuração de nível superior carregada de `dateplan.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Porta HTTP do servidor.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub siliconflow: SiliconFlowConfig,

    #[serde(default)]
    pub coze: CozeConfig,

    #[serde(default)]
    pub poll: PollConfig,

    /// Tabelas de seleção de imagem; usa o catálogo embutido se ausente.
    #[serde(default)]
    pub imagery: ImageCatalog,
}

/// Colaborador de geração de texto e imagem (SiliconFlow).
#[derive(Debug, Clone, Deserialize)]
pub struct SiliconFlowConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_siliconflow_url")]
    pub api_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,
}

/// Colaborador de busca assíncrona (bot Coze).
#[derive(Debug, Clone, Deserialize)]
pub struct CozeConfig {
    #[serde(default)]
    pub api_key: String,

    /// Identificador do bot que executa a busca.
    #[serde(default)]
    pub bot_id: String,

    #[serde(default = "default_coze_url")]
    pub api_url: String,
}

/// Parâmetros do laço de consulta (poll).
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Número máximo de consultas de status.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Intervalo fixo entre consultas, em milissegundos.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_siliconflow_url() -> String {
    "https://api.siliconflow.com/v1".to_string()
}

fn default_chat_model() -> String {
    "deepseek-ai/DeepSeek-V3".to_string()
}

fn default_image_model() -> String {
    "Kwai-Kolors/Kolors".to_string()
}

fn default_coze_url() -> String {
    "https://api.coze.cn".to_string()
}

// Valor padrão para consultas máximas: 10.
fn default_max_attempts() -> u32 {
    10
}

// Valor padrão para o intervalo entre consultas: 2000ms.
fn default_interval_ms() -> u64 {
    2000
}

impl Default for SiliconFlowConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_siliconflow_url(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
        }
    }
}

impl Default for CozeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            bot_id: String::new(),
            api_url: default_coze_url(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            siliconflow: SiliconFlowConfig::default(),
            coze: CozeConfig::default(),
            poll: PollConfig::default(),
            imagery: ImageCatalog::default(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl SiliconFlowConfig {
    /// Retorna a chave da API ou um erro de configuração, sem tocar a rede.
    pub fn credentials(&self) -> Result<&str, ConfigError> {
        if is_placeholder(&self.api_key) {
            return Err(ConfigError::MissingCredentials {
                keys: vec!["SILICONFLOW_API_KEY"],
            });
        }
        Ok(&self.api_key)
    }
}

impl CozeConfig {
    /// Valida a chave da API e o identificador do bot juntos, listando todos os ausentes.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let mut keys = Vec::new();
        if is_placeholder(&self.api_key) {
            keys.push("COZE_API_KEY");
        }
        if is_placeholder(&self.bot_id) {
            keys.push("COZE_BOT_ID");
        }
        if !keys.is_empty() {
            return Err(ConfigError::MissingCredentials { keys });
        }
        Ok((&self.api_key, &self.bot_id))
    }
}

/// Um valor vazio ou copiado de um arquivo de exemplo conta como ausente.
pub fn is_placeholder(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v.is_empty()
        || v.starts_with("your_")
        || v.starts_with("your-")
        || v.starts_with("xxx")
        || v == "changeme"
        || v == "placeholder"
}

impl AppConfig {
    /// Carrega a configuração de `path`, aplicando as variáveis de ambiente do processo.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Lê apenas o arquivo, sem consultar o ambiente.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&contents)?)
    }

    /// Sobrescreve campos com valores de ambiente não vazios.
    ///
    /// A busca é injetada para que os testes não dependam do ambiente real.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("SILICONFLOW_API_KEY") {
            self.siliconflow.api_key = key;
        }
        if let Some(url) = get("SILICONFLOW_API_URL") {
            self.siliconflow.api_url = url;
        }
        if let Some(key) = get("COZE_API_KEY") {
            self.coze.api_key = key;
        }
        if let Some(bot) = get("COZE_BOT_ID") {
            self.coze.bot_id = bot;
        }
        if let Some(url) = get("COZE_API_URL") {
            self.coze.api_url = url;
        }
        if let Some(raw) = get("PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid PORT"),
            }
        }
    }
}
