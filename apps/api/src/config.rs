use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::matching::chunker::{ChunkConfig, ChunkUnit};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub tavily_api_key: Option<String>,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    pub chunk: ChunkConfig,
    pub default_top_k: i64,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let chunk_size: usize = parse_env("CHUNK_SIZE", 800)?;
        let chunk_overlap: usize = parse_env("CHUNK_OVERLAP", 150)?;
        let chunk_unit = match optional_env("CHUNK_UNIT").as_deref() {
            None => ChunkUnit::Char,
            Some(raw) => raw
                .parse::<ChunkUnit>()
                .context("CHUNK_UNIT must be 'char' or 'word'")?,
        };
        let chunk = ChunkConfig::new(chunk_size, chunk_overlap, chunk_unit)
            .context("Invalid CHUNK_SIZE / CHUNK_OVERLAP combination")?;

        let llm_max_attempts: u32 = parse_env("LLM_MAX_ATTEMPTS", 1)?;
        if llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            chat_model: optional_env("CHAT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            tavily_api_key: optional_env("TAVILY_API_KEY"),
            llm_max_attempts,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            chunk,
            default_top_k: parse_env("DEFAULT_TOP_K", 5)?,
            upload_dir: optional_env("UPLOAD_DIR").map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: parse_env("PORT", 8000)
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable's value, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
    }
}
