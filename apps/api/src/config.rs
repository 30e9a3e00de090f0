use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

const DEFAULT_DATABASE_PATH: &str = "data/resume_context.db";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails fast if the model API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub database_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub model_timeout: Duration,
    pub structure_fallback: bool,
}

/// The subset of configuration the tailoring pipeline needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on a single model call when the caller supplies none.
    pub model_timeout: Duration,
    /// Re-structure a weak heuristic parse through the model.
    pub structure_fallback: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            structure_fallback: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigurationMissing(
                    "Required environment variable 'ANTHROPIC_API_KEY' is not set".to_string(),
                )
            })?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::Validation(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => 8080,
        };

        let model_timeout = match lookup("MODEL_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                AppError::Validation(format!(
                    "MODEL_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?),
            None => Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
        };

        let structure_fallback = lookup("STRUCTURE_FALLBACK")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Config {
            anthropic_api_key,
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            model_timeout,
            structure_fallback,
        })
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            model_timeout: self.model_timeout,
            structure_fallback: self.structure_fallback,
        }
    }
}
