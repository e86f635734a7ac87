use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::extraction::{DocumentFormat, PdfStrategy};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which model backend handles suggestion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Ollama,
    Anthropic,
}

impl FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(anyhow!("unknown LLM provider '{other}'")),
        }
    }
}

/// What happens to uploaded files once a request finishes.
///
/// `Keep` leaves every upload in the working directory forever. Nothing
/// rotates or expires them, so the directory grows with traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadRetention {
    #[default]
    Keep,
    Delete,
}

impl FromStr for UploadRetention {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(UploadRetention::Keep),
            "delete" => Ok(UploadRetention::Delete),
            other => Err(anyhow!("unknown upload retention '{other}'")),
        }
    }
}

/// Model backend settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub temperature: f32,
    pub ollama_url: String,
    pub anthropic_api_key: Option<String>,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub upload_retention: UploadRetention,
    pub max_upload_bytes: usize,
    pub allowed_formats: Vec<DocumentFormat>,
    pub pdf_strategy: PdfStrategy,
    pub llm: LlmConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let provider: LlmProvider = var("LLM_PROVIDER", "ollama")
            .parse()
            .context("LLM_PROVIDER must be 'ollama' or 'anthropic'")?;

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if provider == LlmProvider::Anthropic && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set");
        }

        let temperature = var("LLM_TEMPERATURE", "0.7")
            .parse::<f32>()
            .context("LLM_TEMPERATURE must be a number")?;
        if !(0.0..=2.0).contains(&temperature) {
            bail!("LLM_TEMPERATURE must be between 0.0 and 2.0, got {temperature}");
        }

        Ok(Config {
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            upload_dir: PathBuf::from(var("UPLOAD_DIR", "./uploads")),
            upload_retention: var("UPLOAD_RETENTION", "keep")
                .parse()
                .context("UPLOAD_RETENTION must be 'keep' or 'delete'")?,
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            allowed_formats: vec![DocumentFormat::Pdf, DocumentFormat::Docx],
            pdf_strategy: var("PDF_EXTRACTOR", "pages")
                .parse()
                .context("PDF_EXTRACTOR must be 'pages' or 'whole'")?,
            llm: LlmConfig {
                provider,
                model: var("LLM_MODEL", "llama3"),
                temperature,
                ollama_url: var("OLLAMA_URL", "http://localhost:11434"),
                anthropic_api_key,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_match_original_service() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.upload_retention, UploadRetention::Keep);
        assert_eq!(config.pdf_strategy, PdfStrategy::PageIteration);
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.model, "llama3");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.allowed_formats,
            vec![DocumentFormat::Pdf, DocumentFormat::Docx]
        );
    }

    #[test]
    fn test_anthropic_requires_api_key() {
        let err = config_from(&[("LLM_PROVIDER", "anthropic")]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config = config_from(&[
            ("LLM_PROVIDER", "Anthropic"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("LLM_MODEL", "claude-sonnet-4-5"),
        ])
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.anthropic_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("LLM_TEMPERATURE", "hot")]).is_err());
        assert!(config_from(&[("LLM_TEMPERATURE", "3.5")]).is_err());
        assert!(config_from(&[("UPLOAD_RETENTION", "forever")]).is_err());
        assert!(config_from(&[("PDF_EXTRACTOR", "ocr")]).is_err());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("UPLOAD_DIR", "/tmp/resumes"),
            ("UPLOAD_RETENTION", "delete"),
            ("PDF_EXTRACTOR", "whole"),
            ("MAX_UPLOAD_BYTES", "2048"),
        ])
        .unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/resumes"));
        assert_eq!(config.upload_retention, UploadRetention::Delete);
        assert_eq!(config.pdf_strategy, PdfStrategy::WholeDocument);
        assert_eq!(config.max_upload_bytes, 2048);
    }
}
