use std::time::Duration;

use lra_core::config::OllamaConfig;
use lra_core::error::AppError;

/// Connection settings for a local Ollama server, shared by the completion and embedding clients.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    completion_timeout: Duration,
    embed_timeout: Duration,
}

impl OllamaClient {
    /// Create a client for Ollama. This is strictly limited to `127.0.0.1`.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        // Corpus text and user questions never leave the host.
        let port_ok = match base_url.strip_prefix("http://127.0.0.1") {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix(':')
                .and_then(|p| p.parse::<u16>().ok())
                .is_some_and(|p| p != 0),
            None => false,
        };
        if !port_ok {
            return Err(AppError::new(
                "AI_REMOTE_NOT_ALLOWED",
                "Ollama base URL must be localhost (127.0.0.1)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self {
            base_url,
            completion_timeout: Duration::from_secs(60),
            embed_timeout: Duration::from_secs(10),
        })
    }

    pub fn from_config(cfg: &OllamaConfig) -> Result<Self, AppError> {
        Ok(Self::new(&cfg.base_url)?.with_timeouts(
            Duration::from_secs(cfg.completion_timeout_secs),
            Duration::from_secs(cfg.embed_timeout_secs),
        ))
    }

    pub fn with_timeouts(mut self, completion: Duration, embed: Duration) -> Self {
        self.completion_timeout = completion;
        self.embed_timeout = embed;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn completion_timeout(&self) -> Duration {
        self.completion_timeout
    }

    pub fn embed_timeout(&self) -> Duration {
        self.embed_timeout
    }

    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = ureq::get(&url).timeout(Duration::from_millis(800)).call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(
                AppError::new("AI_OLLAMA_UNHEALTHY", "Ollama health check failed")
                    .with_details(format!("status={}", r.status())),
            ),
            Err(e) => Err(AppError::new(
                "AI_OLLAMA_UNREACHABLE",
                "Failed to reach Ollama on 127.0.0.1",
            )
            .with_details(e.to_string())
            .with_retryable(true)),
        }
    }
}
