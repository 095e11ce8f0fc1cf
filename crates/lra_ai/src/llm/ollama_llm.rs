use lra_core::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Llm;
use crate::ollama::OllamaClient;

#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    fn call(&self, req: GenerateRequest<'_>) -> Result<String, AppError> {
        let url = format!("{}/api/generate", self.client.base_url());
        let body = serde_json::to_value(&req).map_err(|e| {
            AppError::new("AI_COMPLETION_FAILED", "Failed to encode completion request")
                .with_details(e.to_string())
        })?;

        let resp = ureq::post(&url)
            .timeout(self.client.completion_timeout())
            .send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new("AI_COMPLETION_FAILED", "Failed to decode completion response")
                        .with_details(e.to_string())
                })?;
                if v.response.trim().is_empty() {
                    return Err(AppError::new("AI_COMPLETION_FAILED", "Completion response was empty"));
                }
                Ok(v.response)
            }
            Ok(r) => Err(
                AppError::new("AI_COMPLETION_FAILED", "Completion request failed")
                    .with_details(format!("status={}; model={}", r.status(), req.model)),
            ),
            Err(e) => Err(
                AppError::new("AI_COMPLETION_FAILED", "Failed to call completion endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl Llm for OllamaLlm {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        self.call(GenerateRequest {
            model,
            prompt,
            stream: false,
            format: None,
            options: GenerateOptions { temperature: 0.0 },
        })
    }

    fn generate_structured(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, AppError> {
        // Ollama constrains decoding to the schema when it is passed as `format`.
        let text = self.call(GenerateRequest {
            model,
            prompt,
            stream: false,
            format: Some(schema),
            options: GenerateOptions { temperature: 0.0 },
        })?;
        serde_json::from_str(text.trim()).map_err(|e| {
            AppError::new("AI_STRUCTURED_OUTPUT_INVALID", "Structured completion was not valid JSON")
                .with_details(e.to_string())
        })
    }
}
