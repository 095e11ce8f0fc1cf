use lra_core::error::AppError;
use serde_json::Value;

pub mod ollama_llm;
pub mod structured;

/// Completion service capability: prompt in, text (or schema-shaped JSON) out.
pub trait Llm: Send + Sync {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError>;

    /// Structured completion constrained by a JSON schema.
    ///
    /// The default coerces through plain `generate`: the schema is appended to the prompt and the
    /// first JSON object in the reply is parsed. Backends with native schema support override it.
    fn generate_structured(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, AppError> {
        let coerced = format!(
            "{prompt}\n\nRespond with a single JSON object and nothing else. It must match this JSON schema:\n{schema}"
        );
        let text = self.generate(model, &coerced)?;
        let raw = structured::extract_json_object(&text).ok_or_else(|| {
            AppError::new("AI_STRUCTURED_OUTPUT_INVALID", "Completion did not contain a JSON object")
                .with_details(structured::snippet(&text))
        })?;
        serde_json::from_str(raw).map_err(|e| {
            AppError::new("AI_STRUCTURED_OUTPUT_INVALID", "Completion JSON was malformed")
                .with_details(e.to_string())
        })
    }
}
