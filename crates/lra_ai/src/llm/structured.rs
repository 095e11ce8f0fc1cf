//! Typed structured decoding on top of [`Llm::generate_structured`].

use lra_core::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::Llm;

/// A record the completion service can be asked to produce directly.
pub trait StructuredOutput: DeserializeOwned {
    /// Schema title, also used in error messages.
    const NAME: &'static str;

    fn schema() -> Value;
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("completion service failed: {0}")]
    Upstream(#[from] AppError),
    #[error("{target} did not match its schema: {source}")]
    Schema {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Collapse into the shared error shape under the caller's error code.
    pub fn into_app_error(self, code: &str, message: &str) -> AppError {
        let retryable = matches!(&self, DecodeError::Upstream(e) if e.retryable);
        AppError::new(code, message)
            .with_details(self.to_string())
            .with_retryable(retryable)
    }
}

pub fn decode<T: StructuredOutput>(llm: &dyn Llm, model: &str, prompt: &str) -> Result<T, DecodeError> {
    let value = llm.generate_structured(model, prompt, &T::schema())?;
    serde_json::from_value(value).map_err(|source| DecodeError::Schema {
        target: T::NAME,
        source,
    })
}

/// Locate the outermost JSON object in free text, tolerating Markdown fences and chatter.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_fenced_reply() {
        let reply = "Sure:\n```json\n{\"route\": \"Overview\"}\n```";
        assert_eq!(extract_json_object(reply), Some("{\"route\": \"Overview\"}"));
        assert_eq!(extract_json_object("no json"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
