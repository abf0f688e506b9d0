use async_trait::async_trait;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, StructuredOutputFormat};
use llm::error::LLMError;

use versus_core::{AiSettings, CollaboratorError};

/// A chat model that answers one system + user exchange with text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, system: &str, user_msg: &str) -> Result<String, CollaboratorError>;
}

/// Resolve a provider name, case-insensitively, accepting the model family
/// names people tend to type ("gemini", "claude", "gpt").
fn map_backend(provider: &str) -> Result<LLMBackend, CollaboratorError> {
    let backend = match provider.trim().to_ascii_lowercase().as_str() {
        "google" | "gemini" => LLMBackend::Google,
        "anthropic" | "claude" => LLMBackend::Anthropic,
        "openai" | "gpt" => LLMBackend::OpenAI,
        "ollama" => LLMBackend::Ollama,
        "groq" => LLMBackend::Groq,
        "mistral" => LLMBackend::Mistral,
        "deepseek" => LLMBackend::DeepSeek,
        _ => {
            return Err(CollaboratorError::UnknownProvider {
                provider: provider.to_string(),
            })
        }
    };
    Ok(backend)
}

/// Sort provider failures into transient ones and ones a retry cannot fix.
fn classify(err: LLMError) -> CollaboratorError {
    match err {
        LLMError::HttpError(message) | LLMError::ProviderError(message) => {
            CollaboratorError::Transport { message }
        }
        LLMError::ResponseFormatError { message, .. } | LLMError::JsonError(message) => {
            CollaboratorError::Malformed { message }
        }
        LLMError::AuthError(message) => CollaboratorError::Rejected {
            message: format!("authentication failed: {message}"),
        },
        LLMError::InvalidRequest(message) | LLMError::ToolConfigError(message) => {
            CollaboratorError::Rejected { message }
        }
        other => CollaboratorError::Rejected {
            message: other.to_string(),
        },
    }
}

/// Structured-output format wrapping the comparison schema.
fn response_format() -> Result<StructuredOutputFormat, CollaboratorError> {
    serde_json::from_value(serde_json::json!({
        "name": "comparison",
        "description": "A multi-attribute comparison of the requested items.",
        "schema": versus_core::response_schema(),
    }))
    .map_err(|e| CollaboratorError::Build {
        message: format!("response schema: {e}"),
    })
}

/// [`ChatBackend`] over the `llm` crate's provider clients.
pub struct LlmChat {
    settings: AiSettings,
}

impl LlmChat {
    pub fn new(settings: &AiSettings) -> Result<Self, CollaboratorError> {
        map_backend(&settings.provider)?;
        Ok(Self {
            settings: settings.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for LlmChat {
    async fn chat(&self, system: &str, user_msg: &str) -> Result<String, CollaboratorError> {
        let backend = map_backend(&self.settings.provider)?;

        let mut builder = LLMBuilder::new()
            .backend(backend)
            .model(&self.settings.model)
            .temperature(self.settings.temperature)
            .stream(false)
            .system(system)
            .schema(response_format()?);

        if !self.settings.api_key.is_empty() {
            builder = builder.api_key(&self.settings.api_key);
        }

        let llm = builder.build().map_err(|e| CollaboratorError::Build {
            message: e.to_string(),
        })?;

        let messages = vec![ChatMessage::user().content(user_msg).build()];

        let response = llm
            .chat(&messages)
            .await
            .map_err(classify)?;

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CollaboratorError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_map() {
        for provider in ["openai", "anthropic", "google", "ollama", "groq", "mistral", "deepseek"] {
            assert!(map_backend(provider).is_ok(), "{provider}");
        }
        assert!(matches!(map_backend(" Gemini "), Ok(LLMBackend::Google)));
        assert!(matches!(map_backend("Claude"), Ok(LLMBackend::Anthropic)));
    }

    #[test]
    fn only_network_and_provider_failures_stay_retryable() {
        let transient = [
            LLMError::HttpError("connection reset".into()),
            LLMError::ProviderError("503 overloaded".into()),
        ];
        for err in transient {
            assert!(classify(err).is_retryable());
        }

        let malformed = classify(LLMError::ResponseFormatError {
            message: "not json".into(),
            raw_response: "oops".into(),
        });
        assert_eq!(
            malformed,
            CollaboratorError::Malformed {
                message: "not json".into()
            }
        );
        assert!(matches!(
            classify(LLMError::JsonError("eof".into())),
            CollaboratorError::Malformed { .. }
        ));

        for err in [
            LLMError::AuthError("bad key".into()),
            LLMError::InvalidRequest("schema".into()),
            LLMError::Generic("?".into()),
            LLMError::RetryExceeded {
                attempts: 3,
                last_error: "timeout".into(),
            },
        ] {
            let mapped = classify(err);
            assert!(matches!(mapped, CollaboratorError::Rejected { .. }), "{mapped:?}");
            assert!(!mapped.is_retryable());
        }
    }

    #[test]
    fn unknown_provider_is_rejected_up_front() {
        let settings = AiSettings {
            provider: "acme".to_string(),
            ..AiSettings::default()
        };
        assert!(matches!(
            LlmChat::new(&settings),
            Err(CollaboratorError::UnknownProvider { provider }) if provider == "acme"
        ));
    }

    #[test]
    fn schema_wraps_into_structured_format() {
        assert!(response_format().is_ok());
    }
}
