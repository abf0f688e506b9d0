pub mod engine;
mod parse;
mod prompt;
pub mod retry;

use serde_json::Value;

use versus_core::{AiSettings, CollaboratorError};

pub use engine::{ChatBackend, LlmChat};
pub use retry::RetryPolicy;

/// Ask the configured model to compare `items`.
///
/// Returns the payload as JSON, not yet normalized: the caller runs it through
/// [`versus_core::normalize`] before showing it.
pub async fn generate_comparison(
    items: &[String],
    settings: &AiSettings,
) -> Result<Value, CollaboratorError> {
    let backend = LlmChat::new(settings)?;

    tracing::info!(
        provider = %settings.provider,
        model = %settings.model,
        items = items.len(),
        "sending comparison request"
    );

    generate_with(&backend, items, &RetryPolicy::from(settings)).await
}

/// Same as [`generate_comparison`] over any chat backend.
pub async fn generate_with<B>(
    backend: &B,
    items: &[String],
    policy: &RetryPolicy,
) -> Result<Value, CollaboratorError>
where
    B: ChatBackend + ?Sized,
{
    let system = prompt::system_prompt();
    let user_msg = prompt::user_message(items);
    let (system, user_msg) = (system.as_str(), user_msg.as_str());

    let raw = retry::with_retry(policy, move || backend.chat(system, user_msg)).await?;
    tracing::debug!(raw = %raw, "raw LLM output");

    parse::parse_llm_output(&raw)
}
