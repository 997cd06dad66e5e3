//! Language-model access: one prompt in, one completion out.
//!
//! [`TextGenerator`] is the only seam between the pipeline and a hosted
//! model. [`ProviderGenerator`] implements it on top of any
//! `edgequake_llm::LLMProvider` (OpenAI, Anthropic, Gemini, Ollama, Azure…);
//! tests implement it with canned replies.
//!
//! Calls are made exactly once: no caching, no retry. A call that exceeds
//! `api_timeout_secs` or fails in the provider is reported as
//! [`ScreenError::Connectivity`] for [`Endpoint::LanguageModel`].

use crate::config::ScreeningConfig;
use crate::error::{Endpoint, ScreenError};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default model used when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// A single-shot text completion endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `system` + `prompt` and return the model's completion text.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ScreenError>;
}

/// [`TextGenerator`] backed by an `edgequake_llm` provider.
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
    timeout: Duration,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &ScreeningConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, ScreenError> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];
        let start = Instant::now();

        let call = self.provider.chat(&messages, Some(&self.options));
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Model call failed after {:?}: {e}", start.elapsed());
                return Err(ScreenError::Connectivity {
                    endpoint: Endpoint::LanguageModel,
                    detail: e.to_string(),
                });
            }
            Err(_) => {
                warn!("Model call timed out after {}s", self.timeout.as_secs());
                return Err(ScreenError::Connectivity {
                    endpoint: Endpoint::LanguageModel,
                    detail: format!("timed out after {}s", self.timeout.as_secs()),
                });
            }
        };

        debug!(
            "Model call: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

/// Build `CompletionOptions` from the screening config.
fn build_options(config: &ScreeningConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Resolve the text generator, from most-specific to least-specific:
///
/// 1. `config.generator`, used as-is.
/// 2. `config.provider_name` (+ `config.model`, default [`DEFAULT_MODEL`]).
/// 3. `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL` when both are set.
/// 4. `OPENAI_API_KEY` present → OpenAI.
/// 5. `ProviderFactory::from_env()` auto-detection.
pub fn resolve_generator(config: &ScreeningConfig) -> Result<Arc<dyn TextGenerator>, ScreenError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    let provider = resolve_provider(config)?;
    Ok(Arc::new(ProviderGenerator::new(provider, config)))
}

fn resolve_provider(config: &ScreeningConfig) -> Result<Arc<dyn LLMProvider>, ScreenError> {
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ScreenError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY, or pass --provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ScreenError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ScreenError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
