//! Configuration for screening runs.
//!
//! All endpoints and tuning knobs live in one [`ScreeningConfig`] value that
//! callers build once and pass to every operation in [`crate::screen`].
//! Nothing here is read from process-wide state; the CLI maps its flags and
//! environment variables onto the builder, and tests point the same builder
//! at local fakes.

use crate::error::ScreenError;
use crate::pipeline::llm::TextGenerator;
use std::fmt;
use std::sync::Arc;

/// Default webhook timeout in seconds.
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 60;

/// Configuration for document Q&A, structured extraction and screening dispatch.
///
/// Built via [`ScreeningConfig::builder()`] or using
/// [`ScreeningConfig::default()`].
///
/// # Example
/// ```rust
/// use resume_screener::ScreeningConfig;
///
/// let config = ScreeningConfig::builder()
///     .webhook_url("https://automation.example.com/webhook/screen")
///     .webhook_timeout_secs(30)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// assert_eq!(config.webhook_timeout_secs, 30);
/// ```
#[derive(Clone)]
pub struct ScreeningConfig {
    /// Screening webhook endpoint. Required only for dispatch.
    pub webhook_url: Option<String>,

    /// Upper bound on the whole webhook POST, in seconds. Default: 60.
    pub webhook_timeout_secs: u64,

    /// LLM model identifier, e.g. "gpt-4.1-nano", "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini", "ollama").
    /// If None, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed text generator. Takes precedence over `provider_name`.
    pub generator: Option<Arc<dyn TextGenerator>>,

    /// Sampling temperature for model calls. Default: 0.0.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 2048.
    pub max_tokens: usize,

    /// Per model call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            model: None,
            provider_name: None,
            generator: None,
            temperature: 0.0,
            max_tokens: 2048,
            api_timeout_secs: 60,
        }
    }
}

impl fmt::Debug for ScreeningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreeningConfig")
            .field("webhook_url", &self.webhook_url)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("generator", &self.generator.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ScreeningConfig {
    /// Create a new builder for `ScreeningConfig`.
    pub fn builder() -> ScreeningConfigBuilder {
        ScreeningConfigBuilder {
            config: Self::default(),
        }
    }

    /// The webhook URL, or [`ScreenError::InvalidConfig`] if none was set.
    pub fn require_webhook_url(&self) -> Result<&str, ScreenError> {
        self.webhook_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                ScreenError::InvalidConfig(
                    "No screening webhook URL configured.\n\
                     Pass --webhook-url or set N8N_WEBHOOK_URL."
                        .into(),
                )
            })
    }
}

/// Builder for [`ScreeningConfig`].
#[derive(Debug)]
pub struct ScreeningConfigBuilder {
    config: ScreeningConfig,
}

impl ScreeningConfigBuilder {
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook_url = Some(url.into());
        self
    }

    pub fn webhook_timeout_secs(mut self, secs: u64) -> Self {
        self.config.webhook_timeout_secs = secs;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScreeningConfig, ScreenError> {
        let c = &self.config;
        if let Some(ref url) = c.webhook_url {
            let parsed = reqwest::Url::parse(url).map_err(|e| {
                ScreenError::InvalidConfig(format!("Webhook URL '{url}' is not a valid URL: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ScreenError::InvalidConfig(format!(
                    "Webhook URL must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }
        if c.webhook_timeout_secs == 0 {
            return Err(ScreenError::InvalidConfig(
                "Webhook timeout must be ≥ 1 second".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(ScreenError::InvalidConfig(
                "Model call timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(ScreenError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
