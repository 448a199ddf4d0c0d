//! Best-effort translation of admin-entered text into every quiz language
//!
//! Providers implement [`Translator`]. [`TranslationService`] wraps the optional
//! configured provider and never lets a failure escape: callers always get a
//! bundle back, at worst the source text echoed into every language.

mod ollama;
mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::types::TranslationBundle;

pub use ollama::OllamaTranslator;
pub use openai::OpenAiTranslator;

/// Errors from a translation provider
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response parsing failed: {0}")]
    Parse(String),

    #[error("Translation service not configured")]
    NotConfigured,
}

impl TranslateError {
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::Api(_) => "TRANSLATION_API",
            TranslateError::Timeout(_) => "TRANSLATION_TIMEOUT",
            TranslateError::Parse(_) => "TRANSLATION_PARSE",
            TranslateError::NotConfigured => "TRANSLATION_UNAVAILABLE",
        }
    }
}

/// A translation backend
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<TranslationBundle, TranslateError>;

    fn name(&self) -> &str;
}

/// Instruction shared by all providers
pub(crate) const TRANSLATION_PROMPT: &str = "Translate the text below from English into Spanish, \
Papiamentu (as spoken on Curaçao) and Dutch. Reply with a single JSON object with exactly the keys \
\"english\", \"spanish\", \"papiamentu\" and \"dutch\", each holding the text in that language. \
Keep names, numbers and punctuation. Do not add explanations.";

pub(crate) fn build_prompt(text: &str) -> String {
    format!("{}\n\nText:\n{}", TRANSLATION_PROMPT, text)
}

#[derive(Deserialize)]
struct RawBundle {
    #[serde(default)]
    english: Option<String>,
    #[serde(default)]
    spanish: Option<String>,
    #[serde(default)]
    papiamentu: Option<String>,
    #[serde(default)]
    dutch: Option<String>,
}

/// Parse a provider reply into a bundle. Markdown code fences are tolerated;
/// any missing or blank entry is replaced by `source`.
pub(crate) fn parse_bundle(reply: &str, source: &str) -> Result<TranslationBundle, TranslateError> {
    let mut body = reply.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Drop an optional language tag after the opening fence
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        body = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    let raw: RawBundle =
        serde_json::from_str(body).map_err(|e| TranslateError::Parse(e.to_string()))?;

    let clean = |value: Option<String>| {
        value
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| source.to_string())
    };

    Ok(TranslationBundle {
        english: clean(raw.english),
        spanish: Some(clean(raw.spanish)),
        papiamentu: Some(clean(raw.papiamentu)),
        dutch: Some(clean(raw.dutch)),
    })
}

/// Translation result for the admin form, with the reason when it fell back
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationOutcome {
    pub bundle: TranslationBundle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Wraps the optional provider with echo fallback and an in-flight flag
pub struct TranslationService {
    translator: Option<Arc<dyn Translator>>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight count when the request finishes, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TranslationService {
    pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
        Self {
            translator,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Service with no provider; every call echoes
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.translator.is_some()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.translator.as_deref().map(|t| t.name())
    }

    /// Translate `text`; never fails
    pub async fn translate(&self, text: &str) -> TranslationBundle {
        self.translate_for_admin(text).await.bundle
    }

    /// Translate `text`, reporting why the result is an echo if it is one
    pub async fn translate_for_admin(&self, text: &str) -> TranslationOutcome {
        let result = match &self.translator {
            None => Err(TranslateError::NotConfigured),
            Some(translator) if text.trim().is_empty() => {
                tracing::debug!("Skipping {} for blank text", translator.name());
                Ok(TranslationBundle::echo(text))
            }
            Some(translator) => {
                let _guard = InFlight::enter(&self.in_flight);
                translator.translate(text).await
            }
        };

        match result {
            Ok(bundle) => TranslationOutcome {
                bundle,
                fallback_reason: None,
            },
            Err(e) => {
                tracing::warn!("Translation failed: {}, echoing source text", e);
                TranslationOutcome {
                    bundle: TranslationBundle::echo(text),
                    fallback_reason: Some(e.to_string()),
                }
            }
        }
    }
}

/// Configuration for translation providers
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Ollama is used only when this is set
    pub ollama_base_url: Option<String>,
    pub ollama_model: String,
    pub timeout: Duration,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            ollama_base_url: None,
            ollama_model: "llama3.2".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl TranslationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: env_trimmed("OPENAI_API_KEY"),
            openai_model: env_trimmed("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            ollama_base_url: env_trimmed("OLLAMA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            ollama_model: env_trimmed("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            timeout: env_trimmed("TRANSLATION_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// The configured provider, OpenAI preferred over Ollama
    pub fn build_translator(&self) -> Option<Arc<dyn Translator>> {
        if let Some(api_key) = &self.openai_api_key {
            return Some(Arc::new(OpenAiTranslator::new(
                api_key.clone(),
                self.openai_model.clone(),
                self.timeout,
            )));
        }
        if let Some(base_url) = &self.ollama_base_url {
            return Some(Arc::new(OllamaTranslator::new(
                base_url.clone(),
                self.ollama_model.clone(),
                self.timeout,
            )));
        }
        None
    }

    pub fn build_service(&self) -> TranslationService {
        let service = TranslationService::new(self.build_translator());
        match service.provider_name() {
            Some(name) => tracing::info!("Translation provider: {}", name),
            None => tracing::warn!(
                "No translation provider configured. Set OPENAI_API_KEY or OLLAMA_BASE_URL"
            ),
        }
        service
    }
}
