use super::*;
use std::time::Instant;

/// Translator backed by a local Ollama server
pub struct OllamaTranslator {
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaTranslator {
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            base_url,
            model,
            timeout,
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    /// Ask Ollama to constrain the reply to JSON
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationBundle, TranslateError> {
        let start = Instant::now();

        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt: build_prompt(text),
            stream: false,
            format: "json",
        };
        let url = format!("{}/api/generate", self.base_url);

        let response = tokio::time::timeout(
            self.timeout,
            self.client.post(&url).json(&request).send(),
        )
        .await
        .map_err(|_| TranslateError::Timeout(self.timeout))?
        .map_err(|e| TranslateError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Api(format!(
                "Ollama API returned status: {}",
                response.status()
            )));
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        tracing::debug!(
            "Ollama translation via {} took {}ms",
            self.model,
            start.elapsed().as_millis()
        );
        parse_bundle(&body.response, text)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
