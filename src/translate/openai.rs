use super::*;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Instant;

/// OpenAI chat-completion translator
pub struct OpenAiTranslator {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiTranslator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self {
            client,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationBundle, TranslateError> {
        let start = Instant::now();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(TRANSLATION_PROMPT)
                    .build()
                    .map_err(|e| TranslateError::Api(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()
                    .map_err(|e| TranslateError::Api(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| TranslateError::Api(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| TranslateError::Timeout(self.timeout))?
            .map_err(|e| TranslateError::Api(e.to_string()))?;

        let reply = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| TranslateError::Parse("No content in response".to_string()))?;

        tracing::debug!(
            "OpenAI translation via {} took {}ms",
            self.model,
            start.elapsed().as_millis()
        );
        parse_bundle(&reply, text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
