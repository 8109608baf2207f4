//! OpenAI chat-completion instruction generator.

use super::{parse_instruction_set, GeneratedInstructions, InstructionError, InstructionGenerator};
use crate::config::{ApiKey, InstructionPrompts, InstructionSettings};
use crate::error::Result;
use crate::openai::{create_client, create_client_with_timeout};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Generates instruction sets with an OpenAI chat model.
pub struct OpenAiInstructionGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: InstructionPrompts,
}

impl OpenAiInstructionGenerator {
    /// Create a generator for `model` with default prompts.
    pub fn new(model: &str, api_key: Option<&ApiKey>) -> Result<Self> {
        Ok(Self {
            client: create_client(api_key)?,
            model: model.to_string(),
            temperature: 0.2,
            prompts: InstructionPrompts::default(),
        })
    }

    /// Create a generator from the instruction section of the pipeline config.
    pub fn from_settings(
        settings: &InstructionSettings,
        prompts: InstructionPrompts,
        api_key: Option<&ApiKey>,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(
                api_key,
                Duration::from_secs(settings.request_timeout_secs),
            )?,
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompts,
        })
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: InstructionPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages(
        &self,
        transcript: &str,
    ) -> std::result::Result<Vec<ChatCompletionRequestMessage>, InstructionError> {
        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.system.clone())
                .build()
                .map_err(|e| InstructionError::Service(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(self.prompts.render_user(transcript))
                .build()
                .map_err(|e| InstructionError::Service(e.to_string()))?
                .into(),
        ])
    }

    /// Send one completion request and return the completion text.
    async fn complete(&self, transcript: &str) -> std::result::Result<String, InstructionError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.build_messages(transcript)?)
            .temperature(self.temperature)
            .build()
            .map_err(|e| InstructionError::Service(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            InstructionError::Service(format!("{} API error: {}", self.model, e))
        })?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| InstructionError::Service("Empty response from model".to_string()))
    }
}

#[async_trait]
impl InstructionGenerator for OpenAiInstructionGenerator {
    #[instrument(skip(self), fields(model = %self.model, transcript = %transcript_path.display()))]
    async fn generate_instructions(
        &self,
        transcript_path: &Path,
    ) -> std::result::Result<GeneratedInstructions, InstructionError> {
        let transcript = tokio::fs::read_to_string(transcript_path).await?;
        info!("Generating instructions from {} characters of transcript", transcript.len());

        let completion = self.complete(&transcript).await?;
        debug!("Completion length: {}", completion.len());

        match parse_instruction_set(&completion) {
            Ok(value) => Ok(GeneratedInstructions::from_value(value)),
            Err(e) => {
                warn!("Could not parse completion as JSON");
                Err(e)
            }
        }
    }
}
