//! Voice-assistant data models and option catalogs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_ASSISTANT_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 500;
pub const MAX_SYSTEM_PROMPT_LEN: usize = 4000;
pub const MIN_CALL_DURATION_SECS: u32 = 30;
pub const MAX_CALL_DURATION_SECS: u32 = 3600;

/// LLM vendor backing an assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Openai,
    Anthropic,
    Google,
    Groq,
}

impl ModelProvider {
    pub fn all() -> &'static [ModelProvider] {
        &[Self::Openai, Self::Anthropic, Self::Google, Self::Groq]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Groq => "groq",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Openai => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Google => "Google",
            Self::Groq => "Groq",
        }
    }

    /// Models offered by this provider, in catalog order.
    pub fn models(&self) -> &'static [ModelName] {
        match self {
            Self::Openai => &[ModelName::Gpt4o, ModelName::Gpt4oMini, ModelName::Gpt4Turbo],
            Self::Anthropic => &[
                ModelName::Claude35Sonnet,
                ModelName::Claude3Opus,
                ModelName::Claude3Haiku,
            ],
            Self::Google => &[ModelName::GeminiPro, ModelName::GeminiProVision],
            Self::Groq => &[ModelName::Llama370b, ModelName::Mixtral8x7b],
        }
    }
}

/// Concrete model identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelName {
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet,
    #[serde(rename = "claude-3-opus-20240229")]
    Claude3Opus,
    #[serde(rename = "claude-3-haiku-20240307")]
    Claude3Haiku,
    #[serde(rename = "gemini-pro")]
    GeminiPro,
    #[serde(rename = "gemini-pro-vision")]
    GeminiProVision,
    #[serde(rename = "llama-3-70b")]
    Llama370b,
    #[serde(rename = "mixtral-8x7b")]
    Mixtral8x7b,
}

impl ModelName {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Claude35Sonnet => "claude-3-5-sonnet-20241022",
            Self::Claude3Opus => "claude-3-opus-20240229",
            Self::Claude3Haiku => "claude-3-haiku-20240307",
            Self::GeminiPro => "gemini-pro",
            Self::GeminiProVision => "gemini-pro-vision",
            Self::Llama370b => "llama-3-70b",
            Self::Mixtral8x7b => "mixtral-8x7b",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gpt4o => "GPT-4o",
            Self::Gpt4oMini => "GPT-4o Mini",
            Self::Gpt4Turbo => "GPT-4 Turbo",
            Self::Claude35Sonnet => "Claude 3.5 Sonnet",
            Self::Claude3Opus => "Claude 3 Opus",
            Self::Claude3Haiku => "Claude 3 Haiku",
            Self::GeminiPro => "Gemini Pro",
            Self::GeminiProVision => "Gemini Pro Vision",
            Self::Llama370b => "Llama 3 70B",
            Self::Mixtral8x7b => "Mixtral 8x7B",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Gpt4o => "Most capable model",
            Self::Gpt4oMini => "Fast and efficient",
            Self::Gpt4Turbo => "High performance",
            Self::Claude35Sonnet => "Best balance",
            Self::Claude3Opus => "Most powerful",
            Self::Claude3Haiku => "Fastest",
            Self::GeminiPro => "General purpose",
            Self::GeminiProVision => "Multimodal",
            Self::Llama370b => "Open source powerhouse",
            Self::Mixtral8x7b => "Fast MoE model",
        }
    }
}

/// Speech voice for the assistant (ElevenLabs catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantVoice {
    Rachel,
    Domi,
    Bella,
    Antoni,
    Elli,
    Josh,
    Arnold,
    Adam,
    Sam,
    Nicole,
    Glinda,
    Clyde,
    Paul,
    Callum,
    Charlotte,
    Matilda,
    Lily,
}

impl AssistantVoice {
    pub fn all() -> &'static [AssistantVoice] {
        &[
            Self::Rachel,
            Self::Domi,
            Self::Bella,
            Self::Antoni,
            Self::Elli,
            Self::Josh,
            Self::Arnold,
            Self::Adam,
            Self::Sam,
            Self::Nicole,
            Self::Glinda,
            Self::Clyde,
            Self::Paul,
            Self::Callum,
            Self::Charlotte,
            Self::Matilda,
            Self::Lily,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Rachel => "rachel",
            Self::Domi => "domi",
            Self::Bella => "bella",
            Self::Antoni => "antoni",
            Self::Elli => "elli",
            Self::Josh => "josh",
            Self::Arnold => "arnold",
            Self::Adam => "adam",
            Self::Sam => "sam",
            Self::Nicole => "nicole",
            Self::Glinda => "glinda",
            Self::Clyde => "clyde",
            Self::Paul => "paul",
            Self::Callum => "callum",
            Self::Charlotte => "charlotte",
            Self::Matilda => "matilda",
            Self::Lily => "lily",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rachel => "Rachel",
            Self::Domi => "Domi",
            Self::Bella => "Bella",
            Self::Antoni => "Antoni",
            Self::Elli => "Elli",
            Self::Josh => "Josh",
            Self::Arnold => "Arnold",
            Self::Adam => "Adam",
            Self::Sam => "Sam",
            Self::Nicole => "Nicole",
            Self::Glinda => "Glinda",
            Self::Clyde => "Clyde",
            Self::Paul => "Paul",
            Self::Callum => "Callum",
            Self::Charlotte => "Charlotte",
            Self::Matilda => "Matilda",
            Self::Lily => "Lily",
        }
    }

    pub fn gender(&self) -> &'static str {
        match self {
            Self::Rachel
            | Self::Domi
            | Self::Bella
            | Self::Elli
            | Self::Nicole
            | Self::Glinda
            | Self::Charlotte
            | Self::Matilda
            | Self::Lily => "female",
            _ => "male",
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            Self::Callum | Self::Charlotte | Self::Lily => "British",
            Self::Matilda => "Australian",
            _ => "American",
        }
    }
}

/// A configured voice assistant for a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAssistant {
    pub id: Uuid,
    pub business_id: Uuid,
    /// Back-reference to the inbound number, not ownership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_id: Option<Uuid>,
    pub name: String,
    pub first_message: String,
    pub system_prompt: String,
    pub model_provider: ModelProvider,
    pub model_name: ModelName,
    pub voice: AssistantVoice,
    pub end_call_message: String,
    pub max_call_duration_seconds: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /voice-assistant/{business_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoiceAssistant {
    pub name: String,
    pub first_message: String,
    pub system_prompt: String,
    pub model_provider: ModelProvider,
    pub model_name: ModelName,
    pub voice: AssistantVoice,
    pub end_call_message: String,
    pub max_call_duration_seconds: u32,
    #[serde(default)]
    pub phone_number_id: Option<Uuid>,
}

impl CreateVoiceAssistant {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_text("name", &self.name, MAX_ASSISTANT_NAME_LEN)?;
        validate_text("first_message", &self.first_message, MAX_MESSAGE_LEN)?;
        validate_text("system_prompt", &self.system_prompt, MAX_SYSTEM_PROMPT_LEN)?;
        validate_text("end_call_message", &self.end_call_message, MAX_MESSAGE_LEN)?;
        validate_duration(self.max_call_duration_seconds)
    }
}

/// Request body for `PATCH /voice-assistant/{business_id}/{assistant_id}`.
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVoiceAssistant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_message: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model_provider: Option<ModelProvider>,
    #[serde(default)]
    pub model_name: Option<ModelName>,
    #[serde(default)]
    pub voice: Option<AssistantVoice>,
    #[serde(default)]
    pub end_call_message: Option<String>,
    #[serde(default)]
    pub max_call_duration_seconds: Option<u32>,
    #[serde(default)]
    pub phone_number_id: Option<Uuid>,
}

impl UpdateVoiceAssistant {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref name) = self.name {
            validate_text("name", name, MAX_ASSISTANT_NAME_LEN)?;
        }
        if let Some(ref first_message) = self.first_message {
            validate_text("first_message", first_message, MAX_MESSAGE_LEN)?;
        }
        if let Some(ref system_prompt) = self.system_prompt {
            validate_text("system_prompt", system_prompt, MAX_SYSTEM_PROMPT_LEN)?;
        }
        if let Some(ref end_call_message) = self.end_call_message {
            validate_text("end_call_message", end_call_message, MAX_MESSAGE_LEN)?;
        }
        if let Some(duration) = self.max_call_duration_seconds {
            validate_duration(duration)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    if len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn validate_duration(seconds: u32) -> Result<(), ApiError> {
    if !(MIN_CALL_DURATION_SECS..=MAX_CALL_DURATION_SECS).contains(&seconds) {
        return Err(ApiError::Validation(format!(
            "max_call_duration_seconds must be between {MIN_CALL_DURATION_SECS} and {MAX_CALL_DURATION_SECS}"
        )));
    }
    Ok(())
}

// ── Options catalog ─────────────────────────────────────────────────────

/// One model entry in the options catalog.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// One provider entry (with its models) in the options catalog.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderOption {
    pub id: String,
    pub name: String,
    pub models: Vec<ModelOption>,
}

/// One voice entry in the options catalog.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceOption {
    pub id: String,
    pub name: String,
    pub gender: String,
}

/// Response body for `GET /voice-assistant/options`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceOptionsResponse {
    pub providers: Vec<ProviderOption>,
    pub voices: Vec<VoiceOption>,
}

impl VoiceOptionsResponse {
    /// Build the full catalog from the provider/model/voice enums.
    pub fn catalog() -> Self {
        let providers = ModelProvider::all()
            .iter()
            .map(|provider| ProviderOption {
                id: provider.id().to_string(),
                name: provider.display_name().to_string(),
                models: provider
                    .models()
                    .iter()
                    .map(|m| ModelOption {
                        id: m.id().to_string(),
                        name: m.display_name().to_string(),
                        description: m.description().to_string(),
                    })
                    .collect(),
            })
            .collect();

        let voices = AssistantVoice::all()
            .iter()
            .map(|v| VoiceOption {
                id: v.id().to_string(),
                name: v.display_name().to_string(),
                gender: v.gender().to_string(),
            })
            .collect();

        Self { providers, voices }
    }
}
