//! Wizard configuration catalog — everything the onboarding frontend needs
//! to render its steps and forms in one response.

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::server::AppState;
use crate::voice_assistant::model::{AssistantVoice, ModelProvider};

/// One step in the wizard stepper.
#[derive(Debug, Serialize, Deserialize)]
pub struct StepConfig {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// Response body for `GET /config/onboarding`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OnboardingConfigResponse {
    pub steps: Vec<StepConfig>,
    pub business: Value,
    #[serde(rename = "knowledgeBase")]
    pub knowledge_base: Value,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Value,
    #[serde(rename = "voiceAssistant")]
    pub voice_assistant: Value,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/config/onboarding", get(onboarding_config))
}

async fn onboarding_config() -> Json<OnboardingConfigResponse> {
    Json(build_config())
}

fn step(id: u32, title: &str, description: &str, icon: &str) -> StepConfig {
    StepConfig {
        id,
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

fn build_config() -> OnboardingConfigResponse {
    let steps = vec![
        step(1, "Business Info", "Company details", "building"),
        step(2, "Knowledge Base", "Upload documents", "document"),
        step(3, "Phone Number", "Select a number", "phone"),
        step(4, "Voice Assistant", "Configure AI", "microphone"),
    ];

    let business = json!({
        "title": "Business Information",
        "subtitle": "Tell us about your company to personalize your voice assistant",
        "fields": [
            {
                "name": "name",
                "label": "Business Name",
                "placeholder": "Enter your company name",
                "required": true,
                "type": "text",
                "maxLength": 255,
            },
            {
                "name": "description",
                "label": "Description",
                "placeholder": "Briefly describe what your company does (optional)",
                "required": false,
                "type": "textarea",
                "maxLength": 2000,
            },
        ],
        "api": { "endpoint": "/api/v1/business" },
    });

    let knowledge_base = json!({
        "title": "Knowledge Base",
        "subtitle": "Upload documents to train your voice assistant with your business knowledge",
        "maxFileSize": 50 * 1024 * 1024,
        "maxFiles": 10,
        "acceptedFileTypes": [
            { "extension": ".pdf", "label": "PDF Document", "mimeTypes": ["application/pdf"] },
            { "extension": ".csv", "label": "CSV Spreadsheet", "mimeTypes": ["text/csv"] },
            { "extension": ".txt", "label": "Text File", "mimeTypes": ["text/plain"] },
            {
                "extension": ".docx",
                "label": "Word Document",
                "mimeTypes": ["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
            },
            { "extension": ".doc", "label": "Word Document", "mimeTypes": ["application/msword"] },
        ],
        "api": {
            "uploadEndpoint": "/api/v1/knowledge-base/upload",
            "listEndpoint": "/api/v1/knowledge-base",
            "deleteEndpoint": "/api/v1/knowledge-base",
        },
    });

    let phone_number = json!({
        "title": "Select Phone Number",
        "subtitle": "Choose a US phone number for your voice assistant to receive calls",
        "pricePerNumber": 5.00,
        "countries": [
            { "code": "US", "name": "United States" },
        ],
        "numberTypes": [
            { "id": "local", "name": "Local", "description": "Local presence in your area" },
        ],
        "api": {
            "searchEndpoint": "/api/v1/phone-numbers/available",
            "purchaseEndpoint": "/api/v1/phone-numbers/purchase",
            "listEndpoint": "/api/v1/phone-numbers",
        },
    });

    let providers: Vec<Value> = ModelProvider::all()
        .iter()
        .map(|provider| {
            let models: Vec<Value> = provider
                .models()
                .iter()
                .map(|m| {
                    json!({
                        "id": m.id(),
                        "name": m.display_name(),
                        "description": m.description(),
                    })
                })
                .collect();
            json!({
                "id": provider.id(),
                "name": provider.display_name(),
                "models": models,
            })
        })
        .collect();

    let voices: Vec<Value> = AssistantVoice::all()
        .iter()
        .map(|v| {
            json!({
                "id": v.id(),
                "name": v.display_name(),
                "gender": v.gender(),
                "accent": v.accent(),
            })
        })
        .collect();

    let voice_assistant = json!({
        "title": "Configure Voice Assistant",
        "subtitle": "Set up how your AI assistant will interact with callers",
        "providers": providers,
        "voices": voices,
        "durationPresets": [
            { "value": 60, "label": "1 min" },
            { "value": 120, "label": "2 min" },
            { "value": 300, "label": "5 min" },
            { "value": 600, "label": "10 min" },
            { "value": 900, "label": "15 min" },
            { "value": 1800, "label": "30 min" },
            { "value": 3600, "label": "60 min" },
        ],
        "defaults": {
            "systemPrompt": "You are a helpful AI assistant for {business_name}. Your role is to:\n\
                - Answer questions about our products and services\n\
                - Help customers with their inquiries\n\
                - Provide accurate information based on the knowledge base\n\
                - Be professional, friendly, and concise\n\
                \n\
                Always maintain a helpful and professional tone.",
            "firstMessage": "Hello! Thank you for calling. How can I assist you today?",
            "endCallMessage": "Thank you for calling. Have a great day!",
            "maxCallDurationSeconds": 300,
        },
        "api": {
            "endpoint": "/api/v1/voice-assistant",
            "completeEndpoint": "/api/v1/onboarding/complete",
        },
    });

    OnboardingConfigResponse {
        steps,
        business,
        knowledge_base,
        phone_number,
        voice_assistant,
    }
}
