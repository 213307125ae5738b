//! In-memory entity store — the authoritative holder of all collections.
//!
//! Nothing here survives a process restart; a production deployment swaps
//! this for a durable database behind the same contract. Operations are
//! synchronous dictionary lookups and never suspend. There are no
//! transactions: the lock below is the minimum Rust requires for shared
//! state, and concurrent field merges remain last-write-wins.
//!
//! The store performs unconditional inserts — referential checks (does the
//! business exist?) belong to the handler layer. Point lookups return
//! `None` for unknown ids and list operations return an empty `Vec`; the
//! store itself never errors.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::business::model::{Business, CreateBusiness, UpdateBusiness};
use crate::knowledge_base::model::{KnowledgeBaseFile, NewKnowledgeBaseFile};
use crate::onboarding::model::{OnboardingSession, UpdateOnboardingSession};
use crate::phone_numbers::model::{NewPhoneNumber, PhoneNumber};
use crate::voice_assistant::model::{CreateVoiceAssistant, UpdateVoiceAssistant, VoiceAssistant};

#[derive(Default)]
struct Collections {
    businesses: HashMap<Uuid, Business>,
    knowledge_bases: HashMap<Uuid, Vec<KnowledgeBaseFile>>,
    phone_numbers: HashMap<Uuid, Vec<PhoneNumber>>,
    voice_assistants: HashMap<Uuid, Vec<VoiceAssistant>>,
    onboarding_sessions: HashMap<Uuid, OnboardingSession>,
}

/// All entity collections behind one lock, keyed by business where owned.
/// Constructed once at startup and passed by `Arc` through router state.
#[derive(Default)]
pub struct EntityStore {
    inner: RwLock<Collections>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Businesses ──────────────────────────────────────────────────

    pub fn create_business(&self, fields: CreateBusiness) -> Business {
        let now = Utc::now();
        let business = Business {
            id: Uuid::new_v4(),
            name: fields.name,
            description: fields.description,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.write().unwrap();
        inner.businesses.insert(business.id, business.clone());
        business
    }

    pub fn get_business(&self, id: Uuid) -> Option<Business> {
        self.inner.read().unwrap().businesses.get(&id).cloned()
    }

    pub fn list_businesses(&self) -> Vec<Business> {
        self.inner.read().unwrap().businesses.values().cloned().collect()
    }

    /// Merge partial fields into an existing business. Always refreshes
    /// `updated_at`, even when no field is set.
    pub fn update_business(&self, id: Uuid, update: UpdateBusiness) -> Option<Business> {
        let mut inner = self.inner.write().unwrap();
        let business = inner.businesses.get_mut(&id)?;
        if let Some(name) = update.name {
            business.name = name;
        }
        if let Some(description) = update.description {
            business.description = Some(description);
        }
        business.updated_at = Utc::now();
        Some(business.clone())
    }

    /// Delete a business and cascade to its knowledge-base files, phone
    /// numbers, and voice assistants. Onboarding sessions are untouched.
    /// Returns whether the business existed.
    pub fn delete_business(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.businesses.remove(&id).is_none() {
            return false;
        }
        inner.knowledge_bases.remove(&id);
        inner.phone_numbers.remove(&id);
        inner.voice_assistants.remove(&id);
        true
    }

    // ── Knowledge-base files ────────────────────────────────────────

    pub fn add_knowledge_base_file(
        &self,
        business_id: Uuid,
        fields: NewKnowledgeBaseFile,
    ) -> KnowledgeBaseFile {
        let record = KnowledgeBaseFile {
            id: Uuid::new_v4(),
            business_id,
            filename: fields.filename,
            file_type: fields.file_type,
            file_size: fields.file_size,
            storage_path: fields.storage_path,
            uploaded_at: Utc::now(),
        };
        let mut inner = self.inner.write().unwrap();
        inner
            .knowledge_bases
            .entry(business_id)
            .or_default()
            .push(record.clone());
        record
    }

    pub fn list_knowledge_base_files(&self, business_id: Uuid) -> Vec<KnowledgeBaseFile> {
        self.inner
            .read()
            .unwrap()
            .knowledge_bases
            .get(&business_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns whether a record was actually removed.
    pub fn delete_knowledge_base_file(&self, business_id: Uuid, file_id: Uuid) -> bool {
        let mut inner = self.inner.write().unwrap();
        let Some(files) = inner.knowledge_bases.get_mut(&business_id) else {
            return false;
        };
        let before = files.len();
        files.retain(|f| f.id != file_id);
        files.len() != before
    }

    // ── Phone numbers ───────────────────────────────────────────────

    pub fn add_phone_number(&self, business_id: Uuid, fields: NewPhoneNumber) -> PhoneNumber {
        let record = PhoneNumber {
            id: Uuid::new_v4(),
            business_id,
            phone_number: fields.phone_number,
            friendly_name: fields.friendly_name,
            sid: fields.sid,
            status: fields.status,
            purchased_at: Utc::now(),
        };
        let mut inner = self.inner.write().unwrap();
        inner
            .phone_numbers
            .entry(business_id)
            .or_default()
            .push(record.clone());
        record
    }

    pub fn list_phone_numbers(&self, business_id: Uuid) -> Vec<PhoneNumber> {
        self.inner
            .read()
            .unwrap()
            .phone_numbers
            .get(&business_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_phone_number(&self, business_id: Uuid, phone_id: Uuid) -> Option<PhoneNumber> {
        self.inner
            .read()
            .unwrap()
            .phone_numbers
            .get(&business_id)?
            .iter()
            .find(|n| n.id == phone_id)
            .cloned()
    }

    pub fn delete_phone_number(&self, business_id: Uuid, phone_id: Uuid) -> bool {
        let mut inner = self.inner.write().unwrap();
        let Some(numbers) = inner.phone_numbers.get_mut(&business_id) else {
            return false;
        };
        let before = numbers.len();
        numbers.retain(|n| n.id != phone_id);
        numbers.len() != before
    }

    // ── Voice assistants ────────────────────────────────────────────

    pub fn create_voice_assistant(
        &self,
        business_id: Uuid,
        fields: CreateVoiceAssistant,
    ) -> VoiceAssistant {
        let now = Utc::now();
        let assistant = VoiceAssistant {
            id: Uuid::new_v4(),
            business_id,
            phone_number_id: fields.phone_number_id,
            name: fields.name,
            first_message: fields.first_message,
            system_prompt: fields.system_prompt,
            model_provider: fields.model_provider,
            model_name: fields.model_name,
            voice: fields.voice,
            end_call_message: fields.end_call_message,
            max_call_duration_seconds: fields.max_call_duration_seconds,
            created_at: now,
            updated_at: now,
        };
        let mut inner = self.inner.write().unwrap();
        inner
            .voice_assistants
            .entry(business_id)
            .or_default()
            .push(assistant.clone());
        assistant
    }

    pub fn list_voice_assistants(&self, business_id: Uuid) -> Vec<VoiceAssistant> {
        self.inner
            .read()
            .unwrap()
            .voice_assistants
            .get(&business_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_voice_assistant(
        &self,
        business_id: Uuid,
        assistant_id: Uuid,
    ) -> Option<VoiceAssistant> {
        self.inner
            .read()
            .unwrap()
            .voice_assistants
            .get(&business_id)?
            .iter()
            .find(|a| a.id == assistant_id)
            .cloned()
    }

    /// Merge partial fields into an existing assistant. Always refreshes
    /// `updated_at`, even when no field is set.
    pub fn update_voice_assistant(
        &self,
        business_id: Uuid,
        assistant_id: Uuid,
        update: UpdateVoiceAssistant,
    ) -> Option<VoiceAssistant> {
        let mut inner = self.inner.write().unwrap();
        let assistant = inner
            .voice_assistants
            .get_mut(&business_id)?
            .iter_mut()
            .find(|a| a.id == assistant_id)?;

        if let Some(name) = update.name {
            assistant.name = name;
        }
        if let Some(first_message) = update.first_message {
            assistant.first_message = first_message;
        }
        if let Some(system_prompt) = update.system_prompt {
            assistant.system_prompt = system_prompt;
        }
        if let Some(model_provider) = update.model_provider {
            assistant.model_provider = model_provider;
        }
        if let Some(model_name) = update.model_name {
            assistant.model_name = model_name;
        }
        if let Some(voice) = update.voice {
            assistant.voice = voice;
        }
        if let Some(end_call_message) = update.end_call_message {
            assistant.end_call_message = end_call_message;
        }
        if let Some(duration) = update.max_call_duration_seconds {
            assistant.max_call_duration_seconds = duration;
        }
        if let Some(phone_number_id) = update.phone_number_id {
            assistant.phone_number_id = Some(phone_number_id);
        }
        assistant.updated_at = Utc::now();
        Some(assistant.clone())
    }

    pub fn delete_voice_assistant(&self, business_id: Uuid, assistant_id: Uuid) -> bool {
        let mut inner = self.inner.write().unwrap();
        let Some(assistants) = inner.voice_assistants.get_mut(&business_id) else {
            return false;
        };
        let before = assistants.len();
        assistants.retain(|a| a.id != assistant_id);
        assistants.len() != before
    }

    // ── Onboarding sessions ─────────────────────────────────────────

    pub fn create_onboarding_session(&self) -> OnboardingSession {
        let session = OnboardingSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            current_step: 1,
            business_id: None,
            completed: false,
        };
        let mut inner = self.inner.write().unwrap();
        inner.onboarding_sessions.insert(session.id, session.clone());
        session
    }

    pub fn get_onboarding_session(&self, id: Uuid) -> Option<OnboardingSession> {
        self.inner
            .read()
            .unwrap()
            .onboarding_sessions
            .get(&id)
            .cloned()
    }

    pub fn update_onboarding_session(
        &self,
        id: Uuid,
        update: UpdateOnboardingSession,
    ) -> Option<OnboardingSession> {
        let mut inner = self.inner.write().unwrap();
        let session = inner.onboarding_sessions.get_mut(&id)?;
        if let Some(current_step) = update.current_step {
            session.current_step = current_step;
        }
        if let Some(business_id) = update.business_id {
            session.business_id = Some(business_id);
        }
        if let Some(completed) = update.completed {
            session.completed = completed;
        }
        Some(session.clone())
    }
}
