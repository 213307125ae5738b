//! External collaborators: telephony number provider and blob storage.

pub mod storage;
pub mod telephony;

pub use storage::FileStorage;
pub use telephony::{MockNumberProvider, NumberProvider, TwilioProvider, provider_from_settings};
