//! Onboarding wizard — session tracking and the completion gate.
//!
//! A session is an ephemeral progress tracker for the wizard, with a
//! lifecycle independent from the Business it eventually points at:
//! deleting the business leaves the session behind.

pub mod model;
pub mod routes;

pub use model::{OnboardingSession, UpdateOnboardingSession};
