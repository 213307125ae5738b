//! Phone-number search, purchase, and assignment.

pub mod model;
pub mod routes;

pub use model::{AvailableNumber, NewPhoneNumber, PhoneNumber, PhoneNumberType};
