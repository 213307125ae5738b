//! Business registration — the root entity owning all other records.

pub mod model;
pub mod routes;

pub use model::{Business, CreateBusiness, UpdateBusiness};
