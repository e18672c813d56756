// src/error/mod.rs
//
// Error module
//
// Single error type for the whole crate. Repositories signal absence
// through Option/bool, never through NotFound; NotFound exists for the
// service layer when a caller demands an entity that is missing.

pub mod types;

pub use types::{AppError, AppResult};
