// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement beyond what the schema itself rejects
// - NO cross-repository calls
// - Explicit SQL only
//
// Absence is signalled with Option/bool, never with an error. The only
// in-store retry is the bounded slug-collision loop in create.

pub mod memory;
pub mod movie_repository;

pub use memory::InMemoryMovieRepository;
pub use movie_repository::{MovieRepository, SqliteMovieRepository};
