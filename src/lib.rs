// src/lib.rs
// MovieHub - movie catalog persistence layer
//
// Architecture:
// - Domain-centric: entity rules live in the domain module
// - Explicit: explicit SQL, explicit transactions, no magic
// - The database is the only shared state; repositories hold none
//
// The HTTP surface is a separate concern and lives outside this crate;
// everything here speaks plain domain types.

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{validate_movie, Movie};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Persistence
// ============================================================================

pub use db::{
    create_connection_pool, default_database_path, get_connection, initialize_database,
    ConnectionPool, PooledConn,
};

pub use repositories::{InMemoryMovieRepository, MovieRepository, SqliteMovieRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{CreateMovieRequest, MovieService, UpdateMovieRequest};
