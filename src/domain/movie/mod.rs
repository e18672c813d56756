pub mod entity;
pub mod invariants;
pub mod slug;

pub use entity::Movie;
pub use invariants::validate_movie;
