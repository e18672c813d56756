use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

/// Validates all Movie invariants
/// These are the absolute rules that must hold for a Movie to be valid
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_title(&movie.title)?;
    validate_genres(&movie.genres)?;
    Ok(())
}

/// Title cannot be empty
fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Genre names cannot be empty; duplicates are allowed
fn validate_genres(genres: &[String]) -> DomainResult<()> {
    if genres.iter().any(|g| g.trim().is_empty()) {
        return Err(DomainError::InvariantViolation(
            "Genre names cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Invariants that must hold true for the Movie domain:
///
/// 1. Identity (UUID) is immutable and never reused
/// 2. Title cannot be empty
/// 3. Slug is unique across the catalog and stable after creation
/// 4. Genre rows always reference an existing movie
/// 5. Genres are replaced wholesale, never patched incrementally
/// 6. A movie can exist with zero genres

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_valid_movie() {
        let movie = Movie::new(
            Uuid::new_v4(),
            "Heat".to_string(),
            1995,
            vec!["Crime".to_string(), "Drama".to_string()],
        );
        assert!(validate_movie(&movie).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let movie = Movie::new(Uuid::new_v4(), "   ".to_string(), 1995, vec![]);
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_blank_genre_fails() {
        let movie = Movie::new(
            Uuid::new_v4(),
            "Heat".to_string(),
            1995,
            vec!["Crime".to_string(), "  ".to_string()],
        );
        assert!(validate_movie(&movie).is_err());
    }

    #[test]
    fn test_duplicate_genres_allowed() {
        let movie = Movie::new(
            Uuid::new_v4(),
            "Heat".to_string(),
            1995,
            vec!["Crime".to_string(), "Crime".to_string()],
        );
        assert!(validate_movie(&movie).is_ok());
    }
}
