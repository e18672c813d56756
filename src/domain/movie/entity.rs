use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug;

/// Represents a movie in the catalog.
/// This is the aggregate root; genre tags have no existence of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Display title
    pub title: String,

    /// Release year
    pub year_of_release: i32,

    /// URL-safe identifier, unique across the catalog.
    ///
    /// Computed from title and year at construction, finalized (possibly
    /// suffixed) when the movie is first persisted, and stable from then
    /// on. A later title change does NOT recompute it: the slug is an
    /// external identifier and must not drift.
    pub slug: String,

    /// Genre tags, replaced wholesale on update. Duplicates are allowed.
    pub genres: Vec<String>,
}

impl Movie {
    /// Create a new Movie with its base slug derived from title and year.
    /// The persisted slug may differ if the repository had to disambiguate.
    pub fn new(id: Uuid, title: String, year_of_release: i32, genres: Vec<String>) -> Self {
        let slug = slug::generate(&title, year_of_release);
        Self {
            id,
            title,
            year_of_release,
            slug,
            genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_movie_carries_derived_slug() {
        let movie = Movie::new(
            Uuid::new_v4(),
            "The Matrix".to_string(),
            1999,
            vec!["Sci-Fi".to_string()],
        );
        assert_eq!(movie.slug, "the-matrix-1999");
    }
}
