// src/repositories/memory.rs
//
// In-memory MovieRepository
//
// Test double for layers that want the repository contract without a
// database file. Behavior mirrors SqliteMovieRepository: same slug
// disambiguation, same wholesale genre replacement, same Option/bool
// absence signalling. Not the authoritative backend; SQLite is.

use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::movie::{slug, Movie};
use crate::error::{AppError, AppResult};

use super::movie_repository::MovieRepository;

#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: Mutex<Vec<Movie>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Vec<Movie>>> {
        self.movies
            .lock()
            .map_err(|_| AppError::Other("movie store lock poisoned".to_string()))
    }
}

impl MovieRepository for InMemoryMovieRepository {
    fn create(&self, movie: &Movie) -> AppResult<Movie> {
        let mut movies = self.lock()?;

        let base_slug = slug::generate(&movie.title, movie.year_of_release);
        let mut candidate = base_slug.clone();

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            if attempts > slug::MAX_SLUG_ATTEMPTS {
                return Err(AppError::SlugCollisionExhausted {
                    slug: base_slug,
                    attempts: slug::MAX_SLUG_ATTEMPTS,
                });
            }

            if movies.iter().all(|m| m.slug != candidate) {
                break;
            }
            candidate = slug::with_random_suffix(&base_slug);
        }

        let mut persisted = movie.clone();
        persisted.slug = candidate;
        movies.push(persisted.clone());
        Ok(persisted)
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let movies = self.lock()?;
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Movie>> {
        let movies = self.lock()?;
        Ok(movies.iter().find(|m| m.slug == slug).cloned())
    }

    fn get_all(&self) -> AppResult<Vec<Movie>> {
        let movies = self.lock()?;
        let mut all: Vec<Movie> = movies.clone();
        all.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    fn update(&self, movie: &Movie) -> AppResult<bool> {
        let mut movies = self.lock()?;

        match movies.iter_mut().find(|m| m.id == movie.id) {
            Some(stored) => {
                stored.title = movie.title.clone();
                stored.year_of_release = movie.year_of_release;
                stored.genres = movie.genres.clone();
                // stored.slug stays as assigned at creation
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut movies = self.lock()?;
        let before = movies.len();
        movies.retain(|m| m.id != id);
        Ok(movies.len() < before)
    }

    fn exists_by_id(&self, id: Uuid) -> AppResult<bool> {
        let movies = self.lock()?;
        Ok(movies.iter().any(|m| m.id == id))
    }
}
