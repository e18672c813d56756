// src/services/movie_service.rs
use crate::domain::movie::{validate_movie, Movie};
use crate::error::{AppError, AppResult};
use crate::repositories::MovieRepository;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateMovieRequest {
    pub title: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateMovieRequest {
    pub movie_id: Uuid,
    pub title: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
}

pub struct MovieService {
    movie_repo: Arc<dyn MovieRepository>,
}

impl MovieService {
    pub fn new(movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self { movie_repo }
    }

    pub fn create_movie(&self, request: CreateMovieRequest) -> AppResult<Movie> {
        let movie = Movie::new(
            Uuid::new_v4(),
            request.title,
            request.year_of_release,
            request.genres,
        );

        validate_movie(&movie).map_err(AppError::Domain)?;
        self.movie_repo.create(&movie)
    }

    pub fn update_movie(&self, request: UpdateMovieRequest) -> AppResult<Movie> {
        let mut movie = self
            .movie_repo
            .get_by_id(request.movie_id)?
            .ok_or(AppError::NotFound)?;

        movie.title = request.title;
        movie.year_of_release = request.year_of_release;
        movie.genres = request.genres;

        validate_movie(&movie).map_err(AppError::Domain)?;
        if !self.movie_repo.update(&movie)? {
            return Err(AppError::NotFound);
        }

        // Re-read so the caller sees the stored slug; update never touches it
        self.movie_repo
            .get_by_id(request.movie_id)?
            .ok_or(AppError::NotFound)
    }

    pub fn get_movie(&self, movie_id: Uuid) -> AppResult<Option<Movie>> {
        self.movie_repo.get_by_id(movie_id)
    }

    pub fn get_movie_by_slug(&self, slug: &str) -> AppResult<Option<Movie>> {
        self.movie_repo.get_by_slug(slug)
    }

    /// Lookup by either key: a key that parses as a UUID is treated as an
    /// id, anything else as a slug.
    pub fn get_movie_by_id_or_slug(&self, key: &str) -> AppResult<Option<Movie>> {
        match Uuid::parse_str(key) {
            Ok(id) => self.movie_repo.get_by_id(id),
            Err(_) => self.movie_repo.get_by_slug(key),
        }
    }

    pub fn list_all_movies(&self) -> AppResult<Vec<Movie>> {
        self.movie_repo.get_all()
    }

    pub fn delete_movie(&self, movie_id: Uuid) -> AppResult<bool> {
        self.movie_repo.delete_by_id(movie_id)
    }

    pub fn movie_exists(&self, movie_id: Uuid) -> AppResult<bool> {
        self.movie_repo.exists_by_id(movie_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::movie_repository::MockMovieRepository;

    fn stored_movie(title: &str, year: i32) -> Movie {
        Movie::new(Uuid::new_v4(), title.to_string(), year, vec![])
    }

    #[test]
    fn test_create_movie_rejects_empty_title() {
        let mut repo = MockMovieRepository::new();
        repo.expect_create().never();

        let service = MovieService::new(Arc::new(repo));
        let result = service.create_movie(CreateMovieRequest {
            title: "   ".to_string(),
            year_of_release: 2024,
            genres: vec![],
        });

        assert!(matches!(result, Err(AppError::Domain(_))));
    }

    #[test]
    fn test_create_movie_returns_persisted_entity() {
        let mut repo = MockMovieRepository::new();
        repo.expect_create()
            .withf(|m: &Movie| m.title == "Heat" && m.slug == "heat-1995")
            .returning(|m| Ok(m.clone()));

        let service = MovieService::new(Arc::new(repo));
        let created = service
            .create_movie(CreateMovieRequest {
                title: "Heat".to_string(),
                year_of_release: 1995,
                genres: vec!["Crime".to_string()],
            })
            .unwrap();

        assert_eq!(created.slug, "heat-1995");
    }

    #[test]
    fn test_update_missing_movie_is_not_found() {
        let mut repo = MockMovieRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        repo.expect_update().never();

        let service = MovieService::new(Arc::new(repo));
        let result = service.update_movie(UpdateMovieRequest {
            movie_id: Uuid::new_v4(),
            title: "Anything".to_string(),
            year_of_release: 2000,
            genres: vec![],
        });

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_update_keeps_stored_slug() {
        let stored = stored_movie("Old Title", 1990);
        let stored_id = stored.id;

        let mut repo = MockMovieRepository::new();
        let lookup = stored.clone();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(lookup.clone())));
        repo.expect_update()
            .withf(|m: &Movie| m.title == "New Title" && m.slug == "old-title-1990")
            .returning(|_| Ok(true));

        let service = MovieService::new(Arc::new(repo));
        let updated = service
            .update_movie(UpdateMovieRequest {
                movie_id: stored_id,
                title: "New Title".to_string(),
                year_of_release: 1990,
                genres: vec!["Drama".to_string()],
            })
            .unwrap();

        assert_eq!(updated.slug, "old-title-1990");
    }

    #[test]
    fn test_lookup_dispatches_on_key_shape() {
        let stored = stored_movie("Heat", 1995);
        let id = stored.id;

        let mut repo = MockMovieRepository::new();
        let by_id = stored.clone();
        repo.expect_get_by_id()
            .withf(move |lookup_id: &Uuid| *lookup_id == id)
            .returning(move |_| Ok(Some(by_id.clone())));
        let by_slug = stored.clone();
        repo.expect_get_by_slug()
            .withf(|slug: &str| slug == "heat-1995")
            .returning(move |_| Ok(Some(by_slug.clone())));

        let service = MovieService::new(Arc::new(repo));

        let via_id = service.get_movie_by_id_or_slug(&id.to_string()).unwrap();
        assert_eq!(via_id.unwrap().id, id);

        let via_slug = service.get_movie_by_id_or_slug("heat-1995").unwrap();
        assert_eq!(via_slug.unwrap().id, id);
    }
}
