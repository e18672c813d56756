// src/repositories/movie_repository.rs
//
// Movie persistence
//
// Multi-statement operations (create, update, delete) span the movie row
// and its genre rows inside one transaction: either everything commits or
// nothing is observable. Slug uniqueness is ultimately enforced by the
// unique index on movies.slug; the in-store pre-check only saves a round
// trip in the common case.

use log::{debug, warn};
use rusqlite::{params, Row, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::movie::{slug, Movie};
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait MovieRepository: Send + Sync {
    fn create(&self, movie: &Movie) -> AppResult<Movie>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Movie>>;
    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Movie>>;
    fn get_all(&self) -> AppResult<Vec<Movie>>;
    fn update(&self, movie: &Movie) -> AppResult<bool>;
    fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
    fn exists_by_id(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
    // Plain fn pointer so tests can substitute a deterministic suffixer
    suffixer: fn(&str) -> String,
}

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            suffixer: slug::with_random_suffix,
        }
    }

    #[cfg(test)]
    fn with_suffixer(pool: Arc<ConnectionPool>, suffixer: fn(&str) -> String) -> Self {
        Self { pool, suffixer }
    }

    /// Map database row to Movie - returns rusqlite::Error for query_map
    /// compatibility. Genres are loaded separately.
    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Movie {
            id,
            title: row.get("title")?,
            year_of_release: row.get("year_of_release")?,
            slug: row.get("slug")?,
            genres: Vec::new(),
        })
    }

    fn load_genres(conn: &rusqlite::Connection, movie_id: Uuid) -> AppResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM genres WHERE movie_id = ?1")?;

        let genres: Vec<String> = stmt
            .query_map(params![movie_id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }

    /// Insert the movie row with a unique slug, then its genre rows.
    /// Returns the finalized slug. Runs entirely inside the caller's
    /// transaction; any error leaves the rollback to the caller.
    fn insert_movie(&self, tx: &Transaction, movie: &Movie) -> AppResult<String> {
        let base_slug = slug::generate(&movie.title, movie.year_of_release);
        let mut candidate = base_slug.clone();

        let mut attempts = 0u32;
        let finalized = loop {
            attempts += 1;
            if attempts > slug::MAX_SLUG_ATTEMPTS {
                return Err(AppError::SlugCollisionExhausted {
                    slug: base_slug,
                    attempts: slug::MAX_SLUG_ATTEMPTS,
                });
            }

            // Pre-check saves the insert round trip on a known collision.
            // Correctness does not depend on it.
            let taken: i64 = tx.query_row(
                "SELECT COUNT(1) FROM movies WHERE slug = ?1",
                params![candidate],
                |row| row.get(0),
            )?;
            if taken > 0 {
                debug!("slug '{}' already taken, disambiguating", candidate);
                candidate = (self.suffixer)(&base_slug);
                continue;
            }

            let inserted = tx.execute(
                "INSERT INTO movies (id, title, slug, year_of_release)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    movie.id.to_string(),
                    movie.title,
                    candidate,
                    movie.year_of_release
                ],
            );

            match inserted {
                Ok(_) => break candidate,
                // A concurrent create can slip in between the pre-check and
                // the insert. The unique index rejects it here; that exact
                // failure is retriable with a fresh suffix. Every other
                // constraint failure propagates unmodified.
                Err(e) if is_slug_conflict(&e) => {
                    warn!("slug '{}' collided on insert, disambiguating", candidate);
                    candidate = (self.suffixer)(&base_slug);
                }
                Err(e) => return Err(AppError::Database(e)),
            }
        };

        let mut stmt = tx.prepare("INSERT INTO genres (movie_id, name) VALUES (?1, ?2)")?;
        for genre in &movie.genres {
            stmt.execute(params![movie.id.to_string(), genre])?;
        }

        Ok(finalized)
    }

    /// Wholesale genre replacement plus movie-row update. The slug column
    /// is deliberately absent from the UPDATE list: slugs are assigned
    /// once at creation and stay stable even when the title changes.
    fn replace_movie(tx: &Transaction, movie: &Movie) -> AppResult<bool> {
        tx.execute(
            "DELETE FROM genres WHERE movie_id = ?1",
            params![movie.id.to_string()],
        )?;

        let updated = tx.execute(
            "UPDATE movies SET title = ?2, year_of_release = ?3 WHERE id = ?1",
            params![movie.id.to_string(), movie.title, movie.year_of_release],
        )?;

        if updated == 0 {
            return Ok(false);
        }

        let mut stmt = tx.prepare("INSERT INTO genres (movie_id, name) VALUES (?1, ?2)")?;
        for genre in &movie.genres {
            stmt.execute(params![movie.id.to_string(), genre])?;
        }

        Ok(true)
    }

    fn remove_movie(tx: &Transaction, id: Uuid) -> AppResult<bool> {
        // Genre rows first: they reference the movie row.
        tx.execute(
            "DELETE FROM genres WHERE movie_id = ?1",
            params![id.to_string()],
        )?;

        let removed = tx.execute("DELETE FROM movies WHERE id = ?1", params![id.to_string()])?;

        Ok(removed > 0)
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn create(&self, movie: &Movie) -> AppResult<Movie> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        match self.insert_movie(&tx, movie) {
            Ok(finalized_slug) => {
                tx.commit()?;
                let mut persisted = movie.clone();
                persisted.slug = finalized_slug;
                Ok(persisted)
            }
            Err(e) => {
                // A failed rollback must not mask the original cause.
                if let Err(rollback_err) = tx.rollback() {
                    warn!("rollback after failed create also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, slug, year_of_release FROM movies WHERE id = ?1",
        )?;

        let mut movie = match stmt.query_row(params![id.to_string()], Self::row_to_movie) {
            Ok(movie) => movie,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        movie.genres = Self::load_genres(&conn, movie.id)?;
        Ok(Some(movie))
    }

    fn get_by_slug(&self, slug: &str) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, slug, year_of_release FROM movies WHERE slug = ?1",
        )?;

        let mut movie = match stmt.query_row(params![slug], Self::row_to_movie) {
            Ok(movie) => movie,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        movie.genres = Self::load_genres(&conn, movie.id)?;
        Ok(Some(movie))
    }

    fn get_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        // LEFT JOIN so movies with zero genres still appear. Secondary
        // order by id keeps title ties stable within one call.
        let mut stmt = conn.prepare(
            "SELECT m.id, m.title, m.slug, m.year_of_release, g.name
             FROM movies m
             LEFT JOIN genres g ON g.movie_id = m.id
             ORDER BY m.title, m.id",
        )?;

        let mut rows = stmt.query([])?;
        let mut movies: Vec<Movie> = Vec::new();

        while let Some(row) = rows.next()? {
            let movie = Self::row_to_movie(row)?;
            let genre: Option<String> = row.get("name")?;

            let is_new = movies.last().map_or(true, |m| m.id != movie.id);
            if is_new {
                movies.push(movie);
            }
            if let (Some(current), Some(name)) = (movies.last_mut(), genre) {
                current.genres.push(name);
            }
        }

        Ok(movies)
    }

    fn update(&self, movie: &Movie) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        match Self::replace_movie(&tx, movie) {
            Ok(true) => {
                tx.commit()?;
                Ok(true)
            }
            // Unknown id: nothing was changed, dropping the transaction
            // discards the no-op genre delete.
            Ok(false) => Ok(false),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("rollback after failed update also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        match Self::remove_movie(&tx, id) {
            Ok(removed) => {
                tx.commit()?;
                Ok(removed)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("rollback after failed delete also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    fn exists_by_id(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM movies WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}

/// True only for a uniqueness-constraint failure on movies.slug. Other
/// constraint violations (including a duplicate primary key) must reach
/// the caller unmodified.
fn is_slug_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("movies.slug")
        }
        _ => false,
    }
}
