// src/domain/movie/slug.rs
//
// Slug derivation
//
// `generate` is pure: the same (title, year) always yields the same
// slug. Uniqueness is enforced by the repositories against the stored
// catalog; the suffix scheme and the retry bound they share live here
// so both backends disambiguate identically.

use rand::Rng;

/// Cap on slug disambiguation attempts per create. Unbounded retry risks
/// livelock under adversarial input; past the cap the create fails with
/// SlugCollisionExhausted and the store stays usable.
pub const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Derive the base slug for a title/year pair.
///
/// Rules:
/// - keep only alphanumerics, spaces, hyphens and underscores
/// - lowercase the result
/// - replace spaces with hyphens
/// - append `-{year}`
///
/// A title that strips to nothing yields `-{year}`; that slug collides
/// more readily, and the repository's retry loop absorbs it like any
/// other collision.
pub fn generate(title: &str, year: i32) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    let slug_title = cleaned.to_lowercase().replace(' ', "-");
    format!("{}-{}", slug_title, year)
}

/// Append a short random suffix to the base slug, producing a fresh
/// candidate after a collision.
pub fn with_random_suffix(base_slug: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}-{:08x}", base_slug, suffix)
}
