use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Input validation and slug helpers

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$").expect("hardcoded username regex is invalid - fix source code")
});

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("hardcoded slug regex is invalid - fix source code")
});

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("hardcoded slug separator regex is invalid - fix source code")
});

const MAX_SLUG_LEN: usize = 200;

/// Validate username format (3-32 characters, alphanumeric with - and _)
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

pub fn validate_username_shape(username: &str) -> Result<(), ValidationError> {
    if validate_username(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some(
            "Username must be 3-32 characters of letters, digits, '-' or '_'".into(),
        );
        Err(err)
    }
}

/// Rejects strings that are empty after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Lowercase words joined by single hyphens
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LEN && SLUG_REGEX.is_match(slug)
}

/// Derive a URL slug from free text.
///
/// Returns `None` when nothing slug-worthy remains (e.g. a title made only of
/// punctuation), so callers can ask for an explicit slug instead.
pub fn slugify(text: &str) -> Option<String> {
    slugify_within(text, MAX_SLUG_LEN)
}

/// [`slugify`] capped at `max_len` bytes
pub fn slugify_within(text: &str, max_len: usize) -> Option<String> {
    let lowered = text.trim().to_lowercase();
    let joined = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let mut slug = joined.trim_matches('-').to_string();

    if slug.len() > max_len {
        slug.truncate(max_len);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}
