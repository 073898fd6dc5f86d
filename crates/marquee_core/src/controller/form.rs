//! Field validation rules shared by the form controllers.
//!
//! Each rule returns the field error message, or `None` when the value is
//! acceptable.

use once_cell::sync::Lazy;
use regex::Regex;

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const EMPTY_PASSWORD: &str = "Password cannot be empty";
pub const SHORT_PASSWORD: &str = "Password must be at least 6 characters";
pub const NAME_REQUIRED: &str = "Name is required";
pub const TITLE_REQUIRED: &str = "Title is required";
pub const DIRECTOR_REQUIRED: &str = "Director is required";
pub const GENRE_REQUIRED: &str = "Genre is required";
pub const INVALID_YEAR: &str = "Invalid year";
pub const INVALID_DURATION: &str = "Invalid duration";

pub const MIN_PASSWORD_CHARS: usize = 6;
/// Years must be strictly greater than this.
pub const MIN_RELEASE_YEAR_EXCLUSIVE: i32 = 1800;

// Same shape as the platform e-mail address pattern: local part, `@`, a
// domain label, then one or more dot-separated labels.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn email_error(email: &str) -> Option<String> {
    (!is_valid_email(email)).then(|| INVALID_EMAIL.to_string())
}

/// Error when `value` is empty or whitespace only.
pub fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

/// Error when `value` is shorter than `min_chars` characters.
pub fn min_chars(value: &str, min_chars: usize, message: &str) -> Option<String> {
    (value.chars().count() < min_chars).then(|| message.to_string())
}

/// Parses `value` as an integer strictly greater than `floor`.
///
/// Surrounding whitespace makes the value invalid.
pub fn int_above(value: &str, floor: i32) -> Option<i32> {
    value.parse::<i32>().ok().filter(|parsed| *parsed > floor)
}
