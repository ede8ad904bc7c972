//! Note slugs: validation and derivation from titles.
//!
//! A slug is a URL path segment made of ASCII letters, digits, hyphens and
//! underscores. When a note is saved without one, it is derived from the
//! title by transliterating Cyrillic to Latin and collapsing everything else
//! into hyphen-separated words.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum slug length in characters.
pub const SLUG_MAX: usize = 100;

/// Validation errors returned by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// The slug was empty.
    #[error("This field is required.")]
    Empty,
    /// The slug exceeded [`SLUG_MAX`].
    #[error("Ensure this value has at most {max} characters (it has {length}).")]
    TooLong {
        /// Maximum length.
        max: usize,
        /// Observed length.
        length: usize,
    },
    /// The slug contained characters outside `[-A-Za-z0-9_]`.
    #[error("Enter a valid “slug” consisting of letters, numbers, underscores or hyphens.")]
    InvalidCharacters,
}

/// Validated URL slug.
///
/// # Examples
/// ```
/// use ya_backend::domain::Slug;
///
/// assert!(Slug::new("note-slug").is_ok());
/// assert!(Slug::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        let length = value.chars().count();
        if length > SLUG_MAX {
            return Err(SlugValidationError::TooLong {
                max: SLUG_MAX,
                length,
            });
        }
        if !value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Derive a slug from a note title, or `None` when nothing survives.
    pub fn from_title(title: &str) -> Option<Self> {
        let derived = slugify(title);
        Self::new(derived).ok()
    }

    /// The slug text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' | 'ґ' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'ї' | 'ы' => "yi",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Turn free text into a slug candidate.
///
/// Lowercases, replaces `&` with `and`, collapses runs of whitespace and
/// hyphens into a single `-`, transliterates Cyrillic, drops every other
/// character, trims hyphens from both ends and truncates to [`SLUG_MAX`].
/// The result may be empty.
///
/// Dropped characters never leave hyphens behind: separators around them
/// merge into one (`"a ! b"` gives `a-b`) and a dropped tail leaves no
/// trailing hyphen (`"Заметка !"` gives `zametka`), unlike slugifiers that
/// emit `a--b` and `zametka-`.
///
/// # Examples
/// ```
/// use ya_backend::domain::slugify;
///
/// assert_eq!(slugify("Новая заметка"), "novaya-zametka");
/// assert_eq!(slugify("Tea & Биscuits!"), "tea-and-biscuits");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");

    let mut out = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
            continue;
        }
        let piece = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            Some(ch.to_string())
        } else {
            transliterate(ch).map(str::to_owned)
        };
        let Some(piece) = piece else { continue };
        if piece.is_empty() {
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        out.push_str(&piece);
    }

    let mut slug: String = out.chars().take(SLUG_MAX).collect();
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
