use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The two locales the site is published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(AppError::NotFound(format!("Unsupported locale '{other}'"))),
        }
    }
}

/// Entities storing `{base}_en` / `{base}_es` column pairs.
pub trait Bilingual {
    /// The `(english, spanish)` values stored under `base`, or `None` when the
    /// entity has no such pair.
    fn field_pair(&self, base: &str) -> Option<(Option<&str>, Option<&str>)>;
}

/// Picks the Spanish value when asked for Spanish and one is present,
/// falling back to English otherwise.
pub fn pick<'a>(en: Option<&'a str>, es: Option<&'a str>, locale: Locale) -> Option<&'a str> {
    match (locale, es) {
        (Locale::Es, Some(es)) if !es.is_empty() => Some(es),
        _ => en,
    }
}

/// Resolves the `base` field of `entry` for `locale`. Each field falls back
/// on its own, so a row may mix languages.
pub fn resolve<'a, T>(entry: &'a T, base: &str, locale: Locale) -> Option<&'a str>
where
    T: Bilingual + ?Sized,
{
    entry
        .field_pair(base)
        .and_then(|(en, es)| pick(en, es, locale))
}

/// Same as [`resolve`] for fields whose English side is required; yields an
/// empty string instead of `None`.
pub fn resolve_text<'a, T>(entry: &'a T, base: &str, locale: Locale) -> String
where
    T: Bilingual + ?Sized,
{
    resolve(entry, base, locale).unwrap_or_default().to_string()
}
