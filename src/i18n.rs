//! Message catalogs with `{name}` placeholders.
//!
//! A `Localizer` is built once from the configured language and handed to
//! whoever renders text. Keys missing from the selected catalog fall back to
//! English; keys missing everywhere render as an empty string.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

const FALLBACK_LANGUAGE: &str = "en";

const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.yaml")),
    ("ru", include_str!("../locales/ru.yaml")),
];

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("unsupported language: {0}")]
    UnknownLanguage(String),
    #[error("catalog {language} is malformed: {source}")]
    Catalog {
        language: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    CATALOGS.iter().map(|(lang, _)| *lang)
}

#[derive(Debug, Clone)]
pub struct Localizer {
    language: String,
    messages: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Localizer {
    pub fn new(language: &str) -> Result<Self, LocaleError> {
        let messages = catalog(language)?;
        let fallback = if language == FALLBACK_LANGUAGE {
            HashMap::new()
        } else {
            catalog(FALLBACK_LANGUAGE)?
        };
        Ok(Self {
            language: language.to_string(),
            messages,
            fallback,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Resolve `key` and substitute `{name}` placeholders from `args`.
    pub fn lookup(&self, key: &str, args: &[(&str, &str)]) -> String {
        let Some(template) = self.messages.get(key).or_else(|| self.fallback.get(key)) else {
            warn!(key, language = %self.language, "missing message");
            return String::new();
        };
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                args.iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

fn catalog(language: &str) -> Result<HashMap<String, String>, LocaleError> {
    let (lang, raw) = CATALOGS
        .iter()
        .find(|(lang, _)| *lang == language)
        .ok_or_else(|| LocaleError::UnknownLanguage(language.to_string()))?;
    serde_yaml::from_str(raw).map_err(|source| LocaleError::Catalog {
        language: *lang,
        source,
    })
}
