//! Localization
//!
//! Translation catalogs are embedded at build time as JSON
//! (`context -> source -> translation`). One [`Translator`] is installed
//! process-wide and replaced whenever the interface language changes.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use tracing::{debug, info, warn};

use crate::constants::i18n::{CATALOG_PREFIX, LOCALE_VARS};
use crate::types::{Language, TokenMap};

const CATALOGS: &[(Language, &str)] = &[
    (
        Language::Finnish,
        include_str!("../data/translations/optimus-manager_fi.json"),
    ),
    (
        Language::ChineseSimplified,
        include_str!("../data/translations/optimus-manager_zh_CN.json"),
    ),
];

static TRANSLATOR: Lazy<RwLock<Translator>> =
    Lazy::new(|| RwLock::new(Translator::untranslated(Language::English)));

#[derive(Debug, Deserialize)]
struct Catalog {
    language: String,
    #[serde(default)]
    contexts: HashMap<String, HashMap<String, String>>,
}

/// Message lookup for one resolved language
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    /// Translator that returns every source string unchanged
    pub fn untranslated(language: Language) -> Self {
        Self {
            language,
            messages: HashMap::new(),
        }
    }

    /// Load the catalog for `language`, resolving `System` from the environment
    ///
    /// English is the source language and needs no catalog.
    pub fn load(language: Language) -> Result<Self> {
        let language = resolve_language(language);
        let Some((_, raw)) = CATALOGS.iter().find(|(lang, _)| *lang == language) else {
            debug!(language = ?language, "No catalog for language, using source strings");
            return Ok(Self::untranslated(language));
        };

        let catalog: Catalog = serde_json::from_str(raw)
            .with_context(|| format!("Failed to parse catalog {}", catalog_name(language)))?;

        if catalog.language != language.token() {
            return Err(anyhow!(
                "Catalog {} declares language '{}'",
                catalog_name(language),
                catalog.language
            ));
        }

        Ok(Self {
            language,
            messages: catalog.contexts,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translate(&self, context: &str, source: &str) -> String {
        self.messages
            .get(context)
            .and_then(|messages| messages.get(source))
            .cloned()
            .unwrap_or_else(|| source.to_string())
    }

    pub fn message_count(&self) -> usize {
        self.messages.values().map(HashMap::len).sum()
    }
}

fn catalog_name(language: Language) -> String {
    format!("{}_{}", CATALOG_PREFIX, language.token())
}

/// Language derived from a locale lookup, English when nothing matches
pub fn system_language_from(lookup: impl Fn(&str) -> Option<String>) -> Language {
    LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty())
        .and_then(|locale| Language::from_locale(&locale))
        .unwrap_or(Language::English)
}

pub fn system_language() -> Language {
    system_language_from(|var| env::var(var).ok())
}

pub fn resolve_language(language: Language) -> Language {
    match language {
        Language::System => system_language(),
        other => other,
    }
}

/// Language of the installed translator, with `System` already resolved
pub fn current_language() -> Language {
    TRANSLATOR.read().language()
}

/// Replace the process-wide translator
pub fn install(translator: Translator) {
    info!(language = ?translator.language(), messages = translator.message_count(), "Installed translator");
    *TRANSLATOR.write() = translator;
}

/// Load and install the catalog for `language`; failures fall back to source strings
pub fn load_language(language: Language) {
    let translator = Translator::load(language).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load translations");
        Translator::untranslated(resolve_language(language))
    });
    install(translator);
}

/// Translate `source` in `context` and substitute `%1`, `%2`, ... with `args`
pub fn tr(context: &str, source: &str, args: &[&str]) -> String {
    let mut text = TRANSLATOR.read().translate(context, source);
    for (index, arg) in args.iter().enumerate().rev() {
        text = text.replace(&format!("%{}", index + 1), arg);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTORUN_ERROR: &str = "Unable to create autorun file from '%1'";

    fn env_with<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var: &str| {
            pairs
                .iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_embedded_catalogs_parse() {
        for (language, _) in CATALOGS {
            let translator = Translator::load(*language).unwrap();
            assert_eq!(translator.language(), *language);
            assert!(translator.message_count() > 0);
        }
    }

    #[test]
    fn test_translate_known_message() {
        let translator = Translator::load(Language::Finnish).unwrap();
        assert_eq!(
            translator.translate("AppSettings", AUTORUN_ERROR),
            "Autorun-tiedostoa ei voi luoda osoitteesta '%1'"
        );
    }

    #[test]
    fn test_translate_falls_back_to_source() {
        let translator = Translator::load(Language::English).unwrap();
        assert_eq!(translator.message_count(), 0);
        assert_eq!(translator.translate("AppSettings", AUTORUN_ERROR), AUTORUN_ERROR);

        let finnish = Translator::load(Language::Finnish).unwrap();
        assert_eq!(finnish.translate("NoSuchContext", "Hello"), "Hello");
    }

    #[test]
    fn test_system_language_from_env_order() {
        let lookup = env_with(&[("LC_ALL", ""), ("LC_MESSAGES", "fi_FI.UTF-8"), ("LANG", "zh_CN.UTF-8")]);
        assert_eq!(system_language_from(lookup), Language::Finnish);

        let lookup = env_with(&[("LANG", "zh_CN.UTF-8")]);
        assert_eq!(system_language_from(lookup), Language::ChineseSimplified);

        let lookup = env_with(&[("LANG", "de_DE.UTF-8")]);
        assert_eq!(system_language_from(lookup), Language::English);

        assert_eq!(system_language_from(env_with(&[])), Language::English);
    }

    #[test]
    fn test_resolve_language_keeps_explicit_choice() {
        assert_eq!(resolve_language(Language::Finnish), Language::Finnish);
        assert_ne!(resolve_language(Language::System), Language::System);
    }

    #[test]
    fn test_tr_substitutes_arguments() {
        // English carries no catalog, so the global translator state does not matter
        let translator = Translator::untranslated(Language::English);
        let text = translator.translate("AppSettings", AUTORUN_ERROR).replace("%1", "/x");
        assert_eq!(text, "Unable to create autorun file from '/x'");
        assert_eq!(tr("Nowhere", "%1 and %2", &["a", "b"]), "a and b");
    }
}
