// SPDX-License-Identifier: MPL-2.0
use crate::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

const DEFAULT_LOCALE: &str = "en-US";

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("available_locales", &self.available_locales)
            .field("current_locale", &self.current_locale)
            .finish_non_exhaustive()
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

impl I18n {
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename
                .strip_suffix(".ftl")
                .and_then(|locale| locale.parse::<LanguageIdentifier>().ok())
            else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            if let Some(bundle) = build_bundle(&locale, &String::from_utf8_lossy(&content.data)) {
                bundles.insert(locale.clone(), bundle);
                available_locales.push(locale);
            }
        }
        available_locales.sort_by_key(ToString::to_string);

        let current_locale = resolve_locale(cli_lang, config, &available_locales)
            .unwrap_or_else(default_locale);

        Self {
            bundles,
            available_locales,
            current_locale,
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    pub fn tr(&self, key: &str) -> String {
        self.tr_with_args(key, &[])
    }

    /// Formats `key` with named arguments. Unknown keys render as `MISSING: key`.
    pub fn tr_with_args(&self, key: &str, args: &[(String, String)]) -> String {
        let Some(bundle) = self.bundles.get(&self.current_locale) else {
            return format!("MISSING: {key}");
        };
        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("MISSING: {key}");
        };

        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(name.as_str(), value.as_str());
        }

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, Some(&fluent_args), &mut errors);
        if !errors.is_empty() {
            log::debug!("Formatting {key} reported {errors:?}");
        }
        value.into_owned()
    }
}

fn default_locale() -> LanguageIdentifier {
    LanguageIdentifier::from_bytes(DEFAULT_LOCALE.as_bytes()).unwrap_or_default()
}

fn build_bundle(locale: &LanguageIdentifier, source: &str) -> Option<FluentBundle<FluentResource>> {
    let resource = match FluentResource::try_new(source.to_string()) {
        Ok(resource) => resource,
        Err((_, errors)) => {
            log::warn!("Skipping {locale} translations: {errors:?}");
            return None;
        }
    };
    let mut bundle = FluentBundle::new(vec![locale.clone()]);
    // Terminal output has no use for bidi isolation marks.
    bundle.set_use_isolating(false);
    if let Err(errors) = bundle.add_resource(resource) {
        log::warn!("Skipping {locale} translations: {errors:?}");
        return None;
    }
    Some(bundle)
}

fn resolve_locale(
    cli_lang: Option<String>,
    config: &Config,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    let pick = |lang_str: &str| {
        lang_str
            .parse::<LanguageIdentifier>()
            .ok()
            .filter(|lang| available.contains(lang))
    };

    // 1. Check CLI args
    if let Some(lang) = cli_lang.as_deref().and_then(pick) {
        return Some(lang);
    }

    // 2. Check config file
    if let Some(lang) = config.general.language.as_deref().and_then(pick) {
        return Some(lang);
    }

    // 3. Check OS locale
    sys_locale::get_locale().as_deref().and_then(pick)
}
