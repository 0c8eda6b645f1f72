//! # Localization Module
//!
//! All user-facing text is kept in a Fluent resource embedded at compile
//! time. Only English is shipped.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use lazy_static::lazy_static;
use unic_langid::LanguageIdentifier;

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");

lazy_static! {
    static ref LOCALIZATION_MANAGER: LocalizationManager =
        LocalizationManager::new().expect("Embedded English messages should be valid Fluent");
}

/// Localization manager for the storefront bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager from the embedded English resource
    pub fn new() -> Result<Self> {
        Self::from_source(EN_MESSAGES)
    }

    /// Create a localization manager from an arbitrary Fluent source
    pub fn from_source(source: &str) -> Result<Self> {
        let en_locale: LanguageIdentifier = "en".parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![en_locale]);
        // Messages go to Telegram as plain text, no bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Failed to parse Fluent resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Failed to add Fluent resource: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Get a localized message, substituting the given arguments
    pub fn get_message(&self, key: &str, args: &[(&str, &str)]) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = (!args.is_empty()).then(|| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::warn!(key = key, errors = ?errors, "Fluent formatting reported errors");
        }

        value.into_owned()
    }
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    get_localization_manager().get_message(key, &[])
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    get_localization_manager().get_message(key, args)
}
