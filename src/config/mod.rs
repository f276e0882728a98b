use std::num::NonZeroUsize;
use std::path::Path;

use crate::Result;
use crate::error::Error as ToastError;
use crate::options::ToastOptions;

pub(crate) mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::{Millis, NumericMillis};

/// Site-wide toaster settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Options every toast starts from; per-call options take precedence.
    pub defaults: ToastOptions,
    /// How many debug snapshots are retained.
    pub debug_history: NonZeroUsize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            defaults: ToastOptions::default(),
            debug_history: NonZeroUsize::new(defaults::default_debug_history())
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file and the environment.
    ///
    /// `BTOAST__SECTION__KEY` variables override file values; the flat
    /// `BTOAST_POSITION`, `BTOAST_VARIANT`, `BTOAST_DELAY` and `BTOAST_DEBUG`
    /// shortcuts are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when an environment
    /// override is malformed, or when the resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }

    /// Parse settings from TOML text, without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not valid TOML or fails validation.
    pub fn from_toml(text: &str) -> Result<Self> {
        raw::parse(text).map_err(ToastError::from)?.validate_and_build()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use crate::error::{ConfigError, Error};
    use crate::types::{Position, Variant};
    use std::time::Duration;

    #[test]
    fn empty_input_yields_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.debug_history.get(), 64);
        assert!(settings.defaults.variant.is_none());
        assert_eq!(Settings::default().debug_history.get(), 64);
    }

    #[test]
    fn defaults_section_is_read_with_snake_case_keys() {
        let settings = Settings::from_toml(
            r#"
            [defaults]
            position = "bottom-left"
            variant = "info"
            delay = "2500ms"
            extended_delay = 500
            progress_bar = true
            prevent_duplicates = true

            [debug]
            history = 8
            "#,
        )
        .unwrap();
        let defaults = &settings.defaults;
        assert_eq!(defaults.position, Some(Position::BottomLeft));
        assert_eq!(defaults.variant, Some(Variant::Info));
        assert_eq!(defaults.delay, Some(Duration::from_millis(2_500)));
        assert_eq!(defaults.extended_delay, Some(Duration::from_millis(500)));
        assert_eq!(defaults.progress_bar, Some(true));
        assert_eq!(defaults.prevent_duplicates, Some(true));
        assert_eq!(settings.debug_history.get(), 8);
    }

    #[test]
    fn bad_toast_values_degrade_instead_of_failing() {
        let settings = Settings::from_toml(
            r#"
            [defaults]
            variant = "chartreuse"
            delay = "whenever"
            "#,
        )
        .unwrap();
        assert!(settings.defaults.variant.is_none());
        assert!(settings.defaults.delay.is_none());
    }

    #[test]
    fn zero_history_is_rejected() {
        let err = Settings::from_toml("[debug]\nhistory = 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidField {
                field: "debug.history",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Settings::from_toml("[defaults\nposition = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Other(_) | ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("btoast-settings-that-does-not-exist.toml");
        let settings = Settings::from_env_and_file(&path).unwrap();
        assert!(settings.debug_history.get() > 0);
    }
}
