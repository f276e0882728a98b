use std::num::NonZeroUsize;
use std::path::Path;

use std::time::Duration;

use serde::Deserialize;
use serde_with::{DefaultOnError, serde_as};

use crate::Result;
use crate::error::ConfigError;
use crate::options::ToastOptions;
use crate::types::{Position, Variant};

use super::{Millis, Settings};
use super::defaults::default_debug_history;
use super::env::{env_bool, env_duration, env_parse};

const ENV_PREFIX: &str = "BTOAST";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawSettings, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

pub(super) fn parse(text: &str) -> std::result::Result<RawSettings, ConfigError> {
    ::config::Config::builder()
        .add_source(::config::File::from_str(text, ::config::FileFormat::Toml))
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawSettings {
    #[serde(default)]
    pub(super) defaults: RawDefaults,
    #[serde(default)]
    pub(super) debug: RawDebug,
}

/// The `[defaults]` table. Delays here also take humantime strings such as `"5s"`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawDefaults {
    #[serde(default)]
    #[serde_as(as = "DefaultOnError<Option<Millis>>")]
    pub(super) delay: Option<Duration>,
    #[serde(default, alias = "extendedDelay")]
    #[serde_as(as = "DefaultOnError<Option<Millis>>")]
    pub(super) extended_delay: Option<Duration>,
    #[serde(flatten)]
    pub(super) options: ToastOptions,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawDebug {
    #[serde(default = "default_debug_history")]
    pub(super) history: usize,
    #[serde(default)]
    pub(super) snapshots: Option<bool>,
}

impl Default for RawDebug {
    fn default() -> Self {
        Self {
            history: default_debug_history(),
            snapshots: None,
        }
    }
}

impl RawSettings {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(position) = env_parse::<Position>("BTOAST_POSITION")? {
            self.defaults.options.position = Some(position);
        }
        if let Some(variant) = env_parse::<Variant>("BTOAST_VARIANT")? {
            self.defaults.options.variant = Some(variant);
        }
        if let Some(delay) = env_duration("BTOAST_DELAY")? {
            self.defaults.delay = Some(delay);
        }
        if let Some(debug) = env_bool("BTOAST_DEBUG")? {
            self.debug.snapshots = Some(debug);
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Settings> {
        let debug_history =
            NonZeroUsize::new(self.debug.history).ok_or(ConfigError::InvalidField {
                field: "debug.history",
                message: "snapshot history must be greater than zero".to_string(),
            })?;

        let RawDefaults {
            delay,
            extended_delay,
            options: mut defaults,
        } = self.defaults;
        defaults.delay = delay.or(defaults.delay);
        defaults.extended_delay = extended_delay.or(defaults.extended_delay);
        if let Some(snapshots) = self.debug.snapshots {
            defaults.debug = Some(snapshots);
        }

        Ok(Settings {
            defaults,
            debug_history,
        })
    }
}
