use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("toast widget is not available; load the host toast component before showing toasts")]
    MissingWidget,
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Failure raised by a user-supplied toast callback.
///
/// These never reach the caller of [`crate::Toaster`]; they are reported to the
/// diagnostic sink and the toast carries on.
#[derive(Debug, Error)]
pub enum CallbackFault {
    #[error("{callback} callback failed: {message}")]
    Failed {
        callback: &'static str,
        message: String,
    },
    #[error("{callback} callback panicked: {message}")]
    Panicked {
        callback: &'static str,
        message: String,
    },
}

impl CallbackFault {
    pub const fn callback(&self) -> &'static str {
        match self {
            Self::Failed { callback, .. } | Self::Panicked { callback, .. } => callback,
        }
    }
}
