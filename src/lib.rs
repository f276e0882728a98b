#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod autohide;
pub mod config;
pub mod dedup;
pub mod dom;
pub mod error;
pub mod host;
pub mod interaction;
pub mod lifecycle;
pub mod options;
pub mod progress;
pub mod registry;
pub mod render;
pub mod sim;
pub mod telemetry;
pub mod toaster;
pub mod types;

pub use config::Settings;
pub use error::{CallbackFault, ConfigError, Error};
pub use interaction::{CallbackResult, ClickEvent, ToastContext};
pub use options::{ToastConfig, ToastOptions, normalize};
pub use toaster::{DebugSnapshot, ToastHandle, ToastState, Toaster};
pub use types::{DuplicatePolicy, Position, Variant};

pub type Result<T> = std::result::Result<T, error::Error>;
