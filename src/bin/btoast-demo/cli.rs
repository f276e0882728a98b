use std::path::PathBuf;
use std::time::Duration;

use btoast::{Position, Variant};
use clap::{ArgAction, Parser};
use humantime::parse_duration;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Shows toasts on a simulated page and prints what happens", long_about = None)]
pub struct Cli {
    /// Message text of the toast.
    pub message: String,

    /// Color variant (primary, secondary, success, info, warning, danger, dark, light).
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Title shown in the toast header.
    #[arg(long)]
    pub title: Option<String>,

    /// Screen position (e.g. "bottom-left").
    #[arg(long)]
    pub position: Option<Position>,

    /// Autohide delay (e.g. "4s").
    #[arg(long, value_parser = parse_duration)]
    pub delay: Option<Duration>,

    /// Countdown granted after the pointer leaves (e.g. "1s").
    #[arg(long, value_parser = parse_duration)]
    pub extended_delay: Option<Duration>,

    /// Draw a progress bar under the toast.
    #[arg(long, action = ArgAction::SetTrue)]
    pub progress_bar: bool,

    /// Render without an icon.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_icon: bool,

    /// Keep counting down while hovered.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_pause_on_hover: bool,

    /// Stack new toasts above older ones.
    #[arg(long, action = ArgAction::SetTrue)]
    pub newest_on_top: bool,

    /// Collapse identical toasts into one.
    #[arg(long, action = ArgAction::SetTrue)]
    pub prevent_duplicates: bool,

    /// Number of times the toast is shown.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32))]
    pub repeat: u32,

    /// Label of the approve button.
    #[arg(long)]
    pub approve: Option<String>,

    /// Label of the deny button.
    #[arg(long)]
    pub deny: Option<String>,

    /// Pointer enters the first toast at this time (e.g. "1s").
    #[arg(long, value_parser = parse_duration)]
    pub hover_at: Option<Duration>,

    /// Pointer leaves the first toast at this time.
    #[arg(long, value_parser = parse_duration)]
    pub leave_at: Option<Duration>,

    /// Raw toast options as a JSON object; flags take precedence.
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,

    /// Path of the TOML settings file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Simulated time to run for (e.g. "10s").
    #[arg(long, value_parser = parse_duration, default_value = "10s")]
    pub run_for: Duration,

    /// Use a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "btoast=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
