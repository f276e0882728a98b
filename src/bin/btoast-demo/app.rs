use std::path::PathBuf;
use std::time::Duration;

use btoast::Result;
use btoast::error::{ConfigError, Error as ToastError};
use btoast::sim::Harness;
use btoast::telemetry::init_tracing;
use btoast::{Settings, ToastHandle, ToastOptions};
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "btoast.toml";
const TICK: Duration = Duration::from_millis(10);

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let settings = Settings::from_env_and_file(&config_path)?;

    if cli.repeat == 0 {
        return Err(ToastError::from(ConfigError::InvalidField {
            field: "cli.repeat",
            message: "repeat count must be at least 1".to_string(),
        }));
    }
    let options = toast_options(&cli)?;

    let mut harness = Harness::with_settings(settings);
    let mut shown: Vec<ToastHandle> = Vec::new();
    for _ in 0..cli.repeat {
        let handle = harness
            .toaster_mut()
            .show(&cli.message, options.clone())
            .ok_or(ToastError::MissingWidget)?;
        if !shown.contains(&handle) {
            shown.push(handle);
        }
    }
    info!(shown = shown.len(), requested = cli.repeat, "demo toasts created");
    println!("{}", harness.render_page());

    let mut pointer = pointer_script(&cli);
    let hovered = shown.first().map(|handle| handle.element);
    let mut live = shown;
    while harness.now() < cli.run_for {
        let step = TICK.min(cli.run_for.saturating_sub(harness.now()));
        harness.advance(step);
        let now = harness.now();

        while let Some((at, enter)) = pointer.first().copied().filter(|(at, _)| *at <= now) {
            pointer.remove(0);
            if let Some(element) = hovered {
                if enter {
                    harness.pointer_enter(element);
                } else {
                    harness.pointer_leave(element);
                }
                println!("{:>6} ms  pointer {}", at.as_millis(), if enter { "enter" } else { "leave" });
            }
        }

        live.retain(|handle| {
            let alive = harness.toaster().state(handle.element).is_some();
            if !alive {
                println!("{:>6} ms  removed {}", now.as_millis(), handle.id);
            }
            alive
        });
        if live.is_empty() && pointer.is_empty() {
            break;
        }
    }

    for handle in &live {
        println!("still visible after {} ms: {}", harness.now().as_millis(), handle.id);
    }
    Ok(())
}

/// `--options` JSON first, individual flags on top.
fn toast_options(cli: &Cli) -> Result<ToastOptions> {
    let base = match cli.options.as_deref() {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(raw).map_err(|err| ConfigError::InvalidField {
                    field: "cli.options",
                    message: err.to_string(),
                })?;
            ToastOptions::from_json(&value)
        }
        None => ToastOptions::default(),
    };

    let flags = ToastOptions {
        id: base.id.clone(),
        dedupe_key: base.dedupe_key.clone(),
        variant: cli.variant,
        title: cli.title.clone(),
        position: cli.position,
        delay: cli.delay,
        extended_delay: cli.extended_delay,
        progress_bar: cli.progress_bar.then_some(true),
        no_icon: cli.no_icon.then_some(true),
        pause_on_hover: cli.no_pause_on_hover.then_some(false),
        newest_on_top: cli.newest_on_top.then_some(true),
        prevent_duplicates: cli.prevent_duplicates.then_some(true),
        approve_text: cli.approve.clone(),
        deny_text: cli.deny.clone(),
        ..ToastOptions::default()
    };
    Ok(flags.layered_over(&base))
}

/// Pointer events in time order; `true` is enter.
fn pointer_script(cli: &Cli) -> Vec<(Duration, bool)> {
    let mut script: Vec<(Duration, bool)> = [
        cli.hover_at.map(|at| (at, true)),
        cli.leave_at.map(|at| (at, false)),
    ]
    .into_iter()
    .flatten()
    .collect();
    script.sort_by_key(|(at, _)| *at);
    script
}
