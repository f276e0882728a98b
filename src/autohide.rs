//! Who hides a toast, and when.
//!
//! Without hover handling the host widget's own timer does the job. With
//! `pause_on_hover` or a non-zero `extended_delay` the widget is built with
//! autohide off and a local, cancellable timer takes over. Leaving the toast
//! after hovering grants a fresh `extended_delay` countdown; the time left on
//! the original delay is not resumed.

use std::time::Duration;

use tracing::debug;

use crate::host::{Scheduler, TimerId, WidgetOptions};
use crate::options::ToastConfig;
use crate::progress::ProgressDriver;

#[derive(Debug)]
pub enum Autohide {
    /// The host widget runs its own timer (or never hides, if autohide is off).
    Delegated,
    Local(LocalTimer),
}

#[derive(Debug)]
pub struct LocalTimer {
    delay: Duration,
    extended_delay: Duration,
    pause_on_hover: bool,
    pending: Option<TimerId>,
}

impl Autohide {
    pub fn for_config(config: &ToastConfig) -> Self {
        let manages_hover = config.pause_on_hover || !config.extended_delay.is_zero();
        if config.autohide && manages_hover {
            Self::Local(LocalTimer {
                delay: config.delay,
                extended_delay: config.extended_delay,
                pause_on_hover: config.pause_on_hover,
                pending: None,
            })
        } else {
            Self::Delegated
        }
    }

    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    pub const fn widget_options(&self, config: &ToastConfig) -> WidgetOptions {
        match self {
            Self::Delegated => WidgetOptions {
                autohide: config.autohide,
                delay: config.delay,
            },
            Self::Local(_) => WidgetOptions {
                autohide: false,
                delay: config.delay,
            },
        }
    }

    pub const fn pending(&self) -> Option<TimerId> {
        match self {
            Self::Delegated => None,
            Self::Local(timer) => timer.pending,
        }
    }

    /// Starts the initial countdown.
    pub fn start<C: Scheduler>(&mut self, scheduler: &mut C, progress: &mut ProgressDriver) {
        if let Self::Local(timer) = self {
            let delay = timer.delay;
            timer.arm(scheduler, progress, delay);
        }
    }

    pub fn pointer_enter<C: Scheduler>(&mut self, scheduler: &mut C, progress: &mut ProgressDriver) {
        if let Self::Local(timer) = self {
            if !timer.pause_on_hover {
                return;
            }
            timer.cancel(scheduler);
            let remaining = progress.pause(scheduler);
            debug!(remaining_ms = remaining.as_millis(), "toast autohide paused on hover");
        }
    }

    pub fn pointer_leave<C: Scheduler>(&mut self, scheduler: &mut C, progress: &mut ProgressDriver) {
        if let Self::Local(timer) = self {
            let extended = timer.extended_delay;
            timer.arm(scheduler, progress, extended);
            debug!(extended_ms = extended.as_millis(), "toast autohide extended after hover");
        }
    }

    /// Consumes an expired timer. `true` when it was this toast's pending hide.
    pub fn expire(&mut self, fired: TimerId) -> bool {
        match self {
            Self::Local(timer) if timer.pending == Some(fired) => {
                timer.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel<C: Scheduler>(&mut self, scheduler: &mut C) {
        if let Self::Local(timer) = self {
            timer.cancel(scheduler);
        }
    }
}

impl LocalTimer {
    fn arm<C: Scheduler>(&mut self, scheduler: &mut C, progress: &mut ProgressDriver, delay: Duration) {
        self.cancel(scheduler);
        self.pending = Some(scheduler.set_timeout(delay));
        progress.reset(scheduler, delay);
    }

    fn cancel<C: Scheduler>(&mut self, scheduler: &mut C) {
        if let Some(timer) = self.pending.take() {
            scheduler.clear_timeout(timer);
        }
    }
}
