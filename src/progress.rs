//! Linear countdown bar drawn under a toast.

use std::time::Duration;

use crate::dom::{Element, NodeId, Placement, Surface};
use crate::host::{FrameId, Scheduler};
use crate::options::ToastConfig;
use crate::types::Variant;

pub const TRACK_CLASS: &str = "bt-progress-track";
pub const FILL_CLASS: &str = "bt-progress-fill";

const MIN_TOTAL: Duration = Duration::from_millis(1);

/// Drives the fill width frame by frame. A disabled driver (no fill node)
/// accepts every call and does nothing.
#[derive(Debug, Default)]
pub struct ProgressDriver {
    fill: Option<NodeId>,
    frame: Option<FrameId>,
    started: Duration,
    duration: Duration,
}

impl ProgressDriver {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn applies(config: &ToastConfig) -> bool {
        config.progress_bar && config.autohide && !config.delay.is_zero()
    }

    /// Appends the track and fill to `root`.
    pub fn attach<S: Surface>(surface: &mut S, root: NodeId, variant: Variant) -> Self {
        let track = Element::div()
            .class(TRACK_CLASS)
            .class("bg-body-secondary")
            .style("height", "2px")
            .style("width", "100%")
            .style("opacity", "0.6")
            .child(
                Element::div()
                    .class(FILL_CLASS)
                    .class(&format!("bg-{variant}"))
                    .style("height", "2px")
                    .style("width", "100%"),
            );
        let track = surface.create(track);
        surface.insert(root, track, Placement::Append);
        Self {
            fill: surface.query(track, FILL_CLASS),
            ..Self::default()
        }
    }

    pub const fn is_active(&self) -> bool {
        self.fill.is_some()
    }

    pub const fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn owns_frame(&self, frame: FrameId) -> bool {
        self.frame == Some(frame)
    }

    /// Restarts the countdown from full over `duration`.
    pub fn reset<C: Scheduler>(&mut self, scheduler: &mut C, duration: Duration) {
        if !self.is_active() {
            return;
        }
        self.stop(scheduler);
        self.started = scheduler.now();
        self.duration = duration;
        self.frame = Some(scheduler.request_frame());
    }

    /// Freezes the bar where it is and returns the time budget left.
    pub fn pause<C: Scheduler>(&mut self, scheduler: &mut C) -> Duration {
        if !self.is_active() {
            return Duration::ZERO;
        }
        self.stop(scheduler);
        let elapsed = scheduler.now().saturating_sub(self.started);
        self.duration.saturating_sub(elapsed)
    }

    pub fn stop<C: Scheduler>(&mut self, scheduler: &mut C) {
        if let Some(frame) = self.frame.take() {
            scheduler.cancel_frame(frame);
        }
    }

    /// Renders one frame. Returns the drawn fraction, or `None` when `frame` is
    /// not the one this driver is waiting for.
    pub fn on_frame<S, C>(&mut self, surface: &mut S, scheduler: &mut C, frame: FrameId) -> Option<f64>
    where
        S: Surface,
        C: Scheduler,
    {
        if !self.owns_frame(frame) {
            return None;
        }
        self.frame = None;
        let fill = self.fill?;
        let remaining = self.remaining_fraction(scheduler.now());
        surface.set_style(fill, "width", &format_width(remaining));
        if remaining > 0.0 {
            self.frame = Some(scheduler.request_frame());
        }
        Some(remaining)
    }

    pub fn remaining_fraction(&self, now: Duration) -> f64 {
        let total = self.duration.max(MIN_TOTAL).as_secs_f64();
        let elapsed = now.saturating_sub(self.started).as_secs_f64();
        (1.0 - elapsed / total).clamp(0.0, 1.0)
    }
}

/// `0.4` becomes `"40.00%"`.
pub fn format_width(fraction: f64) -> String {
    format!("{:.2}%", fraction.clamp(0.0, 1.0) * 100.0)
}
