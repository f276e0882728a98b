//! Host capabilities the toaster is generic over: the toast widget and the
//! timer/frame scheduler.

use std::time::Duration;

use crate::dom::NodeId;

/// Handle to a host widget instance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct InstanceId(u64);

impl InstanceId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FrameId(u64);

impl FrameId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Construction options handed to the host widget.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WidgetOptions {
    pub autohide: bool,
    pub delay: Duration,
}

/// The external toast component: show/hide animation and accessibility wiring
/// live on its side.
///
/// When a hide completes the host reports it back through
/// [`crate::Toaster::dispatch`] with [`HostEvent::Hidden`].
pub trait ToastWidget {
    fn is_available(&self) -> bool {
        true
    }

    fn create(&mut self, element: NodeId, options: WidgetOptions) -> InstanceId;

    /// Existing instance bound to `element`, or a fresh one with host defaults.
    fn get_or_create(&mut self, element: NodeId) -> InstanceId;

    fn show(&mut self, instance: InstanceId);

    /// Must be safe to call repeatedly.
    fn hide(&mut self, instance: InstanceId);

    fn dispose(&mut self, instance: InstanceId);
}

/// Monotonic clock plus cancellable timers and animation frames.
///
/// Expiries come back through [`crate::Toaster::fire_timer`] and
/// [`crate::Toaster::fire_frame`].
pub trait Scheduler {
    fn now(&self) -> Duration;

    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    fn clear_timeout(&mut self, timer: TimerId);

    fn request_frame(&mut self) -> FrameId;

    fn cancel_frame(&mut self, frame: FrameId);
}

/// Events the host delivers for a toast element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostEvent {
    /// The widget finished hiding.
    Hidden,
    PointerEnter,
    PointerLeave,
    Click { target: NodeId },
}
