use std::time::Duration;

use crate::config::Settings;
use crate::dom::{NodeId, Surface};
use crate::host::HostEvent;
use crate::toaster::Toaster;

use super::{MemoryDom, SimClock, SimScheduler, SimTask, SimWidget};

/// A [`Toaster`] wired to the in-memory host, plus the clock that drives it.
pub struct Harness {
    clock: SimClock,
    toaster: Toaster<MemoryDom, SimWidget, SimScheduler>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let clock = SimClock::new();
        let widget = SimWidget::new(clock.clone());
        Self::with_widget(clock, widget, settings)
    }

    /// Uses a pre-configured widget; it must share `clock`.
    pub fn with_widget(clock: SimClock, widget: SimWidget, settings: Settings) -> Self {
        let toaster = Toaster::with_settings(
            MemoryDom::new(),
            widget,
            SimScheduler::new(clock.clone()),
            settings,
        );
        Self { clock, toaster }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub const fn toaster(&self) -> &Toaster<MemoryDom, SimWidget, SimScheduler> {
        &self.toaster
    }

    pub const fn toaster_mut(&mut self) -> &mut Toaster<MemoryDom, SimWidget, SimScheduler> {
        &mut self.toaster
    }

    pub const fn dom(&self) -> &MemoryDom {
        self.toaster.surface()
    }

    pub const fn widget(&self) -> &SimWidget {
        self.toaster.widget()
    }

    /// Runs the clock forward by `by`, delivering every timer, frame and widget
    /// notification that comes due on the way, in time order.
    pub fn advance(&mut self, by: Duration) {
        let target = self.clock.now() + by;
        while let Some(due) = self.next_due().filter(|due| *due <= target) {
            self.clock.set(due);
            for task in self.toaster.scheduler_mut().take_due(due) {
                match task {
                    SimTask::Timer(timer) => self.toaster.fire_timer(timer),
                    SimTask::Frame(frame) => self.toaster.fire_frame(frame),
                }
            }
            for (element, event) in self.toaster.widget_mut().take_due(due) {
                self.toaster.dispatch(element, event);
            }
        }
        self.clock.set(target);
    }

    /// Delivers everything already due without moving the clock.
    pub fn settle(&mut self) {
        self.advance(Duration::ZERO);
    }

    pub fn pointer_enter(&mut self, element: NodeId) {
        self.toaster.dispatch(element, HostEvent::PointerEnter);
    }

    pub fn pointer_leave(&mut self, element: NodeId) {
        self.toaster.dispatch(element, HostEvent::PointerLeave);
    }

    /// Clicks the first node carrying `class` inside the toast. Returns `false`
    /// when the toast has no such node.
    pub fn click(&mut self, element: NodeId, class: &str) -> bool {
        let Some(target) = self.toaster.surface().query(element, class) else {
            return false;
        };
        self.toaster.dispatch(element, HostEvent::Click { target });
        true
    }

    /// HTML of every container currently on the page.
    pub fn render_page(&self) -> String {
        let dom = self.toaster.surface();
        dom.render(dom.body())
    }

    fn next_due(&self) -> Option<Duration> {
        let timers = self.toaster.scheduler().next_due();
        let widget = self.toaster.widget().next_due();
        match (timers, widget) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
