use std::collections::HashMap;
use std::time::Duration;

use crate::dom::NodeId;
use crate::host::{HostEvent, InstanceId, ToastWidget, WidgetOptions};

use super::SimClock;

/// Time between `hide()` and the hidden notification.
pub const DEFAULT_FADE: Duration = Duration::from_millis(150);

/// Options used by `get_or_create` for an element that has no instance yet.
const HOST_DEFAULTS: WidgetOptions = WidgetOptions {
    autohide: true,
    delay: Duration::from_millis(5_000),
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Shown,
    Hiding,
}

#[derive(Debug)]
struct Instance {
    element: NodeId,
    options: WidgetOptions,
    phase: Phase,
    shows: usize,
    hides: usize,
    autohide_at: Option<Duration>,
    hidden_at: Option<Duration>,
}

/// Toast widget on simulated time.
///
/// `show` starts the widget's own autohide countdown when the instance was built
/// with `autohide: true`. `hide` starts a fade and the hidden notification becomes
/// due once it ends; hiding an instance that is already hiding does nothing. An
/// instance is released when its hidden notification is emitted.
#[derive(Debug)]
pub struct SimWidget {
    clock: SimClock,
    fade: Duration,
    available: bool,
    next_id: u64,
    instances: HashMap<InstanceId, Instance>,
    by_element: HashMap<NodeId, InstanceId>,
}

impl SimWidget {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            fade: DEFAULT_FADE,
            available: true,
            next_id: 0,
            instances: HashMap::new(),
            by_element: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn with_fade(mut self, fade: Duration) -> Self {
        self.fade = fade;
        self
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn show_count(&self, instance: InstanceId) -> usize {
        self.instances.get(&instance).map_or(0, |i| i.shows)
    }

    pub fn hide_count(&self, instance: InstanceId) -> usize {
        self.instances.get(&instance).map_or(0, |i| i.hides)
    }

    pub fn options(&self, instance: InstanceId) -> Option<WidgetOptions> {
        self.instances.get(&instance).map(|i| i.options)
    }

    pub fn is_shown(&self, instance: InstanceId) -> bool {
        self.instances
            .get(&instance)
            .is_some_and(|i| i.phase == Phase::Shown)
    }

    /// True once the instance is gone, through `dispose` or after its hidden
    /// notification.
    pub fn is_disposed(&self, instance: InstanceId) -> bool {
        !self.instances.contains_key(&instance)
    }

    pub fn instance_for(&self, element: NodeId) -> Option<InstanceId> {
        self.by_element.get(&element).copied()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.instances
            .values()
            .filter_map(|i| i.next_due())
            .min()
    }

    /// Advances every instance to `now` and returns the notifications that
    /// became due, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<(NodeId, HostEvent)> {
        let mut events = Vec::new();
        loop {
            let next = self
                .instances
                .iter()
                .filter_map(|(id, i)| i.next_due().map(|due| (due, id.get())))
                .filter(|(due, _)| *due <= now)
                .min();
            let Some((due, raw)) = next else {
                break;
            };
            let fade = self.fade;
            let id = InstanceId::new(raw);
            let Some(instance) = self.instances.get_mut(&id) else {
                break;
            };
            if instance.autohide_at.is_some_and(|at| at == due) {
                instance.autohide_at = None;
                instance.begin_hide(due, fade);
            } else {
                let element = instance.element;
                self.release(id);
                events.push((element, HostEvent::Hidden));
            }
        }
        events
    }

    /// Hidden instances are finished; their element is about to leave the page.
    fn release(&mut self, id: InstanceId) {
        if let Some(removed) = self.instances.remove(&id) {
            if self.by_element.get(&removed.element) == Some(&id) {
                self.by_element.remove(&removed.element);
            }
        }
    }

    fn insert(&mut self, element: NodeId, options: WidgetOptions) -> InstanceId {
        self.next_id += 1;
        let id = InstanceId::new(self.next_id);
        self.instances.insert(
            id,
            Instance {
                element,
                options,
                phase: Phase::Idle,
                shows: 0,
                hides: 0,
                autohide_at: None,
                hidden_at: None,
            },
        );
        self.by_element.insert(element, id);
        id
    }
}

impl Instance {
    fn next_due(&self) -> Option<Duration> {
        match (self.autohide_at, self.hidden_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn begin_hide(&mut self, now: Duration, fade: Duration) {
        if self.phase != Phase::Shown {
            return;
        }
        self.phase = Phase::Hiding;
        self.autohide_at = None;
        self.hidden_at = Some(now + fade);
    }
}

impl ToastWidget for SimWidget {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create(&mut self, element: NodeId, options: WidgetOptions) -> InstanceId {
        if let Some(old) = self.by_element.get(&element).copied() {
            self.instances.remove(&old);
        }
        self.insert(element, options)
    }

    fn get_or_create(&mut self, element: NodeId) -> InstanceId {
        match self.by_element.get(&element) {
            Some(id) => *id,
            None => self.insert(element, HOST_DEFAULTS),
        }
    }

    fn show(&mut self, instance: InstanceId) {
        let now = self.clock.now();
        if let Some(instance) = self.instances.get_mut(&instance) {
            instance.shows += 1;
            instance.phase = Phase::Shown;
            instance.hidden_at = None;
            instance.autohide_at = instance
                .options
                .autohide
                .then_some(now + instance.options.delay);
        }
    }

    fn hide(&mut self, instance: InstanceId) {
        let now = self.clock.now();
        let fade = self.fade;
        if let Some(instance) = self.instances.get_mut(&instance) {
            instance.hides += 1;
            instance.begin_hide(now, fade);
        }
    }

    fn dispose(&mut self, instance: InstanceId) {
        self.release(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_FADE, SimWidget};
    use crate::dom::NodeId;
    use crate::host::{HostEvent, ToastWidget, WidgetOptions};
    use crate::sim::SimClock;
    use std::time::Duration;

    const MANUAL: WidgetOptions = WidgetOptions {
        autohide: false,
        delay: Duration::from_millis(1_000),
    };

    #[test]
    fn hide_fades_then_notifies_once() {
        let clock = SimClock::new();
        let mut widget = SimWidget::new(clock.clone());
        let element = NodeId::new(9);
        let instance = widget.create(element, MANUAL);
        widget.show(instance);
        widget.hide(instance);
        widget.hide(instance);
        assert_eq!(widget.hide_count(instance), 2);
        assert_eq!(widget.next_due(), Some(DEFAULT_FADE));
        assert!(widget.take_due(Duration::from_millis(149)).is_empty());
        assert_eq!(widget.take_due(DEFAULT_FADE), vec![(element, HostEvent::Hidden)]);
        assert!(widget.take_due(Duration::from_secs(5)).is_empty());
        assert!(widget.is_disposed(instance));
        assert_eq!(widget.instance_for(element), None);
    }

    #[test]
    fn hidden_instances_stop_being_tracked() {
        let clock = SimClock::new();
        let mut widget = SimWidget::new(clock).with_fade(Duration::from_millis(5));
        for raw in 0..32 {
            let instance = widget.create(NodeId::new(raw), MANUAL);
            widget.show(instance);
            widget.hide(instance);
        }
        assert_eq!(widget.take_due(Duration::from_millis(5)).len(), 32);
        assert!(widget.instances.is_empty());
        assert!(widget.by_element.is_empty());
        assert_eq!(widget.next_due(), None);
    }

    #[test]
    fn own_autohide_runs_into_the_fade() {
        let clock = SimClock::new();
        let mut widget = SimWidget::new(clock).with_fade(Duration::from_millis(10));
        let element = NodeId::new(3);
        let instance = widget.create(
            element,
            WidgetOptions {
                autohide: true,
                delay: Duration::from_millis(100),
            },
        );
        widget.show(instance);
        assert_eq!(widget.next_due(), Some(Duration::from_millis(100)));
        assert_eq!(
            widget.take_due(Duration::from_millis(110)),
            vec![(element, HostEvent::Hidden)]
        );
        assert!(!widget.is_shown(instance));
    }

    #[test]
    fn show_while_hiding_cancels_the_fade() {
        let clock = SimClock::new();
        let mut widget = SimWidget::new(clock);
        let instance = widget.create(NodeId::new(1), MANUAL);
        widget.show(instance);
        widget.hide(instance);
        widget.show(instance);
        assert_eq!(widget.show_count(instance), 2);
        assert!(widget.is_shown(instance));
        assert_eq!(widget.next_due(), None);
    }

    #[test]
    fn get_or_create_reuses_and_dispose_forgets() {
        let clock = SimClock::new();
        let mut widget = SimWidget::new(clock);
        let element = NodeId::new(4);
        let instance = widget.create(element, MANUAL);
        assert_eq!(widget.get_or_create(element), instance);
        widget.dispose(instance);
        assert!(widget.is_disposed(instance));
        assert_eq!(widget.instance_for(element), None);
        let fresh = widget.get_or_create(element);
        assert_ne!(fresh, instance);
        assert!(widget.options(fresh).is_some_and(|o| o.autohide));
    }
}
