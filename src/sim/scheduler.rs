use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::host::{FrameId, Scheduler, TimerId};

/// Interval between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Manual monotonic clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct SimClock(Rc<Cell<Duration>>);

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.0.get()
    }

    /// Moves the clock to `at`. Time never runs backwards.
    pub fn set(&self, at: Duration) {
        self.0.set(self.0.get().max(at));
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SimTask {
    Timer(TimerId),
    Frame(FrameId),
}

/// Timer and frame queue on simulated time. Nothing fires by itself: the owner
/// polls [`SimScheduler::take_due`] and delivers the tasks.
#[derive(Debug)]
pub struct SimScheduler {
    clock: SimClock,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), SimTask>,
}

impl SimScheduler {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            next_seq: 1,
            queue: BTreeMap::new(),
        }
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<SimTask> {
        let later = self.queue.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.queue
            .values()
            .filter(|task| matches!(task, SimTask::Timer(_)))
            .count()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue
            .values()
            .filter(|task| matches!(task, SimTask::Frame(_)))
            .count()
    }

    fn push(&mut self, delay: Duration, task: impl FnOnce(u64) -> SimTask) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((self.clock.now() + delay, seq), task(seq));
        seq
    }

    fn cancel(&mut self, task: SimTask) {
        self.queue.retain(|_, queued| *queued != task);
    }
}

impl Scheduler for SimScheduler {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        TimerId::new(self.push(delay, |seq| SimTask::Timer(TimerId::new(seq))))
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.cancel(SimTask::Timer(timer));
    }

    fn request_frame(&mut self) -> FrameId {
        FrameId::new(self.push(FRAME_INTERVAL, |seq| SimTask::Frame(FrameId::new(seq))))
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.cancel(SimTask::Frame(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::{FRAME_INTERVAL, SimClock, SimScheduler, SimTask};
    use crate::host::Scheduler;
    use std::time::Duration;

    #[test]
    fn clock_is_shared_and_monotonic() {
        let clock = SimClock::new();
        let other = clock.clone();
        clock.set(Duration::from_millis(50));
        other.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(50));
        other.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(55));
    }

    #[test]
    fn tasks_come_out_in_due_then_creation_order() {
        let clock = SimClock::new();
        let mut scheduler = SimScheduler::new(clock);
        let late = scheduler.set_timeout(Duration::from_millis(40));
        let frame = scheduler.request_frame();
        let early = scheduler.set_timeout(Duration::from_millis(16));
        assert_eq!(scheduler.next_due(), Some(FRAME_INTERVAL));
        assert_eq!(
            scheduler.take_due(Duration::from_millis(40)),
            vec![SimTask::Frame(frame), SimTask::Timer(early), SimTask::Timer(late)]
        );
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let clock = SimClock::new();
        let mut scheduler = SimScheduler::new(clock);
        let timer = scheduler.set_timeout(Duration::from_millis(5));
        let frame = scheduler.request_frame();
        scheduler.clear_timeout(timer);
        scheduler.cancel_frame(frame);
        assert_eq!(scheduler.pending_timers(), 0);
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(scheduler.take_due(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn take_due_leaves_later_tasks_queued() {
        let clock = SimClock::new();
        let mut scheduler = SimScheduler::new(clock.clone());
        scheduler.set_timeout(Duration::from_millis(10));
        scheduler.set_timeout(Duration::from_millis(30));
        assert_eq!(scheduler.take_due(Duration::from_millis(10)).len(), 1);
        assert_eq!(scheduler.pending_timers(), 1);
        clock.set(Duration::from_millis(20));
        assert_eq!(scheduler.now(), Duration::from_millis(20));
    }
}
