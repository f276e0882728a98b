//! Deterministic in-memory host: a DOM, a manual clock, a timer/frame queue and a
//! toast widget with Bootstrap-like behaviour. Used by the tests and the demo
//! binary.

mod dom;
mod harness;
mod scheduler;
mod widget;

pub use dom::MemoryDom;
pub use harness::Harness;
pub use scheduler::{FRAME_INTERVAL, SimClock, SimScheduler, SimTask};
pub use widget::{DEFAULT_FADE, SimWidget};
