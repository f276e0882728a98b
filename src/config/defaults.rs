use std::time::Duration;

pub(crate) const DEFAULT_DELAY: Duration = Duration::from_millis(4_000);

pub(crate) const DEFAULT_EXTENDED_DELAY: Duration = Duration::from_millis(1_000);

pub(crate) const DEFAULT_ARIA_LIVE: &str = "polite";

pub(crate) const ID_PREFIX: &str = "bt_";

pub(super) const fn default_debug_history() -> usize {
    64
}
