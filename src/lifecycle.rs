use std::collections::HashMap;
use std::hash::Hash;

/// Listeners that fire at most once per key.
///
/// `fire` hands out and forgets everything registered under a key, so a second
/// notification for the same key finds nothing to run.
#[derive(Debug)]
pub struct OnceListeners<K, L> {
    listeners: HashMap<K, Vec<L>>,
}

impl<K, L> Default for OnceListeners<K, L> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, L> OnceListeners<K, L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: K, listener: L) {
        self.listeners.entry(key).or_default().push(listener);
    }

    /// Takes every listener for `key`, in registration order.
    pub fn fire(&mut self, key: &K) -> Vec<L> {
        self.listeners.remove(key).unwrap_or_default()
    }

    /// Drops the listeners for `key` without running them.
    pub fn forget(&mut self, key: &K) -> bool {
        self.listeners.remove(key).is_some()
    }

    pub fn is_registered(&self, key: &K) -> bool {
        self.listeners.contains_key(key)
    }
}

/// Cleanup steps attached to a toast's hidden notification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cleanup {
    StopProgress,
    RemoveElement,
}

#[cfg(test)]
mod tests {
    use super::OnceListeners;

    #[test]
    fn listeners_fire_once_in_order() {
        let mut listeners = OnceListeners::new();
        listeners.register("toast", 1);
        listeners.register("toast", 2);
        assert_eq!(listeners.fire(&"toast"), vec![1, 2]);
        assert!(listeners.fire(&"toast").is_empty());
    }

    #[test]
    fn forget_drops_without_firing() {
        let mut listeners = OnceListeners::new();
        listeners.register(3_u64, "cleanup");
        assert!(listeners.is_registered(&3));
        assert!(listeners.forget(&3));
        assert!(!listeners.forget(&3));
        assert!(listeners.fire(&3).is_empty());
    }
}
