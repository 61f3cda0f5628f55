//! Hot-swappable configuration section.

use std::sync::Arc;
use tokio::sync::watch;

/// One reloadable config section.
///
/// The value sits in a `watch` channel as an `Arc<T>`, so readers get a
/// cheap handle to the current value and never hold a lock while they use
/// it. SIGHUP reloads swap in a whole new value.
pub struct ConfigStore<T> {
    tx: Arc<watch::Sender<Arc<T>>>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// The value in effect right now.
    pub fn current(&self) -> Arc<T> {
        Arc::clone(&self.tx.borrow())
    }

    /// Swap in a new value. Handles obtained earlier keep the old one.
    pub fn replace(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_leaves_old_handles_intact() {
        let store = ConfigStore::new(String::from("brand-a"));
        let before = store.current();

        store.replace(String::from("brand-b"));

        assert_eq!(*before, "brand-a");
        assert_eq!(*store.current(), "brand-b");
    }

    #[test]
    fn test_clones_share_state() {
        let store = ConfigStore::new(1u32);
        let other = store.clone();
        other.replace(2);
        assert_eq!(*store.current(), 2);
    }
}
