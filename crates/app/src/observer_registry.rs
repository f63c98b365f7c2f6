//! In-process observer registry keyed by device name.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use homesim_domain::id::SubscriptionId;

use crate::ports::Observer;

type Subscribers = Vec<(SubscriptionId, Arc<dyn Observer>)>;

/// Per-device subscriber lists.
///
/// Publishing snapshots the subscriber list and releases the lock before
/// calling observers, so an observer may subscribe or unsubscribe from
/// inside `update`.
#[derive(Default)]
pub struct ObserverRegistry {
    subscribers: Mutex<BTreeMap<String, Subscribers>>,
}

impl ObserverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` on `device`.
    pub fn subscribe(&self, device: &str, observer: Arc<dyn Observer>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.lock()
            .entry(device.to_string())
            .or_default()
            .push((id, observer));
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let mut found = false;
        for list in subscribers.values_mut() {
            let before = list.len();
            list.retain(|(sid, _)| *sid != id);
            found |= list.len() != before;
        }
        subscribers.retain(|_, list| !list.is_empty());
        found
    }

    /// Drop every observer of `device`.
    pub fn remove_device(&self, device: &str) -> usize {
        self.lock().remove(device).map_or(0, |list| list.len())
    }

    #[must_use]
    pub fn count(&self, device: &str) -> usize {
        self.lock().get(device).map_or(0, Vec::len)
    }

    /// Deliver `"<device>: <message>"` to each observer in registration order.
    pub fn publish(&self, device: &str, message: &str) {
        let targets: Vec<Arc<dyn Observer>> = self
            .lock()
            .get(device)
            .map(|list| list.iter().map(|(_, o)| Arc::clone(o)).collect())
            .unwrap_or_default();
        let formatted = format!("{device}: {message}");
        for observer in targets {
            tracing::debug!(device, message, "delivering notification");
            observer.update(&formatted);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Subscribers>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Observer for Recorder {
        fn update(&self, message: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}|{message}", self.label));
        }
    }

    #[test]
    fn should_format_message_with_device_name() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.subscribe(
            "hall",
            Arc::new(Recorder {
                label: "a",
                log: Arc::clone(&log),
            }),
        );
        registry.publish("hall", "Light turned on");
        assert_eq!(*log.lock().unwrap(), vec!["a|hall: Light turned on"]);
    }

    #[test]
    fn should_deliver_in_registration_order() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["first", "second", "third"] {
            registry.subscribe(
                "hall",
                Arc::new(Recorder {
                    label,
                    log: Arc::clone(&log),
                }),
            );
        }
        registry.publish("hall", "ping");
        let labels: Vec<String> = log
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.split('|').next().unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn should_not_deliver_to_other_devices() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.subscribe(
            "hall",
            Arc::new(Recorder {
                label: "a",
                log: Arc::clone(&log),
            }),
        );
        registry.publish("kitchen", "ping");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn should_stop_delivering_when_unsubscribed() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = registry.subscribe(
            "hall",
            Arc::new(Recorder {
                label: "a",
                log: Arc::clone(&log),
            }),
        );
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.publish("hall", "ping");
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.count("hall"), 0);
    }

    #[test]
    fn should_accept_closures_as_observers() {
        let registry = ObserverRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        registry.subscribe(
            "hall",
            Arc::new(move |message: &str| sink.lock().unwrap().push(message.to_string())),
        );
        registry.publish("hall", "ping");
        assert_eq!(*log.lock().unwrap(), vec!["hall: ping"]);
    }

    #[test]
    fn should_drop_all_observers_of_removed_device() {
        let registry = ObserverRegistry::new();
        registry.subscribe("hall", Arc::new(Recorder::default()));
        registry.subscribe("hall", Arc::new(Recorder::default()));
        assert_eq!(registry.remove_device("hall"), 2);
        assert_eq!(registry.count("hall"), 0);
    }
}
