use std::sync::mpsc::Sender;

use super::types::{ReleaseEvent, StartEvent};

/// Downstream consumer of hold notifications.
pub trait HoldObserver: Send {
    fn on_start(&mut self, event: &StartEvent) {
        let _ = event;
    }

    fn on_release(&mut self, event: &ReleaseEvent) {
        let _ = event;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoldNotification {
    Start(StartEvent),
    Release(ReleaseEvent),
}

impl HoldObserver for Sender<HoldNotification> {
    fn on_start(&mut self, event: &StartEvent) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.send(HoldNotification::Start(*event));
    }

    fn on_release(&mut self, event: &ReleaseEvent) {
        let _ = self.send(HoldNotification::Release(*event));
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u32);

/// Subscribers in subscription order.
#[derive(Default)]
pub struct ObserverList {
    next_id: u32,
    entries: Vec<(SubscriptionId, Box<dyn HoldObserver>)>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn HoldObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify_start(&mut self, event: &StartEvent) {
        for (_, observer) in &mut self.entries {
            observer.on_start(event);
        }
    }

    pub(crate) fn notify_release(&mut self, event: &ReleaseEvent) {
        for (_, observer) in &mut self.entries {
            observer.on_release(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc, Mutex};

    use embassy_time::{Duration, Instant};

    use super::super::types::{Position, ReleaseReason};
    use super::*;

    struct Tagged {
        tag: u8,
        log: Arc<Mutex<Vec<u8>>>,
    }

    impl HoldObserver for Tagged {
        fn on_release(&mut self, _event: &ReleaseEvent) {
            self.log.lock().expect("log lock").push(self.tag);
        }
    }

    fn release() -> ReleaseEvent {
        ReleaseEvent {
            normalized_hold_time: 0.5,
            held: Duration::from_millis(500),
            position: Position::ZERO,
            reason: ReleaseReason::Explicit,
        }
    }

    #[test]
    fn release_reaches_subscribers_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut list = ObserverList::new();
        for tag in [3, 1, 2] {
            let _ = list.subscribe(Box::new(Tagged {
                tag,
                log: Arc::clone(&log),
            }));
        }

        list.notify_release(&release());

        assert_eq!(*log.lock().expect("log lock"), vec![3, 1, 2]);
    }

    #[test]
    fn unsubscribed_observer_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut list = ObserverList::new();
        let first = list.subscribe(Box::new(Tagged {
            tag: 1,
            log: Arc::clone(&log),
        }));
        let _ = list.subscribe(Box::new(Tagged {
            tag: 2,
            log: Arc::clone(&log),
        }));

        assert!(list.unsubscribe(first));
        assert!(!list.unsubscribe(first));
        list.notify_release(&release());

        assert_eq!(*log.lock().expect("log lock"), vec![2]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn channel_observer_forwards_notifications() {
        let (tx, rx) = mpsc::channel();
        let mut list = ObserverList::new();
        let _ = list.subscribe(Box::new(tx));

        let start = StartEvent {
            at: Instant::from_millis(0),
            position: Position::ZERO,
            normalized_hold_time: 0.0,
        };
        list.notify_start(&start);
        list.notify_release(&release());

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                HoldNotification::Start(start),
                HoldNotification::Release(release())
            ]
        );
    }
}
