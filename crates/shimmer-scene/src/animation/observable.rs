//! Single-threaded observable scalar.
//!
//! The owner holds the only strong handle. Animation drivers get a
//! [`WeakScalar`], so dropping the owner detaches every writer, and observers
//! are held through [`Subscription`] guards that unregister on drop.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Observer = Rc<RefCell<dyn FnMut(f32)>>;

struct ScalarCell {
    value: Cell<f32>,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_id: Cell<u64>,
}

impl ScalarCell {
    fn set(&self, value: f32) {
        if self.value.get() == value {
            return;
        }
        self.value.set(value);

        // Snapshot so observers may subscribe or unsubscribe while being notified.
        let snapshot: Vec<Observer> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        for observer in snapshot {
            match observer.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(value),
                Err(_) => log::warn!("observer re-entered while handling {value}; skipped"),
            }
        }
    }
}

/// Scalar value whose changes are pushed to subscribers.
pub struct ObservableScalar {
    cell: Rc<ScalarCell>,
}

impl ObservableScalar {
    pub fn new(value: f32) -> Self {
        Self {
            cell: Rc::new(ScalarCell {
                value: Cell::new(value),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> f32 {
        self.cell.value.get()
    }

    /// Store `value`, notifying observers only if it differs from the current one.
    pub fn set(&self, value: f32) {
        self.cell.set(value);
    }

    /// Register `observer`; it runs on every change until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(f32) + 'static,
    {
        let id = self.cell.next_id.get();
        self.cell.next_id.set(id + 1);
        let observer: Observer = Rc::new(RefCell::new(observer));
        self.cell.observers.borrow_mut().push((id, observer));
        Subscription {
            cell: Rc::downgrade(&self.cell),
            id,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.cell.observers.borrow().len()
    }

    /// Write-only handle that does not keep the scalar alive.
    pub fn downgrade(&self) -> WeakScalar {
        WeakScalar {
            cell: Rc::downgrade(&self.cell),
        }
    }
}

impl fmt::Debug for ObservableScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableScalar")
            .field("value", &self.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Non-owning handle used by animation drivers.
#[derive(Clone)]
pub struct WeakScalar {
    cell: Weak<ScalarCell>,
}

impl WeakScalar {
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }

    /// Write through to the scalar. Returns `false` once the owner is gone.
    pub fn set(&self, value: f32) -> bool {
        match self.cell.upgrade() {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> Option<f32> {
        self.cell.upgrade().map(|c| c.value.get())
    }
}

impl fmt::Debug for WeakScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakScalar")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Guard returned by [`ObservableScalar::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    cell: Weak<ScalarCell>,
    id: u64,
}

impl Subscription {
    /// Unsubscribe now; same as dropping the guard.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.upgrade() {
            if let Ok(mut observers) = cell.observers.try_borrow_mut() {
                observers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observers_fire_only_on_change() {
        let scalar = ObservableScalar::new(-1.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = scalar.subscribe(move |v| sink.borrow_mut().push(v));

        scalar.set(-1.0);
        scalar.set(0.5);
        scalar.set(0.5);
        scalar.set(1.0);

        assert_eq!(*seen.borrow(), vec![0.5, 1.0]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let scalar = ObservableScalar::new(0.0);
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let sub = scalar.subscribe(move |_| counter.set(counter.get() + 1));
        scalar.set(1.0);
        drop(sub);
        scalar.set(2.0);

        assert_eq!(hits.get(), 1);
        assert_eq!(scalar.observer_count(), 0);
    }

    #[test]
    fn weak_handle_detaches_when_owner_drops() {
        let scalar = ObservableScalar::new(0.0);
        let weak = scalar.downgrade();
        assert!(weak.set(0.25));
        assert_eq!(scalar.get(), 0.25);

        drop(scalar);
        assert!(!weak.is_alive());
        assert!(!weak.set(1.0));
        assert_eq!(weak.get(), None);
    }

    #[test]
    fn observer_may_unsubscribe_itself() {
        let scalar = ObservableScalar::new(0.0);
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let sub = scalar.subscribe(move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        scalar.set(1.0);
        assert!(slot.borrow().is_none());
        assert_eq!(scalar.observer_count(), 0);
    }
}
