//! Listener registry with drop-to-unsubscribe handles

use std::cell::RefCell;
use std::rc::Rc;

type Callback<T> = Rc<RefCell<Box<dyn FnMut(&T)>>>;

pub(crate) struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

pub(crate) type SharedListeners<T> = Rc<RefCell<Listeners<T>>>;

impl<T: 'static> Listeners<T> {
    pub(crate) fn shared() -> SharedListeners<T> {
        Rc::new(RefCell::new(Self {
            next_id: 0,
            entries: Vec::new(),
        }))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Register `callback`; the returned handle removes it again
    pub(crate) fn subscribe(
        shared: &SharedListeners<T>,
        callback: Box<dyn FnMut(&T)>,
    ) -> Subscription {
        let id = {
            let mut listeners = shared.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Rc::new(RefCell::new(callback))));
            id
        };

        let weak = Rc::downgrade(shared);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.borrow_mut().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Call every listener; listeners may unsubscribe while being called
    pub(crate) fn emit(shared: &SharedListeners<T>, value: &T) {
        let callbacks: Vec<Callback<T>> = shared
            .borrow()
            .entries
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            // Skip a listener that is already running further up the stack
            if let Ok(mut f) = callback.try_borrow_mut() {
                (&mut **f)(value);
            }
        }
    }
}

/// Live listener registration; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
