//! Enum-keyed multi-subscriber callback table.
//!
//! Both the store (load / clear / reset notifications) and the draw session
//! (done / rejected notifications) register listeners here. Dispatch is
//! synchronous and in registration order; there is only one thread of control.

use std::fmt;

type Listener<E> = Box<dyn FnMut(&E)>;

/// Callback table keyed by an event kind `K`, delivering payloads of type `E`.
pub struct Dispatcher<K, E> {
    listeners: Vec<(K, Listener<E>)>,
}

impl<K, E> Default for Dispatcher<K, E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<K: fmt::Debug, E> fmt::Debug for Dispatcher<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "kinds",
                &self.listeners.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K: Copy + PartialEq, E> Dispatcher<K, E> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one kind of event.
    pub fn subscribe(&mut self, kind: K, listener: impl FnMut(&E) + 'static) {
        self.listeners.push((kind, Box::new(listener)));
    }

    /// Deliver `event` to every listener registered for `kind`.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&mut self, kind: K, event: &E) -> usize {
        let mut delivered = 0;
        for (k, listener) in self.listeners.iter_mut() {
            if *k == kind {
                listener(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: K) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        A,
        B,
    }

    #[test]
    fn emits_only_to_matching_kind() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher: Dispatcher<Kind, u32> = Dispatcher::new();

        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Kind::A, move |v| sink.borrow_mut().push(("a", *v)));
        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Kind::B, move |v| sink.borrow_mut().push(("b", *v)));
        let sink = Rc::clone(&seen);
        dispatcher.subscribe(Kind::A, move |v| sink.borrow_mut().push(("a2", *v)));

        assert_eq!(dispatcher.emit(Kind::A, &7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("a2", 7)]);

        assert_eq!(dispatcher.count(Kind::B), 1);
        dispatcher.clear();
        assert_eq!(dispatcher.emit(Kind::B, &1), 0);
    }
}
