use crate::ValidationEvent;
use std::{fmt::Debug, rc::Rc};
use uuid::Uuid;

type ListenerTraitObject = dyn Fn();

/// A callback registered for a [ValidationEvent].
///
/// Two `Listener`s are equal when one is a clone of the other, which
/// is how [EventEmitter::off()] finds the listener to remove.
///
/// ## Example
///
/// ```
/// use field_validation::Listener;
///
/// let listener = Listener::new(|| println!("valid"));
/// let copy = listener.clone();
/// assert_eq!(listener, copy);
/// assert_ne!(listener, Listener::new(|| println!("valid")));
/// ```
pub struct Listener {
    closure: Rc<ListenerTraitObject>,
    id: Uuid,
}

impl Listener {
    /// Create a new `Listener`.
    pub fn new<C>(closure: C) -> Self
    where
        C: Fn() + 'static,
    {
        Self {
            closure: Rc::new(closure),
            id: Uuid::new_v4(),
        }
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.closure)()
    }
}

impl Clone for Listener {
    fn clone(&self) -> Self {
        Self {
            closure: Rc::clone(&self.closure),
            id: self.id,
        }
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> From<C> for Listener
where
    C: Fn() + 'static,
{
    fn from(closure: C) -> Self {
        Listener::new(closure)
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener(closure: {:p}, id: {})", self.closure, self.id)
    }
}

/// Ordered listener lists, one per [ValidationEvent].
///
/// ## Example
/// ```
/// use field_validation::{EventEmitter, ValidationEvent};
/// use std::{cell::RefCell, rc::Rc};
///
/// let calls = Rc::new(RefCell::new(Vec::new()));
/// let mut emitter = EventEmitter::new();
///
/// let c = calls.clone();
/// emitter.on(ValidationEvent::Invalid, move || c.borrow_mut().push("first"));
/// let c = calls.clone();
/// emitter.on(ValidationEvent::Invalid, move || c.borrow_mut().push("second"));
///
/// emitter.trigger(ValidationEvent::Valid);
/// assert!(calls.borrow().is_empty());
///
/// emitter.trigger(ValidationEvent::Invalid);
/// assert_eq!(vec!["first", "second"], *calls.borrow());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventEmitter {
    listeners: [Vec<Listener>; 2],
}

impl EventEmitter {
    /// Create a new `EventEmitter` with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the list for `event`.
    pub fn on<L: Into<Listener>>(&mut self, event: ValidationEvent, listener: L) {
        self.listeners[event.index()].push(listener.into());
    }

    /// Remove the first registration of `listener` (or a clone of it)
    /// for `event`. Returns `true` if one was removed.
    pub fn off(&mut self, event: ValidationEvent, listener: &Listener) -> bool {
        let listeners = &mut self.listeners[event.index()];
        match listeners.iter().position(|registered| registered == listener) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// The listeners registered for `event`, in registration order.
    pub fn listeners(&self, event: ValidationEvent) -> &[Listener] {
        &self.listeners[event.index()]
    }

    /// Call every listener registered for `event` in registration
    /// order. A panicking listener stops the dispatch and the panic
    /// propagates to the caller.
    pub fn trigger(&self, event: ValidationEvent) {
        let listeners = self.listeners(event);
        tracing::trace!(%event, count = listeners.len(), "dispatching listeners");
        for listener in listeners {
            listener.call();
        }
    }
}
