//! Event handlers that can live in args structs.
//!
//! Closures are neither `Clone` nor `PartialEq`. Wrapping them in
//! [`CallbackWith`] (or [`Callback`] for handlers without an argument) gives
//! both: clones share one closure and equality means "same closure".
//!
//! ```
//! use glissade_ui::CallbackWith;
//!
//! let on_change = CallbackWith::new(|value: f64| assert!(value >= 0.0));
//! let copy = on_change.clone();
//! assert_eq!(on_change, copy);
//! copy.call(3.0);
//! ```

use std::{fmt, sync::Arc};

type Handler<T, R> = dyn Fn(T) -> R + Send + Sync;

/// Shared `Fn(T) -> R`, equal only to its own clones.
pub struct CallbackWith<T, R = ()> {
    handler: Arc<Handler<T, R>>,
}

impl<T, R> CallbackWith<T, R> {
    /// Wraps `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Runs the handler.
    pub fn call(&self, value: T) -> R {
        (self.handler)(value)
    }
}

impl<T, R, F> From<F> for CallbackWith<T, R>
where
    F: Fn(T) -> R + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T> Default for CallbackWith<T> {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl<T, R> Clone for CallbackWith<T, R> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T, R> PartialEq for CallbackWith<T, R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<T, R> Eq for CallbackWith<T, R> {}

impl<T, R> fmt::Debug for CallbackWith<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackWith({:p})", Arc::as_ptr(&self.handler))
    }
}

/// Shared `Fn()`, equal only to its own clones.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Callback(CallbackWith<()>);

impl Callback {
    /// Wraps `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(CallbackWith::new(move |()| handler()))
    }

    /// Runs the handler.
    pub fn call(&self) {
        self.0.call(());
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0.handler))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn clones_are_equal_and_fresh_handlers_are_not() {
        let focus = Callback::new(|| {});
        assert_eq!(focus, focus.clone());
        assert_ne!(focus, Callback::new(|| {}));

        let change = CallbackWith::new(|_: f64| {});
        assert_eq!(change, change.clone());
        assert_ne!(change, CallbackWith::default());
    }

    #[test]
    fn calls_reach_the_shared_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&calls);
        let blur = Callback::new(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        blur.call();
        blur.clone().call();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let double = CallbackWith::new(|v: i32| v * 2);
        assert_eq!(double.call(21), 42);
    }
}
