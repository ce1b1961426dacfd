//! Values that are either fixed or produced at render time.

use std::fmt;
use std::sync::Arc;

/// Producer closure type used by [`Value::Producer`].
pub type Producer<T> = Arc<dyn Fn() -> T + Send + Sync + 'static>;

/// A literal value or a zero-argument producer evaluated on every render.
pub enum Value<T> {
    /// A fixed value.
    Literal(T),
    /// A closure invoked each time the value is resolved.
    Producer(Producer<T>),
}

impl<T: Clone> Value<T> {
    /// Resolve to a concrete value, invoking the producer if there is one.
    pub fn resolve(&self) -> T {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Producer(producer) => producer(),
        }
    }
}

impl<T> Value<T> {
    /// Wrap a producer closure.
    pub fn producer(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::Producer(Arc::new(f))
    }

    /// Whether this value is computed lazily.
    pub fn is_producer(&self) -> bool {
        matches!(self, Self::Producer(_))
    }
}

impl<T: Clone> Clone for Value<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Producer(producer) => Self::Producer(Arc::clone(producer)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl<T> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn literal_resolves_to_itself() {
        let v: Value<String> = "Copy".into();
        assert_eq!(v.resolve(), "Copy");
        assert!(!v.is_producer());
    }

    #[test]
    fn producer_runs_on_every_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let v = Value::producer(move || counter.fetch_add(1, Ordering::SeqCst) + 1);
        assert_eq!(v.resolve(), 1);
        assert_eq!(v.clone().resolve(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
