//! Per-request value carrier.
//!
//! A [`Context`] travels with every [`Request`](crate::Request). Middleware
//! derives a new context with extra values and hands the derived request
//! downstream; nothing is ever mutated in place, and nothing lives in a
//! thread-local, so values stay attached to the request no matter which
//! worker thread polls it.
//!
//! Values are keyed by their type. Define a newtype per value you want to
//! carry:
//!
//! ```rust
//! use tollgate::Context;
//!
//! #[derive(Debug, PartialEq)]
//! struct Tenant(&'static str);
//!
//! let root = Context::new();
//! let ctx = root.with(Tenant("acme"));
//!
//! assert_eq!(ctx.get::<Tenant>(), Some(&Tenant("acme")));
//! assert_eq!(root.get::<Tenant>(), None);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Values = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Immutable, type-keyed map of request-scoped values.
///
/// Cloning is one `Arc` increment. [`Context::with`] copies the map once and
/// leaves `self` untouched.
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<Values>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a derived context that also carries `value`.
    ///
    /// A value of the same type already present in `self` is shadowed in the
    /// derived context only.
    pub fn with<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut values = Values::clone(&self.values);
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self { values: Arc::new(values) }
    }

    /// Looks up the value of type `T`, if one was attached.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").field("values", &self.values.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Answer(u32);

    #[test]
    fn derived_context_leaves_parent_untouched() {
        let parent = Context::new();
        let child = parent.with(Answer(42));

        assert!(parent.is_empty());
        assert_eq!(child.get::<Answer>(), Some(&Answer(42)));
    }

    #[test]
    fn later_value_shadows_earlier_one() {
        let first = Context::new().with(Answer(1));
        let second = first.with(Answer(2));

        assert_eq!(first.get::<Answer>(), Some(&Answer(1)));
        assert_eq!(second.get::<Answer>(), Some(&Answer(2)));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn missing_type_is_none() {
        let ctx = Context::new().with(Answer(7));
        assert_eq!(ctx.get::<String>(), None);
    }
}
