//! Process-wide request correlation ids.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::context::Context;

static COUNTER: AtomicI64 = AtomicI64::new(0);

/// Correlation id of one request.
///
/// Ids are decimal strings of a process-wide counter: `"1"`, `"2"`, …
/// Every id is handed out exactly once per process, and ids handed out later
/// compare greater as integers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// Allocates the next id. One atomic `fetch_add`, safe from any thread.
    pub fn next() -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        Self(n.to_string().into())
    }

    /// Placeholder for code paths that run outside the logging middleware.
    pub fn unknown() -> Self {
        Self(Arc::from("unknown"))
    }

    /// The id carried by `ctx`, if any.
    pub fn from_context(ctx: &Context) -> Option<&Self> {
        ctx.get::<Self>()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    fn value(id: &RequestId) -> i64 {
        id.as_str().parse().unwrap()
    }

    #[test]
    fn ids_are_decimal_and_increasing() {
        let a = RequestId::next();
        let b = RequestId::next();
        assert!(value(&b) > value(&a));
    }

    #[test]
    fn concurrent_ids_are_unique_and_ordered_per_thread() {
        let workers: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..500).map(|_| RequestId::next()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for worker in workers {
            let ids = worker.join().unwrap();
            assert!(ids.windows(2).all(|w| value(&w[0]) < value(&w[1])));
            for id in ids {
                assert!(seen.insert(id), "duplicate request id");
            }
        }
        assert_eq!(seen.len(), 8 * 500);
    }

    #[test]
    fn context_roundtrip() {
        let id = RequestId::next();
        let ctx = Context::new().with(id.clone());

        assert_eq!(RequestId::from_context(&ctx), Some(&id));
        assert_eq!(RequestId::from_context(&Context::new()), None);
        assert_eq!(RequestId::unknown().as_str(), "unknown");
    }
}
