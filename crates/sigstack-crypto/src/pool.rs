//! A small exclusive-checkout object pool.
//!
//! Keyed-hash primitives are mutable and must not be shared between two
//! logical operations, yet constructing one repeats the key schedule. The
//! pool hands out exclusive ownership per checkout and accepts every return;
//! instances are created lazily on first demand, never eagerly. Pooling is
//! purely a performance optimization and never changes computed results.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// A lazy pool of reusable objects with exclusive checkout.
pub struct Pool<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Pool<T> {
    /// Create an empty pool. No instances are constructed up front.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Check out an instance, creating one with `create` only when the pool
    /// is empty. The returned guard gives exclusive access and returns the
    /// instance on drop — on every exit path, including early returns.
    pub fn checkout_with(&self, create: impl FnOnce() -> T) -> PoolGuard<'_, T> {
        let existing = self.items.lock().pop();
        let item = existing.unwrap_or_else(create);
        PoolGuard {
            pool: self,
            item: Some(item),
        }
    }

    /// Number of idle instances currently held.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.items.lock().len()
    }

    /// Drop all idle instances.
    pub fn clear(&self) {
        self.items.lock().clear();
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("idle", &self.idle()).finish()
    }
}

/// Exclusive handle to a pooled instance; returns it to the pool on drop.
pub struct PoolGuard<'a, T> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T> Deref for PoolGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item.as_ref().expect("pool guard holds an item until drop")
    }
}

impl<T> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("pool guard holds an item until drop")
    }
}

impl<T> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        // Returns always succeed; the pool never rejects an item.
        if let Some(item) = self.item.take() {
            self.pool.items.lock().push(item);
        }
    }
}

impl<T> fmt::Debug for PoolGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PoolGuard(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_should_create_lazily_only_on_checkout() {
        let created = AtomicUsize::new(0);
        let pool: Pool<u32> = Pool::new();
        assert_eq!(created.load(Ordering::SeqCst), 0);

        {
            let _guard = pool.checkout_with(|| {
                created.fetch_add(1, Ordering::SeqCst);
                7
            });
            assert_eq!(created.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_should_reuse_returned_instances() {
        let created = AtomicUsize::new(0);
        let pool: Pool<u32> = Pool::new();

        {
            let _guard = pool.checkout_with(|| {
                created.fetch_add(1, Ordering::SeqCst);
                7
            });
        }
        assert_eq!(pool.idle(), 1);

        let guard = pool.checkout_with(|| {
            created.fetch_add(1, Ordering::SeqCst);
            8
        });
        assert_eq!(*guard, 7, "the returned instance is reused");
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_should_hand_out_distinct_instances_concurrently() {
        let pool: Pool<u32> = Pool::new();
        let first = pool.checkout_with(|| 1);
        let second = pool.checkout_with(|| 2);
        assert_eq!((*first, *second), (1, 2));
    }

    #[test]
    fn test_should_return_on_early_exit_paths() {
        fn early_return(pool: &Pool<u32>) -> Result<(), ()> {
            let _guard = pool.checkout_with(|| 1);
            Err(())
        }

        let pool = Pool::new();
        let _ = early_return(&pool);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_should_clear_idle_instances() {
        let pool: Pool<u32> = Pool::new();
        drop(pool.checkout_with(|| 1));
        assert_eq!(pool.idle(), 1);
        pool.clear();
        assert_eq!(pool.idle(), 0);
    }
}
