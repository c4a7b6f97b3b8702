//! Resource pool: the idle set of one kind of worker or facility.
//!
//! Design:
//! - The idle resources live in a `VecDeque` behind an async mutex.
//! - `acquire` waits on a `Notify` while the pool is empty. A waiter that
//!   was notified but returns early hands the wakeup on when its `Notified`
//!   is dropped.
//! - `release` never blocks beyond taking the lock for a push.
//!
//! There is no fairness guarantee among waiting acquirers.

use std::collections::VecDeque;
use std::fmt::Debug;

use tokio::sync::{Mutex, Notify};

/// Anything that can sit in a pool. The id is only used to catch double
/// releases in debug builds.
pub trait Pooled: Send + 'static {
    type Id: PartialEq + Debug;

    fn pool_id(&self) -> Self::Id;
}

pub struct ResourcePool<T: Pooled> {
    tag: String,
    capacity: usize,
    idle: Mutex<VecDeque<T>>,
    notify: Notify,
}

impl<T: Pooled> ResourcePool<T> {
    /// An empty pool. `capacity` is the number of resources configured for
    /// this kind; they join through `release` once their actors are running.
    pub fn new(tag: impl Into<String>, capacity: usize) -> Self {
        Self {
            tag: tag.into(),
            capacity,
            idle: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Total number of resources of this kind, idle or busy.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take an idle resource, waiting for one to be released if none is idle.
    ///
    /// Never fails; if the pool stays empty forever, neither does this call.
    pub async fn acquire(&self) -> T {
        loop {
            // Register interest before looking, so a release that lands
            // between the check and the await still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut idle = self.idle.lock().await;
                if let Some(resource) = idle.pop_front() {
                    return resource;
                }
            }
            notified.await;
        }
    }

    /// Return a resource to the idle set.
    pub async fn release(&self, resource: T) {
        {
            let mut idle = self.idle.lock().await;
            debug_assert!(
                !idle.iter().any(|r| r.pool_id() == resource.pool_id()),
                "{:?} released twice into the {} pool",
                resource.pool_id(),
                self.tag,
            );
            idle.push_back(resource);
        }
        self.notify.notify_one();
    }

    /// Number of currently idle resources.
    pub async fn idle_count(&self) -> usize {
        self.idle.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Token(u32);

    impl Pooled for Token {
        type Id = u32;

        fn pool_id(&self) -> u32 {
            self.0
        }
    }

    #[tokio::test]
    async fn acquire_returns_released_resources() {
        let pool = ResourcePool::new("tokens", 2);
        pool.release(Token(1)).await;
        pool.release(Token(2)).await;
        assert_eq!(pool.idle_count().await, 2);

        let a = pool.acquire().await;
        let b = pool.acquire().await;
        assert_ne!(a, b);
        assert_eq!(pool.idle_count().await, 0);
        assert_eq!(pool.capacity(), 2);
    }

    #[tokio::test]
    async fn acquire_blocks_until_release() {
        let pool = Arc::new(ResourcePool::new("tokens", 1));

        let waiter = tokio::spawn({
            let pool = Arc::clone(&pool);
            async move { pool.acquire().await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        pool.release(Token(7)).await;
        let token = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(token, Token(7));
    }

    #[tokio::test]
    async fn empty_pool_never_yields() {
        let pool: ResourcePool<Token> = ResourcePool::new("tokens", 0);
        let result = tokio::time::timeout(Duration::from_millis(100), pool.acquire()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn every_waiter_is_served_once() {
        let pool = Arc::new(ResourcePool::new("tokens", 3));
        let mut waiters = Vec::new();
        for _ in 0..3 {
            let pool = Arc::clone(&pool);
            waiters.push(tokio::spawn(async move { pool.acquire().await }));
        }
        tokio::task::yield_now().await;

        for id in 0..3 {
            pool.release(Token(id)).await;
        }

        let mut seen = Vec::new();
        for waiter in waiters {
            let token = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .unwrap()
                .unwrap();
            seen.push(token.0);
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(pool.idle_count().await, 0);
    }

    #[tokio::test]
    #[should_panic(expected = "released twice")]
    #[cfg(debug_assertions)]
    async fn double_release_is_caught_in_debug() {
        let pool = ResourcePool::new("tokens", 1);
        pool.release(Token(1)).await;
        pool.release(Token(1)).await;
    }
}
