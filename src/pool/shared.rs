//! Process-wide array pools, one per element type

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;
use tracing::debug;

use super::{
    array_pool::{ArrayPool, Poolable},
    config::PoolConfig,
};

type SharedEntry = Arc<dyn Any + Send + Sync>;

fn registry() -> &'static RwLock<HashMap<TypeId, SharedEntry>> {
    static REGISTRY: OnceLock<RwLock<HashMap<TypeId, SharedEntry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

impl<T: Poolable> ArrayPool<T> {
    /// The process-wide pool for element type `T`
    ///
    /// Created on first use with [`PoolConfig::default`]; every later call
    /// returns a handle to the same pool.
    pub fn shared() -> Arc<Self> {
        let key = TypeId::of::<T>();

        let existing = registry().read().get(&key).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let mut pools = registry().write();
                Arc::clone(pools.entry(key).or_insert_with(|| {
                    debug!(
                        element = std::any::type_name::<T>(),
                        "creating shared array pool"
                    );
                    Self::from_valid_config(PoolConfig::default()) as SharedEntry
                }))
            }
        };

        // Entries are keyed by TypeId, so the downcast always matches
        entry
            .downcast::<Self>()
            .unwrap_or_else(|_| Self::from_valid_config(PoolConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_pool_is_per_type_singleton() {
        let a = ArrayPool::<u64>::shared();
        let b = ArrayPool::<u64>::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_shared_pool_concurrent_access() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let pool = ArrayPool::<u32>::shared();
                    for n in 0..100 {
                        let mut lease = pool.rent(16 + (i * 100 + n) % 500);
                        lease.as_mut_slice()[0] = n as u32;
                    }
                    pool
                })
            })
            .collect();

        let pools: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(pools.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
