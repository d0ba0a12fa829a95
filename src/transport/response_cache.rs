use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::operation::Operation;

/// Last canonical response per read operation.
///
/// Only responses produced by the resolvers are ever recorded. Mutations that
/// change agreements drop the slots derived from them so the next read
/// reflects the store. Every invalidation bumps a generation; a read records
/// only if no invalidation happened since it started.
#[derive(Debug, Default)]
pub struct ResponseCache {
    state: RwLock<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    entries: HashMap<Operation, Value>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Taken before a read executes, handed back to [`record_if_current`].
    ///
    /// [`record_if_current`]: ResponseCache::record_if_current
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn record(&self, operation: Operation, data: Value) {
        self.state.write().await.entries.insert(operation, data);
    }

    /// Records unless an invalidation ran after `generation` was taken.
    pub async fn record_if_current(&self, operation: Operation, data: Value, generation: u64) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("Discarded stale {} response", operation);
            return false;
        }
        state.entries.insert(operation, data);
        true
    }

    pub async fn get(&self, operation: Operation) -> Option<Value> {
        self.state.read().await.entries.get(&operation).cloned()
    }

    pub async fn contains(&self, operation: Operation) -> bool {
        self.state.read().await.entries.contains_key(&operation)
    }

    pub async fn invalidate(&self, operations: &[Operation]) {
        let mut state = self.state.write().await;
        state.generation += 1;
        for operation in operations {
            if state.entries.remove(operation).is_some() {
                debug!("Invalidated cached {}", operation);
            }
        }
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}
