use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-branch mutual exclusion. The guard is held for the whole
/// mutate-cascade-revalidate sequence so two concurrent writes on one
/// branch cannot both pass a max-threshold check; operations on
/// different branches proceed in parallel.
#[derive(Clone, Default)]
pub struct BranchLocks {
    registry: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl BranchLocks {
    pub fn new() -> BranchLocks {
        BranchLocks::default()
    }

    pub async fn acquire(&self, branch_code: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.registry.lock().expect("branch lock registry poisoned");
            registry
                .entry(branch_code.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
