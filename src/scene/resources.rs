use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Mesh,
    Points,
    FrameTarget,
}

#[derive(Debug, Default)]
struct LedgerCounters {
    allocated: AtomicU64,
    released: AtomicU64,
}

/// Registry of renderable buffers handed to the rasterizer.
///
/// Every mesh and point cloud holds a [`ResourceHandle`]; dropping the handle releases it.
/// The counters make teardown observable: after an unmount `live()` must be zero.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    counters: Arc<LedgerCounters>,
}

impl ResourceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn acquire(&self, kind: ResourceKind) -> ResourceHandle {
        let id = self.counters.allocated.fetch_add(1, Ordering::Relaxed);
        ResourceHandle {
            id,
            kind,
            counters: Arc::clone(&self.counters),
        }
    }

    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.counters.allocated.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn released(&self) -> u64 {
        self.counters.released.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn live(&self) -> u64 {
        self.allocated().saturating_sub(self.released())
    }
}

#[derive(Debug)]
pub struct ResourceHandle {
    id: u64,
    kind: ResourceKind,
    counters: Arc<LedgerCounters>,
}

impl ResourceHandle {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_release_on_drop() {
        let ledger = ResourceLedger::new();
        let first = ledger.acquire(ResourceKind::Mesh);
        let second = ledger.acquire(ResourceKind::Points);
        assert_eq!(ledger.live(), 2);
        assert_ne!(first.id(), second.id());

        drop(first);
        assert_eq!(ledger.live(), 1);
        assert_eq!(ledger.released(), 1);

        drop(second);
        assert_eq!(ledger.live(), 0);
        assert_eq!(ledger.allocated(), 2);
    }

    #[test]
    fn cloned_ledgers_share_counters() {
        let ledger = ResourceLedger::new();
        let view = ledger.clone();
        let handle = ledger.acquire(ResourceKind::Mesh);
        assert_eq!(view.live(), 1);
        assert_eq!(handle.kind(), ResourceKind::Mesh);
    }
}
