use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket issued to one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic refresh counter. Each filter change begins a new generation;
/// results computed under an older ticket are discarded.
#[derive(Debug, Default)]
pub struct RefreshGeneration {
    current: AtomicU64,
}

impl RefreshGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> GenerationTicket {
        GenerationTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.current() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_cycle_supersedes() {
        let generations = RefreshGeneration::new();
        let first = generations.begin();
        assert!(generations.is_current(first));

        let second = generations.begin();
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert!(second > first);
        assert_eq!(generations.current(), 2);
    }
}
