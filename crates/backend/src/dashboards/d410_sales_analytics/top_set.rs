use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::generation::{GenerationTicket, RefreshGeneration};

#[derive(Debug, Default)]
struct TopSetState {
    key: Option<String>,
    set: Option<Arc<HashSet<String>>>,
}

/// Кэш эталонного набора "топ клиентов", ключ `category|metric|group_by`.
///
/// Смена ключа сбрасывает набор, а не перезаписывает его: запрос, начатый
/// под старым ключом или в устаревшем поколении, ничего не устанавливает.
#[derive(Debug, Default)]
pub struct TopSetCache {
    state: Mutex<TopSetState>,
}

impl TopSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached set for `key`. A different key clears the cache and becomes
    /// the key the next `store` must match, unless `ticket` is already stale.
    pub async fn get_or_invalidate(
        &self,
        key: &str,
        ticket: GenerationTicket,
        generations: &RefreshGeneration,
    ) -> Option<Arc<HashSet<String>>> {
        let mut state = self.state.lock().await;
        if state.key.as_deref() == Some(key) {
            return state.set.clone();
        }

        if !generations.is_current(ticket) {
            tracing::debug!("top set key {} ignored (generation {})", key, ticket.value());
            return None;
        }

        if state.key.is_some() {
            tracing::debug!("top set key changed to {}, cache invalidated", key);
        }
        state.key = Some(key.to_string());
        state.set = None;
        None
    }

    /// Install a freshly fetched set. Refused (`None`) when `ticket` is stale
    /// or `key` is no longer the current one.
    pub async fn store(
        &self,
        key: &str,
        set: HashSet<String>,
        ticket: GenerationTicket,
        generations: &RefreshGeneration,
    ) -> Option<Arc<HashSet<String>>> {
        let mut state = self.state.lock().await;
        if !generations.is_current(ticket) || state.key.as_deref() != Some(key) {
            tracing::debug!("top set for {} discarded (generation {})", key, ticket.value());
            return None;
        }

        let set = Arc::new(set);
        state.set = Some(set.clone());
        Some(set)
    }
}
