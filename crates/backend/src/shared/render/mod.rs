//! Реестр отрисованных графиков: один владеющий handle на chart id.

use contracts::shared::charts::ChartSpec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Живой экземпляр графика у рендерера
pub trait RenderHandle: Send + Sync {
    fn spec(&self) -> &ChartSpec;

    /// Освободить ресурсы рендерера. Вызывается ровно один раз, до установки замены.
    fn dispose(&mut self);
}

/// Создаёт handles по готовой спецификации `{labels, datasets}`
pub trait ChartRenderer: Send + Sync {
    fn create(&self, spec: ChartSpec) -> Box<dyn RenderHandle>;
}

/// Рендерер по умолчанию: хранит спецификацию, HTTP-слой отдаёт её клиенту как JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

struct JsonHandle {
    spec: ChartSpec,
}

impl RenderHandle for JsonHandle {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn dispose(&mut self) {
        tracing::trace!("chart {} disposed", self.spec.id);
    }
}

impl ChartRenderer for JsonRenderer {
    fn create(&self, spec: ChartSpec) -> Box<dyn RenderHandle> {
        Box::new(JsonHandle { spec })
    }
}

pub struct ChartRegistry {
    renderer: Arc<dyn ChartRenderer>,
    handles: BTreeMap<String, Box<dyn RenderHandle>>,
}

impl ChartRegistry {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            renderer,
            handles: BTreeMap::new(),
        }
    }

    /// Dispose the handle currently under `id` (if any), then install a
    /// handle for `spec`. Returns true when a previous handle was replaced.
    pub fn replace(&mut self, id: &str, spec: ChartSpec) -> bool {
        let replaced = match self.handles.remove(id) {
            Some(mut old) => {
                old.dispose();
                true
            }
            None => false,
        };
        let handle = self.renderer.create(spec);
        self.handles.insert(id.to_string(), handle);
        replaced
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.handles.get(id).map(|h| h.spec())
    }

    pub fn ids(&self) -> Vec<String> {
        self.handles.keys().cloned().collect()
    }

    /// All current specs in chart-id order
    pub fn snapshot(&self) -> Vec<ChartSpec> {
        self.handles.values().map(|h| h.spec().clone()).collect()
    }
}

impl Default for ChartRegistry {
    fn default() -> Self {
        Self::new(Arc::new(JsonRenderer))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Renderer that counts created and disposed handles
    #[derive(Default)]
    pub struct CountingRenderer {
        pub created: Arc<AtomicUsize>,
        pub disposed: Arc<AtomicUsize>,
    }

    struct CountingHandle {
        spec: ChartSpec,
        disposed: Arc<AtomicUsize>,
    }

    impl RenderHandle for CountingHandle {
        fn spec(&self) -> &ChartSpec {
            &self.spec
        }

        fn dispose(&mut self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl ChartRenderer for CountingRenderer {
        fn create(&self, spec: ChartSpec) -> Box<dyn RenderHandle> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingHandle {
                spec,
                disposed: self.disposed.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CountingRenderer;
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_replace_disposes_previous() {
        let renderer = Arc::new(CountingRenderer::default());
        let disposed = renderer.disposed.clone();
        let created = renderer.created.clone();
        let mut registry = ChartRegistry::new(renderer);

        assert!(!registry.replace("daily", ChartSpec::new("daily", "Daily", vec![])));
        assert_eq!(disposed.load(Ordering::SeqCst), 0);

        assert!(registry.replace("daily", ChartSpec::new("daily", "Daily v2", vec![])));
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(registry.ids(), vec!["daily".to_string()]);
        assert_eq!(registry.get("daily").unwrap().title, "Daily v2");
    }

    #[test]
    fn test_snapshot_in_id_order() {
        let mut registry = ChartRegistry::default();
        registry.replace("yearly", ChartSpec::new("yearly", "Yearly", vec![]));
        registry.replace("daily", ChartSpec::new("daily", "Daily", vec![]));

        assert_eq!(registry.ids(), vec!["daily".to_string(), "yearly".to_string()]);
        let titles: Vec<String> = registry.snapshot().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Daily", "Yearly"]);
        assert!(registry.get("monthly").is_none());
    }
}
