//! 이름으로 명시 등록하는 LP 백엔드 레지스트리

use std::collections::BTreeMap;
use std::sync::Arc;

use super::backend::LpBackend;
use super::minilp_backend::MinilpBackend;
use crate::core::error::{PolyRoundError, Result};

#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Arc<dyn LpBackend>>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}

impl BackendRegistry {
    /// 빈 레지스트리
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 백엔드(minilp) 등록
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MinilpBackend::new()));
        registry
    }

    /// 같은 이름이 있으면 교체
    pub fn register(&mut self, backend: Arc<dyn LpBackend>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn LpBackend>> {
        self.backends
            .get(name)
            .cloned()
            .ok_or_else(|| PolyRoundError::UnknownBackend(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }
}
