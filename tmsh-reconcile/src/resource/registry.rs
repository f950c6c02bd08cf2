//! Global registry of resource kinds.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use super::definition::ResourceKind;
use super::kinds;
use crate::error::{ConfigError, Result};

/// Global kind registry, seeded with the built-in kinds.
static REGISTRY: LazyLock<RwLock<KindRegistry>> = LazyLock::new(|| {
    let mut registry = KindRegistry::new();
    registry.register_builtin_kinds();
    RwLock::new(registry)
});

/// Registry of resource kinds by name.
#[derive(Debug, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, ResourceKind>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<KindRegistry> {
        &REGISTRY
    }

    /// Look a kind up in the global registry, returning a copy.
    pub fn lookup(name: &str) -> Result<ResourceKind> {
        let registry = REGISTRY.read().map_err(|_| ConfigError::Invalid {
            message: "kind registry lock poisoned".to_string(),
        })?;
        registry.get(name).cloned().ok_or_else(|| {
            ConfigError::UnknownKind {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn register_builtin_kinds(&mut self) {
        for kind in kinds::builtin() {
            self.kinds.insert(kind.name.clone(), kind);
        }
    }

    /// Register a kind. Names must be unique.
    pub fn register(&mut self, kind: ResourceKind) -> Result<()> {
        if self.kinds.contains_key(&kind.name) {
            return Err(ConfigError::KindAlreadyRegistered {
                name: kind.name.clone(),
            }
            .into());
        }
        self.kinds.insert(kind.name.clone(), kind);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResourceKind> {
        self.kinds.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// List all registered kind names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.kinds.keys()
    }
}
