//! Capability registration and lookup.
//!
//! Capabilities join the registry through an explicit registration table of
//! constructor functions, built once at process startup. A broken entry is
//! logged and skipped; building the registry never fails as a whole.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::adapter::LifecycleAdapter;
use toolrig_core::{schema, Capability, FunctionSchema, Result};

/// Constructor for one capability. Returning `Err` marks this entry broken;
/// it is skipped without affecting the rest of the table.
pub type CapabilityFactory = fn() -> Result<Arc<dyn Capability>>;

/// One registered capability: the shared instance, its derived schema, and
/// the adapter the orchestrator drives. Never mutated after registration.
pub struct RegistryEntry {
    pub capability: Arc<dyn Capability>,
    pub schema: FunctionSchema,
    pub adapter: Arc<LifecycleAdapter>,
}

#[derive(Default)]
pub struct CapabilityRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Instantiate one capability and register it under its declared name.
    ///
    /// Instantiation or schema-translation failures are logged and the entry
    /// is skipped. A name collision overwrites the earlier entry, loudly.
    pub fn register(&mut self, factory: CapabilityFactory) {
        let capability = match factory() {
            Ok(capability) => capability,
            Err(e) => {
                warn!(error = %e, "Skipping capability: instantiation failed");
                return;
            }
        };
        let name = capability.descriptor().name.clone();
        let schema = match schema::translate(capability.descriptor()) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(capability = %name, error = %e, "Skipping capability: schema translation failed");
                return;
            }
        };

        if self.entries.contains_key(&name) {
            warn!(capability = %name, "Duplicate capability name, overwriting earlier registration");
        }
        debug!(capability = %name, "Registered capability");
        let adapter = Arc::new(LifecycleAdapter::new(capability.clone()));
        self.entries.insert(
            name,
            RegistryEntry {
                capability,
                schema,
                adapter,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Function-calling schemas of every registered capability.
    pub fn schemas(&self) -> Vec<FunctionSchema> {
        self.entries.values().map(|e| e.schema.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
