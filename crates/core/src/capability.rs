use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::descriptor::CapabilityDescriptor;

/// Result of one raw capability execution.
///
/// Domain-level failures (unsupported action, bad parameter values) are data,
/// not faults: the capability returns an `Execution` whose output carries a
/// `"status": "error"` field, and the adapter forwards it unchanged.
#[derive(Debug, Clone)]
pub struct Execution {
    /// Structured output, forwarded to the orchestrator as the response.
    pub output: Value,
    /// Step reward delta, accumulated per instance by the adapter.
    pub reward: f64,
    /// Free-form execution metrics.
    pub metrics: Map<String, Value>,
}

impl Execution {
    pub fn new(output: Value) -> Self {
        Self {
            output,
            reward: 0.0,
            metrics: Map::new(),
        }
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_metric(mut self, key: &str, value: Value) -> Self {
        self.metrics.insert(key.to_string(), value);
        self
    }
}

/// One pluggable unit of domain logic.
///
/// Implementations are shared across all logical instances of one registry
/// entry; the adapter serializes same-instance executions, but distinct
/// instances may call `execute_raw` concurrently, so implementations guard
/// any interior state themselves.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The metadata record this capability was registered with.
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Execute with orchestrator-supplied parameters.
    async fn execute_raw(&self, parameters: Value) -> Execution;
}
