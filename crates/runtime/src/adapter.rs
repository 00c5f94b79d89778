//! Instance-scoped lifecycle around one capability.
//!
//! One adapter wraps one capability implementation and multiplexes it across
//! any number of logical instances (sessions), each identified by an opaque
//! id. Per instance, executions are strictly sequential; across instances
//! they proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use toolrig_core::{Capability, Error, Result};

/// What one `execute` call hands back to the orchestrator.
#[derive(Debug, Clone)]
pub struct ExecuteOutcome {
    /// Capability output, forwarded unchanged: strings verbatim, any other
    /// JSON value serialized. Domain errors arrive here as data.
    pub response: String,
    /// Reward delta of this step.
    pub reward: f64,
    /// Execution metrics of this step.
    pub metrics: Map<String, Value>,
}

struct InstanceRecord {
    /// Guards execution sequencing. tokio's Mutex wakes waiters in FIFO
    /// order, which gives same-instance calls strict program order.
    exec: Mutex<()>,
    /// Accumulated reward. Guarded separately so `calc_reward` never blocks
    /// behind an in-flight execute.
    reward: Mutex<f64>,
}

impl InstanceRecord {
    fn new() -> Self {
        Self {
            exec: Mutex::new(()),
            reward: Mutex::new(0.0),
        }
    }
}

/// Wraps one capability behind the create/execute/calc_reward/release
/// protocol.
pub struct LifecycleAdapter {
    capability: Arc<dyn Capability>,
    instances: Mutex<HashMap<String, Arc<InstanceRecord>>>,
}

impl LifecycleAdapter {
    pub fn new(capability: Arc<dyn Capability>) -> Self {
        Self {
            capability,
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn capability(&self) -> &Arc<dyn Capability> {
        &self.capability
    }

    async fn lookup(&self, instance_id: &str) -> Result<Arc<InstanceRecord>> {
        self.instances
            .lock()
            .await
            .get(instance_id)
            .cloned()
            .ok_or_else(|| Error::InstanceNotFound(instance_id.to_string()))
    }

    /// Start tracking an instance. A supplied id is adopted as-is when not
    /// already tracked; without one a fresh UUID is generated. Re-creating a
    /// tracked id fails with `InstanceExists`.
    pub async fn create(&self, instance_id: Option<String>) -> Result<String> {
        let id = instance_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut instances = self.instances.lock().await;
        if instances.contains_key(&id) {
            return Err(Error::InstanceExists(id));
        }
        instances.insert(id.clone(), Arc::new(InstanceRecord::new()));
        debug!(capability = %self.capability.descriptor().name, instance = %id, "Created instance");
        Ok(id)
    }

    /// Run the wrapped capability for one instance and accumulate its reward
    /// delta. Same-instance calls queue on the record's execution lock;
    /// distinct instances do not contend.
    pub async fn execute(&self, instance_id: &str, parameters: Value) -> Result<ExecuteOutcome> {
        let record = self.lookup(instance_id).await?;
        let _running = record.exec.lock().await;

        let execution = self.capability.execute_raw(parameters).await;

        // Single guarded add keeps the delta atomic w.r.t. calc_reward.
        *record.reward.lock().await += execution.reward;

        let response = match execution.output {
            Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(ExecuteOutcome {
            response,
            reward: execution.reward,
            metrics: execution.metrics,
        })
    }

    /// Accumulated reward total for one instance. No side effects.
    pub async fn calc_reward(&self, instance_id: &str) -> Result<f64> {
        let record = self.lookup(instance_id).await?;
        let total = *record.reward.lock().await;
        Ok(total)
    }

    /// Stop tracking an instance, waiting for any in-flight execute to
    /// finish first. Idempotent: unknown or already-released ids are a
    /// no-op.
    pub async fn release(&self, instance_id: &str) -> Result<()> {
        let record = self.instances.lock().await.remove(instance_id);
        if let Some(record) = record {
            // Drain: an execute that looked the record up before removal may
            // still hold (or be queued on) the execution lock.
            let _drained = record.exec.lock().await;
            debug!(capability = %self.capability.descriptor().name, instance = %instance_id, "Released instance");
        }
        Ok(())
    }

    /// Number of live instances. Diagnostics only.
    pub async fn instance_count(&self) -> usize {
        self.instances.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::time::Duration;
    use toolrig_core::{CapabilityDescriptor, Execution};

    /// Echoes its parameters; reward comes from the "reward" parameter.
    struct ScriptedCapability {
        descriptor: CapabilityDescriptor,
    }

    impl ScriptedCapability {
        fn new() -> Self {
            Self {
                descriptor: CapabilityDescriptor::new("scripted", "echoes input", "0.0.1")
                    .with_input("reward", "float - reward delta to emit"),
            }
        }
    }

    #[async_trait]
    impl Capability for ScriptedCapability {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn execute_raw(&self, parameters: Value) -> Execution {
            let reward = parameters["reward"].as_f64().unwrap_or(0.0);
            Execution::new(json!({"status": "success"})).with_reward(reward)
        }
    }

    /// Counts entries and flags any same-time overlap of execute_raw.
    struct OverlapDetector {
        descriptor: CapabilityDescriptor,
        in_flight: AtomicBool,
        overlapped: AtomicBool,
        calls: AtomicU64,
    }

    impl OverlapDetector {
        fn new() -> Self {
            Self {
                descriptor: CapabilityDescriptor::new("overlap_detector", "detects overlap", "0.0.1"),
                in_flight: AtomicBool::new(false),
                overlapped: AtomicBool::new(false),
                calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl Capability for OverlapDetector {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn execute_raw(&self, _parameters: Value) -> Execution {
            if self.in_flight.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.store(false, Ordering::SeqCst);
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Execution::new(json!({"status": "success", "call": n}))
        }
    }

    fn adapter() -> LifecycleAdapter {
        LifecycleAdapter::new(Arc::new(ScriptedCapability::new()))
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let adapter = adapter();
        let mut ids = HashSet::new();
        for _ in 0..16 {
            ids.insert(adapter.create(None).await.unwrap());
        }
        assert_eq!(ids.len(), 16);
        assert_eq!(adapter.instance_count().await, 16);
    }

    #[tokio::test]
    async fn test_create_adopts_external_id() {
        let adapter = adapter();
        let id = adapter.create(Some("session-7".to_string())).await.unwrap();
        assert_eq!(id, "session-7");
    }

    #[tokio::test]
    async fn test_create_duplicate_id_fails() {
        let adapter = adapter();
        adapter.create(Some("dup".to_string())).await.unwrap();
        assert!(matches!(
            adapter.create(Some("dup".to_string())).await,
            Err(Error::InstanceExists(_))
        ));
    }

    #[tokio::test]
    async fn test_reward_accumulates() {
        let adapter = adapter();
        let id = adapter.create(None).await.unwrap();
        for delta in [0.2, 0.3, -0.1] {
            let outcome = adapter.execute(&id, json!({"reward": delta})).await.unwrap();
            assert_eq!(outcome.reward, delta);
        }
        let total = adapter.calc_reward(&id).await.unwrap();
        assert!((total - 0.4).abs() < 1e-9, "total = {}", total);
    }

    #[tokio::test]
    async fn test_unknown_instance_is_protocol_error() {
        let adapter = adapter();
        assert!(matches!(
            adapter.execute("ghost", json!({})).await,
            Err(Error::InstanceNotFound(_))
        ));
        assert!(matches!(
            adapter.calc_reward("ghost").await,
            Err(Error::InstanceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let adapter = adapter();
        let id = adapter.create(None).await.unwrap();
        adapter.release(&id).await.unwrap();
        adapter.release(&id).await.unwrap();
        adapter.release("never-existed").await.unwrap();
        assert!(matches!(
            adapter.execute(&id, json!({})).await,
            Err(Error::InstanceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_same_instance_executes_never_interleave() {
        let capability = Arc::new(OverlapDetector::new());
        let adapter = Arc::new(LifecycleAdapter::new(capability.clone()));
        let id = adapter.create(None).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let adapter = adapter.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                adapter.execute(&id, json!({})).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(!capability.overlapped.load(Ordering::SeqCst));
        assert_eq!(capability.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_distinct_instances_run_concurrently() {
        let capability = Arc::new(OverlapDetector::new());
        let adapter = Arc::new(LifecycleAdapter::new(capability.clone()));
        let a = adapter.create(None).await.unwrap();
        let b = adapter.create(None).await.unwrap();

        let start = tokio::time::Instant::now();
        let (ra, rb) = tokio::join!(
            adapter.execute(&a, json!({})),
            adapter.execute(&b, json!({}))
        );
        ra.unwrap();
        rb.unwrap();
        // Two 10ms executions overlapping should finish well under 2x.
        assert!(start.elapsed() < Duration::from_millis(19));
    }

    #[tokio::test]
    async fn test_release_waits_for_in_flight_execute() {
        let capability = Arc::new(OverlapDetector::new());
        let adapter = Arc::new(LifecycleAdapter::new(capability.clone()));
        let id = adapter.create(None).await.unwrap();

        let exec = {
            let adapter = adapter.clone();
            let id = id.clone();
            tokio::spawn(async move { adapter.execute(&id, json!({})).await })
        };
        tokio::time::sleep(Duration::from_millis(2)).await;

        adapter.release(&id).await.unwrap();
        // Release returned, so the execution must already have completed.
        assert_eq!(capability.calls.load(Ordering::SeqCst), 1);
        exec.await.unwrap().unwrap();
    }
}
