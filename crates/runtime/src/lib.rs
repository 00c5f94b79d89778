pub mod adapter;
pub mod registry;

pub use adapter::{ExecuteOutcome, LifecycleAdapter};
pub use registry::{CapabilityFactory, CapabilityRegistry, RegistryEntry};
