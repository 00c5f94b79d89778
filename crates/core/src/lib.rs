pub mod capability;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod schema;

pub use capability::{Capability, Execution};
pub use config::Config;
pub use descriptor::CapabilityDescriptor;
pub use error::{Error, Result};
pub use schema::{translate, FunctionSchema};
