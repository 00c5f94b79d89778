use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A descriptor string lacks the `" - "` separator. Fatal only for the
    /// capability that carries it, never for the registry as a whole.
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// Capability instantiation failed during registration.
    #[error("Registration error: {0}")]
    Registration(String),

    #[error("Unknown instance: {0}")]
    InstanceNotFound(String),

    #[error("Instance already exists: {0}")]
    InstanceExists(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
