use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("container failed: {0}")]
    Container(#[from] testcontainers::TestcontainersError),
    /// The fixture configuration would be refused by the image entrypoint.
    #[error("invalid fixture config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
