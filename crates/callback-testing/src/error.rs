use callback_core::error::ConfigError;

/// Failures of the mock app harness. Never produced by the callback
/// operations themselves, which only echo the injected error.
#[derive(Debug, thiserror::Error)]
pub enum MockServerError {
    #[error("failed to bind mock app listener")]
    Bind(#[source] std::io::Error),
    #[error("mock app gRPC server error")]
    Serve(#[from] tonic::transport::Error),
    #[error("mock app server task failed")]
    Join(#[from] tokio::task::JoinError),
    #[error("invalid mock fixture")]
    Fixture(#[from] ConfigError),
}

impl MockServerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bind(_) => "BIND",
            Self::Serve(_) => "SERVE",
            Self::Join(_) => "JOIN",
            Self::Fixture(_) => "FIXTURE",
        }
    }
}
