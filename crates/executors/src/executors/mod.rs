use thiserror::Error;

pub mod sequence;

pub use sequence::{CommandSequenceExecutor, DEFAULT_COMMAND_TIMEOUT};

/// Raised before any process is started. Everything that goes wrong while a
/// command runs is reported inside the result instead.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("No command provided")]
    InvalidInput,
}
