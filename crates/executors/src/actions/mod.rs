use std::io;

use async_trait::async_trait;
use command_group::AsyncGroupChild;

pub mod script;

/// Launches a single command line as a child process group with piped
/// stdout and stderr.
#[async_trait]
pub trait CommandSpawner: Send + Sync {
    async fn spawn(&self, command: &str) -> io::Result<AsyncGroupChild>;
}
