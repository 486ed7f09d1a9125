use std::{io, process::Stdio};

use async_trait::async_trait;
use command_group::{AsyncCommandGroup, AsyncGroupChild};
use tokio::process::Command;
use utils::shell::get_shell_command;

use crate::actions::CommandSpawner;

/// Runs command lines through the platform shell so pipes, redirects and
/// built-ins keep working. Environment and working directory are inherited
/// from the server.
#[derive(Debug, Clone)]
pub struct ShellSpawner {
    shell: String,
    shell_arg: String,
}

impl Default for ShellSpawner {
    fn default() -> Self {
        let (shell, shell_arg) = get_shell_command();
        Self::with_shell(shell, shell_arg)
    }
}

impl ShellSpawner {
    pub fn with_shell(shell: impl Into<String>, shell_arg: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            shell_arg: shell_arg.into(),
        }
    }
}

#[async_trait]
impl CommandSpawner for ShellSpawner {
    async fn spawn(&self, command: &str) -> io::Result<AsyncGroupChild> {
        let mut cmd = Command::new(&self.shell);
        cmd.kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .arg(&self.shell_arg)
            .arg(command);

        // New process group so a timeout can take down the whole pipeline
        cmd.group_spawn()
    }
}
