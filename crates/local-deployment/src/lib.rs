use std::sync::Arc;

use async_trait::async_trait;
use deployment::{Deployment, DeploymentError};
use executors::executors::CommandSequenceExecutor;
use services::services::{
    config::ServerConfig, installer::TemplateInstaller, shortcuts::ShortcutStore,
    template_store::TemplateStore,
};

/// Deployment backed by the local file system and local processes.
#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<ServerConfig>,
    executor: CommandSequenceExecutor,
    templates: TemplateStore,
    shortcuts: ShortcutStore,
    installer: TemplateInstaller,
}

impl LocalDeployment {
    /// Replace the executor shared by the routes and the installer.
    pub fn with_executor(mut self, executor: CommandSequenceExecutor) -> Self {
        self.installer = TemplateInstaller::new(executor.clone());
        self.executor = executor;
        self
    }
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new(config: ServerConfig) -> Result<Self, DeploymentError> {
        let executor = CommandSequenceExecutor::new().with_timeout(config.command_timeout);

        let templates = TemplateStore::new(config.templates_dir());
        templates.ensure_dir().await?;

        // Writes the default shortcuts on first start
        let shortcuts = ShortcutStore::new(config.shortcuts_path());
        let loaded = shortcuts.load().await?;
        tracing::debug!(
            count = loaded.shortcuts.len(),
            created_defaults = loaded.created_defaults,
            "Shortcuts ready"
        );

        let installer = TemplateInstaller::new(executor.clone());

        Ok(Self {
            config: Arc::new(config),
            executor,
            templates,
            shortcuts,
            installer,
        })
    }

    fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn executor(&self) -> &CommandSequenceExecutor {
        &self.executor
    }

    fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    fn shortcuts(&self) -> &ShortcutStore {
        &self.shortcuts
    }

    fn installer(&self) -> &TemplateInstaller {
        &self.installer
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_new_prepares_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default().with_data_dir(dir.path());
        config.command_timeout = Duration::from_secs(5);

        let deployment = LocalDeployment::new(config).await.unwrap();

        assert!(dir.path().join("templates").is_dir());
        assert!(dir.path().join("configs/shortcuts.json").is_file());
        assert_eq!(deployment.executor().timeout(), Duration::from_secs(5));
        assert_eq!(deployment.config().data_dir, dir.path());
    }
}
