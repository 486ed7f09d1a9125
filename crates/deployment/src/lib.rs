use async_trait::async_trait;
use executors::executors::CommandSequenceExecutor;
use services::services::{
    config::{ConfigError, ServerConfig},
    installer::TemplateInstaller,
    shortcuts::{ShortcutError, ShortcutStore},
    template_store::{TemplateStore, TemplateStoreError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    TemplateStore(#[from] TemplateStoreError),
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
}

/// Everything a route handler needs, cheap to clone into every request.
#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new(config: ServerConfig) -> Result<Self, DeploymentError>;

    fn config(&self) -> &ServerConfig;

    fn executor(&self) -> &CommandSequenceExecutor;

    fn templates(&self) -> &TemplateStore;

    fn shortcuts(&self) -> &ShortcutStore;

    fn installer(&self) -> &TemplateInstaller;
}
