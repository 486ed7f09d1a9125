use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use utils::text::sanitize_name;

#[derive(Debug, Error)]
pub enum TemplateStoreError {
    #[error("Name and content are required")]
    MissingField,
    #[error("Template not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTemplate {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Templates kept as `<sanitized name>.yaml` files in one directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.yaml", sanitize_name(name)))
    }

    pub async fn ensure_dir(&self) -> Result<(), TemplateStoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `content` under `name`, replacing any template with the same
    /// sanitized name.
    pub async fn save(&self, name: &str, content: &str) -> Result<PathBuf, TemplateStoreError> {
        if name.is_empty() || content.is_empty() {
            return Err(TemplateStoreError::MissingField);
        }

        self.ensure_dir().await?;
        let path = self.path_for(name);
        fs::write(&path, content).await?;
        tracing::info!(name, path = %path.display(), "Saved template");
        Ok(path)
    }

    /// Every `.yaml`/`.yml` file in the directory, sorted by name.
    pub async fn list(&self) -> Result<Vec<StoredTemplate>, TemplateStoreError> {
        self.ensure_dir().await?;

        let mut templates = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = template_stem(&path) else {
                continue;
            };
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            templates.push(StoredTemplate {
                name,
                path,
                content,
            });
        }

        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    pub async fn delete(&self, name: &str) -> Result<(), TemplateStoreError> {
        let stem = sanitize_name(name);
        if stem.is_empty() {
            return Err(TemplateStoreError::NotFound);
        }

        for extension in ["yaml", "yml"] {
            let path = self.dir.join(format!("{stem}.{extension}"));
            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(name, path = %path.display(), "Deleted template");
                    return Ok(());
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(TemplateStoreError::NotFound)
    }
}

fn template_stem(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if extension != "yaml" && extension != "yml" {
        return None;
    }
    path.file_stem()?.to_str().map(String::from)
}
