use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("Invalid shortcut at position {position}: name, icon and command are required")]
    Invalid { position: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A one-click button that runs a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub command: String,
}

impl Shortcut {
    pub fn new(name: &str, icon: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            command: command.to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.icon.is_empty() && !self.command.is_empty()
    }
}

pub fn default_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("System info", "💻", "uname -a"),
        Shortcut::new("Disk space", "💾", "df -h"),
        Shortcut::new("Processes", "🔍", "ps aux | head -10"),
        Shortcut::new("Node version", "📦", "node -v"),
        Shortcut::new("NPM version", "🔧", "npm -v"),
        Shortcut::new("Files", "📂", "ls -la"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedShortcuts {
    pub shortcuts: Vec<Shortcut>,
    /// True when the file did not exist and the defaults were written.
    pub created_defaults: bool,
}

/// Shortcut buttons persisted as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct ShortcutStore {
    path: PathBuf,
}

impl ShortcutStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<LoadedShortcuts, ShortcutError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(LoadedShortcuts {
                shortcuts: serde_json::from_str(&raw)?,
                created_defaults: false,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No shortcuts file found, writing defaults");
                let shortcuts = default_shortcuts();
                self.write(&shortcuts).await?;
                Ok(LoadedShortcuts {
                    shortcuts,
                    created_defaults: true,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save(&self, shortcuts: &[Shortcut]) -> Result<(), ShortcutError> {
        validate(shortcuts)?;
        self.write(shortcuts).await?;
        tracing::info!(count = shortcuts.len(), "Saved shortcuts");
        Ok(())
    }

    async fn write(&self, shortcuts: &[Shortcut]) -> Result<(), ShortcutError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(shortcuts)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// Every shortcut needs a non-empty name, icon and command. Positions in the
/// error are 1-based.
pub fn validate(shortcuts: &[Shortcut]) -> Result<(), ShortcutError> {
    match shortcuts.iter().position(|shortcut| !shortcut.is_complete()) {
        Some(index) => Err(ShortcutError::Invalid {
            position: index + 1,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_yields_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::new(dir.path().join("configs/shortcuts.json"));

        let first = store.load().await.unwrap();
        assert!(first.created_defaults);
        assert_eq!(first.shortcuts, default_shortcuts());
        assert!(store.path().is_file());

        let second = store.load().await.unwrap();
        assert!(!second.created_defaults);
        assert_eq!(second.shortcuts, default_shortcuts());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::new(dir.path().join("shortcuts.json"));
        let shortcuts = vec![Shortcut::new("Uptime", "⏱", "uptime")];

        store.save(&shortcuts).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n  {"), "file should be pretty-printed");
        assert_eq!(store.load().await.unwrap().shortcuts, shortcuts);
    }

    #[tokio::test]
    async fn test_incomplete_shortcut_is_rejected_and_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::new(dir.path().join("shortcuts.json"));
        let shortcuts = vec![
            Shortcut::new("Uptime", "⏱", "uptime"),
            Shortcut::new("Broken", "", "ls"),
        ];

        let err = store.save(&shortcuts).await.unwrap_err();
        assert!(matches!(err, ShortcutError::Invalid { position: 2 }));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ShortcutStore::new(&path).load().await,
            Err(ShortcutError::Json(_))
        ));
    }
}
