use executors::executors::CommandSequenceExecutor;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsSummary {
    pub os_type: String,
    pub os_version: String,
    pub architecture: String,
    pub bitness: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub node_version: String,
    pub npm_version: String,
    pub disk_space: String,
    pub os: OsSummary,
}

pub fn os_summary() -> OsSummary {
    let info = os_info::get();
    OsSummary {
        os_type: info.os_type().to_string(),
        os_version: info.version().to_string(),
        architecture: info.architecture().unwrap_or("unknown").to_string(),
        bitness: info.bitness().to_string(),
    }
}

/// Probe the toolchain the templates usually depend on. A probe that fails
/// leaves its field empty.
pub async fn system_info(executor: &CommandSequenceExecutor) -> SystemInfo {
    SystemInfo {
        node_version: probe(executor, "node -v").await,
        npm_version: probe(executor, "npm -v").await,
        disk_space: probe(executor, "df -h").await,
        os: os_summary(),
    }
}

async fn probe(executor: &CommandSequenceExecutor, command: &str) -> String {
    let outcome = executor.run_unit(command).await;
    if !outcome.succeeded {
        tracing::debug!(command, stderr = %outcome.stderr, "System probe failed");
        return String::new();
    }
    outcome.stdout.trim().to_string()
}
