//! Runs a validated template: enabled steps in order, one command at a time.

use executors::{command::AggregateResult, executors::CommandSequenceExecutor};
use serde::Serialize;

use crate::services::template::Template;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport {
    pub step: String,
    pub name: String,
    pub cmd: String,
    pub required: bool,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AggregateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReport {
    pub template: String,
    pub success: bool,
    /// Commands that either succeeded or failed while optional.
    pub completed: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_command: Option<String>,
    pub commands: Vec<CommandReport>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateInstaller {
    executor: CommandSequenceExecutor,
}

impl TemplateInstaller {
    pub fn new(executor: CommandSequenceExecutor) -> Self {
        Self { executor }
    }

    /// Each command's `cmd` goes through the executor on its own. A failed
    /// required command ends the installation; a failed optional one is
    /// recorded and skipped.
    pub async fn install(&self, template: &Template) -> InstallReport {
        let mut report = InstallReport {
            template: template.name.clone(),
            success: true,
            completed: 0,
            total: template.command_count(),
            failed_step: None,
            failed_command: None,
            commands: Vec::with_capacity(template.command_count()),
        };

        tracing::info!(
            template = %template.name,
            total = report.total,
            "Starting installation"
        );

        for step in template.enabled_steps() {
            tracing::info!(step = %step.name, "Running installation step");

            for command in &step.commands {
                let (success, result, error) = match self.executor.execute(&command.cmd).await {
                    Ok(result) => (result.succeeded, Some(result), None),
                    Err(err) => (false, None, Some(err.to_string())),
                };

                report.commands.push(CommandReport {
                    step: step.name.clone(),
                    name: command.display_name().to_string(),
                    cmd: command.cmd.clone(),
                    required: command.required,
                    success,
                    result,
                    error,
                });

                if success {
                    report.completed += 1;
                    continue;
                }

                if command.required {
                    tracing::warn!(
                        step = %step.name,
                        command = command.display_name(),
                        "Required command failed, aborting installation"
                    );
                    report.success = false;
                    report.failed_step = Some(step.name.clone());
                    report.failed_command = Some(command.display_name().to_string());
                    return report;
                }

                tracing::warn!(
                    step = %step.name,
                    command = command.display_name(),
                    "Optional command failed, continuing"
                );
                report.completed += 1;
            }
        }

        tracing::info!(template = %template.name, "Installation finished");
        report
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::services::template::validate_template;

    fn template(yaml: &str) -> Template {
        let validation = validate_template(yaml);
        assert!(validation.valid, "{}", validation.message);
        validation.data.unwrap()
    }

    #[tokio::test]
    async fn test_runs_enabled_steps_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("install.log");
        let yaml = format!(
            r#"
name: ordered
description: d
steps:
  - name: first
    commands:
      - cmd: echo 1 >> {log}
  - name: skipped
    enabled: false
    commands:
      - cmd: echo never >> {log}
  - name: second
    commands:
      - cmd: |
          echo 2 >> {log}
          echo 3 >> {log}
"#,
            log = log.display()
        );

        let report = TemplateInstaller::default().install(&template(&yaml)).await;

        assert!(report.success);
        assert_eq!(report.total, 2);
        assert_eq!(report.completed, 2);
        assert_eq!(report.commands.len(), 2);
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "1\n2\n3\n");
    }

    #[tokio::test]
    async fn test_required_failure_stops_installation() {
        let report = TemplateInstaller::default()
            .install(&template(
                r#"
name: stops
description: d
steps:
  - name: setup
    commands:
      - cmd: exit 3
        name: broken
        required: true
      - cmd: echo unreachable
"#,
            ))
            .await;

        assert!(!report.success);
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 2);
        assert_eq!(report.commands.len(), 1);
        assert_eq!(report.failed_step.as_deref(), Some("setup"));
        assert_eq!(report.failed_command.as_deref(), Some("broken"));
        let result = report.commands[0].result.as_ref().unwrap();
        assert_eq!(result.exit_code(), Some(Some(3)));
    }

    #[tokio::test]
    async fn test_optional_failure_is_skipped() {
        let report = TemplateInstaller::default()
            .install(&template(
                r#"
name: continues
description: d
steps:
  - name: setup
    commands:
      - cmd: exit 1
      - cmd: ""
      - cmd: echo done
"#,
            ))
            .await;

        assert!(report.success);
        assert_eq!(report.completed, 3);
        assert!(!report.commands[0].success);
        assert_eq!(
            report.commands[1].error.as_deref(),
            Some("No command provided")
        );
        assert!(report.commands[2].success);
        assert_eq!(
            report.commands[2].result.as_ref().unwrap().stdout,
            "done\n"
        );
    }
}
