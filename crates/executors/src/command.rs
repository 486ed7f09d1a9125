//! Request and result values for command sequence execution.
//!
//! Both are built fresh for every request and never mutated afterwards.

use std::io;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::executors::ExecutorError;

/// A block of text split into command units, one per non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    units: Vec<String>,
}

impl CommandRequest {
    /// Split `text` on newlines, trim every line and drop the empty ones.
    ///
    /// Input without a single command unit is rejected with
    /// [`ExecutorError::InvalidInput`], so a parsed request is never empty.
    pub fn parse(text: &str) -> Result<Self, ExecutorError> {
        let units: Vec<String> = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if units.is_empty() {
            return Err(ExecutorError::InvalidInput);
        }

        Ok(Self { units })
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.units.len() == 1
    }
}

/// Why a command unit did not succeed. Only used for logging: callers see a
/// plain `success: false` whatever the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFailure {
    SpawnFailure,
    NonZeroExit(i32),
    Timeout,
    /// Terminated without an exit code, e.g. by a signal.
    NoExitCode,
}

/// Result of running one command unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub succeeded: bool,
    pub timed_out: bool,
    pub spawn_failed: bool,
}

impl CommandOutcome {
    pub fn exited(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stdout,
            stderr,
            succeeded: exit_code == Some(0),
            timed_out: false,
            spawn_failed: false,
        }
    }

    pub fn timed_out(command: impl Into<String>, stdout: String, stderr: String) -> Self {
        Self {
            command: command.into(),
            exit_code: None,
            stdout,
            stderr,
            succeeded: false,
            timed_out: true,
            spawn_failed: false,
        }
    }

    pub fn spawn_failed(command: impl Into<String>, error: &io::Error) -> Self {
        Self {
            command: command.into(),
            exit_code: None,
            stdout: String::new(),
            stderr: error.to_string(),
            succeeded: false,
            timed_out: false,
            spawn_failed: true,
        }
    }

    pub fn failure(&self) -> Option<CommandFailure> {
        if self.succeeded {
            return None;
        }
        Some(if self.spawn_failed {
            CommandFailure::SpawnFailure
        } else if self.timed_out {
            CommandFailure::Timeout
        } else {
            match self.exit_code {
                Some(code) => CommandFailure::NonZeroExit(code),
                None => CommandFailure::NoExitCode,
            }
        })
    }
}

/// Combined report over every command unit of a request.
///
/// Serialises to `{"success", "exitCode", "stdout", "stderr"}` when exactly
/// one unit ran and to `{"success", "stdout", "stderr"}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    pub outcomes: Vec<CommandOutcome>,
}

impl AggregateResult {
    pub fn from_outcomes(outcomes: Vec<CommandOutcome>) -> Self {
        let succeeded = outcomes.iter().all(|outcome| outcome.succeeded);

        let (stdout, stderr) = match outcomes.as_slice() {
            [only] => (only.stdout.clone(), only.stderr.clone()),
            many => {
                let mut stdout = String::new();
                let mut stderr = String::new();
                for outcome in many {
                    append_labelled(&mut stdout, &outcome.command, &outcome.stdout);
                    append_labelled(&mut stderr, &outcome.command, &outcome.stderr);
                }
                (stdout, stderr)
            }
        };

        Self {
            succeeded,
            stdout,
            stderr,
            outcomes,
        }
    }

    /// The unit's exit code, present only for single-command requests.
    /// The inner `None` means the unit ended without one.
    pub fn exit_code(&self) -> Option<Option<i32>> {
        match self.outcomes.as_slice() {
            [only] => Some(only.exit_code),
            _ => None,
        }
    }
}

fn append_labelled(buffer: &mut String, command: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    buffer.push('[');
    buffer.push_str(command);
    buffer.push_str("]: ");
    buffer.push_str(text);
    buffer.push('\n');
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let exit_code = self.exit_code();
        let len = if exit_code.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("AggregateResult", len)?;
        state.serialize_field("success", &self.succeeded)?;
        if let Some(code) = exit_code {
            state.serialize_field("exitCode", &code)?;
        }
        state.serialize_field("stdout", &self.stdout)?;
        state.serialize_field("stderr", &self.stderr)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ok(command: &str, stdout: &str) -> CommandOutcome {
        CommandOutcome::exited(command, Some(0), stdout.to_string(), String::new())
    }

    #[test]
    fn test_parse_drops_blank_lines() {
        let request = CommandRequest::parse("echo a\n\n   \n\techo b  \r\n").unwrap();
        assert_eq!(request.units(), ["echo a", "echo b"]);
        assert!(!request.is_single());
    }

    #[test]
    fn test_parse_single_line() {
        let request = CommandRequest::parse("  ls -la | head -3 \n").unwrap();
        assert!(request.is_single());
        assert_eq!(request.units(), ["ls -la | head -3"]);
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(
            CommandRequest::parse(""),
            Err(ExecutorError::InvalidInput)
        ));
        assert!(matches!(
            CommandRequest::parse(" \n\t\n "),
            Err(ExecutorError::InvalidInput)
        ));
    }

    #[test]
    fn test_single_outcome_keeps_raw_output_and_exit_code() {
        let result = AggregateResult::from_outcomes(vec![CommandOutcome::exited(
            "exit 7",
            Some(7),
            String::new(),
            "boom\n".to_string(),
        )]);

        assert!(!result.succeeded);
        assert_eq!(result.exit_code(), Some(Some(7)));
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"success":false,"exitCode":7,"stdout":"","stderr":"boom\n"}"#
        );
    }

    #[test]
    fn test_single_timed_out_outcome_serialises_null_exit_code() {
        let result = AggregateResult::from_outcomes(vec![CommandOutcome::timed_out(
            "sleep 100",
            String::new(),
            String::new(),
        )]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "exitCode": null, "stdout": "", "stderr": "" })
        );
    }

    #[test]
    fn test_multiple_outcomes_are_labelled_and_omit_exit_code() {
        let result = AggregateResult::from_outcomes(vec![
            ok("echo a", "a\n"),
            CommandOutcome::exited("exit 1", Some(1), String::new(), String::new()),
            ok("echo c", "c\n"),
        ]);

        assert!(!result.succeeded);
        assert_eq!(result.exit_code(), None);
        assert_eq!(result.stdout, "[echo a]: a\n\n[echo c]: c\n\n");
        assert_eq!(result.stderr, "");
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"success":false,"stdout":"[echo a]: a\n\n[echo c]: c\n\n","stderr":""}"#
        );
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(ok("true", "").failure(), None);
        assert_eq!(
            CommandOutcome::exited("false", Some(1), String::new(), String::new()).failure(),
            Some(CommandFailure::NonZeroExit(1))
        );
        assert_eq!(
            CommandOutcome::timed_out("sleep 5", String::new(), String::new()).failure(),
            Some(CommandFailure::Timeout)
        );
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        let spawn = CommandOutcome::spawn_failed("anything", &err);
        assert_eq!(spawn.stderr, "No such file or directory");
        assert_eq!(spawn.failure(), Some(CommandFailure::SpawnFailure));
    }
}
