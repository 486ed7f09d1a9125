//! Installation templates: a named list of steps, each a list of shell
//! commands, written as YAML.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub steps: Vec<TemplateStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub commands: Vec<TemplateCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCommand {
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

fn default_enabled() -> bool {
    true
}

impl Template {
    pub fn enabled_steps(&self) -> impl Iterator<Item = &TemplateStep> {
        self.steps.iter().filter(|step| step.enabled)
    }

    /// Number of commands that an installation would run.
    pub fn command_count(&self) -> usize {
        self.enabled_steps().map(|step| step.commands.len()).sum()
    }
}

impl TemplateCommand {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.cmd)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateValidation {
    pub valid: bool,
    pub message: String,
    #[serde(rename = "template", skip_serializing_if = "Option::is_none")]
    pub data: Option<Template>,
}

impl TemplateValidation {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            data: None,
        }
    }
}

const REQUIRED_FIELDS: [&str; 3] = ["name", "description", "steps"];

/// Check a YAML template and report the first problem found.
///
/// Structural checks run in document order (top-level fields, then each
/// step, then each step's commands) before the typed decode, so the message
/// points at the earliest missing field rather than at a serde path.
pub fn validate_template(content: &str) -> TemplateValidation {
    let document: Value = match serde_yaml::from_str(content) {
        Ok(value) => value,
        Err(err) => return TemplateValidation::invalid(format!("Parse error: {err}")),
    };

    let Some(root) = document.as_mapping() else {
        return TemplateValidation::invalid("Template must be a YAML mapping");
    };

    for field in REQUIRED_FIELDS {
        if !has_key(root, field) {
            return TemplateValidation::invalid(format!("Missing required field: {field}"));
        }
    }

    let Some(steps) = root.get("steps").and_then(Value::as_sequence) else {
        return TemplateValidation::invalid("Field 'steps' must be a list");
    };

    for (i, step) in steps.iter().enumerate() {
        let step_no = i + 1;
        let Some(step) = step.as_mapping() else {
            return TemplateValidation::invalid(format!("Step {step_no} must be a mapping"));
        };
        if !has_key(step, "name") {
            return TemplateValidation::invalid(format!("Step {step_no} is missing a name field"));
        }
        let Some(commands) = step.get("commands") else {
            return TemplateValidation::invalid(format!(
                "Step {step_no} is missing a commands field"
            ));
        };
        let Some(commands) = commands.as_sequence() else {
            return TemplateValidation::invalid(format!(
                "Step {step_no} commands must be a list"
            ));
        };
        for (j, command) in commands.iter().enumerate() {
            let has_cmd = command
                .as_mapping()
                .is_some_and(|command| has_key(command, "cmd"));
            if !has_cmd {
                return TemplateValidation::invalid(format!(
                    "Step {step_no} command {} is missing a cmd field",
                    j + 1
                ));
            }
        }
    }

    match serde_yaml::from_value::<Template>(document) {
        Ok(template) => TemplateValidation {
            valid: true,
            message: "Template is valid".to_string(),
            data: Some(template),
        },
        Err(err) => TemplateValidation::invalid(format!("Parse error: {err}")),
    }
}

fn has_key(mapping: &Mapping, key: &str) -> bool {
    mapping.contains_key(key)
}

/// Starter template offered to new users.
pub fn default_template() -> &'static str {
    r#"# Example template
name: Example installation plan
description: A multi-step template showing every supported field
steps:
  - name: Create project structure
    description: Set up the base directories
    enabled: true
    commands:
      - cmd: echo "Creating project structure..."
        name: Initial setup
        description: Prepare the environment
        required: true
      - cmd: |
          mkdir -p src/components
          mkdir -p src/utils
          mkdir -p src/assets
        name: Create directories
        description: Create the directories the project needs
        required: true
  - name: Install dependencies
    description: Install the npm packages
    enabled: true
    commands:
      - cmd: npm install react react-dom
        name: Install core dependencies
        description: Install React and React DOM
        required: true
      - cmd: >
          npm install tailwindcss postcss autoprefixer
          --save-dev
        name: Install Tailwind CSS
        description: Set up Tailwind CSS with PostCSS
        required: false
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_is_valid() {
        let validation = validate_template(default_template());
        assert!(validation.valid, "{}", validation.message);

        let template = validation.data.unwrap();
        assert_eq!(template.steps.len(), 2);
        assert_eq!(template.command_count(), 4);
        assert_eq!(
            template.steps[0].commands[1].cmd,
            "mkdir -p src/components\nmkdir -p src/utils\nmkdir -p src/assets\n"
        );
        assert_eq!(
            template.steps[1].commands[1].cmd,
            "npm install tailwindcss postcss autoprefixer --save-dev\n"
        );
    }

    #[test]
    fn test_optional_fields_take_defaults() {
        let validation = validate_template(
            "name: t\ndescription: d\nsteps:\n  - name: s\n    commands:\n      - cmd: ls\n",
        );
        assert!(validation.valid, "{}", validation.message);
        let template = validation.data.unwrap();
        let step = &template.steps[0];
        assert!(step.enabled);
        assert_eq!(step.commands[0].cmd, "ls");
        assert!(!step.commands[0].required);
        assert_eq!(step.commands[0].display_name(), "ls");
    }

    #[test]
    fn test_disabled_steps_are_not_counted() {
        let template = validate_template(
            "name: t\ndescription: d\nsteps:\n  - name: a\n    enabled: false\n    commands:\n      - cmd: echo a\n  - name: b\n    commands:\n      - cmd: echo b\n      - cmd: echo c\n",
        )
        .data
        .unwrap();
        assert_eq!(template.enabled_steps().count(), 1);
        assert_eq!(template.command_count(), 2);
    }

    #[test]
    fn test_reports_first_missing_top_level_field() {
        let validation = validate_template("name: t\nsteps: []\n");
        assert!(!validation.valid);
        assert_eq!(validation.message, "Missing required field: description");
        assert!(validation.data.is_none());
    }

    #[test]
    fn test_reports_step_problems_with_one_based_positions() {
        let missing_name = validate_template(
            "name: t\ndescription: d\nsteps:\n  - name: ok\n    commands: []\n  - commands: []\n",
        );
        assert_eq!(missing_name.message, "Step 2 is missing a name field");

        let missing_commands =
            validate_template("name: t\ndescription: d\nsteps:\n  - name: s\n");
        assert_eq!(
            missing_commands.message,
            "Step 1 is missing a commands field"
        );

        let missing_cmd = validate_template(
            "name: t\ndescription: d\nsteps:\n  - name: s\n    commands:\n      - cmd: ls\n      - name: nothing\n",
        );
        assert_eq!(missing_cmd.message, "Step 1 command 2 is missing a cmd field");
    }

    #[test]
    fn test_parse_errors_are_reported_not_raised() {
        let validation = validate_template("name: [unterminated\n");
        assert!(!validation.valid);
        assert!(validation.message.starts_with("Parse error:"));

        let scalar = validate_template("just a string");
        assert_eq!(scalar.message, "Template must be a YAML mapping");
    }
}
