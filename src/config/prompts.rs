//! Prompt templates for Autolab.
//!
//! The instruction prompt can be customized with a TOML file holding `system`
//! and `user` keys. `{{transcript}}` in the user template is replaced with the
//! transcript text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Prompts for instruction set generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionPrompts {
    pub system: String,
    pub user: String,
}

impl Default for InstructionPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a teaching assistant who turns recorded lectures into hands-on lab material.

Guidelines:
- Base every exercise on what the lecturer actually demonstrated or explained
- Write instructions as short, imperative steps a student can follow alone
- Keep the original order of topics from the lecture
- Do not invent tools, commands or values that are not in the transcript
- Respond with JSON only, no commentary and no code fences"#
                .to_string(),

            user: r#"Below is a lecture transcript. Each line is a spoken sentence followed by its [start-end] time in seconds.

Transcript:
{{transcript}}

Create a lab instruction set from this lecture. Respond with a single JSON object of this shape:
{
  "title": "Short title of the lab",
  "summary": "One or two sentences describing what the student will practise",
  "exercises": [
    {
      "title": "Exercise title",
      "objective": "What the student should be able to do afterwards",
      "steps": ["First step", "Second step"],
      "timestamp": "start-end of the lecture section this exercise is based on"
    }
  ]
}"#
            .to_string(),
        }
    }
}

impl InstructionPrompts {
    /// Load prompts from a TOML file, falling back to defaults for missing keys.
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// Render the user prompt for a transcript.
    pub fn render_user(&self, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        render(&self.user, &vars)
    }
}

/// Render a prompt template with the given variables.
pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_prompts() {
        let prompts = InstructionPrompts::default();
        assert!(!prompts.system.is_empty());
        assert!(prompts.user.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_user_embeds_transcript() {
        let prompts = InstructionPrompts::default();
        let rendered = prompts.render_user("hello class [0.00-1.50]");
        assert!(rendered.contains("hello class [0.00-1.50]"));
        assert!(!rendered.contains("{{transcript}}"));
    }

    #[test]
    fn test_load_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user = \"Summarize: {{{{transcript}}}}\"").unwrap();

        let prompts = InstructionPrompts::load(Some(file.path())).unwrap();
        assert_eq!(prompts.user, "Summarize: {{transcript}}");
        assert_eq!(prompts.system, InstructionPrompts::default().system);
    }
}
