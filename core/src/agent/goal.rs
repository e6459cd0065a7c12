use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub description: String,
}

impl Goal {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Renders goals as markdown sections separated by a blank line, in order.
pub fn build_system_prompt(goals: &[Goal]) -> String {
    goals
        .iter()
        .map(|goal| format!("## {}\n{}", goal.name, goal.description))
        .collect::<Vec<_>>()
        .join("\n\n")
}
