use crate::traits::{Tool, ToolSpec};
use crate::agent::format_tools;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub struct ToolRegistry {
    tools: Mutex<Vec<Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Tool>>> {
        self.tools.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a tool, replacing any tool already registered under the same name.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.lock();
        match tools.iter().position(|t| t.name() == tool.name()) {
            Some(idx) => {
                debug!(tool = tool.name(), "Replacing registered tool");
                tools[idx] = tool;
            }
            None => {
                debug!(tool = tool.name(), "Registering tool");
                tools.push(tool);
            }
        }
    }

    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        self.lock().clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.lock().iter().find(|t| t.name() == name).cloned()
    }

    pub fn list_by_tag(&self, tag: &str) -> Vec<Arc<dyn Tool>> {
        self.lock()
            .iter()
            .filter(|t| t.has_tag(tag))
            .cloned()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().iter().any(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        format_tools(&self.list())
    }
}
