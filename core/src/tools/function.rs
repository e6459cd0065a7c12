use crate::agent::Context;
use crate::traits::{ParamSpec, Tool, ToolArgs};
use async_trait::async_trait;
use serde_json::Value;

type Handler =
    dyn Fn(ToolArgs, Option<&mut Context>) -> anyhow::Result<Value> + Send + Sync + 'static;

/// Tool backed by a plain closure plus explicitly declared parameters.
pub struct FnTool {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    tags: Vec<String>,
    handler: Box<Handler>,
}

impl FnTool {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        params: Vec<ParamSpec>,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArgs, Option<&mut Context>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            params,
            tags: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn params(&self) -> Vec<ParamSpec> {
        self.params.clone()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    async fn execute(
        &self,
        args: ToolArgs,
        context: Option<&mut Context>,
    ) -> anyhow::Result<Value> {
        (self.handler)(args, context)
    }
}
