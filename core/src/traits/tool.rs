use crate::agent::{Context, format_tool};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the reserved parameter through which the loop hands a tool the
/// shared [`Context`]. The model never sees or supplies it.
pub const CONTEXT_PARAM: &str = "context";

pub type ToolArgs = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Text,
    Integer,
    Number,
    Boolean,
    Object,
    List,
    /// Undeclared type; rendered as a string parameter.
    Any,
}

impl ParamKind {
    pub fn json_type(self) -> &'static str {
        match self {
            Self::Text | Self::Any => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::List => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// A parameter that carries a default value on the tool side.
    pub fn optional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    pub fn context() -> Self {
        Self::required(CONTEXT_PARAM, ParamKind::Object)
    }

    pub fn is_context(&self) -> bool {
        self.name == CONTEXT_PARAM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Declared parameters in call order, including [`CONTEXT_PARAM`] when the
    /// tool wants the shared context.
    fn params(&self) -> Vec<ParamSpec>;

    fn tags(&self) -> &[String] {
        &[]
    }

    /// `context` is `Some` exactly when [`Tool::wants_context`] is true.
    async fn execute(&self, args: ToolArgs, context: Option<&mut Context>)
    -> anyhow::Result<Value>;

    fn wants_context(&self) -> bool {
        self.params().iter().any(ParamSpec::is_context)
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    fn spec(&self) -> ToolSpec {
        format_tool(self)
    }
}
