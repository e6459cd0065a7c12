use crate::agent::{Context, Environment, Goal, ToolRegistry, build_system_prompt, format_tools};
use crate::traits::{
    CONTEXT_PARAM, ChatMessage, ChatRequest, Provider, ToolArgs, ToolCall, ToolChoice,
    ToolResponse,
};
use anyhow::Result;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 10;
pub const MAX_ITERATIONS_MESSAGE: &str = "Maximum iterations reached without a final response.";

/// Why a single tool invocation produced an error payload instead of a result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for {tool}: expected a JSON object")]
    InvalidArguments { tool: String },
    #[error("Missing required argument '{param}' for {tool}")]
    MissingArgument { tool: String, param: String },
    #[error("Unexpected argument '{param}' for {tool}")]
    UnexpectedArgument { tool: String, param: String },
    #[error("{0:#}")]
    Execution(anyhow::Error),
}

/// Shapes a tool's return value into a function-response payload.
///
/// Objects pass through untouched. Anything else lands under `"result"`:
/// strings verbatim, every other value as compact JSON.
pub fn wrap_result(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        Value::String(s) => json!({ "result": s }),
        other => json!({ "result": other.to_string() }),
    }
}

pub struct Agent {
    goals: Vec<Goal>,
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    environment: Environment,
    messages: Vec<ChatMessage>,
    max_iterations: usize,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn Provider>,
        tool_registry: Arc<ToolRegistry>,
        goals: Vec<Goal>,
    ) -> Self {
        Self {
            goals,
            provider,
            tool_registry,
            environment: Environment::new(),
            messages: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn context(&self) -> &Context {
        self.environment.context()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_context(self) -> Context {
        self.environment.into_context()
    }

    pub fn system_prompt(&self) -> String {
        build_system_prompt(&self.goals)
    }

    /// Runs the model/tool cycle for one user input.
    ///
    /// Tool problems are reported back to the model; only a failing model call
    /// surfaces as `Err`. Hitting the iteration cap is a normal outcome and
    /// yields [`MAX_ITERATIONS_MESSAGE`].
    pub async fn process(&mut self, user_input: &str) -> Result<String> {
        let tool_specs = format_tools(&self.tool_registry.list());
        let system_prompt = self.system_prompt();

        self.messages.push(ChatMessage::user(user_input));

        for iteration in 1..=self.max_iterations {
            let request = ChatRequest {
                messages: &self.messages,
                tools: (!tool_specs.is_empty()).then_some(tool_specs.as_slice()),
                system: (!system_prompt.is_empty()).then_some(system_prompt.as_str()),
                tool_choice: ToolChoice::Auto,
            };

            let response = self.provider.chat(request).await?;
            self.messages.push(ChatMessage::model(response.parts.clone()));

            let tool_calls = response.tool_calls();
            if tool_calls.is_empty() {
                info!(iterations = iteration, "Agent produced final response");
                return Ok(response.joined_text());
            }

            debug!(iteration, calls = tool_calls.len(), "Dispatching tool calls");
            let mut results = Vec::with_capacity(tool_calls.len());
            for call in &tool_calls {
                results.push(self.dispatch(call).await);
            }
            self.messages.push(ChatMessage::tool_results(results));
        }

        warn!(max_iterations = self.max_iterations, "Agent hit iteration cap");
        Ok(MAX_ITERATIONS_MESSAGE.to_string())
    }

    async fn dispatch(&mut self, call: &ToolCall) -> ToolResponse {
        let response = match self.invoke(call).await {
            Ok(value) => wrap_result(value),
            Err(e) => {
                warn!(tool = call.name.as_str(), error = %e, "Tool call failed");
                json!({ "error": e.to_string() })
            }
        };

        ToolResponse {
            id: call.id.clone(),
            name: call.name.clone(),
            response,
        }
    }

    async fn invoke(&mut self, call: &ToolCall) -> Result<Value, DispatchError> {
        let tool = self
            .tool_registry
            .get(&call.name)
            .ok_or_else(|| DispatchError::UnknownTool(call.name.clone()))?;

        let mut args: ToolArgs = match &call.arguments {
            Value::Object(map) => map.clone(),
            Value::Null => ToolArgs::new(),
            _ => {
                return Err(DispatchError::InvalidArguments {
                    tool: call.name.clone(),
                });
            }
        };
        args.remove(CONTEXT_PARAM);

        let params = tool.params();
        if let Some(param) = params
            .iter()
            .find(|p| p.required && !p.is_context() && !args.contains_key(&p.name))
        {
            return Err(DispatchError::MissingArgument {
                tool: call.name.clone(),
                param: param.name.clone(),
            });
        }
        if let Some(extra) = args.keys().find(|k| !params.iter().any(|p| &p.name == *k)) {
            return Err(DispatchError::UnexpectedArgument {
                tool: call.name.clone(),
                param: extra.clone(),
            });
        }

        debug!(tool = call.name.as_str(), "Executing tool");
        let context = if tool.wants_context() {
            Some(self.environment.context_mut())
        } else {
            None
        };

        tool.execute(args, context)
            .await
            .map_err(DispatchError::Execution)
    }
}
