pub mod provider;
pub mod tool;

pub use provider::{
    ChatMessage, ChatRequest, ChatResponse, MessagePart, Provider, ReplyPart, Role, ToolCall,
    ToolChoice, ToolResponse,
};
pub use tool::{CONTEXT_PARAM, ParamKind, ParamSpec, Tool, ToolArgs, ToolSpec};
