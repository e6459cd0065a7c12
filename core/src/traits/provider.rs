use crate::traits::ToolSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Normally a JSON object. Backends that deliver arguments as text keep
    /// the raw string here when it does not parse.
    pub arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: String,
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ToolCall(ToolCall),
    ToolResponse(ToolResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![MessagePart::Text {
                text: content.into(),
            }],
        }
    }

    pub fn model(parts: Vec<ReplyPart>) -> Self {
        Self {
            role: Role::Model,
            parts: parts.into_iter().map(MessagePart::from).collect(),
        }
    }

    pub fn tool_results(responses: Vec<ToolResponse>) -> Self {
        Self {
            role: Role::Tool,
            parts: responses.into_iter().map(MessagePart::ToolResponse).collect(),
        }
    }

    pub fn text(&self) -> String {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                MessagePart::Text { text } if !text.is_empty() => Some(text.as_str()),
                _ => None,
            })
            .collect();
        texts.join("\n")
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.parts.iter().filter_map(|p| match p {
            MessagePart::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn tool_responses(&self) -> impl Iterator<Item = &ToolResponse> {
        self.parts.iter().filter_map(|p| match p {
            MessagePart::ToolResponse(response) => Some(response),
            _ => None,
        })
    }
}

/// Backend-neutral piece of a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPart {
    Text(String),
    ToolCall(ToolCall),
}

impl From<ReplyPart> for MessagePart {
    fn from(part: ReplyPart) -> Self {
        match part {
            ReplyPart::Text(text) => MessagePart::Text { text },
            ReplyPart::ToolCall(call) => MessagePart::ToolCall(call),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub parts: Vec<ReplyPart>,
}

impl ChatResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ReplyPart::Text(text.into())],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, ReplyPart::ToolCall(_)))
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ReplyPart::ToolCall(call) => Some(call.clone()),
                ReplyPart::Text(_) => None,
            })
            .collect()
    }

    /// Text segments joined by newline; empty when the reply carries none.
    pub fn joined_text(&self) -> String {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                ReplyPart::Text(text) if !text.is_empty() => Some(text.as_str()),
                _ => None,
            })
            .collect();
        texts.join("\n")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolChoice {
    #[default]
    Auto,
    /// The model must answer with at least one tool call.
    Required,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub tools: Option<&'a [ToolSpec]>,
    pub system: Option<&'a str>,
    pub tool_choice: ToolChoice,
}

impl<'a> ChatRequest<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            tools: None,
            system: None,
            tool_choice: ToolChoice::Auto,
        }
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse>;
}
