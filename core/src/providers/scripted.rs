use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, Provider, ReplyPart, ToolCall, ToolChoice, ToolSpec,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

static CALL_IDS: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn tool_call(name: &str, arguments: Value) -> ReplyPart {
    let n = CALL_IDS.fetch_add(1, Ordering::Relaxed);
    ReplyPart::ToolCall(ToolCall {
        id: format!("call_{n}"),
        name: name.to_string(),
        arguments,
    })
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub tools: Option<Vec<ToolSpec>>,
    pub system: Option<String>,
    pub tool_choice: ToolChoice,
}

/// Replays canned replies in order and records every request it receives.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<ChatResponse, String>>>,
    repeat: Option<ChatResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<ChatResponse, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same reply.
    pub fn repeating(reply: ChatResponse) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: Some(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages: request.messages.to_vec(),
            tools: request.tools.map(<[ToolSpec]>::to_vec),
            system: request.system.map(str::to_string),
            tool_choice: request.tool_choice,
        });

        let next = self.replies.lock().unwrap().pop_front();
        match (next, &self.repeat) {
            (Some(Ok(reply)), _) => Ok(reply),
            (Some(Err(message)), _) => Err(anyhow::anyhow!(message)),
            (None, Some(reply)) => Ok(reply.clone()),
            (None, None) => Err(anyhow::anyhow!("scripted provider exhausted")),
        }
    }
}
