use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, MessagePart, Provider, ReplyPart, Role, ToolCall,
    ToolChoice, ToolSpec,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCallRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn new(role: &'static str, content: Option<String>) -> Self {
        Self {
            role,
            content,
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIToolCallRequest {
    id: String,
    r#type: &'static str,
    function: OpenAIFunctionRequest,
}

#[derive(Debug, Serialize)]
struct OpenAIFunctionRequest {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct OpenAITool {
    r#type: &'static str,
    function: OpenAIToolFunction,
}

#[derive(Debug, Serialize)]
struct OpenAIToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 1.0,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn convert_messages(&self, system: Option<&str>, messages: &[ChatMessage]) -> Vec<OpenAIMessage> {
        let mut converted = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system {
            converted.push(OpenAIMessage::new("system", Some(system.to_string())));
        }

        for m in messages {
            match m.role {
                Role::User => converted.push(OpenAIMessage::new("user", Some(m.text()))),
                Role::Model => {
                    let calls: Vec<OpenAIToolCallRequest> = m
                        .tool_calls()
                        .map(|tc| OpenAIToolCallRequest {
                            id: tc.id.clone(),
                            r#type: "function",
                            function: OpenAIFunctionRequest {
                                name: tc.name.clone(),
                                arguments: encode_arguments(&tc.arguments),
                            },
                        })
                        .collect();
                    let text = m.text();
                    let mut message = OpenAIMessage::new(
                        "assistant",
                        (!text.is_empty() || calls.is_empty()).then_some(text),
                    );
                    message.tool_calls = (!calls.is_empty()).then_some(calls);
                    converted.push(message);
                }
                Role::Tool => {
                    for part in &m.parts {
                        if let MessagePart::ToolResponse(r) = part {
                            let mut message =
                                OpenAIMessage::new("tool", Some(r.response.to_string()));
                            message.tool_call_id = Some(r.id.clone());
                            converted.push(message);
                        }
                    }
                }
            }
        }

        converted
    }

    fn convert_tools(&self, tools: &[ToolSpec]) -> Vec<OpenAITool> {
        tools
            .iter()
            .map(|t| OpenAITool {
                r#type: "function",
                function: OpenAIToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    fn convert_response(&self, response: OpenAIResponse) -> anyhow::Result<ChatResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        let mut parts = Vec::new();
        if let Some(text) = choice.message.content.filter(|c| !c.trim().is_empty()) {
            parts.push(ReplyPart::Text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            parts.push(ReplyPart::ToolCall(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: decode_arguments(call.function.arguments),
            }));
        }

        Ok(ChatResponse { parts })
    }
}

/// OpenAI carries arguments as a JSON string. Unparseable text is kept as a
/// string so the loop can report it back to the model.
fn decode_arguments(raw: String) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

fn encode_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let tool_choice = match (request.tools, request.tool_choice) {
            (Some(_), ToolChoice::Required) => Some("required"),
            _ => None,
        };
        let openai_request = OpenAIRequest {
            model: self.model.clone(),
            messages: self.convert_messages(request.system, request.messages),
            tools: request.tools.map(|t| self.convert_tools(t)),
            tool_choice,
            temperature: self.temperature,
        };

        debug!(
            model = self.model.as_str(),
            messages = openai_request.messages.len(),
            "Sending request to OpenAI"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "OpenAI API error {}: {}",
                status,
                error_text
            ));
        }

        let openai_response: OpenAIResponse = response.json().await?;
        self.convert_response(openai_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ToolResponse;
    use serde_json::json;

    #[test]
    fn converts_history_with_tool_round_trip() {
        let provider = OpenAIProvider::new("key");
        let call = ToolCall {
            id: "call_1".into(),
            name: "add".into(),
            arguments: json!({"a": 2, "b": 3}),
        };
        let history = vec![
            ChatMessage::user("add 2 and 3"),
            ChatMessage::model(vec![ReplyPart::ToolCall(call)]),
            ChatMessage::tool_results(vec![ToolResponse {
                id: "call_1".into(),
                name: "add".into(),
                response: json!({"result": "5"}),
            }]),
        ];

        let converted = provider.convert_messages(Some("be brief"), &history);
        let wire = serde_json::to_value(&converted).unwrap();

        assert_eq!(wire[0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(wire[1], json!({"role": "user", "content": "add 2 and 3"}));
        assert_eq!(wire[2]["role"], "assistant");
        assert!(wire[2].get("content").is_none());
        assert_eq!(wire[2]["tool_calls"][0]["function"]["arguments"], "{\"a\":2,\"b\":3}");
        assert_eq!(wire[3]["role"], "tool");
        assert_eq!(wire[3]["tool_call_id"], "call_1");
        assert_eq!(wire[3]["content"], "{\"result\":\"5\"}");
    }

    #[test]
    fn parses_reply_into_parts() {
        let provider = OpenAIProvider::new("key");
        let raw: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "working on it",
                    "tool_calls": [
                        {"id": "c1", "type": "function", "function": {"name": "add", "arguments": "{\"a\":1}"}},
                        {"id": "c2", "type": "function", "function": {"name": "add", "arguments": "not json"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let reply = provider.convert_response(raw).unwrap();
        assert_eq!(reply.joined_text(), "working on it");
        let calls = reply.tool_calls();
        assert_eq!(calls[0].arguments, json!({"a": 1}));
        assert_eq!(calls[1].arguments, json!("not json"));
    }

    #[test]
    fn empty_choices_is_an_error() {
        let provider = OpenAIProvider::new("key");
        let raw: OpenAIResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(provider.convert_response(raw).is_err());
    }
}
