use crate::traits::{
    ChatMessage, ChatRequest, ChatResponse, MessagePart, Provider, ReplyPart, Role, ToolCall,
    ToolChoice, ToolSpec,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<GeminiToolConfig>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolConfig {
    function_calling_config: GeminiFunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct GeminiFunctionCallingConfig {
    mode: &'static str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
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

    fn model_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, request: &ChatRequest<'_>) -> GeminiRequest {
        let tool_config = match (request.tools, request.tool_choice) {
            (Some(_), ToolChoice::Required) => Some(GeminiToolConfig {
                function_calling_config: GeminiFunctionCallingConfig { mode: "ANY" },
            }),
            _ => None,
        };

        GeminiRequest {
            contents: request.messages.iter().map(convert_message).collect(),
            system_instruction: request.system.map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(text.to_string()),
                    ..Default::default()
                }],
            }),
            tools: request.tools.map(convert_tools),
            tool_config,
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

fn convert_message(message: &ChatMessage) -> GeminiContent {
    // Function responses travel back on the user side of the conversation.
    let role = match message.role {
        Role::User | Role::Tool => "user",
        Role::Model => "model",
    };

    let parts = message
        .parts
        .iter()
        .map(|part| match part {
            MessagePart::Text { text } => GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            MessagePart::ToolCall(call) => GeminiPart {
                function_call: Some(GeminiFunctionCall {
                    id: None,
                    name: call.name.clone(),
                    args: call.arguments.clone(),
                }),
                ..Default::default()
            },
            MessagePart::ToolResponse(response) => GeminiPart {
                function_response: Some(GeminiFunctionResponse {
                    name: response.name.clone(),
                    response: response.response.clone(),
                }),
                ..Default::default()
            },
        })
        .collect();

    GeminiContent {
        role: Some(role.to_string()),
        parts,
    }
}

fn convert_tools(tools: &[ToolSpec]) -> Vec<GeminiTool> {
    vec![GeminiTool {
        function_declarations: tools
            .iter()
            .map(|t| GeminiFunctionDeclaration {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect(),
    }]
}

fn convert_response(response: GeminiResponse) -> anyhow::Result<ChatResponse> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No candidates in Gemini response"))?
        .content
        .ok_or_else(|| anyhow::anyhow!("Gemini candidate has no content"))?;

    let mut parts = Vec::new();
    for part in content.parts {
        if let Some(call) = part.function_call {
            parts.push(ReplyPart::ToolCall(ToolCall {
                id: call
                    .id
                    .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple())),
                name: call.name,
                arguments: match call.args {
                    Value::Null => Value::Object(Default::default()),
                    args => args,
                },
            }));
        } else if let Some(text) = part.text.filter(|t| !t.is_empty()) {
            parts.push(ReplyPart::Text(text));
        }
    }

    Ok(ChatResponse { parts })
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let payload = self.build_request(&request);

        debug!(
            model = self.model.as_str(),
            contents = payload.contents.len(),
            "Sending request to Gemini"
        );

        let response = self
            .client
            .post(self.model_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Gemini API error {}: {}",
                status,
                error_text
            ));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        convert_response(gemini_response)
    }
}
