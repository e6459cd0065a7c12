use crate::traits::{ChatMessage, ChatRequest, Provider, ToolChoice, ToolSpec};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const EXTRACT_TOOL_NAME: &str = "extract_data";
const EXTRACT_TOOL_DESCRIPTION: &str = "Extract structured data from the provided content";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("LLM did not return structured data")]
    NoStructuredData,
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

/// Turns free text into a JSON object matching a caller-supplied schema by
/// forcing the model to answer through a single function declaration.
#[derive(Clone)]
pub struct JsonExtractor {
    provider: Arc<dyn Provider>,
}

impl JsonExtractor {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn extract(&self, schema: &Value, prompt: &str) -> Result<Map<String, Value>, ExtractError> {
        let tools = [ToolSpec {
            name: EXTRACT_TOOL_NAME.to_string(),
            description: EXTRACT_TOOL_DESCRIPTION.to_string(),
            parameters: schema.clone(),
        }];
        let messages = [ChatMessage::user(prompt)];
        let request = ChatRequest {
            messages: &messages,
            tools: Some(&tools),
            system: None,
            tool_choice: ToolChoice::Required,
        };

        let response = self.provider.chat(request).await?;
        debug!(provider = self.provider.name(), "Received extraction reply");

        response
            .tool_calls()
            .into_iter()
            .find_map(|call| match call.arguments {
                Value::Object(args) => Some(args),
                _ => None,
            })
            .ok_or(ExtractError::NoStructuredData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::scripted::{ScriptedProvider, tool_call};
    use crate::traits::ChatResponse;
    use serde_json::json;

    #[tokio::test]
    async fn returns_first_call_arguments() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(ChatResponse {
            parts: vec![tool_call("extract_data", json!({"invoice_number": "INV-9"}))],
        })]));
        let extractor = JsonExtractor::new(provider.clone());
        let schema = json!({"type": "object", "properties": {"invoice_number": {"type": "string"}}});

        let data = extractor.extract(&schema, "Invoice INV-9").await.unwrap();
        assert_eq!(data["invoice_number"], "INV-9");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tool_choice, ToolChoice::Required);
        let tools = requests[0].tools.as_ref().unwrap();
        assert_eq!(tools[0].name, "extract_data");
        assert_eq!(tools[0].parameters, schema);
        assert_eq!(requests[0].messages[0].text(), "Invoice INV-9");
    }

    #[tokio::test]
    async fn text_reply_is_distinguishable_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(ChatResponse::text("no"))]));
        let err = JsonExtractor::new(provider)
            .extract(&json!({}), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoStructuredData));
    }

    #[tokio::test]
    async fn provider_failure_is_wrapped() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err("LLM unavailable".into())]));
        let err = JsonExtractor::new(provider)
            .extract(&json!({}), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Provider(_)));
        assert!(err.to_string().contains("LLM unavailable"));
    }
}
