use crate::agent::{Agent, Context, Environment, Goal, ToolRegistry};
use crate::extract::JsonExtractor;
use crate::tools::register_invoice_tools;
use crate::traits::Provider;
use std::sync::Arc;

const PERSONA: &str =
    "You are an Invoice Processing Agent, specialized in handling and storing invoice data.";

const PROCESS_INVOICES: &str = "Your goal is to process invoices by extracting their data and storing it properly.
For each invoice:
1. Extract all important information including numbers, dates, amounts, and line items
2. Store the extracted data indexed by invoice number
3. Provide confirmation of successful processing
4. Handle any errors appropriately";

pub fn invoice_goals() -> Vec<Goal> {
    vec![
        Goal::new("Persona", PERSONA),
        Goal::new("Process Invoices", PROCESS_INVOICES),
    ]
}

/// Registry holding the invoice extraction and storage tools, both backed by
/// `provider`.
pub fn invoice_tool_registry(provider: Arc<dyn Provider>) -> Arc<ToolRegistry> {
    let registry = Arc::new(ToolRegistry::new());
    register_invoice_tools(&registry, JsonExtractor::new(provider));
    registry
}

pub fn create_invoice_agent(
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    context: Context,
) -> Agent {
    Agent::new(provider, tool_registry, invoice_goals())
        .with_environment(Environment::with_context(context))
}

/// Prompt handed to the agent for one invoice document.
pub fn process_prompt(document_text: &str) -> String {
    format!("Please process the following invoice and store it:\n\n{document_text}")
}
