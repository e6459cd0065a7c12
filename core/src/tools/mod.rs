use crate::extract::JsonExtractor;
use crate::agent::ToolRegistry;
use crate::traits::ToolArgs;
use std::sync::Arc;

pub mod extract_invoice;
pub mod function;
pub mod store_invoice;

pub use extract_invoice::{ExtractInvoiceTool, extract_invoice_data, extraction_prompt, invoice_schema};
pub use function::FnTool;
pub use store_invoice::StoreInvoiceTool;

pub fn extract_string_arg(args: &ToolArgs, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

/// Registers the invoice extraction and storage tools.
pub fn register_invoice_tools(registry: &ToolRegistry, extractor: JsonExtractor) {
    registry.register(Arc::new(ExtractInvoiceTool::new(extractor)));
    registry.register(Arc::new(StoreInvoiceTool::new()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::scripted::ScriptedProvider;
    use serde_json::json;

    #[test]
    fn string_args() {
        let mut args = ToolArgs::new();
        args.insert("path".into(), json!("a.txt"));
        args.insert("count".into(), json!(3));

        assert_eq!(extract_string_arg(&args, "path").unwrap(), "a.txt");
        let err = extract_string_arg(&args, "count").unwrap_err();
        assert_eq!(err.to_string(), "Missing 'count' parameter");
        assert!(extract_string_arg(&args, "mode").is_err());
    }

    #[test]
    fn invoice_tools_carry_tags() {
        let registry = ToolRegistry::new();
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        register_invoice_tools(&registry, JsonExtractor::new(provider));

        assert!(registry.contains("extract_invoice_data"));
        assert!(registry.contains("store_invoice"));
        assert_eq!(registry.list_by_tag("invoices").len(), 2);
        assert_eq!(registry.list_by_tag("storage").len(), 1);
        assert_eq!(registry.list_by_tag("document_processing").len(), 1);

        for spec in registry.get_specs() {
            assert!(spec.parameters["properties"].get("context").is_none());
        }
    }
}
