use crate::agent::Context;
use crate::invoices::storage;
use crate::traits::{ParamKind, ParamSpec, Tool, ToolArgs};
use async_trait::async_trait;
use serde_json::Value;

pub struct StoreInvoiceTool {
    tags: Vec<String>,
}

impl Default for StoreInvoiceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInvoiceTool {
    pub fn new() -> Self {
        Self {
            tags: vec!["storage".into(), "invoices".into()],
        }
    }
}

#[async_trait]
impl Tool for StoreInvoiceTool {
    fn name(&self) -> &str {
        "store_invoice"
    }

    fn description(&self) -> &str {
        "Store extracted invoice data, indexed by its invoice number. Storing the same invoice number again replaces the earlier record"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::context(),
            ParamSpec::required("invoice_data", ParamKind::Object),
        ]
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    async fn execute(&self, args: ToolArgs, context: Option<&mut Context>) -> anyhow::Result<Value> {
        let context =
            context.ok_or_else(|| anyhow::anyhow!("store_invoice requires the shared context"))?;
        let invoice = match args.get("invoice_data") {
            Some(Value::Object(map)) => map.clone(),
            _ => anyhow::bail!("'invoice_data' must be an object"),
        };
        Ok(storage::store_invoice(context, invoice)?)
    }
}
