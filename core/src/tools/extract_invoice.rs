use crate::agent::Context;
use crate::extract::{ExtractError, JsonExtractor};
use crate::tools::extract_string_arg;
use crate::traits::{ParamKind, ParamSpec, Tool, ToolArgs};
use async_trait::async_trait;
use serde_json::{Map, Value, json};

pub fn invoice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "invoice_number": {"type": "string"},
            "date": {"type": "string"},
            "total_amount": {"type": "number"},
            "vendor": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "address": {"type": "string"}
                }
            },
            "line_items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "description": {"type": "string"},
                        "quantity": {"type": "number"},
                        "unit_price": {"type": "number"},
                        "total": {"type": "number"}
                    }
                }
            }
        },
        "required": ["invoice_number", "date", "total_amount"]
    })
}

pub fn extraction_prompt(document_text: &str) -> String {
    format!(
        "Extract the invoice details from the document below.\n\
         Capture the invoice number, invoice date, total amount, vendor name and address, \
         and every line item with its description, quantity, unit price and line total.\n\
         Use plain numbers for amounts, without currency symbols or thousands separators.\n\n\
         <invoice>\n{document_text}\n</invoice>"
    )
}

pub async fn extract_invoice_data(
    extractor: &JsonExtractor,
    document_text: &str,
) -> Result<Map<String, Value>, ExtractError> {
    extractor
        .extract(&invoice_schema(), &extraction_prompt(document_text))
        .await
}

pub struct ExtractInvoiceTool {
    extractor: JsonExtractor,
    tags: Vec<String>,
}

impl ExtractInvoiceTool {
    pub fn new(extractor: JsonExtractor) -> Self {
        Self {
            extractor,
            tags: vec!["document_processing".into(), "invoices".into()],
        }
    }
}

#[async_trait]
impl Tool for ExtractInvoiceTool {
    fn name(&self) -> &str {
        "extract_invoice_data"
    }

    fn description(&self) -> &str {
        "Extract structured invoice data (number, date, total, vendor, line items) from raw invoice text"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("document_text", ParamKind::Text)]
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    async fn execute(&self, args: ToolArgs, _context: Option<&mut Context>) -> anyhow::Result<Value> {
        let text = extract_string_arg(&args, "document_text")?;
        let data = extract_invoice_data(&self.extractor, &text).await?;
        Ok(Value::Object(data))
    }
}
