use crate::invoices::InvoiceData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ProcessInvoiceRequest {
    pub document_text: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProcessInvoiceResponse {
    pub status: &'static str,
    pub message: String,
    pub invoice_number: String,
    pub invoice_data: InvoiceData,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Value>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteInvoiceResponse {
    pub status: &'static str,
    pub message: String,
    pub invoice_number: String,
}

#[derive(Debug, Serialize)]
pub struct AgentProcessResponse {
    pub status: &'static str,
    pub agent_response: String,
    pub stored_invoices: Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
