use super::dto::{
    AgentProcessResponse, DeleteInvoiceResponse, HealthResponse, InvoiceListResponse,
    ProcessInvoiceRequest, ProcessInvoiceResponse,
};
use super::error::ApiError;
use super::state::AppState;
use crate::invoices::{InvoiceData, StorageError, create_invoice_agent, process_prompt, storage};
use crate::tools::extract_invoice_data;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::Value;
use tracing::{error, info};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "invoice-processing-agent",
    })
}

/// Unwraps a request body, turning malformed JSON and empty text into 422s
/// with the usual `detail` body.
fn read_payload(
    payload: Result<Json<ProcessInvoiceRequest>, JsonRejection>,
) -> Result<ProcessInvoiceRequest, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        ApiError::Unprocessable(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    if payload.document_text.trim().is_empty() {
        return Err(ApiError::Unprocessable(
            "document_text must not be empty".to_string(),
        ));
    }
    Ok(payload)
}

/// Extracts and stores one invoice without going through the agent loop.
pub async fn process_invoice(
    State(state): State<AppState>,
    payload: Result<Json<ProcessInvoiceRequest>, JsonRejection>,
) -> Result<Json<ProcessInvoiceResponse>, ApiError> {
    let payload = read_payload(payload)?;

    let mut extracted = extract_invoice_data(state.extractor(), &payload.document_text)
        .await
        .map_err(|e| {
            error!(error = %e, "Invoice extraction failed");
            ApiError::Extraction(format!("{e:#}"))
        })?;

    let invoice_number = match storage::invoice_number(&extracted) {
        Ok(number) => number,
        Err(StorageError::MissingInvoiceNumber) => {
            return Err(ApiError::Unprocessable(
                "Could not extract an invoice number from the provided text".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    extracted.insert(
        "invoice_number".to_string(),
        Value::String(invoice_number.clone()),
    );

    let invoice_data: InvoiceData = serde_json::from_value(Value::Object(extracted.clone()))
        .map_err(|e| ApiError::Unprocessable(format!("Extracted invoice data is incomplete: {e}")))?;

    let receipt = storage::store_invoice(&mut *state.context().lock().await, extracted)?;
    info!(invoice_number = %invoice_number, "Processed invoice");

    Ok(Json(ProcessInvoiceResponse {
        status: "success",
        message: receipt["message"].as_str().unwrap_or_default().to_string(),
        invoice_number,
        invoice_data,
    }))
}

pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = storage::list_invoices(&*state.context().lock().await)?;
    Ok(Json(InvoiceListResponse {
        count: invoices.len(),
        invoices,
    }))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<Json<Value>, ApiError> {
    storage::get_invoice(&*state.context().lock().await, &invoice_number)?
        .map(Json)
        .ok_or(ApiError::InvoiceNotFound(invoice_number))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_number): Path<String>,
) -> Result<Json<DeleteInvoiceResponse>, ApiError> {
    let removed = storage::delete_invoice(&mut *state.context().lock().await, &invoice_number)?;
    if removed.is_none() {
        return Err(ApiError::InvoiceNotFound(invoice_number));
    }

    Ok(Json(DeleteInvoiceResponse {
        status: "success",
        message: format!("Deleted invoice {invoice_number}"),
        invoice_number,
    }))
}

/// Runs the full agent loop over a copy of the shared context, then merges
/// whatever the agent stored back into it. The lock is not held while the
/// model is working.
pub async fn agent_process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessInvoiceRequest>, JsonRejection>,
) -> Result<Json<AgentProcessResponse>, ApiError> {
    let payload = read_payload(payload)?;

    let seed = state.context().lock().await.clone();
    let before = storage::snapshot(&seed)?;

    let mut agent = create_invoice_agent(state.provider(), state.tool_registry(), seed)
        .with_max_iterations(state.max_iterations());
    let agent_response = agent
        .process(&process_prompt(&payload.document_text))
        .await
        .map_err(|e| {
            error!(error = %e, "Agent run failed");
            ApiError::Agent(format!("{e:#}"))
        })?;

    let stored_invoices = storage::snapshot(agent.context())?;
    if let Value::Object(records) = &stored_invoices {
        let mut shared = state.context().lock().await;
        for (number, record) in records {
            if before.get(number) == Some(record) {
                continue;
            }
            if let Value::Object(record) = record {
                storage::store_invoice(&mut shared, record.clone())?;
            }
        }
    }

    Ok(Json(AgentProcessResponse {
        status: "success",
        agent_response,
        stored_invoices,
    }))
}
