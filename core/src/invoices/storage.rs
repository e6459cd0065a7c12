//! Invoice records kept in a [`Context`] under [`INVOICE_STORAGE_KEY`].
//!
//! The context is process memory only; nothing here survives a restart.

use crate::agent::Context;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::info;

pub const INVOICE_STORAGE_KEY: &str = "invoice_storage";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invoice data must include a non-empty invoice number")]
    MissingInvoiceNumber,
    #[error("invoice number must be a string or a number, got {0}")]
    InvalidInvoiceNumber(String),
    #[error("context key 'invoice_storage' holds a non-mapping value")]
    NotAMapping,
}

/// Storage key of a record. Numeric invoice numbers are keyed by their
/// decimal text.
pub fn invoice_number(invoice: &Map<String, Value>) -> Result<String, StorageError> {
    match invoice.get("invoice_number") {
        None | Some(Value::Null) => Err(StorageError::MissingInvoiceNumber),
        Some(Value::String(n)) if n.is_empty() => Err(StorageError::MissingInvoiceNumber),
        Some(Value::String(n)) => Ok(n.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(StorageError::InvalidInvoiceNumber(other.to_string())),
    }
}

fn storage(ctx: &Context) -> Result<Option<&Map<String, Value>>, StorageError> {
    match ctx.get(INVOICE_STORAGE_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(StorageError::NotAMapping),
    }
}

fn storage_mut(ctx: &mut Context) -> Result<&mut Map<String, Value>, StorageError> {
    let uninitialized = match ctx.get(INVOICE_STORAGE_KEY) {
        None | Some(Value::Null) => true,
        Some(Value::Object(_)) => false,
        Some(_) => return Err(StorageError::NotAMapping),
    };
    if uninitialized {
        ctx.set(INVOICE_STORAGE_KEY, Value::Object(Map::new()));
    }
    match ctx.get_mut(INVOICE_STORAGE_KEY) {
        Some(Value::Object(map)) => Ok(map),
        _ => Err(StorageError::NotAMapping),
    }
}

/// Stores (or replaces) an invoice keyed by its invoice number.
///
/// Validation happens before the context is touched, so a rejected record
/// leaves storage exactly as it was.
///
/// The stored record's `invoice_number` is rewritten to the key it is stored
/// under.
pub fn store_invoice(ctx: &mut Context, mut invoice: Map<String, Value>) -> Result<Value, StorageError> {
    let number = invoice_number(&invoice)?;
    invoice.insert("invoice_number".to_string(), Value::String(number.clone()));

    let storage = storage_mut(ctx)?;
    let replaced = storage.insert(number.clone(), Value::Object(invoice)).is_some();
    info!(invoice_number = %number, replaced, "Stored invoice");

    Ok(json!({
        "status": "success",
        "message": format!("Stored invoice {number}"),
        "invoice_number": number,
    }))
}

pub fn list_invoices(ctx: &Context) -> Result<Vec<Value>, StorageError> {
    Ok(storage(ctx)?
        .map(|s| s.values().cloned().collect())
        .unwrap_or_default())
}

pub fn get_invoice(ctx: &Context, number: &str) -> Result<Option<Value>, StorageError> {
    Ok(storage(ctx)?.and_then(|s| s.get(number).cloned()))
}

pub fn delete_invoice(ctx: &mut Context, number: &str) -> Result<Option<Value>, StorageError> {
    if storage(ctx)?.is_none() {
        return Ok(None);
    }
    let removed = storage_mut(ctx)?.remove(number);
    if removed.is_some() {
        info!(invoice_number = %number, "Deleted invoice");
    }
    Ok(removed)
}

/// The whole storage mapping, or an empty object when nothing was stored.
pub fn snapshot(ctx: &Context) -> Result<Value, StorageError> {
    Ok(Value::Object(storage(ctx)?.cloned().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn stores_new_invoice() {
        let mut ctx = Context::new();
        let inv = invoice(json!({"invoice_number": "INV-001", "total_amount": 100}));
        let receipt = store_invoice(&mut ctx, inv.clone()).unwrap();

        assert_eq!(receipt["status"], "success");
        assert_eq!(receipt["invoice_number"], "INV-001");
        assert!(receipt["message"].as_str().unwrap().contains("INV-001"));
        assert_eq!(ctx.get(INVOICE_STORAGE_KEY).unwrap()["INV-001"], Value::Object(inv));
    }

    #[test]
    fn stores_multiple_invoices() {
        let mut ctx = Context::new();
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "INV-001", "total_amount": 100}))).unwrap();
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "INV-002", "total_amount": 200}))).unwrap();
        assert_eq!(list_invoices(&ctx).unwrap().len(), 2);
    }

    #[test]
    fn second_write_replaces_first() {
        let mut ctx = Context::new();
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "INV-1", "total": 100}))).unwrap();
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "INV-1", "total": 150}))).unwrap();

        let all = list_invoices(&ctx).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["invoice_number"], "INV-1");
        assert_eq!(all[0]["total"], 150);
    }

    #[test]
    fn rejects_missing_empty_or_null_number() {
        let bad = [
            json!({"total_amount": 100}),
            json!({"invoice_number": "", "total_amount": 100}),
            json!({"invoice_number": null, "total_amount": 100}),
        ];
        for record in bad {
            let mut ctx = Context::new();
            let err = store_invoice(&mut ctx, invoice(record)).unwrap_err();
            assert!(matches!(err, StorageError::MissingInvoiceNumber));
            assert!(err.to_string().contains("invoice number"));
            assert!(!ctx.contains(INVOICE_STORAGE_KEY));
        }
    }

    #[test]
    fn numeric_and_blank_numbers_are_keys() {
        let mut ctx = Context::new();
        let receipt = store_invoice(&mut ctx, invoice(json!({"invoice_number": 123, "total_amount": 5}))).unwrap();
        assert_eq!(receipt["invoice_number"], "123");
        assert_eq!(get_invoice(&ctx, "123").unwrap().unwrap()["invoice_number"], "123");

        store_invoice(&mut ctx, invoice(json!({"invoice_number": "   "}))).unwrap();
        assert!(get_invoice(&ctx, "   ").unwrap().is_some());
    }

    #[test]
    fn non_scalar_number_has_its_own_error() {
        let mut ctx = Context::new();
        let err = store_invoice(&mut ctx, invoice(json!({"invoice_number": ["A"]}))).unwrap_err();
        assert!(matches!(err, StorageError::InvalidInvoiceNumber(_)));
        assert!(err.to_string().contains("string or a number"));
        assert!(!ctx.contains(INVOICE_STORAGE_KEY));
    }

    #[test]
    fn rejection_leaves_existing_storage_untouched() {
        let mut ctx = Context::new();
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "A", "total_amount": 1}))).unwrap();
        let before = snapshot(&ctx).unwrap();
        assert!(store_invoice(&mut ctx, invoice(json!({"invoice_number": ""}))).is_err());
        assert_eq!(snapshot(&ctx).unwrap(), before);
    }

    #[test]
    fn keeps_pre_existing_storage() {
        let mut ctx = Context::new();
        ctx.set(
            INVOICE_STORAGE_KEY,
            json!({"EXISTING-001": {"invoice_number": "EXISTING-001", "total_amount": 50}}),
        );
        store_invoice(&mut ctx, invoice(json!({"invoice_number": "NEW-001", "total_amount": 100}))).unwrap();
        assert!(get_invoice(&ctx, "EXISTING-001").unwrap().is_some());
        assert!(get_invoice(&ctx, "NEW-001").unwrap().is_some());
    }

    #[test]
    fn refuses_non_mapping_storage() {
        let mut ctx = Context::new();
        ctx.set(INVOICE_STORAGE_KEY, json!("oops"));
        let err = store_invoice(&mut ctx, invoice(json!({"invoice_number": "A"}))).unwrap_err();
        assert!(matches!(err, StorageError::NotAMapping));
        assert_eq!(ctx.get(INVOICE_STORAGE_KEY), Some(&json!("oops")));
    }

    #[test]
    fn delete_removes_record() {
        let mut ctx = Context::new();
        assert!(delete_invoice(&mut ctx, "A").unwrap().is_none());
        assert!(!ctx.contains(INVOICE_STORAGE_KEY));

        store_invoice(&mut ctx, invoice(json!({"invoice_number": "A"}))).unwrap();
        assert!(delete_invoice(&mut ctx, "A").unwrap().is_some());
        assert!(get_invoice(&ctx, "A").unwrap().is_none());
        assert_eq!(snapshot(&ctx).unwrap(), json!({}));
    }
}
