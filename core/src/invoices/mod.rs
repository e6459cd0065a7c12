pub mod agent;
pub mod models;
pub mod storage;

pub use agent::{create_invoice_agent, invoice_goals, invoice_tool_registry, process_prompt};
pub use models::{InvoiceData, LineItem, Vendor};
pub use storage::{INVOICE_STORAGE_KEY, StorageError};
