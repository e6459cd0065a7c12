pub mod agent;
pub mod config;
pub mod extract;
pub mod invoices;
pub mod providers;
pub mod server;
pub mod tools;
pub mod traits;

pub use agent::{Agent, Context, Environment, Goal, ToolRegistry};
pub use config::*;
pub use extract::{ExtractError, JsonExtractor};
pub use invoices::*;
pub use providers::*;
pub use tools::*;
pub use traits::*;
