pub mod context;
pub mod goal;
pub mod loop_;
pub mod registry;
pub mod schema;

pub use context::{Context, Environment};
pub use goal::{Goal, build_system_prompt};
pub use loop_::{Agent, DEFAULT_MAX_ITERATIONS, DispatchError, MAX_ITERATIONS_MESSAGE, wrap_result};
pub use registry::ToolRegistry;
pub use schema::{format_tool, format_tools};
