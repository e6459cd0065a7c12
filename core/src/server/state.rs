use crate::agent::{Context, DEFAULT_MAX_ITERATIONS, ToolRegistry};
use crate::extract::JsonExtractor;
use crate::invoices::invoice_tool_registry;
use crate::traits::Provider;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything a request handler needs. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    context: Arc<Mutex<Context>>,
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    extractor: JsonExtractor,
    max_iterations: usize,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            context: Arc::new(Mutex::new(Context::new())),
            tool_registry: invoice_tool_registry(provider.clone()),
            extractor: JsonExtractor::new(provider.clone()),
            provider,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn context(&self) -> &Mutex<Context> {
        &self.context
    }

    pub fn provider(&self) -> Arc<dyn Provider> {
        Arc::clone(&self.provider)
    }

    pub fn tool_registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.tool_registry)
    }

    pub fn extractor(&self) -> &JsonExtractor {
        &self.extractor
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
