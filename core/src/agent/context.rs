use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Shared working memory handed to tools during dispatch.
///
/// Last write wins; there is no locking. Hosts that share one context between
/// several agents must serialize access themselves.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    data: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.data.get(key).cloned().unwrap_or(default)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({})", Value::Object(self.data.clone()))
    }
}

/// Execution environment of one agent. Owns the agent's [`Context`].
#[derive(Debug, Default)]
pub struct Environment {
    context: Context,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn into_context(self) -> Context {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_key_is_none() {
        let ctx = Context::new();
        assert!(ctx.get("missing").is_none());
        assert_eq!(ctx.get_or("missing", json!(42)), json!(42));
    }

    #[test]
    fn initial_data_is_visible() {
        let mut data = Map::new();
        data.insert("key".into(), json!("value"));
        let ctx = Context::with_data(data);
        assert_eq!(ctx.get("key"), Some(&json!("value")));
        assert!(ctx.contains("key"));
        assert!(!ctx.contains("other"));
    }

    #[test]
    fn latest_set_wins() {
        let mut ctx = Context::new();
        let writes = [json!(1), json!("two"), json!({"three": 3}), json!([4])];
        for value in writes {
            ctx.set("key", value.clone());
            assert_eq!(ctx.get("key"), Some(&value));
        }
        ctx.set("other", json!(null));
        assert_eq!(ctx.get("key"), Some(&json!([4])));
    }

    #[test]
    fn nested_values_mutate_in_place() {
        let mut ctx = Context::new();
        ctx.set("data", json!({"inner": []}));
        ctx.get_mut("data")
            .and_then(|v| v.get_mut("inner"))
            .and_then(Value::as_array_mut)
            .unwrap()
            .push(json!(1));
        assert_eq!(ctx.get("data").unwrap()["inner"], json!([1]));
    }

    #[test]
    fn debug_names_the_type() {
        let mut ctx = Context::new();
        ctx.set("a", json!(1));
        let rendered = format!("{ctx:?}");
        assert!(rendered.starts_with("Context("));
        assert!(rendered.contains("\"a\""));
    }

    #[test]
    fn environment_keeps_its_context() {
        let mut env = Environment::new();
        env.context_mut().set("key", json!("val"));
        assert_eq!(env.context().get("key"), Some(&json!("val")));
        assert_eq!(env.into_context().get("key"), Some(&json!("val")));
    }
}
