use crate::traits::{Tool, ToolSpec};
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub fn format_tool<T: Tool + ?Sized>(tool: &T) -> ToolSpec {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in tool.params().iter().filter(|p| !p.is_context()) {
        properties.insert(param.name.clone(), json!({ "type": param.kind.json_type() }));
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    ToolSpec {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

pub fn format_tools(tools: &[Arc<dyn Tool>]) -> Vec<ToolSpec> {
    tools.iter().map(|t| format_tool(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FnTool;
    use crate::traits::{ParamKind, ParamSpec};

    fn noop(name: &str, params: Vec<ParamSpec>) -> Arc<dyn Tool> {
        Arc::new(FnTool::new(name, "Does nothing.", params, |_, _| Ok(Value::Null)))
    }

    #[test]
    fn formats_add_tool() {
        let add = noop(
            "add",
            vec![
                ParamSpec::required("a", ParamKind::Integer),
                ParamSpec::required("b", ParamKind::Integer),
            ],
        );
        let spec = format_tool(add.as_ref());
        assert_eq!(spec.name, "add");
        assert_eq!(spec.description, "Does nothing.");
        assert_eq!(
            spec.parameters,
            json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
                "required": ["a", "b"],
            })
        );
    }

    #[test]
    fn skips_context_param() {
        let tool = noop(
            "ctx_tool",
            vec![
                ParamSpec::context(),
                ParamSpec::required("value", ParamKind::Text),
            ],
        );
        let spec = format_tool(tool.as_ref());
        let props = spec.parameters["properties"].as_object().unwrap();
        assert!(!props.contains_key("context"));
        assert!(props.contains_key("value"));
        assert_eq!(spec.parameters["required"], json!(["value"]));
    }

    #[test]
    fn maps_every_kind() {
        let tool = noop(
            "typed",
            vec![
                ParamSpec::required("s", ParamKind::Text),
                ParamSpec::required("i", ParamKind::Integer),
                ParamSpec::required("f", ParamKind::Number),
                ParamSpec::required("b", ParamKind::Boolean),
                ParamSpec::required("d", ParamKind::Object),
                ParamSpec::required("l", ParamKind::List),
                ParamSpec::required("x", ParamKind::Any),
            ],
        );
        let props = format_tool(tool.as_ref()).parameters["properties"].clone();
        let types: Vec<(&str, &str)> = vec![
            ("s", "string"),
            ("i", "integer"),
            ("f", "number"),
            ("b", "boolean"),
            ("d", "object"),
            ("l", "array"),
            ("x", "string"),
        ];
        for (name, ty) in types {
            assert_eq!(props[name]["type"], ty, "param {name}");
        }
    }

    #[test]
    fn optional_params_not_required() {
        let tool = noop(
            "search",
            vec![
                ParamSpec::required("query", ParamKind::Text),
                ParamSpec::optional("limit", ParamKind::Integer),
            ],
        );
        let spec = format_tool(tool.as_ref());
        assert_eq!(spec.parameters["required"], json!(["query"]));
        assert!(spec.parameters["properties"]["limit"].is_object());
    }

    #[test]
    fn every_tool_gets_a_declaration() {
        let tools = vec![
            noop("one", vec![ParamSpec::context()]),
            noop("two", vec![ParamSpec::required("x", ParamKind::Text)]),
        ];
        for spec in format_tools(&tools) {
            let props = spec.parameters["properties"].as_object().unwrap();
            assert!(!props.contains_key("context"));
            let required = spec.parameters["required"].as_array().unwrap();
            for name in props.keys() {
                assert!(required.contains(&json!(name)));
            }
        }
    }
}
