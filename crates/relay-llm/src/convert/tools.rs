//! Tool declarations, tool choice, and JSON schema normalization

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::protocol::openai::{AllowedTools, AllowedToolsMode, FunctionTool, ToolChoice, ToolChoiceMode, ToolReference};
use crate::types::{FunctionCallingMode, FunctionDeclaration, GenerateContentConfig, ToolConfig};

/// Serialize a schema-like value into a JSON object
///
/// Shared by tool parameters and structured output formats.
///
/// # Errors
///
/// Returns [`LlmError::EmptyJsonSchema`] for a null value and
/// [`LlmError::InvalidSchema`] for anything other than an object.
pub fn normalize_schema<T: Serialize + ?Sized>(schema: &T) -> Result<Map<String, Value>, LlmError> {
    let value = serde_json::to_value(schema).map_err(|source| LlmError::Serialization {
        what: "schema",
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(LlmError::EmptyJsonSchema),
        Value::Bool(_) => Err(LlmError::InvalidSchema("boolean")),
        Value::Number(_) => Err(LlmError::InvalidSchema("number")),
        Value::String(_) => Err(LlmError::InvalidSchema("string")),
        Value::Array(_) => Err(LlmError::InvalidSchema("array")),
    }
}

/// Convert the tools of a generation config into function tools
///
/// # Errors
///
/// Fails on tools declaring a built-in capability, tools without
/// functions, and declarations without a name.
pub fn convert_tools(config: &GenerateContentConfig) -> Result<Vec<FunctionTool>, LlmError> {
    let mut out = Vec::new();

    for (index, tool) in config.tools.iter().enumerate() {
        if let Some(capability) = tool.builtin_capability() {
            return Err(LlmError::NonFunctionTool { index, capability });
        }
        if tool.function_declarations.is_empty() {
            return Err(LlmError::ToolWithoutFunctions { index });
        }

        for (decl_index, decl) in tool.function_declarations.iter().enumerate() {
            out.push(convert_declaration(index, decl_index, decl)?);
        }
    }

    Ok(out)
}

fn convert_declaration(tool: usize, index: usize, decl: &FunctionDeclaration) -> Result<FunctionTool, LlmError> {
    if decl.name.is_empty() {
        return Err(LlmError::FunctionDeclarationMissingName { tool, index });
    }

    let parameters = if let Some(schema) = &decl.parameters {
        normalize_schema(schema)?
    } else if let Some(schema) = &decl.parameters_json_schema {
        normalize_schema(schema)?
    } else {
        empty_object_schema()
    };

    Ok(FunctionTool {
        tool_type: "function".to_owned(),
        name: decl.name.clone(),
        description: (!decl.description.is_empty()).then(|| decl.description.clone()),
        parameters,
        strict: true,
    })
}

fn empty_object_schema() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_owned(), json!("object"));
    map.insert("properties".to_owned(), json!({}));
    map
}

/// Convert a tool config into a Responses API tool choice
///
/// Returns `None` when the config leaves the choice to the backend.
///
/// # Errors
///
/// Returns [`LlmError::UnsupportedToolMode`] for modes without an equivalent.
pub fn convert_tool_choice(config: &ToolConfig) -> Result<Option<ToolChoice>, LlmError> {
    let Some(calling) = &config.function_calling_config else {
        return Ok(None);
    };

    let allowed: Vec<&str> = calling
        .allowed_function_names
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect();

    match calling.mode {
        FunctionCallingMode::Unspecified | FunctionCallingMode::Auto => {
            Ok(allowed_tools(AllowedToolsMode::Auto, &allowed))
        }
        FunctionCallingMode::None => Ok(Some(ToolChoice::Mode(ToolChoiceMode::None))),
        FunctionCallingMode::Any if calling.allowed_function_names.is_empty() => {
            Ok(Some(ToolChoice::Mode(ToolChoiceMode::Required)))
        }
        FunctionCallingMode::Any => Ok(allowed_tools(AllowedToolsMode::Required, &allowed)),
        FunctionCallingMode::Validated => Err(LlmError::UnsupportedToolMode(calling.mode.as_str().to_owned())),
    }
}

fn allowed_tools(mode: AllowedToolsMode, names: &[&str]) -> Option<ToolChoice> {
    if names.is_empty() {
        return None;
    }

    Some(ToolChoice::Allowed(AllowedTools {
        choice_type: "allowed_tools".to_owned(),
        mode,
        tools: names
            .iter()
            .map(|name| ToolReference {
                tool_type: "function".to_owned(),
                name: (*name).to_owned(),
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{FunctionCallingConfig, Schema, SchemaType, Tool};

    fn declaration(name: &str) -> FunctionDeclaration {
        FunctionDeclaration {
            name: name.to_owned(),
            ..FunctionDeclaration::default()
        }
    }

    fn config_with(tools: Vec<Tool>) -> GenerateContentConfig {
        GenerateContentConfig {
            tools,
            ..GenerateContentConfig::default()
        }
    }

    fn choice(mode: FunctionCallingMode, names: &[&str]) -> Option<ToolChoice> {
        convert_tool_choice(&ToolConfig {
            function_calling_config: Some(FunctionCallingConfig {
                mode,
                allowed_function_names: names.iter().map(|n| (*n).to_owned()).collect(),
            }),
        })
        .unwrap()
    }

    #[test]
    fn normalize_schema_rejects_null_and_scalars() {
        assert!(matches!(normalize_schema(&Value::Null), Err(LlmError::EmptyJsonSchema)));
        assert!(matches!(normalize_schema(&json!([1])), Err(LlmError::InvalidSchema("array"))));
        assert_eq!(normalize_schema(&json!({"type": "string"})).unwrap()["type"], "string");
    }

    #[test]
    fn native_schema_keeps_property_order() {
        let schema = Schema::object([
            ("zeta".to_owned(), Schema::of(SchemaType::String)),
            ("alpha".to_owned(), Schema::of(SchemaType::Integer)),
        ]);
        let map = normalize_schema(&schema).unwrap();
        let keys: Vec<&String> = map["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn declarations_become_strict_function_tools() {
        let mut with_params = declaration("get_weather");
        with_params.description = "Look up weather".to_owned();
        with_params.parameters = Some(Schema::object([(
            "city".to_owned(),
            Schema::of(SchemaType::String),
        )]));
        let mut with_json = declaration("raw");
        with_json.parameters_json_schema = Some(json!({"type": "object", "properties": {"q": {"type": "string"}}}));

        let tools = convert_tools(&config_with(vec![Tool::functions(vec![
            with_params,
            with_json,
            declaration("bare"),
        ])]))
        .unwrap();

        assert_eq!(tools.len(), 3);
        assert!(tools.iter().all(|t| t.strict && t.tool_type == "function"));
        assert_eq!(tools[0].description.as_deref(), Some("Look up weather"));
        assert_eq!(tools[0].parameters["properties"]["city"]["type"], "string");
        assert_eq!(tools[1].parameters["properties"]["q"]["type"], "string");
        assert!(tools[2].description.is_none());
        assert_eq!(
            Value::Object(tools[2].parameters.clone()),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn builtin_capability_is_rejected_with_index() {
        let search = Tool {
            web_search: Some(json!({})),
            ..Tool::functions(vec![declaration("f")])
        };
        let err = convert_tools(&config_with(vec![Tool::functions(vec![declaration("ok")]), search])).unwrap_err();
        assert!(matches!(
            err,
            LlmError::NonFunctionTool {
                index: 1,
                capability: "web_search"
            }
        ));
    }

    #[test]
    fn tool_without_functions_is_rejected() {
        let err = convert_tools(&config_with(vec![Tool::default()])).unwrap_err();
        assert!(matches!(err, LlmError::ToolWithoutFunctions { index: 0 }));
    }

    #[test]
    fn declaration_needs_name() {
        let err = convert_tools(&config_with(vec![Tool::functions(vec![declaration("a"), declaration("")])]))
            .unwrap_err();
        assert!(matches!(err, LlmError::FunctionDeclarationMissingName { tool: 0, index: 1 }));
    }

    #[test]
    fn auto_without_names_leaves_choice_unset() {
        assert_eq!(choice(FunctionCallingMode::Auto, &[]), None);
        assert_eq!(choice(FunctionCallingMode::Unspecified, &[]), None);
        assert_eq!(convert_tool_choice(&ToolConfig::default()).unwrap(), None);
    }

    #[test]
    fn auto_with_names_allows_subset() {
        let Some(ToolChoice::Allowed(allowed)) = choice(FunctionCallingMode::Auto, &["a", "", "b"]) else {
            panic!("expected allowed tools");
        };
        assert_eq!(allowed.mode, AllowedToolsMode::Auto);
        let names: Vec<&str> = allowed.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn any_maps_to_required() {
        assert_eq!(
            choice(FunctionCallingMode::Any, &[]),
            Some(ToolChoice::Mode(ToolChoiceMode::Required))
        );
        let Some(ToolChoice::Allowed(allowed)) = choice(FunctionCallingMode::Any, &["a"]) else {
            panic!("expected allowed tools");
        };
        assert_eq!(allowed.mode, AllowedToolsMode::Required);
    }

    #[test]
    fn any_with_only_empty_names_has_no_constraint() {
        assert_eq!(choice(FunctionCallingMode::Any, &[""]), None);
    }

    #[test]
    fn none_and_validated_modes() {
        assert_eq!(
            choice(FunctionCallingMode::None, &["a"]),
            Some(ToolChoice::Mode(ToolChoiceMode::None))
        );
        let err = convert_tool_choice(&ToolConfig {
            function_calling_config: Some(FunctionCallingConfig {
                mode: FunctionCallingMode::Validated,
                allowed_function_names: Vec::new(),
            }),
        })
        .unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedToolMode(mode) if mode == "VALIDATED"));
    }
}
